use crate::{opts::LabelArgs, runner::TraceRunner};
use eyre::{Result, WrapErr};
use labeler_evm::{
    extract_addresses_from_file, resolve_labels, EtherscanIdentifier, LabelMap, NameCache,
    NameResolver, Pacing, ReplayCommand, SourcifyIdentifier,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What a labeling run produced.
#[derive(Clone, Debug)]
pub struct Outcome {
    /// The replay script that was written.
    pub script: PathBuf,
    pub labels: LabelMap,
    /// Number of rate limit pauses taken while resolving.
    pub pauses: usize,
}

impl LabelArgs {
    /// Runs the whole pipeline against Etherscan and Sourcify.
    pub async fn run(self) -> Result<Outcome> {
        let etherscan = EtherscanIdentifier::for_chain_id(self.chain, self.api_key.clone())?;
        let sourcify = SourcifyIdentifier::new(self.chain)?;
        self.run_with(NameResolver::new(etherscan, sourcify), Pacing::default()).await
    }

    /// Runs the pipeline with the given resolver: trace, extract, resolve, write the script.
    pub async fn run_with(self, resolver: NameResolver, pacing: Pacing) -> Result<Outcome> {
        if self.skip_trace {
            info!("Reusing existing trace output {}", self.trace_file.display());
        } else {
            TraceRunner::new(&self.cast_bin, &self.rpc_url).run(&self.tx_hash, &self.trace_file)?;
        }

        let addresses = extract_addresses_from_file(&self.trace_file)?;
        info!("Found {} unique Ethereum addresses.", addresses.len());
        if addresses.is_empty() {
            warn!(
                "No addresses found in {}; the replay command will carry no labels",
                self.trace_file.display()
            );
        }

        let mut cache: NameCache = self
            .known_labels
            .into_iter()
            .map(|label| (label.address, label.name))
            .collect();
        let report = resolve_labels(&addresses, &resolver, &mut cache, pacing).await;

        let command =
            ReplayCommand::new(self.tx_hash).rpc_url(self.rpc_url).cast_bin(self.cast_bin);
        write_script(&self.out, &command.script(&report.labels))?;

        Ok(Outcome { script: self.out, labels: report.labels, pauses: report.pauses })
    }
}

/// Writes `contents` to `path` and marks it executable.
fn write_script(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)
        .wrap_err_with(|| format!("failed to write replay script {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .wrap_err_with(|| format!("failed to make {} executable", path.display()))?;
    }

    Ok(())
}
