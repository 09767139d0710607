use eyre::{Result, WrapErr};
use std::{
    fs::File,
    path::Path,
    process::{Command, ExitStatus, Stdio},
};
use tracing::{info, warn};

/// Runs `cast run` and captures the trace it prints.
#[derive(Clone, Debug)]
pub struct TraceRunner {
    cast_bin: String,
    rpc_url: String,
}

impl TraceRunner {
    pub fn new(cast_bin: impl Into<String>, rpc_url: impl Into<String>) -> Self {
        Self { cast_bin: cast_bin.into(), rpc_url: rpc_url.into() }
    }

    /// Replays `tx_hash`, writing stdout to `output`. Blocks until the tool exits.
    ///
    /// A nonzero exit is reported but not fatal: whatever the tool printed is still scanned.
    pub fn run(&self, tx_hash: &str, output: &Path) -> Result<ExitStatus> {
        let file = File::create(output)
            .wrap_err_with(|| format!("failed to create trace output {}", output.display()))?;

        info!("Running `{} run {tx_hash} --rpc-url {}`", self.cast_bin, self.rpc_url);
        let status = Command::new(&self.cast_bin)
            .args(["run", tx_hash, "--rpc-url", &self.rpc_url])
            .stdout(Stdio::from(file))
            .status()
            .wrap_err_with(|| format!("failed to execute `{}`", self.cast_bin))?;

        if !status.success() {
            warn!("`{} run` exited with {status}; the trace may be incomplete", self.cast_bin);
        }
        Ok(status)
    }
}
