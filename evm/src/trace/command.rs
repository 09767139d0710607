use crate::trace::{addresses::Address, labels::LabelMap};

/// Local node the trace is replayed against.
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// Trace tool executable.
pub const DEFAULT_CAST_BIN: &str = "cast";

const LINE_CONTINUATION: &str = " \\\n  ";

/// A `cast run` invocation for one transaction.
///
/// Labels are emitted verbatim. A name containing shell metacharacters produces a command that
/// the shell will not run as intended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayCommand {
    pub cast_bin: String,
    pub tx_hash: String,
    pub rpc_url: String,
}

impl ReplayCommand {
    pub fn new(tx_hash: impl Into<String>) -> Self {
        Self {
            cast_bin: DEFAULT_CAST_BIN.to_owned(),
            tx_hash: tx_hash.into(),
            rpc_url: DEFAULT_RPC_URL.to_owned(),
        }
    }

    pub fn rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    pub fn cast_bin(mut self, cast_bin: impl Into<String>) -> Self {
        self.cast_bin = cast_bin.into();
        self
    }

    /// Renders the command, one `--label` per line in label order.
    pub fn render(&self, labels: &LabelMap) -> String {
        let mut lines = Vec::with_capacity(labels.len() + 2);
        lines.push(format!("{} run", self.cast_bin));
        lines.extend(labels.iter().map(|(address, name)| label_flag(address, name)));
        lines.push(format!("{} --rpc-url {}", self.tx_hash, self.rpc_url));
        lines.join(LINE_CONTINUATION)
    }

    /// Renders a bash script that runs the command.
    pub fn script(&self, labels: &LabelMap) -> String {
        format!("#!/bin/bash\n{}\n", self.render(labels))
    }
}

fn label_flag(address: &Address, name: &str) -> String {
    format!("--label {address}:{name}")
}
