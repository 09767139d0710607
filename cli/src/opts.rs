use clap::Parser;
use labeler_evm::{
    trace::command::{DEFAULT_CAST_BIN, DEFAULT_RPC_URL},
    Address,
};
use std::{path::PathBuf, str::FromStr};

/// Where the raw `cast run` output is written.
pub const DEFAULT_TRACE_FILE: &str = "cast_run_output.txt";

/// Where the labeled replay script is written.
pub const DEFAULT_SCRIPT_FILE: &str = "updated_cast_command.sh";

#[derive(Debug, Clone, Parser)]
#[clap(
    name = "cast-labeler",
    version,
    about = "Generate a cast run command with labeled addresses."
)]
pub struct LabelArgs {
    /// The transaction hash to process.
    #[clap(long, value_name = "TX_HASH")]
    pub tx_hash: String,

    /// Etherscan API key for contract name lookup.
    #[clap(long, env = "ETHERSCAN_API_KEY", hide_env_values = true, value_name = "KEY")]
    pub api_key: String,

    /// Chain id used for explorer lookups.
    #[clap(long, default_value_t = 1, value_name = "CHAIN_ID")]
    pub chain: u64,

    /// RPC endpoint the transaction is replayed against.
    #[clap(long, default_value = DEFAULT_RPC_URL, value_name = "URL")]
    pub rpc_url: String,

    /// File the raw trace is written to and read back from.
    #[clap(long, default_value = DEFAULT_TRACE_FILE, value_name = "PATH")]
    pub trace_file: PathBuf,

    /// File the labeled replay script is written to.
    #[clap(long, default_value = DEFAULT_SCRIPT_FILE, value_name = "PATH")]
    pub out: PathBuf,

    /// The `cast` executable.
    #[clap(long, default_value = DEFAULT_CAST_BIN, value_name = "PATH")]
    pub cast_bin: String,

    /// Read an existing trace file instead of running `cast run`.
    #[clap(long)]
    pub skip_trace: bool,

    /// A label that is used as is instead of being looked up. May be repeated.
    #[clap(long = "known-label", value_name = "ADDRESS:NAME")]
    pub known_labels: Vec<KnownLabel>,
}

/// An `address:name` pair given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownLabel {
    pub address: Address,
    pub name: String,
}

impl FromStr for KnownLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, name) =
            s.split_once(':').ok_or_else(|| format!("expected ADDRESS:NAME, got `{s}`"))?;
        if name.is_empty() {
            return Err(format!("label for {address} is empty"))
        }
        let address = address.parse::<Address>().map_err(|err| err.to_string())?;
        Ok(Self { address, name: name.to_owned() })
    }
}
