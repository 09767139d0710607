/// A contract name source backed by Etherscan verified source code.
pub mod etherscan;
pub use etherscan::EtherscanIdentifier;

/// A contract name source backed by the Sourcify file repository.
pub mod sourcify;
pub use sourcify::SourcifyIdentifier;

use crate::trace::addresses::Address;
use async_trait::async_trait;
use eyre::Result;

/// Contract name sources figure out what label belongs to an address of the trace.
#[async_trait]
pub trait ContractNameSource: Send + Sync {
    /// Short human readable name of the source, used in status lines.
    fn source_name(&self) -> &'static str;

    /// Attempts to find the contract name deployed at `address`.
    ///
    /// `Ok(None)` means the source answered but knows no name for the address, `Err` means it
    /// could not be asked or its answer could not be understood.
    async fn contract_name(&self, address: &Address) -> Result<Option<String>>;
}
