use super::ContractNameSource;
use crate::trace::addresses::Address;
use async_trait::async_trait;
use ethers::{
    etherscan::{errors::EtherscanError, Client},
    types::Chain,
};
use eyre::{eyre, WrapErr};

type Result<T> = std::result::Result<T, EtherscanError>;

#[derive(Clone, Debug)]
pub struct EtherscanIdentifier {
    /// The Etherscan client
    client: Client,
}

impl EtherscanIdentifier {
    pub fn new(chain: Chain, etherscan_api_key: String) -> Result<Self> {
        Ok(EtherscanIdentifier { client: Client::new(chain, etherscan_api_key)? })
    }

    /// Creates an identifier for the chain with the given id.
    pub fn for_chain_id(chain_id: u64, etherscan_api_key: String) -> eyre::Result<Self> {
        let chain = Chain::try_from(chain_id)
            .map_err(|_| eyre!("chain id {chain_id} is not known to etherscan"))?;
        Self::new(chain, etherscan_api_key)
            .wrap_err_with(|| format!("failed to create etherscan client for {chain}"))
    }

    /// Looks up the verified contract name of `addr`.
    ///
    /// Unverified contracts and accounts without code resolve to `None`.
    pub async fn identify(&self, addr: ethers::types::Address) -> Result<Option<String>> {
        let metadata = match self.client.contract_source_code(addr).await {
            Ok(metadata) => metadata,
            Err(EtherscanError::ContractCodeNotVerified(_)) => return Ok(None),
            Err(err) => return Err(err),
        };
        Ok(metadata
            .items
            .into_iter()
            .next()
            .map(|item| item.contract_name)
            .filter(|name| !name.is_empty()))
    }
}

#[async_trait]
impl ContractNameSource for EtherscanIdentifier {
    fn source_name(&self) -> &'static str {
        "Etherscan"
    }

    async fn contract_name(&self, address: &Address) -> eyre::Result<Option<String>> {
        let addr = address.to_h160()?;
        Ok(self.identify(addr).await?)
    }
}
