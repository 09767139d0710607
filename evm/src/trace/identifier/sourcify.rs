use super::ContractNameSource;
use crate::trace::addresses::Address;
use async_trait::async_trait;
use eyre::{Result, WrapErr};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;

/// Public Sourcify server.
pub const SOURCIFY_URL: &str = "https://sourcify.dev/server";

/// Suffix of the source files whose stem names the contract.
pub const SOURCE_SUFFIX: &str = ".sol";

/// Body of `GET /files/any/{chain}/{address}`.
#[derive(Debug, Default, Deserialize)]
pub struct SourceFiles {
    #[serde(default)]
    pub files: Vec<SourceFile>,
}

#[derive(Debug, Deserialize)]
pub struct SourceFile {
    #[serde(default)]
    pub name: String,
}

impl SourceFiles {
    /// Name of the first Solidity source, without its extension.
    pub fn contract_name(&self) -> Option<String> {
        self.files
            .iter()
            .find_map(|file| file.name.strip_suffix(SOURCE_SUFFIX).filter(|stem| !stem.is_empty()))
            .map(str::to_owned)
    }
}

#[derive(Clone, Debug)]
pub struct SourcifyIdentifier {
    client: reqwest::Client,
    base_url: String,
    chain_id: u64,
}

impl SourcifyIdentifier {
    pub fn new(chain_id: u64) -> Result<Self> {
        Self::with_base_url(SOURCIFY_URL, chain_id)
    }

    pub fn with_base_url(base_url: impl Into<String>, chain_id: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .wrap_err("failed to build sourcify http client")?;
        Ok(Self { client, base_url: base_url.into(), chain_id })
    }

    fn files_url(&self, address: &Address) -> String {
        format!("{}/files/any/{}/{}", self.base_url.trim_end_matches('/'), self.chain_id, address)
    }

    /// Looks up the contract name of `address` from its verified source files.
    ///
    /// Any non-success status is treated as "not verified on Sourcify".
    pub async fn identify(&self, address: &Address) -> Result<Option<String>> {
        let url = self.files_url(address);
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .wrap_err_with(|| format!("request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, %address, "sourcify has no files");
            return Ok(None)
        }

        let body = response.text().await.wrap_err("failed to read sourcify response")?;
        let files: SourceFiles =
            serde_json::from_str(&body).wrap_err("unexpected sourcify response shape")?;
        Ok(files.contract_name())
    }
}

#[async_trait]
impl ContractNameSource for SourcifyIdentifier {
    fn source_name(&self) -> &'static str {
        "Sourcify"
    }

    async fn contract_name(&self, address: &Address) -> Result<Option<String>> {
        self.identify(address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> SourceFiles {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn first_solidity_file_names_the_contract() {
        let files = parse(
            r#"{"status":"full","files":[
                {"name":"metadata.json","path":"contracts/full_match/1/0x/metadata.json"},
                {"name":"VaultB.sol","path":"contracts/full_match/1/0x/sources/VaultB.sol"},
                {"name":"IERC20.sol","path":"contracts/full_match/1/0x/sources/IERC20.sol"}
            ]}"#,
        );
        assert_eq!(files.contract_name().as_deref(), Some("VaultB"));
    }

    #[test]
    fn only_the_suffix_is_stripped() {
        let files = parse(r#"{"files":[{"name":"My.solidity.Token.sol"}]}"#);
        assert_eq!(files.contract_name().as_deref(), Some("My.solidity.Token"));
    }

    #[test]
    fn no_solidity_files_means_no_name() {
        assert_eq!(parse(r#"{"files":[{"name":"metadata.json"}]}"#).contract_name(), None);
        assert_eq!(parse(r#"{"files":[]}"#).contract_name(), None);
        assert_eq!(parse(r#"{"error":"Files have not been found!"}"#).contract_name(), None);
        assert_eq!(parse(r#"{"files":[{"name":".sol"}]}"#).contract_name(), None);
    }

    #[test]
    fn url_is_keyed_by_chain_and_address() {
        let sourcify = SourcifyIdentifier::with_base_url("http://localhost:5555/", 137).unwrap();
        let address: Address = "0xba12222222228d8ba445958a75a0704d566bf2c8".parse().unwrap();
        assert_eq!(
            sourcify.files_url(&address),
            "http://localhost:5555/files/any/137/0xba12222222228d8ba445958a75a0704d566bf2c8"
        );
    }
}
