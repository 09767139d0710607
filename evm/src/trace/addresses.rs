use eyre::{eyre, Result, WrapErr};
use std::{
    collections::HashSet,
    fmt,
    hash::{Hash, Hasher},
    path::Path,
    str::FromStr,
};

/// Number of hex digits following the `0x` prefix of an address.
pub const ADDRESS_HEX_LEN: usize = 40;

const PREFIX: &[u8] = b"0x";

/// An address as it was written in a trace.
///
/// The original spelling is kept so labels can be emitted exactly as the trace tool printed them,
/// but equality and hashing ignore ASCII case: `0xABC..` and `0xabc..` are the same account.
#[derive(Clone, Debug)]
pub struct Address(String);

impl Address {
    /// The address exactly as it was encountered.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    /// Converts into the fixed-size representation used by the ethers clients.
    pub fn to_h160(&self) -> Result<ethers::types::Address> {
        let bytes = hex::decode(&self.0[PREFIX.len()..])
            .wrap_err_with(|| format!("invalid hex in address {}", self.0))?;
        Ok(ethers::types::Address::from_slice(&bytes))
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| eyre!("address {s} is missing the 0x prefix"))?;
        if digits.len() != ADDRESS_HEX_LEN {
            return Err(eyre!(
                "address {s} has {} hex digits, expected {ADDRESS_HEX_LEN}",
                digits.len()
            ))
        }
        hex::decode(digits).wrap_err_with(|| format!("invalid hex in address {s}"))?;
        Ok(Self(s.to_owned()))
    }
}

/// Returns every address mentioned in `text`, deduplicated and in the order first seen.
///
/// An address is `0x` followed by exactly 40 hex digits. The prefix may not be glued to a
/// preceding word character and the digits may not run on into more hex, so 32 byte hashes do
/// not yield their first 20 bytes as an address.
pub fn extract_addresses(text: &str) -> Vec<Address> {
    let bytes = text.as_bytes();
    let width = PREFIX.len() + ADDRESS_HEX_LEN;

    let mut seen = HashSet::new();
    let mut found = Vec::new();
    let mut start = 0;
    while start + width <= bytes.len() {
        let end = start + width;
        let is_match = bytes[start..].starts_with(PREFIX) &&
            (start == 0 || !bytes[start - 1].is_ascii_alphanumeric()) &&
            bytes[start + PREFIX.len()..end].iter().all(u8::is_ascii_hexdigit) &&
            !bytes.get(end).map_or(false, u8::is_ascii_hexdigit);

        if is_match {
            let address = Address(text[start..end].to_owned());
            if seen.insert(address.clone()) {
                found.push(address);
            }
            start = end;
        } else {
            start += 1;
        }
    }
    found
}

/// Reads a trace dump and extracts the addresses in it.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected; trace tools happily print
/// raw revert data.
pub fn extract_addresses_from_file(path: impl AsRef<Path>) -> Result<Vec<Address>> {
    let path = path.as_ref();
    let raw = std::fs::read(path)
        .wrap_err_with(|| format!("failed to read trace output {}", path.display()))?;
    Ok(extract_addresses(&String::from_utf8_lossy(&raw)))
}
