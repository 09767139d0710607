use crate::trace::{addresses::Address, identifier::ContractNameSource};
use std::collections::HashMap;
use tracing::{info, warn};

/// Names already settled during this run.
///
/// A `None` entry records that no source knew the address, so it is not asked again; such an
/// address displays as its lowercased self.
#[derive(Clone, Debug, Default)]
pub struct NameCache {
    entries: HashMap<Address, Option<String>>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the display name for `address` if it has been settled.
    pub fn lookup(&self, address: &Address) -> Option<String> {
        self.entries
            .get(address)
            .map(|name| name.clone().unwrap_or_else(|| address.to_lowercase()))
    }

    pub fn insert(&mut self, address: Address, name: Option<String>) {
        self.entries.insert(address, name);
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.entries.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Address, String)> for NameCache {
    fn from_iter<I: IntoIterator<Item = (Address, String)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().map(|(address, name)| (address, Some(name))).collect() }
    }
}

/// Resolves addresses to display names.
///
/// The cache is consulted first, then the primary source, then the secondary source. When neither
/// source has a name the lowercased address is used, so resolution never fails.
pub struct NameResolver {
    primary: Box<dyn ContractNameSource>,
    secondary: Box<dyn ContractNameSource>,
}

impl NameResolver {
    pub fn new(
        primary: impl ContractNameSource + 'static,
        secondary: impl ContractNameSource + 'static,
    ) -> Self {
        Self { primary: Box::new(primary), secondary: Box::new(secondary) }
    }

    pub async fn resolve(&self, address: &Address, cache: &mut NameCache) -> String {
        if let Some(name) = cache.lookup(address) {
            info!("Cache hit for address {address}: {name}");
            return name
        }

        if let Some(name) = query(self.primary.as_ref(), address).await {
            cache.insert(address.clone(), Some(name.clone()));
            return name
        }

        info!(
            "Name not found in {} for address {address}. Falling back to {}.",
            self.primary.source_name(),
            self.secondary.source_name()
        );
        let name = query(self.secondary.as_ref(), address).await;
        cache.insert(address.clone(), name.clone());
        name.unwrap_or_else(|| address.to_lowercase())
    }
}

/// Asks one source, folding "no name" and failures into `None`.
async fn query(source: &dyn ContractNameSource, address: &Address) -> Option<String> {
    match source.contract_name(address).await {
        Ok(Some(name)) if !name.is_empty() => {
            info!("Contract name found in {}: {name} for address {address}", source.source_name());
            Some(name)
        }
        Ok(_) => {
            info!("{} did not return a name for address {address}", source.source_name());
            None
        }
        Err(err) => {
            warn!("Error fetching from {} for address {address}: {err:#}", source.source_name());
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use eyre::{eyre, Result};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    /// Answers from a fixed table and counts how often it was asked.
    #[derive(Clone, Default)]
    pub(crate) struct FixedSource {
        names: HashMap<Address, String>,
        failing: bool,
        calls: Arc<AtomicUsize>,
    }

    impl FixedSource {
        pub(crate) fn with(mut self, address: &str, name: &str) -> Self {
            self.names.insert(address.parse().unwrap(), name.to_owned());
            self
        }

        pub(crate) fn failing() -> Self {
            Self { failing: true, ..Default::default() }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContractNameSource for FixedSource {
        fn source_name(&self) -> &'static str {
            "fixed"
        }

        async fn contract_name(&self, address: &Address) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing {
                return Err(eyre!("connection refused"))
            }
            Ok(self.names.get(address).cloned())
        }
    }

    const TOKEN: &str = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
    const VAULT: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn primary_name_wins() {
        let primary = FixedSource::default().with(TOKEN, "TokenA");
        let secondary = FixedSource::default().with(TOKEN, "Other");
        let resolver = NameResolver::new(primary.clone(), secondary.clone());
        let mut cache = NameCache::new();

        assert_eq!(resolver.resolve(&addr(TOKEN), &mut cache).await, "TokenA");
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn secondary_used_when_primary_has_nothing() {
        let primary = FixedSource::default();
        let secondary = FixedSource::default().with(VAULT, "VaultB");
        let resolver = NameResolver::new(primary.clone(), secondary.clone());
        let mut cache = NameCache::new();

        assert_eq!(resolver.resolve(&addr(VAULT), &mut cache).await, "VaultB");
        assert_eq!(cache.lookup(&addr(VAULT)).as_deref(), Some("VaultB"));
    }

    #[tokio::test]
    async fn failures_degrade_to_lowercased_address() {
        let resolver = NameResolver::new(FixedSource::failing(), FixedSource::failing());
        let mut cache = NameCache::new();

        let name = resolver.resolve(&addr(TOKEN), &mut cache).await;
        assert_eq!(name, TOKEN.to_lowercase());
        assert!(cache.contains(&addr(TOKEN)));
    }

    #[tokio::test]
    async fn empty_names_count_as_missing() {
        let primary = FixedSource::default().with(TOKEN, "");
        let resolver = NameResolver::new(primary, FixedSource::default());
        let mut cache = NameCache::new();

        assert_eq!(resolver.resolve(&addr(TOKEN), &mut cache).await, TOKEN.to_lowercase());
    }

    #[tokio::test]
    async fn second_resolve_is_served_from_cache() {
        let primary = FixedSource::default();
        let secondary = FixedSource::default();
        let resolver = NameResolver::new(primary.clone(), secondary.clone());
        let mut cache = NameCache::new();

        let first = resolver.resolve(&addr(VAULT), &mut cache).await;
        // differently cased spelling of the same account
        let second = resolver.resolve(&addr(&VAULT.to_uppercase().replace("0X", "0x")), &mut cache).await;
        assert_eq!(first, second);
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn seeded_cache_skips_sources() {
        let primary = FixedSource::default();
        let resolver = NameResolver::new(primary.clone(), FixedSource::default());
        let mut cache: NameCache = [(addr(TOKEN), "Router".to_owned())].into_iter().collect();

        assert_eq!(resolver.resolve(&addr(TOKEN), &mut cache).await, "Router");
        assert_eq!(primary.calls(), 0);
    }
}
