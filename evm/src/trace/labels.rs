use crate::trace::{
    addresses::Address,
    resolver::{NameCache, NameResolver},
};
use std::time::Duration;
use tracing::info;

/// Address labels in the order the addresses were discovered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelMap {
    entries: Vec<(Address, String)>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the label of `address`, keeping its original position if it was already labeled.
    pub fn insert(&mut self, address: Address, name: String) {
        match self.entries.iter_mut().find(|(known, _)| *known == address) {
            Some((_, label)) => *label = name,
            None => self.entries.push((address, name)),
        }
    }

    pub fn get(&self, address: &Address) -> Option<&str> {
        self.entries.iter().find(|(known, _)| known == address).map(|(_, name)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &str)> {
        self.entries.iter().map(|(address, name)| (address, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How resolution is throttled to stay under explorer rate limits.
///
/// The pause is taken after every `batch_size` processed addresses, whether or not they hit the
/// network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    pub batch_size: usize,
    pub pause: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self { batch_size: 5, pause: Duration::from_secs(1) }
    }
}

impl Pacing {
    fn pause_after(&self, processed: usize) -> bool {
        self.batch_size > 0 && processed % self.batch_size == 0
    }
}

#[derive(Clone, Debug, Default)]
pub struct LabelReport {
    pub labels: LabelMap,
    /// Number of rate limit pauses taken.
    pub pauses: usize,
}

/// Resolves every address one after another, pausing as `pacing` asks.
pub async fn resolve_labels(
    addresses: &[Address],
    resolver: &NameResolver,
    cache: &mut NameCache,
    pacing: Pacing,
) -> LabelReport {
    let mut report = LabelReport::default();
    for (index, address) in addresses.iter().enumerate() {
        info!("Fetching name for address: {address}");
        let name = resolver.resolve(address, cache).await;
        report.labels.insert(address.clone(), name);

        if pacing.pause_after(index + 1) {
            info!("Pausing to respect Etherscan API rate limits...");
            tokio::time::sleep(pacing.pause).await;
            report.pauses += 1;
        }
    }
    report
}
