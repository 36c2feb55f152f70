//! Shared registry of in-flight transfers, keyed by identifier.
use crate::counter::{TransferCounter, TransferSnapshot};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Maps each identifier to the counter of the transfer writing that file.
///
/// Entries are only ever added or replaced during a run. Snapshots come
/// back ordered by identifier so consecutive renders line up.
#[derive(Debug, Default)]
pub struct ProgressRegistry {
    entries: RwLock<BTreeMap<String, Arc<TransferCounter>>>,
}

impl ProgressRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `counter` under its identifier, returning whatever counter
    /// previously held that slot.
    pub async fn register(&self, counter: Arc<TransferCounter>) -> Option<Arc<TransferCounter>> {
        let mut entries = self.entries.write().await;
        entries.insert(counter.identifier().to_string(), counter)
    }

    /// Inserts `counter` only if its identifier is still free.
    ///
    /// On conflict the registry is left untouched and the counter already
    /// holding the slot is returned.
    pub async fn register_if_absent(
        &self,
        counter: Arc<TransferCounter>,
    ) -> Result<(), Arc<TransferCounter>> {
        let mut entries = self.entries.write().await;
        match entries.entry(counter.identifier().to_string()) {
            Entry::Occupied(existing) => Err(existing.get().clone()),
            Entry::Vacant(slot) => {
                slot.insert(counter);
                Ok(())
            }
        }
    }

    pub async fn get(&self, identifier: &str) -> Option<Arc<TransferCounter>> {
        self.entries.read().await.get(identifier).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Point-in-time view of every registered transfer, sorted by identifier.
    pub async fn snapshot(&self) -> Vec<TransferSnapshot> {
        // Clone the handles out so per-counter locks are never taken while
        // registration is blocked on the map.
        let counters: Vec<Arc<TransferCounter>> =
            self.entries.read().await.values().cloned().collect();
        counters.iter().map(|c| c.snapshot()).collect()
    }
}
