//! In-memory key/value store standing in for the chaincode world state
//! (`spec.md` §4.10, §5: "a small process-wide key/value map"). Keys are
//! ordered so pagination over the `PSU_` prefix range can walk them the same
//! way `GetStateByRangeWithPagination` does.
//!
//! Grounded on the teacher's `ledger/lobby/storage/in_memory.rs`: an
//! `Arc<parking_lot::RwLock<Inner>>` wrapper, cheap to clone and share across
//! callers.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

#[derive(Default)]
struct Inner {
    state: BTreeMap<String, Vec<u8>>,
}

/// A cheaply-cloneable handle onto one shared key/value world state.
#[derive(Clone, Default)]
pub struct MemoryLedgerStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, key: &str, value: Vec<u8>) {
        self.inner.write().state.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.read().state.get(key).cloned()
    }

    /// Keys in `[start, end)`, lexicographically ordered, optionally
    /// resuming strictly after `bookmark` — the shape
    /// `GetStateByRangeWithPagination` exposes over Fabric's world state.
    pub fn range(&self, start: &str, end: &str, bookmark: &str) -> Vec<(String, Vec<u8>)> {
        let guard = self.inner.read();
        guard
            .state
            .range(start.to_string()..end.to_string())
            .filter(|(k, _)| bookmark.is_empty() || k.as_str() > bookmark)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
