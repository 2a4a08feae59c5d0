//! Process-wide memoization of upstream lookups
//!
//! Entries are never evicted or refreshed: example listings and release tags
//! are treated as immutable for the lifetime of the process, so a restart is
//! the only way to pick up upstream changes. Concurrent misses on one key share
//! a single fetch; a failed fetch stores nothing and the next caller retries.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

pub struct MemoCache<V> {
    entries: Mutex<HashMap<String, Arc<OnceCell<V>>>>,
}

impl<V: Clone> MemoCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key`, running `fetch` on the first request
    pub async fn get_or_try_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            Arc::clone(entries.entry(key.to_string()).or_default())
        };
        cell.get_or_try_init(fetch).await.cloned()
    }

    /// Number of keys holding a value
    pub async fn filled(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.values().filter(|cell| cell.initialized()).count()
    }
}

impl<V: Clone> Default for MemoCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
