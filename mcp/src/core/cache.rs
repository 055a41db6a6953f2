//! Per-source discovery cache with a fixed TTL.
//!
//! Cache-aside: the client consults it before a live `tools/list`, and writes
//! to it only after a successful discovery. Expired entries are treated as
//! absent and are never served.

use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use tokio::time::Instant;

use super::client::ToolDescriptor;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub source: String,
    pub tools: Arc<Vec<ToolDescriptor>>,
    pub expires_at: Instant,
}

impl CacheEntry {
    pub fn is_fresh_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

pub struct DiscoveryCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl DiscoveryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Unexpired tools for `source`. Expired entries are dropped on the way.
    pub fn get(&self, source: &str) -> Option<Arc<Vec<ToolDescriptor>>> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(source) {
            if entry.is_fresh_at(now) {
                return Some(Arc::clone(&entry.tools));
            }
        }
        self.entries
            .remove_if(source, |_, entry| !entry.is_fresh_at(now));
        None
    }

    pub fn insert(&self, source: &str, tools: Vec<ToolDescriptor>) -> Arc<Vec<ToolDescriptor>> {
        let tools = Arc::new(tools);
        self.entries.insert(
            source.to_string(),
            CacheEntry {
                source: source.to_string(),
                tools: Arc::clone(&tools),
                expires_at: Instant::now() + self.ttl,
            },
        );
        tools
    }

    pub fn remove(&self, source: &str) {
        self.entries.remove(source);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
