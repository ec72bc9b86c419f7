//! Optional result cache.
//!
//! The engine never requires a backend. When one is installed and the
//! table asks for caching, the filtered and sorted (but unpaged) record
//! list is stored under a key derived from the table, the caller and the
//! request's query shape.

use crate::record::Record;
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{
    collections::{BTreeMap, HashMap},
    fmt::Write as _,
    sync::{Arc, Mutex},
};

///
/// CONSTANTS
///

pub const CACHE_PREFIX: &str = "datagrid_";

///
/// CacheType
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheType {
    #[default]
    None,
    Simple,
}

impl CacheType {
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Simple)
    }
}

///
/// CachedRecords
///
/// records → filtered and sorted, before paging
/// total   → record count before any filtering
///

#[derive(Clone, Debug)]
pub struct CachedRecords {
    pub records: Vec<Record>,
    pub total: usize,
}

///
/// CacheBackend
///

pub trait CacheBackend: Send + Sync {
    fn get(&self, key: &str) -> Option<Arc<CachedRecords>>;

    fn set(&self, key: &str, value: Arc<CachedRecords>);
}

///
/// MemoryCache
/// Process-local backend. A poisoned lock reads as a miss.
///

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Arc<CachedRecords>>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl CacheBackend for MemoryCache {
    fn get(&self, key: &str) -> Option<Arc<CachedRecords>> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: Arc<CachedRecords>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value);
        }
    }
}

///
/// CacheKey
///
/// Components of a cache key. `extra` pairs are hashed in key order so
/// callers may insert them in any order.
///

#[derive(Clone, Debug, Default)]
pub struct CacheKey<'a> {
    pub table_id: &'a str,
    pub view: Option<&'a str>,
    pub user: Option<&'a str>,
    pub extra: BTreeMap<String, String>,
}

impl<'a> CacheKey<'a> {
    #[must_use]
    pub fn new(table_id: &'a str) -> Self {
        Self {
            table_id,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn view(mut self, view: Option<&'a str>) -> Self {
        self.view = view;
        self
    }

    #[must_use]
    pub const fn user(mut self, user: Option<&'a str>) -> Self {
        self.user = user;
        self
    }

    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Render the full storage key.
    #[must_use]
    pub fn render(&self) -> String {
        let mut key = format!("{CACHE_PREFIX}table_{}", digest_hex(&[self.table_id]));

        if let Some(view) = self.view {
            let _ = write!(key, "__view_{}", digest_hex(&[view]));
        }
        if let Some(user) = self.user {
            let _ = write!(key, "__user_{user}");
        }
        if !self.extra.is_empty() {
            let parts: Vec<&str> = self
                .extra
                .iter()
                .flat_map(|(k, v)| [k.as_str(), v.as_str()])
                .collect();
            let _ = write!(key, "__kwargs_{}", digest_hex(&parts));
        }

        debug!("derived cache key {key}");

        key
    }
}

// Length-framed SHA-256 over `parts`, as lowercase hex.
fn digest_hex(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"datagrid:v1");
    for part in parts {
        let len = u32::try_from(part.len()).unwrap_or(u32::MAX);
        hasher.update(len.to_be_bytes());
        hasher.update(part.as_bytes());
    }

    hasher
        .finalize()
        .iter()
        .fold(String::with_capacity(64), |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Object, Record};

    #[test]
    fn key_ignores_extra_insertion_order() {
        let a = CacheKey::new("blog.entries")
            .extra("search", "rust")
            .extra("order", "-pub_date")
            .render();
        let b = CacheKey::new("blog.entries")
            .extra("order", "-pub_date")
            .extra("search", "rust")
            .render();

        assert_eq!(a, b);
        assert!(a.starts_with("datagrid_table_"));
        assert!(a.contains("__kwargs_"));
    }

    #[test]
    fn key_separates_views_and_users() {
        let base = CacheKey::new("entries");
        let plain = base.clone().render();
        let viewed = base.clone().view(Some("EntryList")).render();
        let user = base.user(Some("42")).render();

        assert_ne!(plain, viewed);
        assert!(user.ends_with("__user_42"));
    }

    #[test]
    fn memory_cache_round_trips_entries() {
        let cache = MemoryCache::new();
        assert!(cache.get("k").is_none());

        let records: Vec<Record> = vec![Object::new(1).into()];
        cache.set(
            "k",
            Arc::new(CachedRecords {
                records,
                total: 3,
            }),
        );

        let hit = cache.get("k").unwrap();
        assert_eq!(hit.total, 3);
        assert_eq!(hit.records.len(), 1);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
