use lru::LruCache;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use tracing::trace;

use crate::translation::Lang;

/// Default number of translations kept in memory.
pub const DEFAULT_CAPACITY: usize = 500;

/// Bounded least-recently-used memo of text translations.
///
/// Keys are [`TranslationCache::fingerprint`]s. `get` refreshes recency and
/// `put` evicts the least recently used entry once the cache is full.
#[derive(Debug)]
pub struct TranslationCache {
    entries: LruCache<String, String>,
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl TranslationCache {
    /// Creates an empty cache. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(non_zero(capacity)),
        }
    }

    /// Cache key for translating `text` from `from` to `to`.
    pub fn fingerprint(from: &Lang, to: &Lang, text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(from.code.as_bytes());
        hasher.update([0]);
        hasher.update(to.code.as_bytes());
        hasher.update([0]);
        hasher.update(text.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn get(&mut self, key: &str) -> Option<String> {
        let hit = self.entries.get(key).cloned();
        trace!(hit = hit.is_some(), "cache lookup");
        hit
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        if let Some((evicted, _)) = self.entries.push(key.into(), value.into()) {
            trace!(key = %evicted, "cache entry evicted");
        }
    }

    pub fn lookup(&mut self, from: &Lang, to: &Lang, text: &str) -> Option<String> {
        self.get(&Self::fingerprint(from, to, text))
    }

    pub fn store(&mut self, from: &Lang, to: &Lang, text: &str, translated: &str) {
        self.put(Self::fingerprint(from, to, text), translated);
    }

    /// Changes the capacity, evicting least recently used entries if shrinking.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.entries.resize(non_zero(capacity));
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key/value pairs, least recently used first.
    ///
    /// Feeding them back through [`TranslationCache::from_entries`] restores
    /// the same recency order.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .rev()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn from_entries(capacity: usize, entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut cache = Self::new(capacity);
        for (key, value) in entries {
            cache.put(key, value);
        }
        cache
    }

    /// Serializes the cache as one JSON object, least recently used first.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries()
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        Value::Object(map)
    }

    /// Rebuilds a cache from [`TranslationCache::to_json`] output. Non-string
    /// values are skipped.
    pub fn from_json(capacity: usize, json: &str) -> Result<Self, serde_json::Error> {
        let map: Map<String, Value> = serde_json::from_str(json)?;
        Ok(Self::from_entries(
            capacity,
            map.into_iter().filter_map(|(key, value)| match value {
                Value::String(text) => Some((key, text)),
                _ => None,
            }),
        ))
    }
}

fn non_zero(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}
