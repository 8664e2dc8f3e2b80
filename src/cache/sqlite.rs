use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use std::path::PathBuf;

use super::memo::TranslationCache;
use crate::paths;

/// Persists a [`TranslationCache`] between sessions as an ordered key-value table.
pub struct CacheStore {
    db_path: PathBuf,
}

impl CacheStore {
    pub fn new() -> Result<Self> {
        let cache_dir = paths::cache_dir();

        std::fs::create_dir_all(&cache_dir).with_context(|| {
            format!("Failed to create cache directory: {}", cache_dir.display())
        })?;

        Self::at(cache_dir.join("translations.db"))
    }

    pub fn at(db_path: PathBuf) -> Result<Self> {
        let store = Self { db_path };
        store.init_db()?;
        Ok(store)
    }

    pub const fn db_path(&self) -> &PathBuf {
        &self.db_path
    }

    fn init_db(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS translations (
                position INTEGER PRIMARY KEY,
                cache_key TEXT UNIQUE NOT NULL,
                translated_text TEXT NOT NULL,
                saved_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )
        .context("Failed to create translations table")?;

        Ok(())
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .with_context(|| format!("Failed to open cache database: {}", self.db_path.display()))
    }

    /// Loads the saved entries into a cache of the given capacity.
    ///
    /// Entries are replayed least recently used first, so when there are more
    /// rows than `capacity` the oldest are the ones dropped.
    pub fn load(&self, capacity: usize) -> Result<TranslationCache> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT cache_key, translated_text FROM translations ORDER BY position")?;

        let entries = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read cached translations")?;

        Ok(TranslationCache::from_entries(capacity, entries))
    }

    /// Replaces the saved snapshot with the current cache contents.
    pub fn save(&self, cache: &TranslationCache) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM translations", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO translations (position, cache_key, translated_text)
                 VALUES (?1, ?2, ?3)",
            )?;
            for (position, (key, value)) in cache.entries().iter().enumerate() {
                stmt.execute(params![position as i64, key, value])
                    .context("Failed to insert translation into cache")?;
            }
        }

        tx.commit().context("Failed to save translation cache")?;
        Ok(())
    }

    /// Deletes every saved entry, returning how many there were.
    pub fn clear(&self) -> Result<usize> {
        let conn = self.connect()?;
        conn.execute("DELETE FROM translations", [])
            .context("Failed to clear translation cache")
    }

    pub fn count(&self) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM translations", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store(temp_dir: &TempDir) -> CacheStore {
        CacheStore::at(temp_dir.path().join("translations.db")).unwrap()
    }

    #[test]
    fn test_load_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        let cache = store.load(10).unwrap();
        assert!(cache.is_empty());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        let mut cache = TranslationCache::new(10);
        cache.put("hello", "こんにちは、世界！");
        cache.put("bye", "さようなら");
        store.save(&cache).unwrap();

        let mut loaded = store.load(10).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("hello"), Some("こんにちは、世界！".to_string()));
        assert_eq!(loaded.get("bye"), Some("さようなら".to_string()));
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        let mut cache = TranslationCache::new(10);
        cache.put("a", "1");
        store.save(&cache).unwrap();

        cache.clear();
        cache.put("b", "2");
        store.save(&cache).unwrap();

        assert_eq!(store.count().unwrap(), 1);
        let mut loaded = store.load(10).unwrap();
        assert_eq!(loaded.get("a"), None);
        assert_eq!(loaded.get("b"), Some("2".to_string()));
    }

    #[test]
    fn test_load_with_smaller_capacity_keeps_most_recent() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        let mut cache = TranslationCache::new(10);
        cache.put("a", "1");
        cache.put("b", "2");
        cache.put("c", "3");
        cache.get("a");
        store.save(&cache).unwrap();

        let mut loaded = store.load(2).unwrap();
        assert_eq!(loaded.get("b"), None);
        assert_eq!(loaded.get("a"), Some("1".to_string()));
        assert_eq!(loaded.get("c"), Some("3".to_string()));
    }

    #[test]
    fn test_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        let mut cache = TranslationCache::new(10);
        cache.put("a", "1");
        cache.put("b", "2");
        store.save(&cache).unwrap();

        assert_eq!(store.clear().unwrap(), 2);
        assert_eq!(store.count().unwrap(), 0);
    }
}
