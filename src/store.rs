// 🗄️ Storage Layer - byte-oriented key-value stores
//
// The repository only needs get/put on whole values. No transactions, no
// locking across calls: two writers of the same key race, last put wins.

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Get/put capability the repository is built on.
pub trait KeyValueStore {
    /// Value stored under `key`, `None` when nothing was ever put there
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        (**self).put(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        (**self).put(key, value)
    }
}

// ============================================================================
// MEMORY STORE
// ============================================================================

/// In-process store, for tests and short-lived tools
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let values = self
            .values
            .read()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        values.insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}

// ============================================================================
// SQLITE STORE
// ============================================================================

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

#[cfg(feature = "sqlite")]
mod sqlite {
    use anyhow::{anyhow, Context, Result};
    use rusqlite::{params, Connection, OptionalExtension};
    use std::sync::{Mutex, MutexGuard};
    use std::time::Duration;

    use super::KeyValueStore;
    use crate::config::StoreConfig;

    /// SQLite-backed store: one `kv` table, one row per key
    pub struct SqliteStore {
        conn: Mutex<Connection>,
    }

    impl SqliteStore {
        pub fn open(config: &StoreConfig) -> Result<Self> {
            let conn = match &config.path {
                Some(path) => Connection::open(path)
                    .with_context(|| format!("Failed to open database {}", path.display()))?,
                None => Connection::open_in_memory().context("Failed to open in-memory database")?,
            };

            conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;

            // WAL mode for crash recovery
            if config.wal && !config.is_in_memory() {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }

            setup_store(&conn)?;
            tracing::debug!(path = ?config.path, wal = config.wal, "sqlite store ready");

            Ok(SqliteStore {
                conn: Mutex::new(conn),
            })
        }

        pub fn open_in_memory() -> Result<Self> {
            Self::open(&StoreConfig::in_memory())
        }

        fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
            self.conn
                .lock()
                .map_err(|_| anyhow!("sqlite store connection lock poisoned"))
        }
    }

    fn setup_store(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key BLOB PRIMARY KEY NOT NULL,
                value BLOB NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        Ok(())
    }

    impl KeyValueStore for SqliteStore {
        fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
            let conn = self.lock()?;
            let value = conn
                .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                    row.get::<_, Vec<u8>>(0)
                })
                .optional()
                .context("Failed to read key")?;

            Ok(value)
        }

        fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
            let conn = self.lock()?;
            conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
                params![key, value],
            )
            .context("Failed to write key")?;

            Ok(())
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn check_get_put(store: &dyn KeyValueStore) {
        assert_eq!(store.get(b"missing").unwrap(), None);

        store.put(b"accounts/c1", b"first").unwrap();
        assert_eq!(store.get(b"accounts/c1").unwrap(), Some(b"first".to_vec()));

        store.put(b"accounts/c1", b"second").unwrap();
        assert_eq!(store.get(b"accounts/c1").unwrap(), Some(b"second".to_vec()));

        store.put(b"accounts/c2", b"").unwrap();
        assert_eq!(store.get(b"accounts/c2").unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        check_get_put(&store);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_shared_memory_store() {
        let store = Arc::new(MemoryStore::new());
        let other = Arc::clone(&store);

        store.put(b"k", b"v").unwrap();
        assert_eq!(other.get(b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_sqlite_store() {
        let store = SqliteStore::open_in_memory().unwrap();
        check_get_put(&store);
    }
}
