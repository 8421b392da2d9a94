//! `CredentialStore` implementations.

use super::{CredentialStore, StoreError, StoreResult, CREDENTIAL_KEY};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// SQLite key-value backed store; survives process restarts.
pub struct SqliteCredentialStore {
    conn: Connection,
}

impl SqliteCredentialStore {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }
}

impl CredentialStore for SqliteCredentialStore {
    fn load(&self) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [CREDENTIAL_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&self, credential: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![CREDENTIAL_KEY, credential],
        )?;
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [CREDENTIAL_KEY])?;
        Ok(())
    }
}

/// Process-local store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryCredentialStore {
    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(credential.into()))),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> StoreResult<Option<String>> {
        let slot = self.slot.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(slot.clone())
    }

    fn save(&self, credential: &str) -> StoreResult<()> {
        let mut slot = self.slot.lock().map_err(|_| StoreError::Poisoned)?;
        *slot = Some(credential.to_string());
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        let mut slot = self.slot.lock().map_err(|_| StoreError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteCredentialStore;
    use crate::session::CredentialStore;

    #[test]
    fn sqlite_store_upserts_single_credential() {
        let store = SqliteCredentialStore::open_in_memory().expect("open store");
        assert_eq!(store.load().expect("load"), None);

        store.save("first").expect("save first");
        store.save("second").expect("save second");
        assert_eq!(store.load().expect("load"), Some("second".to_string()));

        let rows: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
            .expect("count rows");
        assert_eq!(rows, 1);
    }

    #[test]
    fn sqlite_clear_is_idempotent() {
        let store = SqliteCredentialStore::open_in_memory().expect("open store");
        store.save("token-value").expect("save");
        store.clear().expect("first clear");
        store.clear().expect("second clear");
        assert_eq!(store.load().expect("load"), None);
    }
}
