//! Session context and persisted bearer credential.
//!
//! # Responsibility
//! - Hold the in-memory bearer credential for one client.
//! - Mirror every credential change into an injected `CredentialStore`.
//!
//! # Invariants
//! - At most one credential is persisted, under `CREDENTIAL_KEY`.
//! - An unreadable credential is treated exactly like an absent one.
//! - Clearing the session always drops the in-memory credential, even when
//!   the store fails to delete it.

mod store;

pub use store::{MemoryCredentialStore, SqliteCredentialStore};

use crate::db::DbError;
use log::{info, warn};
use thiserror::Error;

/// Fixed key the credential is stored under.
pub const CREDENTIAL_KEY: &str = "token";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("credential store lock poisoned")]
    Poisoned,
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Narrow read/write/clear capability over device-local storage.
pub trait CredentialStore {
    fn load(&self) -> StoreResult<Option<String>>;
    fn save(&self, credential: &str) -> StoreResult<()>;
    fn clear(&self) -> StoreResult<()>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for &S {
    fn load(&self) -> StoreResult<Option<String>> {
        (**self).load()
    }

    fn save(&self, credential: &str) -> StoreResult<()> {
        (**self).save(credential)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}

/// Explicitly passed session context.
pub struct Session<S: CredentialStore> {
    store: S,
    credential: Option<String>,
}

impl<S: CredentialStore> Session<S> {
    /// Creates an empty session without reading storage.
    pub fn new(store: S) -> Self {
        Self {
            store,
            credential: None,
        }
    }

    /// Creates a session seeded from the persisted credential.
    ///
    /// Storage failures and blank values yield an empty session.
    pub fn restore(store: S) -> Self {
        let credential = match store.load() {
            Ok(Some(value)) if !value.trim().is_empty() => Some(value),
            Ok(_) => None,
            Err(err) => {
                warn!("event=session_restore module=session status=error error={err}");
                None
            }
        };
        info!(
            "event=session_restore module=session status=ok has_credential={}",
            credential.is_some()
        );
        Self { store, credential }
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// Stores a freshly issued credential in memory and on disk.
    pub fn set_credential(&mut self, credential: impl Into<String>) -> StoreResult<()> {
        let credential = credential.into();
        self.store.save(&credential)?;
        self.credential = Some(credential);
        info!("event=session_set module=session status=ok");
        Ok(())
    }

    /// Drops the credential from memory and storage.
    pub fn clear(&mut self) -> StoreResult<()> {
        self.credential = None;
        let result = self.store.clear();
        match &result {
            Ok(()) => info!("event=session_clear module=session status=ok"),
            Err(err) => warn!("event=session_clear module=session status=error error={err}"),
        }
        result
    }

    /// Drops the in-memory credential but leaves the stored copy in place,
    /// so the next launch validates it again.
    pub fn forget(&mut self) {
        self.credential = None;
        info!("event=session_forget module=session status=ok");
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
