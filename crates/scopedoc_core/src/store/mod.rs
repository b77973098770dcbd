//! Durable key/value storage for the editor.
//!
//! # Responsibility
//! - Define the storage contract used by the save pipeline and startup.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - `save` overwrites any previous value for the same key.
//! - `load` never interprets values; parsing belongs to callers.
//! - Store failures are recoverable; callers must never abort on them.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_store;
pub mod sqlite_store;

pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteKvStore;

/// Logical key holding the persisted theme (`light|dark`).
pub const THEME_KEY: &str = "theme";
/// Logical key holding the JSON document snapshot.
pub const PROJECT_DATA_KEY: &str = "projectData";

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-level failure. Every variant is non-fatal to the editor.
#[derive(Debug)]
pub enum StoreError {
    /// Writing `attempted_bytes` would exceed the store capacity.
    QuotaExceeded {
        key: String,
        attempted_bytes: usize,
        limit_bytes: usize,
    },
    /// Storage is disabled, read-only, or otherwise unreachable.
    Unavailable(String),
    /// Underlying database transport error.
    Db(DbError),
}

impl StoreError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::Unavailable(_) => "storage_unavailable",
            Self::Db(_) => "db_error",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded {
                key,
                attempted_bytes,
                limit_bytes,
            } => write!(
                f,
                "storage quota exceeded writing `{key}` ({attempted_bytes} bytes, limit {limit_bytes})"
            ),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        match value.sqlite_error_code() {
            Some(rusqlite::ErrorCode::DiskFull) => Self::Unavailable(format!("disk full: {value}")),
            Some(
                rusqlite::ErrorCode::ReadOnly
                | rusqlite::ErrorCode::CannotOpen
                | rusqlite::ErrorCode::PermissionDenied,
            ) => Self::Unavailable(value.to_string()),
            _ => Self::Db(DbError::Sqlite(value)),
        }
    }
}

/// Key/value storage contract.
pub trait PersistenceStore {
    /// Stores `value` under `key`, replacing any prior value.
    fn save(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Returns the stored value, or `None` when the key is absent.
    fn load(&self, key: &str) -> StoreResult<Option<String>>;
    /// Deletes `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

impl<S: PersistenceStore + ?Sized> PersistenceStore for &S {
    fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).save(key, value)
    }

    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).load(key)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}
