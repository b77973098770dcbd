//! SQLite file behind the document key/value store.
//!
//! The schema is a single `kv_entries` table:
//!
//! | column       | type    | meaning                                   |
//! |--------------|---------|-------------------------------------------|
//! | `key`        | TEXT PK | `theme` or `projectData`                  |
//! | `value`      | TEXT    | theme string or encoded snapshot JSON     |
//! | `updated_at` | INTEGER | epoch milliseconds of the last write      |
//!
//! Values are opaque here; decoding belongs to `snapshot` and `model::theme`.
//! The schema revision lives in `PRAGMA user_version`, and a connection is only
//! handed out after [`migrations::apply_migrations`] brings it up to date.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the store file.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file carries a `user_version` this build has no migrations for.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "store file uses schema v{found}, this build understands up to v{supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
