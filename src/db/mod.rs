pub mod repository;
pub mod retry;
pub mod sqlite;
pub mod store;

pub use retry::RetryPolicy;
pub use store::PatientStore;

use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Corrupt row {id}: {reason}")]
    CorruptRow { id: i64, reason: String },

    #[error("Database is locked by another writer (gave up after {attempts} attempts)")]
    Busy { attempts: u32 },
}

impl StoreError {
    /// True when the failure is transient lock contention worth retrying.
    pub fn is_lock_contention(&self) -> bool {
        match self {
            Self::Sqlite(e) => is_lock_error(e),
            _ => false,
        }
    }
}

pub(crate) fn is_lock_error(e: &rusqlite::Error) -> bool {
    matches!(
        e.sqlite_error_code(),
        Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked)
    )
}
