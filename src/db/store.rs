//! `PatientStore` — owns the connection to the intake register.
//!
//! Constructed explicitly and passed to the command layer; there is no
//! process-wide connection. Writes go through [`with_write_retry`] so that
//! several processes sharing one database file serialise instead of failing
//! on the first lock they meet.

use std::path::Path;

use rusqlite::Connection;

use super::repository;
use super::retry::{with_write_retry, RetryPolicy};
use super::sqlite;
use super::StoreError;
use crate::models::{NewPatient, PatientRecord};

pub struct PatientStore {
    conn: Connection,
    retry: RetryPolicy,
}

impl PatientStore {
    /// Open (or create) the database file and bring its schema up to date.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::open_with_policy(path, RetryPolicy::default())
    }

    pub fn open_with_policy(path: &Path, retry: RetryPolicy) -> Result<Self, StoreError> {
        let conn = sqlite::open_connection(path)?;
        tracing::debug!(path = %path.display(), "Opened patient database");
        Self::from_connection(conn, retry)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(sqlite::open_memory_connection()?, RetryPolicy::default())
    }

    fn from_connection(conn: Connection, retry: RetryPolicy) -> Result<Self, StoreError> {
        let store = Self { conn, retry };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create the `patients` table if absent and add any missing column.
    /// Safe to call any number of times.
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        with_write_retry(&self.retry, "ensure_schema", || {
            sqlite::run_migrations(&self.conn)
        })
    }

    /// Persist a new patient and return its assigned id.
    pub fn insert(&self, patient: &NewPatient) -> Result<i64, StoreError> {
        with_write_retry(&self.retry, "insert_patient", || {
            repository::insert_patient(&self.conn, patient)
        })
    }

    /// Every stored patient, oldest first.
    pub fn fetch_all(&self) -> Result<Vec<PatientRecord>, StoreError> {
        repository::get_all_patients(&self.conn)
    }

    pub fn count(&self) -> Result<i64, StoreError> {
        repository::count_patients(&self.conn)
    }

    pub fn schema_version(&self) -> Result<i64, StoreError> {
        sqlite::get_current_version(&self.conn)
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}
