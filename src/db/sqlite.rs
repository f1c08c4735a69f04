use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use chrono::Local;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use tracing;

use super::{is_lock_error, StoreError};

/// How long SQLite itself waits on a locked database before reporting BUSY.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Latest schema version produced by [`run_migrations`].
pub const SCHEMA_VERSION: i64 = 2;

/// Columns every `patients` table must carry, with their declared types.
/// `id` is excluded: it can only be created with the table.
pub const PATIENT_COLUMNS: &[(&str, &str)] = &[
    ("name", "TEXT"),
    ("age", "INTEGER"),
    ("gender", "TEXT"),
    ("district", "TEXT"),
    ("disease", "TEXT"),
    ("subtype", "TEXT"),
    ("days_suffering", "INTEGER"),
];

struct Migration {
    version: i64,
    description: &'static str,
    apply: fn(&Connection) -> rusqlite::Result<()>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create patients table",
        apply: create_patients_table,
    },
    Migration {
        version: 2,
        description: "add patients.subtype",
        apply: add_subtype_column,
    },
];

/// Open a SQLite connection to the given path. Does not touch the schema.
pub fn open_connection(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA synchronous=NORMAL;",
    )?;
    Ok(conn)
}

/// Open an in-memory connection (for testing).
pub fn open_memory_connection() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

/// Run all pending migrations, then add any declared column still missing.
///
/// Each step runs in its own immediate transaction and re-reads the schema
/// version under the write lock, so two processes starting together apply
/// every migration exactly once.
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )?;

    for migration in MIGRATIONS {
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        if get_current_version(&tx)? >= migration.version {
            continue;
        }

        tracing::info!(
            version = migration.version,
            description = migration.description,
            "Running migration"
        );
        (migration.apply)(&tx).map_err(|e| migration_error(migration.version, e))?;
        tx.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
            params![
                migration.version,
                Local::now().naive_local().format("%Y-%m-%d %H:%M:%S").to_string()
            ],
        )?;
        tx.commit()?;
    }

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let added = ensure_columns(&tx, "patients", PATIENT_COLUMNS)
        .map_err(|e| migration_error(SCHEMA_VERSION, e))?;
    tx.commit()?;
    if added > 0 {
        tracing::warn!(added, "Restored missing patients columns");
    }

    Ok(())
}

fn migration_error(version: i64, e: rusqlite::Error) -> StoreError {
    if is_lock_error(&e) {
        StoreError::Sqlite(e)
    } else {
        StoreError::MigrationFailed {
            version,
            reason: e.to_string(),
        }
    }
}

fn create_patients_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(include_str!("../../resources/migrations/001_patients.sql"))
}

fn add_subtype_column(conn: &Connection) -> rusqlite::Result<()> {
    ensure_columns(conn, "patients", &[("subtype", "TEXT")]).map(|_| ())
}

/// Add each `(name, type)` column not already on `table`. Returns how many
/// were added.
fn ensure_columns(
    conn: &Connection,
    table: &str,
    columns: &[(&str, &str)],
) -> rusqlite::Result<usize> {
    let existing = table_columns(conn, table)?;
    let mut added = 0;
    for (name, decl) in columns {
        if existing.contains(*name) {
            continue;
        }
        tracing::info!(table, column = name, "Adding missing column");
        conn.execute_batch(&format!("ALTER TABLE {table} ADD COLUMN {name} {decl};"))?;
        added += 1;
    }
    Ok(added)
}

/// Column names of `table` (empty if the table does not exist).
pub fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let rows = stmt.query_map(params![table], |row| row.get::<_, String>(0))?;
    rows.collect()
}

/// Get the current schema version (0 if no migration has run yet)
pub fn get_current_version(conn: &Connection) -> Result<i64, StoreError> {
    let version = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, Option<i64>>(0)
    })?;
    Ok(version.unwrap_or(0))
}
