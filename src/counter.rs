//! Collectible call counters.
//!
//! Each collectible remembers how many times it has been delivered. The count
//! lives behind the [`CounterStore`] capability; [`SqliteCounterStore`] keeps it
//! in a local SQLite file.

use crate::error::{BelcherError, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

/// Integer key/value storage for call counts.
#[allow(async_fn_in_trait)]
pub trait CounterStore {
    /// Current value of counter `id`; counters that were never written read as 0.
    async fn read(&self, id: &str) -> Result<i64>;

    /// Overwrite counter `id` with `value`.
    async fn write(&self, id: &str, value: i64) -> Result<()>;
}

/// Initialize the counter database schema.
///
/// Creates the parent directory and the `counters` table if they don't exist.
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Errors
///
/// Returns an error if the database cannot be created or initialized.
pub async fn init_db(path: &str) -> Result<()> {
    let path = path.to_string();
    tokio::task::spawn_blocking(move || init_db_sync(&path)).await??;
    Ok(())
}

fn init_db_sync(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS counters (
            id TEXT NOT NULL PRIMARY KEY,
            value INTEGER NOT NULL
        )",
        [],
    )?;

    Ok(())
}

/// Counter store backed by a SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteCounterStore {
    db_path: String,
}

impl SqliteCounterStore {
    /// Create a store over an already initialized database (see [`init_db`]).
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }

    fn connect(path: &str) -> Result<Connection> {
        Connection::open(path)
            .map_err(|e| BelcherError::Counter(format!("Failed to connect to database: {}", e)))
    }
}

impl CounterStore for SqliteCounterStore {
    async fn read(&self, id: &str) -> Result<i64> {
        let db_path = self.db_path.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = Self::connect(&db_path)?;
            let value = conn
                .query_row(
                    "SELECT value FROM counters WHERE id = ?1",
                    rusqlite::params![id],
                    |row| row.get::<_, i64>(0),
                )
                .optional()?;
            Ok::<_, BelcherError>(value.unwrap_or(0))
        })
        .await
        .map_err(|e| BelcherError::Counter(format!("Task join error: {}", e)))?
    }

    async fn write(&self, id: &str, value: i64) -> Result<()> {
        let db_path = self.db_path.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = Self::connect(&db_path)?;
            conn.execute(
                "INSERT INTO counters (id, value)
                 VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET value = ?2",
                rusqlite::params![id, value],
            )?;
            Ok::<_, BelcherError>(())
        })
        .await
        .map_err(|e| BelcherError::Counter(format!("Task join error: {}", e)))??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Helper function to create a counter database in a temporary directory
    async fn setup_test_db() -> (TempDir, SqliteCounterStore) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("nested").join("counters.db");
        let db_path_str = db_path.to_str().expect("Invalid path").to_string();

        init_db(&db_path_str).await.expect("Failed to initialize database");

        (temp_dir, SqliteCounterStore::new(db_path_str))
    }

    #[tokio::test]
    async fn test_unknown_counter_reads_zero() {
        let (_temp_dir, store) = setup_test_db().await;
        assert_eq!(store.read("me0tbmp").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let (_temp_dir, store) = setup_test_db().await;

        store.write("me0tbmp", 41).await.unwrap();
        assert_eq!(store.read("me0tbmp").await.unwrap(), 41);

        store.write("me0tbmp", 42).await.unwrap();
        assert_eq!(store.read("me0tbmp").await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_counters_are_independent() {
        let (_temp_dir, store) = setup_test_db().await;

        store.write("me0tbmp", 7).await.unwrap();
        store.write("mlnqxci", 3).await.unwrap();

        assert_eq!(store.read("me0tbmp").await.unwrap(), 7);
        assert_eq!(store.read("mlnqxci").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let (temp_dir, store) = setup_test_db().await;
        store.write("mlnqxci", 5).await.unwrap();

        let db_path = temp_dir.path().join("nested").join("counters.db");
        init_db(db_path.to_str().unwrap()).await.unwrap();

        assert_eq!(store.read("mlnqxci").await.unwrap(), 5);
    }
}
