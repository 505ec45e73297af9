//! SQLite database holding the key-value table that backs the storage slot.

use parking_lot::{Mutex, MutexGuard};
use rusqlite::{Connection, Result as SqliteResult};
use std::fs;
use std::path::Path;

use crate::storage::StorageError;

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file, creating parent directories as needed
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let db = Self::from_connection(conn)?;
        log::info!("[DB] Opened {:?}", path);
        Ok(db)
    }

    /// Open a throwaway database that lives as long as this value
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self::from_connection(Connection::open_in_memory()?)?)
    }

    fn from_connection(conn: Connection) -> SqliteResult<Self> {
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> SqliteResult<()> {
        self.conn().execute_batch(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
    }

    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }
}
