//! Key-value slot operations (kv_store)

use chrono::Utc;
use rusqlite::{OptionalExtension, Result as SqliteResult};

use super::super::Database;

impl Database {
    /// Read the value stored under `key` (None if the key was never written)
    pub fn get_slot(&self, key: &str) -> SqliteResult<Option<String>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()
    }

    /// Overwrite the value stored under `key`
    pub fn put_slot(&self, key: &str, value: &str) -> SqliteResult<()> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            [key, value, now.as_str()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_get_missing_key() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_slot("nothing").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let db = Database::open_in_memory().unwrap();
        db.put_slot("notes", "[]").unwrap();
        db.put_slot("notes", "[1]").unwrap();
        db.put_slot("other", "x").unwrap();

        assert_eq!(db.get_slot("notes").unwrap().as_deref(), Some("[1]"));
        assert_eq!(db.get_slot("other").unwrap().as_deref(), Some("x"));

        let rows: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 2);
    }

    #[test]
    fn test_value_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kv.db");

        {
            let db = Database::open(&path).unwrap();
            db.put_slot("notes", "persisted").unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.get_slot("notes").unwrap().as_deref(), Some("persisted"));
    }
}
