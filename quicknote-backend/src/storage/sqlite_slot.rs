use std::sync::Arc;

use super::{StorageError, StorageSlot};
use crate::db::Database;

/// Storage slot backed by one row of the `kv_store` table
#[derive(Clone)]
pub struct SqliteSlot {
    db: Arc<Database>,
    key: String,
}

impl SqliteSlot {
    pub fn new(db: Arc<Database>, key: &str) -> Self {
        Self {
            db,
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl StorageSlot for SqliteSlot {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.db.get_slot(&self.key)?)
    }

    fn write(&mut self, value: &str) -> Result<(), StorageError> {
        self.db.put_slot(&self.key, value)?;
        Ok(())
    }
}
