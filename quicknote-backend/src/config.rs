use std::env;
use std::path::PathBuf;

use crate::db::Database;
use crate::storage::{SqliteSlot, StorageError};

/// Environment variable names - single source of truth
pub mod env_vars {
    /// Path of the SQLite file holding the storage slot
    pub const DATABASE_PATH: &str = "QUICKNOTE_DATABASE_PATH";
    /// Name of the key the note collection is stored under
    pub const STORAGE_KEY: &str = "QUICKNOTE_STORAGE_KEY";
}

/// Default values
pub mod defaults {
    pub const DATABASE_PATH: &str = "./.db/quicknote.db";
    pub const STORAGE_KEY: &str = "quicknote.notes";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub storage_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(defaults::DATABASE_PATH),
            storage_key: defaults::STORAGE_KEY.to_string(),
        }
    }
}

impl Config {
    /// Load `.env` (if any) and resolve from the process environment
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolve config from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let config = Self {
            database_path: read(env_vars::DATABASE_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(defaults::DATABASE_PATH)),
            storage_key: read(env_vars::STORAGE_KEY)
                .unwrap_or_else(|| defaults::STORAGE_KEY.to_string()),
        };

        log::debug!(
            "[CONFIG] database={:?} key={}",
            config.database_path,
            config.storage_key
        );
        config
    }

    /// Open the configured database and hand back the note slot inside it
    pub fn open_slot(&self) -> Result<SqliteSlot, StorageError> {
        let db = Database::open(&self.database_path)?;
        Ok(SqliteSlot::new(db.into(), &self.storage_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageSlot;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.storage_key, "quicknote.notes");
    }

    #[test]
    fn test_lookup_overrides_and_blank_values() {
        let mut vars = HashMap::new();
        vars.insert(env_vars::DATABASE_PATH, "/tmp/notes.db".to_string());
        vars.insert(env_vars::STORAGE_KEY, "   ".to_string());

        let config = Config::from_lookup(|name| vars.get(name).cloned());
        assert_eq!(config.database_path, PathBuf::from("/tmp/notes.db"));
        assert_eq!(config.storage_key, defaults::STORAGE_KEY);
    }

    #[test]
    fn test_open_slot_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let config = Config {
            database_path: dir.path().join("nested").join("notes.db"),
            storage_key: "k".to_string(),
        };

        let slot = config.open_slot().expect("Failed to open slot");
        assert_eq!(slot.key(), "k");
        assert!(slot.read().unwrap().is_none());
        assert!(dir.path().join("nested").join("notes.db").exists());
    }
}
