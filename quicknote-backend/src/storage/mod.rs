//! Durable storage slot: a single named key holding the serialized note collection.
//!
//! `NoteStore` only needs whole-value reads and overwrites, so any backend that
//! can hold one string under one key works: the SQLite `kv_store` table for
//! real sessions, process memory for tests and throwaway sessions.

mod memory_slot;
mod sqlite_slot;

pub use memory_slot::MemorySlot;
pub use sqlite_slot::SqliteSlot;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One named durable value, read at startup and overwritten on every mutation
pub trait StorageSlot {
    /// Current value, or None if the key is absent
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replace the value wholesale
    fn write(&mut self, value: &str) -> Result<(), StorageError>;
}
