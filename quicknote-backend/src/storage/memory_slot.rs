use parking_lot::Mutex;
use std::sync::Arc;

use super::{StorageError, StorageSlot};

/// In-process slot. Clones share the same value, so a test can keep a handle
/// and inspect what the store last persisted.
#[derive(Clone, Default)]
pub struct MemorySlot {
    value: Arc<Mutex<Option<String>>>,
    writes: Arc<Mutex<usize>>,
    failing: Arc<Mutex<bool>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-filled with a raw value (e.g. a collection written by an earlier session)
    pub fn with_value(value: &str) -> Self {
        let slot = Self::default();
        *slot.value.lock() = Some(value.to_string());
        slot
    }

    /// The value last written, if any
    pub fn snapshot(&self) -> Option<String> {
        self.value.lock().clone()
    }

    /// Make every later write fail with an I/O error until switched off
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    /// Number of overwrites since creation
    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.snapshot())
    }

    fn write(&mut self, value: &str) -> Result<(), StorageError> {
        if *self.failing.lock() {
            return Err(std::io::Error::other("memory slot is read-only").into());
        }
        *self.value.lock() = Some(value.to_string());
        *self.writes.lock() += 1;
        Ok(())
    }
}
