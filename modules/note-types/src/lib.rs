//! Shared types for the quicknote store and anything reading its storage slot.

use serde::{Deserialize, Serialize};

// =====================================================
// Constants
// =====================================================

/// Title substituted when a note is saved with a blank title
pub const PLACEHOLDER_TITLE: &str = "Untitled Note";

/// Maximum title length in characters, enforced by the input surface
pub const MAX_TITLE_LEN: usize = 120;

// =====================================================
// Domain Types
// =====================================================

/// A single user-authored note.
///
/// Field names are the durable wire format: the storage slot holds a JSON
/// array of these objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Opaque unique id, immutable after creation
    pub id: String,
    pub title: String,
    /// Free-form multi-line body, stored verbatim
    pub content: String,
    /// Creation time (epoch milliseconds)
    pub created: i64,
    /// Last successful save (epoch milliseconds)
    pub updated: i64,
}

impl Note {
    /// Case-insensitive substring match against title or content.
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
    }
}

/// Returns `title` unless it is blank, in which case the placeholder
pub fn title_or_placeholder(title: &str) -> String {
    if title.trim().is_empty() {
        PLACEHOLDER_TITLE.to_string()
    } else {
        title.to_string()
    }
}

// =====================================================
// Collection Codec
// =====================================================

/// Serialize the whole collection for the storage slot
pub fn encode_collection(notes: &[Note]) -> serde_json::Result<String> {
    serde_json::to_string(notes)
}

/// Parse a storage slot value. Only the structure is checked.
pub fn decode_collection(raw: &str) -> serde_json::Result<Vec<Note>> {
    serde_json::from_str(raw)
}
