//! QuickNote backend: a local note store with selection and edit-session state.
//!
//! Notes live in memory as an ordered collection and are mirrored, whole, to
//! a single durable key (`kv_store` row in SQLite) on every mutation. The
//! front end renders `view::Screen` and drives `app::NotesApp` with gestures.

pub mod app;
pub mod config;
pub mod db;
pub mod notes;
pub mod session;
pub mod storage;
pub mod view;

pub use app::NotesApp;
pub use config::Config;
pub use note_types::{MAX_TITLE_LEN, Note, PLACEHOLDER_TITLE};
pub use notes::{NoteEvent, NoteStore, NoteStoreError};
pub use session::{EditBuffer, EditSession, SessionError, SessionState};
pub use storage::{MemorySlot, SqliteSlot, StorageError, StorageSlot};
