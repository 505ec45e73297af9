//! Selection & edit-session controller.
//!
//! Tracks which note is selected, whether it is being edited, and the draft
//! being typed. The draft lives here, not in the store, so unsaved edits are
//! invisible to the sidebar until `save` succeeds.
//!
//! ```text
//!   Idle ──select_note──► Viewing ──begin_edit──► Editing
//!    ▲                      ▲  ◄──cancel_edit / save──┘
//!    └──delete last note────┘
//!   create_note (from anywhere) ──► Editing
//! ```

pub mod draft;

pub use draft::EditBuffer;

use note_types::Note;
use thiserror::Error;

use crate::notes::{NoteStore, NoteStoreError};
use crate::storage::StorageSlot;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No note is selected")]
    NoSelection,
    #[error("The selected note is not being edited")]
    NotEditing,
    #[error(transparent)]
    Store(#[from] NoteStoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Viewing(String),
    Editing(String),
}

#[derive(Debug, Default)]
pub struct EditSession {
    state: SessionState,
    buffer: EditBuffer,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn selected_id(&self) -> Option<&str> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Viewing(id) | SessionState::Editing(id) => Some(id),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, SessionState::Editing(_))
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    /// View a note. An id that no longer exists deselects instead.
    /// Returns whether a note is now selected.
    pub fn select_note<S: StorageSlot>(&mut self, store: &NoteStore<S>, id: &str) -> bool {
        match store.get(id) {
            Some(note) => {
                self.view(note);
                true
            }
            None => {
                log::debug!("[SESSION] Select of missing note {}, deselecting", id);
                self.deselect();
                false
            }
        }
    }

    pub fn begin_edit<S: StorageSlot>(&mut self, store: &NoteStore<S>) -> Result<(), SessionError> {
        let id = match &self.state {
            SessionState::Idle => return Err(SessionError::NoSelection),
            SessionState::Editing(_) => return Ok(()),
            SessionState::Viewing(id) => id.clone(),
        };

        if store.get(&id).is_none() {
            self.deselect();
            return Err(SessionError::NoSelection);
        }
        self.state = SessionState::Editing(id);
        Ok(())
    }

    /// Drop the draft and go back to viewing the stored values
    pub fn cancel_edit<S: StorageSlot>(
        &mut self,
        store: &NoteStore<S>,
    ) -> Result<(), SessionError> {
        let SessionState::Editing(id) = &self.state else {
            return Err(SessionError::NotEditing);
        };

        match store.get(id) {
            Some(note) => self.view(note),
            None => self.deselect(),
        }
        Ok(())
    }

    /// Write the draft to the store. A note deleted underneath deselects and
    /// reports `NotFound`.
    pub fn save<S: StorageSlot>(&mut self, store: &mut NoteStore<S>) -> Result<Note, SessionError> {
        let SessionState::Editing(id) = &self.state else {
            return Err(SessionError::NotEditing);
        };
        let id = id.clone();

        match store.update(&id, &self.buffer.title, &self.buffer.content) {
            Ok(note) => {
                self.view(&note);
                Ok(note)
            }
            Err(e) => {
                log::warn!("[SESSION] Save of {} failed: {}", id, e);
                if matches!(e, NoteStoreError::NotFound(_)) {
                    self.deselect();
                }
                Err(e.into())
            }
        }
    }

    /// Delete the selected note, then select the note just before its old
    /// position in storage order (clamped to the head), or go idle if the
    /// collection is now empty. Returns whether the store removed anything.
    pub fn delete_selected<S: StorageSlot>(
        &mut self,
        store: &mut NoteStore<S>,
    ) -> Result<bool, SessionError> {
        let id = self
            .selected_id()
            .ok_or(SessionError::NoSelection)?
            .to_string();
        let index = store.position(&id).unwrap_or(0);

        let removed = store.delete(&id)?;

        match store.notes().get(index.saturating_sub(1)) {
            Some(next) => self.view(next),
            None => self.deselect(),
        }
        Ok(removed)
    }

    /// Create a note and open it for editing with a fresh draft
    pub fn create_note<S: StorageSlot>(
        &mut self,
        store: &mut NoteStore<S>,
    ) -> Result<Note, SessionError> {
        let note = store.create()?;
        self.state = SessionState::Editing(note.id.clone());
        self.buffer = EditBuffer::fresh();
        Ok(note)
    }

    pub fn edit_title(&mut self, title: &str) -> Result<(), SessionError> {
        if !self.is_editing() {
            return Err(SessionError::NotEditing);
        }
        self.buffer.set_title(title);
        Ok(())
    }

    pub fn edit_content(&mut self, content: &str) -> Result<(), SessionError> {
        if !self.is_editing() {
            return Err(SessionError::NotEditing);
        }
        self.buffer.set_content(content);
        Ok(())
    }

    /// Deselect if the selected note vanished. Returns true if it did.
    pub fn reconcile<S: StorageSlot>(&mut self, store: &NoteStore<S>) -> bool {
        match self.selected_id() {
            Some(id) if store.get(id).is_none() => {
                self.deselect();
                true
            }
            _ => false,
        }
    }

    fn view(&mut self, note: &Note) {
        self.state = SessionState::Viewing(note.id.clone());
        self.buffer = EditBuffer::from_note(note);
    }

    fn deselect(&mut self) {
        self.state = SessionState::Idle;
        self.buffer = EditBuffer::default();
    }
}
