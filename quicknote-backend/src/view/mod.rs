//! Screen model handed to the front end on every render.
//!
//! Nothing here is stored: the sidebar is re-derived from `NoteStore::list`
//! and the panel from the edit session each time `Screen::build` runs.

pub mod shortcuts;

use chrono::{Local, TimeZone};
use note_types::Note;

use crate::notes::NoteStore;
use crate::session::{EditBuffer, EditSession, SessionState};
use crate::storage::StorageSlot;

const PREVIEW_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub id: String,
    pub title: String,
    /// Start of the content on one line
    pub preview: String,
    /// Local date-time of the last save
    pub updated_label: String,
    pub selected: bool,
}

impl SidebarEntry {
    fn from_note(note: &Note, selected: Option<&str>) -> Self {
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            preview: preview(&note.content),
            updated_label: format_timestamp(note.updated),
            selected: selected == Some(note.id.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    /// Nothing selected
    Empty,
    /// Read-only view of the stored note
    Detail(Note),
    /// Edit form showing the draft
    EditForm(EditBuffer),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub search: String,
    pub search_focused: bool,
    pub sidebar: Vec<SidebarEntry>,
    pub panel: Panel,
}

impl Screen {
    pub fn build<S: StorageSlot>(
        store: &NoteStore<S>,
        session: &EditSession,
        search: &str,
        search_focused: bool,
    ) -> Self {
        let selected = session.selected_id();
        let sidebar = store
            .list(search)
            .into_iter()
            .map(|note| SidebarEntry::from_note(note, selected))
            .collect();

        let panel = match session.state() {
            SessionState::Idle => Panel::Empty,
            SessionState::Viewing(id) => match store.get(id) {
                Some(note) => Panel::Detail(note.clone()),
                None => Panel::Empty,
            },
            SessionState::Editing(_) => Panel::EditForm(session.buffer().clone()),
        };

        Self {
            search: search.to_string(),
            search_focused,
            sidebar,
            panel,
        }
    }
}

fn preview(content: &str) -> String {
    content
        .replace("\r\n", "\n")
        .chars()
        .take(PREVIEW_CHARS)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

fn format_timestamp(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}
