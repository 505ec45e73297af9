//! Application state: the note store, the edit session, and the search box.
//!
//! `NotesApp` is what a front end talks to: it forwards UI gestures to the
//! session/store, keeps the selection valid after every mutation, and
//! produces the `Screen` to draw. Keyboard shortcuts and the store
//! subscription exist only between `mount` and `unmount`.

use std::cell::Cell;
use std::rc::Rc;

use note_types::Note;

use crate::config::Config;
use crate::notes::{NoteStore, NoteStoreError, SubscriptionId};
use crate::session::{EditSession, SessionError};
use crate::storage::{SqliteSlot, StorageSlot};
use crate::view::shortcuts::{
    HandlerId, KeyChord, KeyEvent, Shortcut, ShortcutError, ShortcutRegistry,
};
use crate::view::Screen;

/// Chords bound while the app is mounted
pub const NEW_NOTE_CHORD: &str = "Ctrl+N";
pub const FOCUS_SEARCH_CHORD: &str = "Ctrl+K";

struct Mounted {
    handlers: Vec<HandlerId>,
    subscription: SubscriptionId,
}

pub struct NotesApp<S: StorageSlot> {
    store: NoteStore<S>,
    session: EditSession,
    search: String,
    search_focused: bool,
    shortcuts: ShortcutRegistry,
    mounted: Option<Mounted>,
    /// Set by the store subscription and by gestures; cleared by `take_render`
    needs_render: Rc<Cell<bool>>,
}

impl NotesApp<SqliteSlot> {
    /// Open the configured slot. Unreadable stored notes are discarded
    /// with a warning rather than failing startup.
    pub fn open(config: &Config) -> Result<Self, NoteStoreError> {
        let slot = config.open_slot()?;
        let store = NoteStore::load_or_empty(slot)?;
        Ok(Self::new(store))
    }
}

impl<S: StorageSlot> NotesApp<S> {
    pub fn new(store: NoteStore<S>) -> Self {
        Self {
            store,
            session: EditSession::new(),
            search: String::new(),
            search_focused: false,
            shortcuts: ShortcutRegistry::new(),
            mounted: None,
            needs_render: Rc::new(Cell::new(true)),
        }
    }

    pub fn store(&self) -> &NoteStore<S> {
        &self.store
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Register shortcuts and the store subscription. Mounting twice is a no-op.
    pub fn mount(&mut self) -> Result<(), ShortcutError> {
        if self.mounted.is_some() {
            return Ok(());
        }

        let bindings = [
            (NEW_NOTE_CHORD, Shortcut::NewNote),
            (FOCUS_SEARCH_CHORD, Shortcut::FocusSearch),
        ];
        let mut handlers = Vec::with_capacity(bindings.len());
        for (chord, action) in bindings {
            let registered = chord
                .parse::<KeyChord>()
                .and_then(|chord| self.shortcuts.register(chord, action));
            match registered {
                Ok(id) => handlers.push(id),
                Err(e) => {
                    for id in handlers {
                        self.shortcuts.unregister(id);
                    }
                    return Err(e);
                }
            }
        }

        let flag = self.needs_render.clone();
        let subscription = self.store.subscribe(move |_| flag.set(true));

        self.mounted = Some(Mounted {
            handlers,
            subscription,
        });
        self.needs_render.set(true);
        Ok(())
    }

    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            for id in mounted.handlers {
                self.shortcuts.unregister(id);
            }
            self.store.unsubscribe(mounted.subscription);
        }
    }

    /// Route a key press through the bound shortcuts. Returns whether a
    /// shortcut fired; nothing fires while unmounted.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Result<bool, SessionError> {
        if self.mounted.is_none() {
            return Ok(false);
        }
        match self.shortcuts.dispatch(event) {
            Some(Shortcut::NewNote) => {
                self.create_note()?;
                Ok(true)
            }
            Some(Shortcut::FocusSearch) => {
                self.search_focused = true;
                self.touch();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn create_note(&mut self) -> Result<Note, SessionError> {
        let note = self.session.create_note(&mut self.store)?;
        self.search_focused = false;
        self.after_mutation();
        Ok(note)
    }

    pub fn select_note(&mut self, id: &str) -> bool {
        let selected = self.session.select_note(&self.store, id);
        self.touch();
        selected
    }

    pub fn begin_edit(&mut self) -> Result<(), SessionError> {
        let result = self.session.begin_edit(&self.store);
        self.touch();
        result
    }

    pub fn cancel_edit(&mut self) -> Result<(), SessionError> {
        let result = self.session.cancel_edit(&self.store);
        self.touch();
        result
    }

    pub fn edit_title(&mut self, title: &str) -> Result<(), SessionError> {
        self.session.edit_title(title)?;
        self.touch();
        Ok(())
    }

    pub fn edit_content(&mut self, content: &str) -> Result<(), SessionError> {
        self.session.edit_content(content)?;
        self.touch();
        Ok(())
    }

    pub fn save(&mut self) -> Result<Note, SessionError> {
        let result = self.session.save(&mut self.store);
        self.after_mutation();
        result
    }

    pub fn delete_selected(&mut self) -> Result<bool, SessionError> {
        let result = self.session.delete_selected(&mut self.store);
        self.after_mutation();
        result
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
        self.touch();
    }

    pub fn blur_search(&mut self) {
        self.search_focused = false;
        self.touch();
    }

    /// Current screen, always freshly derived
    pub fn screen(&self) -> Screen {
        Screen::build(&self.store, &self.session, &self.search, self.search_focused)
    }

    /// Screen if anything changed since the last call
    pub fn take_render(&mut self) -> Option<Screen> {
        if self.needs_render.replace(false) {
            Some(self.screen())
        } else {
            None
        }
    }

    fn after_mutation(&mut self) {
        if self.session.reconcile(&self.store) {
            log::debug!("[SESSION] Selected note disappeared, now idle");
        }
        self.touch();
    }

    fn touch(&self) {
        self.needs_render.set(true);
    }
}
