//! NoteStore — the in-memory note collection mirrored to a storage slot
//!
//! Holds notes in storage order (newest creation at the head). Each mutation
//! builds the next collection, overwrites the slot with it, and only then
//! swaps it in, so memory never runs ahead of what was persisted.

use note_types::{
    Note, PLACEHOLDER_TITLE, decode_collection, encode_collection, title_or_placeholder,
};
use thiserror::Error;
use uuid::Uuid;

use super::clock::{Clock, SystemClock};
use super::events::{Listeners, NoteEvent, SubscriptionId};
use super::query;
use crate::storage::{StorageError, StorageSlot};

#[derive(Error, Debug)]
pub enum NoteStoreError {
    #[error("Note not found: {0}")]
    NotFound(String),
    #[error("Stored notes could not be parsed")]
    MalformedStorage(#[source] serde_json::Error),
    #[error("Failed to encode notes")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct NoteStore<S: StorageSlot> {
    slot: S,
    notes: Vec<Note>,
    clock: Box<dyn Clock>,
    /// Last timestamp handed out; new stamps are strictly greater
    last_stamp: i64,
    listeners: Listeners,
}

impl<S: StorageSlot> NoteStore<S> {
    /// Load the collection from the slot. An absent key yields an empty
    /// store; content that does not parse is `MalformedStorage`.
    pub fn load(slot: S) -> Result<Self, NoteStoreError> {
        let notes = match slot.read()? {
            Some(raw) => decode_collection(&raw).map_err(NoteStoreError::MalformedStorage)?,
            None => Vec::new(),
        };
        log::info!("[NOTES] Loaded {} notes", notes.len());
        Ok(Self::with_notes(slot, notes))
    }

    /// Like `load`, but a malformed slot starts an empty collection instead
    /// of failing. The bad value stays until the next mutation overwrites it.
    pub fn load_or_empty(slot: S) -> Result<Self, NoteStoreError> {
        let raw = slot.read()?;
        let notes = match raw.as_deref().map(decode_collection) {
            Some(Ok(notes)) => notes,
            Some(Err(e)) => {
                log::warn!("[NOTES] Discarding unreadable note storage: {}", e);
                Vec::new()
            }
            None => Vec::new(),
        };
        log::info!("[NOTES] Loaded {} notes", notes.len());
        Ok(Self::with_notes(slot, notes))
    }

    fn with_notes(slot: S, notes: Vec<Note>) -> Self {
        let last_stamp = notes.iter().map(|n| n.updated).max().unwrap_or(i64::MIN);
        Self {
            slot,
            notes,
            clock: Box::new(SystemClock),
            last_stamp,
            listeners: Listeners::default(),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Unfiltered collection in storage order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Create an empty note at the head of the collection
    pub fn create(&mut self) -> Result<Note, NoteStoreError> {
        let now = self.next_stamp();
        let note = Note {
            id: self.fresh_id(),
            title: PLACEHOLDER_TITLE.to_string(),
            content: String::new(),
            created: now,
            updated: now,
        };

        let mut next = Vec::with_capacity(self.notes.len() + 1);
        next.push(note.clone());
        next.extend(self.notes.iter().cloned());
        self.commit(next)?;

        log::debug!("[NOTES] Created note {}", note.id);
        self.listeners.emit(&NoteEvent::Created {
            id: note.id.clone(),
        });
        Ok(note)
    }

    /// Visible list for `query` (see `query::visible_notes`)
    pub fn list(&self, query: &str) -> Vec<&Note> {
        query::visible_notes(&self.notes, query)
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Position of a note in storage order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|n| n.id == id)
    }

    /// Save new title and content. A blank title becomes the placeholder;
    /// content is kept verbatim.
    pub fn update(
        &mut self,
        id: &str,
        title: &str,
        content: &str,
    ) -> Result<Note, NoteStoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| NoteStoreError::NotFound(id.to_string()))?;

        let mut next = self.notes.clone();
        let note = &mut next[index];
        note.title = title_or_placeholder(title);
        note.content = content.to_string();
        note.updated = self.next_stamp().max(note.created);
        let updated = note.clone();

        self.commit(next)?;

        log::debug!("[NOTES] Updated note {}", id);
        self.listeners.emit(&NoteEvent::Updated { id: id.to_string() });
        Ok(updated)
    }

    /// Remove a note. Persists even when nothing matched; returns whether a
    /// note was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool, NoteStoreError> {
        let next: Vec<Note> = self.notes.iter().filter(|n| n.id != id).cloned().collect();
        let removed = next.len() != self.notes.len();
        self.commit(next)?;

        log::debug!("[NOTES] Delete {} (removed: {})", id, removed);
        self.listeners.emit(&NoteEvent::Deleted {
            id: id.to_string(),
            removed,
        });
        Ok(removed)
    }

    /// Register a change listener, called after each successful write
    pub fn subscribe(&mut self, listener: impl FnMut(&NoteEvent) + 'static) -> SubscriptionId {
        self.listeners.add(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn commit(&mut self, next: Vec<Note>) -> Result<(), NoteStoreError> {
        let raw = encode_collection(&next).map_err(NoteStoreError::Encode)?;
        self.slot.write(&raw)?;
        self.notes = next;
        Ok(())
    }

    fn next_stamp(&mut self) -> i64 {
        let now = self.clock.now_millis();
        let stamp = if now > self.last_stamp {
            now
        } else {
            self.last_stamp.saturating_add(1)
        };
        self.last_stamp = stamp;
        stamp
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::ManualClock;
    use crate::storage::MemorySlot;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store_at(millis: i64) -> (NoteStore<MemorySlot>, MemorySlot, ManualClock) {
        let slot = MemorySlot::new();
        let clock = ManualClock::starting_at(millis);
        let store = NoteStore::load(slot.clone())
            .expect("Failed to load store")
            .with_clock(clock.clone());
        (store, slot, clock)
    }

    fn persisted(slot: &MemorySlot) -> Vec<Note> {
        decode_collection(&slot.snapshot().expect("slot never written")).unwrap()
    }

    #[test]
    fn test_create_inserts_at_head_and_persists() {
        let (mut store, slot, clock) = store_at(1_000);

        let first = store.create().unwrap();
        clock.advance(5);
        let second = store.create().unwrap();

        assert_eq!(first.title, PLACEHOLDER_TITLE);
        assert_eq!(first.content, "");
        assert_eq!(first.created, 1_000);
        assert_eq!(first.created, first.updated);
        assert_eq!(second.created, 1_005);

        assert_eq!(store.notes()[0].id, second.id);
        assert_eq!(store.notes()[1].id, first.id);
        assert_eq!(persisted(&slot), store.notes());
    }

    #[test]
    fn test_same_millisecond_stamps_are_strictly_increasing() {
        let (mut store, _slot, _clock) = store_at(42);

        let a = store.create().unwrap();
        let b = store.create().unwrap();
        assert!(b.updated > a.updated);

        let a = store.update(&a.id, "A", "").unwrap();
        assert!(a.updated > a.created);
        assert!(a.updated > b.updated);
    }

    #[test]
    fn test_clock_going_backwards_keeps_created_le_updated() {
        let (mut store, _slot, clock) = store_at(10_000);
        let note = store.create().unwrap();

        clock.set(5);
        let saved = store.update(&note.id, "t", "c").unwrap();
        assert!(saved.created <= saved.updated);
        assert!(saved.updated > note.updated);
    }

    #[test]
    fn test_update_substitutes_placeholder_and_keeps_content_verbatim() {
        let (mut store, slot, clock) = store_at(0);
        let note = store.create().unwrap();
        clock.advance(10);

        let saved = store.update(&note.id, "   ", "  body\n\n").unwrap();
        assert_eq!(saved.title, PLACEHOLDER_TITLE);
        assert_eq!(saved.content, "  body\n\n");
        assert_eq!(saved.created, note.created);
        assert_eq!(saved.updated, 10);
        assert_eq!(store.get(&note.id), Some(&saved));
        assert_eq!(persisted(&slot), store.notes());
    }

    #[test]
    fn test_update_missing_note_is_not_found() {
        let (mut store, slot, _clock) = store_at(0);
        store.create().unwrap();
        let writes = slot.write_count();

        let err = store.update("missing", "t", "c").unwrap_err();
        assert!(matches!(err, NoteStoreError::NotFound(ref id) if id == "missing"));
        assert_eq!(slot.write_count(), writes);
    }

    #[test]
    fn test_update_keeps_storage_position() {
        let (mut store, _slot, clock) = store_at(0);
        let a = store.create().unwrap();
        let b = store.create().unwrap();
        clock.advance(100);

        store.update(&a.id, "A", "").unwrap();
        assert_eq!(store.position(&b.id), Some(0));
        assert_eq!(store.position(&a.id), Some(1));
    }

    #[test]
    fn test_delete_is_idempotent_and_always_persists() {
        let (mut store, slot, _clock) = store_at(0);
        let note = store.create().unwrap();

        assert!(store.delete(&note.id).unwrap());
        assert!(store.get(&note.id).is_none());
        let writes = slot.write_count();

        assert!(!store.delete(&note.id).unwrap());
        assert_eq!(slot.write_count(), writes + 1);
        assert_eq!(persisted(&slot), Vec::<Note>::new());
    }

    #[test]
    fn test_failed_write_leaves_memory_and_slot_untouched() {
        let (mut store, slot, clock) = store_at(0);
        let note = store.create().unwrap();
        let before = store.notes().to_vec();
        let raw = slot.snapshot();
        let events = Rc::new(RefCell::new(0));
        let counter = events.clone();
        store.subscribe(move |_| *counter.borrow_mut() += 1);

        slot.set_failing(true);
        clock.advance(10);
        assert!(matches!(store.create(), Err(NoteStoreError::Storage(_))));
        assert!(matches!(
            store.update(&note.id, "new", "body"),
            Err(NoteStoreError::Storage(_))
        ));
        assert!(matches!(store.delete(&note.id), Err(NoteStoreError::Storage(_))));

        assert_eq!(store.notes(), before.as_slice());
        assert_eq!(store.get(&note.id).unwrap().title, PLACEHOLDER_TITLE);
        assert_eq!(slot.snapshot(), raw);
        assert_eq!(*events.borrow(), 0);

        slot.set_failing(false);
        let saved = store.update(&note.id, "new", "body").unwrap();
        assert_eq!(persisted(&slot), vec![saved]);
    }

    #[test]
    fn test_load_absent_key_is_empty() {
        let store = NoteStore::load(MemorySlot::new()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_malformed_storage() {
        let result = NoteStore::load(MemorySlot::with_value("{not json"));
        assert!(matches!(result, Err(NoteStoreError::MalformedStorage(_))));

        let slot = MemorySlot::with_value("{not json");
        let mut store = NoteStore::load_or_empty(slot.clone()).unwrap();
        assert!(store.is_empty());
        assert_eq!(slot.snapshot().as_deref(), Some("{not json"));

        store.create().unwrap();
        assert_eq!(persisted(&slot).len(), 1);
    }

    #[test]
    fn test_loaded_notes_seed_the_timestamp_floor() {
        let raw = r#"[{"id":"old","title":"Old","content":"","created":5000,"updated":9000}]"#;
        let mut store = NoteStore::load(MemorySlot::with_value(raw))
            .unwrap()
            .with_clock(ManualClock::starting_at(100));

        let fresh = store.create().unwrap();
        assert!(fresh.updated > 9000);
        assert_eq!(store.list("")[0].id, fresh.id);
    }

    #[test]
    fn test_subscribers_see_events_after_write() {
        let (mut store, slot, _clock) = store_at(0);
        let seen: Rc<RefCell<Vec<(NoteEvent, usize)>>> = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        let probe = slot.clone();
        let sub = store.subscribe(move |event| {
            sink.borrow_mut().push((event.clone(), probe.write_count()));
        });

        let note = store.create().unwrap();
        store.update(&note.id, "x", "y").unwrap();
        store.delete("nope").unwrap();

        {
            let seen = seen.borrow();
            assert_eq!(seen.len(), 3);
            assert_eq!(seen[0], (NoteEvent::Created { id: note.id.clone() }, 1));
            assert_eq!(seen[1], (NoteEvent::Updated { id: note.id.clone() }, 2));
            assert_eq!(
                seen[2],
                (NoteEvent::Deleted { id: "nope".to_string(), removed: false }, 3)
            );
        }

        assert!(store.unsubscribe(sub));
        assert!(!store.unsubscribe(sub));
        store.create().unwrap();
        assert_eq!(seen.borrow().len(), 3);
    }
}
