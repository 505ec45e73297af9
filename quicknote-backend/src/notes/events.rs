//! Change notifications emitted by `NoteStore` after a successful write.

/// Handle returned by `NoteStore::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEvent {
    Created { id: String },
    Updated { id: String },
    /// `removed` is false when the id was already gone
    Deleted { id: String, removed: bool },
}

pub(crate) type Listener = Box<dyn FnMut(&NoteEvent)>;

/// Subscriber list with stable ids
#[derive(Default)]
pub(crate) struct Listeners {
    entries: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Listener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(sub, _)| *sub != id);
        self.entries.len() != before
    }

    pub(crate) fn emit(&mut self, event: &NoteEvent) {
        for (_, listener) in self.entries.iter_mut() {
            listener(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
