//! Notes system: an owned, ordered note collection mirrored to one storage slot.
//!
//! Every mutation rewrites the whole collection. The visible list (search
//! filter + newest-first ordering) is derived on demand and never stored.

pub mod clock;
pub mod events;
pub mod query;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use events::{NoteEvent, SubscriptionId};
pub use store::{NoteStore, NoteStoreError};
