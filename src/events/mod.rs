//! Runtime event model: the broadcast [`Bus`] and the typed [`Event`]s that
//! flow over it. Workers, the pool, and the producer publish; subscribers
//! observe through the coordinator's fan-out listener.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
