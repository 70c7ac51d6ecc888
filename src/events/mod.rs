//! Public handles: events to observe, triggers to fire.
//!
//! ## Contents
//! - [`Event`] listen/unlisten, derive (`filter`/`map`), await (`next`/`take`)
//! - [`Trigger`] fires a source node
//!
//! See `nodes/mod.rs` for the propagation tree behind these handles.

mod event;
mod trigger;

pub use event::Event;
pub use trigger::Trigger;
