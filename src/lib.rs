//! # singlevent
//!
//! **singlevent** is a single-topic event primitive for Rust.
//!
//! One source fires one kind of value to a dynamic set of listeners. Derived events
//! (`filter`, `map`) form a tree below the source, connect/disconnect hooks run exactly
//! when a node gains its first or loses its last observer, and `next`/`take` turn
//! callback delivery into awaitable values.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   create_single_event(sender, on_connect, on_disconnect)
//!        │
//!        ├──► Trigger ── trigger(v) ──┐
//!        │                            ▼
//!        └──► Event ─────────── SourceNode ── notify(v) ──► L1, L2, … (insertion order)
//!                                     │
//!                     ┌───────────────┴────────────────┐
//!                     ▼                                ▼
//!               FilterNode (pred)                MapNode (f)
//!               pred(v)? notify(v)               notify(f(v))
//!                     │                                │
//!                     ▼                                ▼
//!               listeners, children…             listeners, children…
//! ```
//!
//! ### Lifecycle
//! ```text
//! node.listen(L) / child attaches
//!   ├─ observers 0 → 1 ─► on_connect()      (before L is stored)
//!   └─ store L
//!
//! node.unlisten(L)
//!   ├─ remove L here
//!   ├─ cascade: child.unlisten(L) for every child
//!   └─ observers 1 → 0 ─► on_disconnect()
//!
//! derived node
//!   ├─ on_connect    = parent.add_child(self)
//!   └─ on_disconnect = parent.remove_child(self)
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types                                 |
//! |-------------------|-----------------------------------------------------------------|-------------------------------------------|
//! | **Factory**       | Source node plus its trigger, with sender and hooks.            | [`create_single_event`], [`SingleEvent`]  |
//! | **Listening**     | Identity-based listen/unlisten with cascade to derived nodes.   | [`Event`], [`Listener`]                   |
//! | **Derivation**    | Filtered and mapped child events sharing the root's sender.     | [`Event::filter`], [`Event::map`]         |
//! | **Async bridge**  | Await the next value, or the next `n` values in order.          | [`Event::next`], [`Next`], [`Event::take`]|
//! | **Errors**        | Typed error for awaits whose tree went away.                    | [`EventError`]                            |
//! | **Configuration** | Tree label used in tracing records and derived names.           | [`EventConfig`]                           |
//!
//! ## Optional features
//! - `logging`: exports a tracing-backed [`LogWriter`] listener _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use singlevent::SingleEvent;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (ev, trigger) = SingleEvent::builder()
//!         .with_name("numbers")
//!         .with_sender("demo")
//!         .build::<i32>();
//!
//!     let positives = ev.filter(|x| *x > 0).map(|x| x * 2);
//!     let next = positives.next();
//!
//!     trigger.trigger(-1);
//!     trigger.trigger(21);
//!
//!     assert_eq!(next.await?, 42);
//!     Ok(())
//! }
//! ```
mod bridge;
mod core;
mod error;
mod events;
mod listeners;
mod nodes;

// ---- Public re-exports ----

pub use bridge::Next;
pub use self::core::{
    EventConfig, SingleEvent, SingleEventBuilder, create_single_event, single_event,
};
pub use error::EventError;
pub use events::{Event, Trigger};
pub use listeners::Listener;
pub use nodes::NodeKind;

// Optional: expose a simple built-in logging listener (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use listeners::LogWriter;
