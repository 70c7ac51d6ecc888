//! # Listeners attached to event nodes.
//!
//! ## Contents
//! - [`Listener`] identity-compared callback `Fn(&A, &S)`
//! - `ListenerSet` insertion-ordered registry used inside every node
//! - [`LogWriter`] tracing-backed listener factory (feature `logging`)

mod listener;
mod set;

#[cfg(feature = "logging")]
mod log;

pub use listener::Listener;

pub(crate) use listener::ListenerKey;
pub(crate) use set::ListenerSet;

#[cfg(feature = "logging")]
pub use log::LogWriter;
