//! Async bridge: callback delivery turned into awaitable values.
//!
//! Built entirely on a node's listen/unlisten; holds no state of its own.

mod next;
mod take;

pub use next::Next;

pub(crate) use next::register;
pub(crate) use take::take;
