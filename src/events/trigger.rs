//! # Trigger: the firing capability of a source node.
//!
//! Returned once by the factory alongside the source's [`Event`]. Whoever holds a
//! [`Trigger`] can originate values; holders of an [`Event`] can only observe.
//!
//! ## Rules
//! - `trigger(v)` runs the whole propagation pass synchronously before returning.
//! - A panic in any listener, predicate or transform unwinds out of `trigger`;
//!   listeners later in the same pass are not notified.
//! - Clones fire the same source.

use std::fmt;
use std::sync::Arc;

use super::Event;
use crate::nodes::{Node, SourceNode};

/// Firing capability bound to exactly one source node.
pub struct Trigger<A, S = ()> {
    node: Arc<SourceNode<A, S>>,
}

impl<A, S> Trigger<A, S>
where
    A: 'static,
    S: Send + Sync + 'static,
{
    pub(crate) fn new(node: Arc<SourceNode<A, S>>) -> Self {
        Self { node }
    }

    /// Fires `value` through the source and every derived node below it.
    pub fn trigger(&self, value: A) {
        self.node.fire(&value);
    }

    /// Public handle to the source this trigger fires.
    pub fn event(&self) -> Event<A, S> {
        let node: Arc<dyn Node<A, S>> = self.node.clone();
        Event::from_node(node)
    }
}

impl<A, S> Clone for Trigger<A, S> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<A, S> fmt::Debug for Trigger<A, S>
where
    A: 'static,
    S: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("event", self.node.core().name())
            .finish()
    }
}
