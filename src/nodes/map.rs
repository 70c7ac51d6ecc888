//! Derived node that re-fires every parent value through a transform.
//!
//! A panicking transform unwinds out of the triggering call; nothing is caught here.

use std::sync::{Arc, Weak};

use super::{ChildKey, Derived, Node, NodeCore, NodeKind, child_hooks, child_name};
use crate::listeners::ListenerKey;

type Transform<A, B> = Box<dyn Fn(&A) -> B + Send + Sync>;

/// Parent values are `A`; this node's listeners and children see `B`.
pub(crate) struct MapNode<A, B, S> {
    core: NodeCore<B, S>,
    transform: Transform<A, B>,
}

impl<A, B, S> MapNode<A, B, S>
where
    A: 'static,
    B: 'static,
    S: Send + Sync + 'static,
{
    /// Builds a map node under `parent`; it joins the parent's children on first observer.
    pub(crate) fn new<F>(parent: &Arc<dyn Node<A, S>>, transform: F) -> Arc<Self>
    where
        F: Fn(&A) -> B + Send + Sync + 'static,
    {
        Arc::new_cyclic(|me: &Weak<Self>| {
            let key = ChildKey::of(me.as_ptr());
            let child: Weak<dyn Derived<A>> = me.clone();
            let hooks = child_hooks(parent, child, key);
            let sender = Arc::clone(parent.core().sender());

            Self {
                core: NodeCore::new(child_name(parent, NodeKind::Map), sender, hooks),
                transform: Box::new(transform),
            }
        })
    }
}

impl<A, B, S> Node<B, S> for MapNode<A, B, S>
where
    A: 'static,
    B: 'static,
    S: Send + Sync + 'static,
{
    fn core(&self) -> &NodeCore<B, S> {
        &self.core
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Map
    }
}

impl<A, B, S> Derived<A> for MapNode<A, B, S>
where
    A: 'static,
    B: 'static,
    S: Send + Sync + 'static,
{
    fn fire(&self, value: &A) {
        let mapped = (self.transform)(value);
        self.core.notify(&mapped);
    }

    fn unlisten_key(&self, key: ListenerKey) {
        self.core.unlisten_key(key);
    }
}
