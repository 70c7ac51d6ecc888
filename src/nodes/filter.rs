//! Derived node that re-fires only the values its predicate accepts.
//!
//! The predicate runs exactly once per parent fire; children of a filter node see
//! the accepted value without re-evaluating it.

use std::sync::{Arc, Weak};

use super::{ChildKey, Derived, Node, NodeCore, NodeKind, child_hooks, child_name};
use crate::listeners::ListenerKey;

type Predicate<A> = Box<dyn Fn(&A) -> bool + Send + Sync>;

pub(crate) struct FilterNode<A, S> {
    core: NodeCore<A, S>,
    predicate: Predicate<A>,
}

impl<A, S> FilterNode<A, S>
where
    A: 'static,
    S: Send + Sync + 'static,
{
    /// Builds a filter under `parent`; it joins the parent's children on first observer.
    pub(crate) fn new<P>(parent: &Arc<dyn Node<A, S>>, predicate: P) -> Arc<Self>
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
    {
        Arc::new_cyclic(|me: &Weak<Self>| {
            let key = ChildKey::of(me.as_ptr());
            let child: Weak<dyn Derived<A>> = me.clone();
            let hooks = child_hooks(parent, child, key);
            let sender = Arc::clone(parent.core().sender());

            Self {
                core: NodeCore::new(child_name(parent, NodeKind::Filter), sender, hooks),
                predicate: Box::new(predicate),
            }
        })
    }
}

impl<A, S> Node<A, S> for FilterNode<A, S>
where
    A: 'static,
    S: Send + Sync + 'static,
{
    fn core(&self) -> &NodeCore<A, S> {
        &self.core
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Filter
    }
}

impl<A, S> Derived<A> for FilterNode<A, S>
where
    A: 'static,
    S: Send + Sync + 'static,
{
    fn fire(&self, value: &A) {
        if (self.predicate)(value) {
            self.core.notify(value);
        }
    }

    fn unlisten_key(&self, key: ListenerKey) {
        self.core.unlisten_key(key);
    }
}
