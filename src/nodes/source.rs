//! Root node created by the factory; fires whatever the trigger hands it.

use std::sync::Arc;

use super::{Hooks, Node, NodeCore, NodeKind};

pub(crate) struct SourceNode<A, S> {
    core: NodeCore<A, S>,
}

impl<A, S> SourceNode<A, S> {
    pub(crate) fn new(name: Arc<str>, sender: Arc<S>, hooks: Hooks) -> Self {
        Self {
            core: NodeCore::new(name, sender, hooks),
        }
    }

    /// No filtering or transformation: straight to `notify`.
    #[inline]
    pub(crate) fn fire(&self, value: &A) {
        self.core.notify(value);
    }
}

impl<A, S> Node<A, S> for SourceNode<A, S>
where
    A: 'static,
    S: Send + Sync + 'static,
{
    fn core(&self) -> &NodeCore<A, S> {
        &self.core
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Source
    }
}
