//! # Event nodes: the propagation tree.
//!
//! Every node embeds a [`NodeCore`] (listeners, children, hooks, sender) and adds one
//! way of reacting to an incoming value:
//!
//! ```text
//!   Trigger::trigger(v)
//!        │
//!        ▼
//!   SourceNode ── notify(v) ──► listeners L1..Ln (in order)
//!        │
//!        ├──► FilterNode::fire(v) ── pred(v)? ── notify(v) ──► listeners, children…
//!        │
//!        └──► MapNode::fire(v) ── notify(f(v)) ──► listeners, children…
//! ```
//!
//! Derived nodes attach themselves to their parent lazily: their connect hook adds
//! them as a child, their disconnect hook removes them. A derived node with no
//! observers is not reachable from its parent and costs nothing per fire.
//!
//! Ownership follows the connection state: an unobserved derived node owns its
//! parent, an observed one is owned by its parent. Dropping every handle to the
//! root therefore frees the whole observed subtree with it.

mod core;
mod filter;
mod map;
mod source;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

pub(crate) use self::core::{ChildKey, Derived, Hook, Hooks, NodeCore};
pub(crate) use filter::FilterNode;
pub(crate) use map::MapNode;
pub(crate) use source::SourceNode;

/// Variant of a node in the propagation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Root node created by the factory; the only one with a trigger.
    Source,
    /// Re-fires values its predicate accepts.
    Filter,
    /// Re-fires transformed values.
    Map,
}

impl NodeKind {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            NodeKind::Source => "source",
            NodeKind::Filter => "filter",
            NodeKind::Map => "map",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Listener-facing side of a node, shared by all variants.
pub(crate) trait Node<A, S>: Send + Sync {
    fn core(&self) -> &NodeCore<A, S>;

    fn kind(&self) -> NodeKind;
}

/// Upward edge from a derived node to its parent.
///
/// While the child is disconnected it owns its parent (`held`), so a chain of
/// unobserved derived nodes stays alive through the handle at its tip. Once
/// connected, the parent owns the child through its child set and the link
/// keeps only `weak`, so no `Arc` cycle forms.
struct ParentLink<A, S> {
    weak: Weak<dyn Node<A, S>>,
    held: Mutex<Option<Arc<dyn Node<A, S>>>>,
}

impl<A, S> ParentLink<A, S> {
    fn held(&self) -> MutexGuard<'_, Option<Arc<dyn Node<A, S>>>> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn parent(&self) -> Option<Arc<dyn Node<A, S>>> {
        self.held().clone().or_else(|| self.weak.upgrade())
    }
}

/// Hooks that register `child` under `parent` while the child has observers.
pub(crate) fn child_hooks<A, S>(
    parent: &Arc<dyn Node<A, S>>,
    child: Weak<dyn Derived<A>>,
    key: ChildKey,
) -> Hooks
where
    A: 'static,
    S: Send + Sync + 'static,
{
    let link = Arc::new(ParentLink {
        weak: Arc::downgrade(parent),
        held: Mutex::new(Some(Arc::clone(parent))),
    });

    let on_connect: Hook = {
        let link = Arc::clone(&link);
        Box::new(move || {
            let (Some(parent), Some(child)) = (link.parent(), child.upgrade()) else {
                return;
            };
            // Released only after add_child returns: a panicking parent hook
            // leaves the child owning its parent for the next attempt.
            parent.core().add_child(key, child);
            link.held().take();
        })
    };
    let on_disconnect: Hook = Box::new(move || {
        if let Some(parent) = link.weak.upgrade() {
            parent.core().remove_child(key);
            *link.held() = Some(parent);
        }
    });
    Hooks::new(Some(on_connect), Some(on_disconnect))
}

/// Label of a derived node: `"<parent>.<kind>"`.
pub(crate) fn child_name<A, S>(parent: &Arc<dyn Node<A, S>>, kind: NodeKind) -> Arc<str> {
    format!("{}.{}", parent.core().name(), kind).into()
}
