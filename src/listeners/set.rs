//! # ListenerSet: insertion-ordered, identity-keyed listener registry
//!
//! ## What it guarantees
//! - Delivery order is registration order.
//! - Re-inserting an identity already present is a no-op (position is kept).
//! - Removing an identity preserves the relative order of the rest.
//!
//! The set never invokes listeners itself; callers take a [`snapshot`](ListenerSet::snapshot)
//! and walk it outside any lock.

use indexmap::IndexMap;

use super::listener::{Listener, ListenerKey};

/// Registration-ordered set of listeners keyed by identity.
pub(crate) struct ListenerSet<A, S> {
    entries: IndexMap<ListenerKey, Listener<A, S>>,
}

impl<A, S> ListenerSet<A, S> {
    pub(crate) fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Adds the listener; returns `false` if that identity was already registered.
    pub(crate) fn insert(&mut self, listener: &Listener<A, S>) -> bool {
        let key = listener.key();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, listener.clone());
        true
    }

    /// Removes by identity; returns `true` if something was removed.
    pub(crate) fn remove(&mut self, key: ListenerKey) -> bool {
        self.entries.shift_remove(&key).is_some()
    }

    #[inline]
    pub(crate) fn contains(&self, key: ListenerKey) -> bool {
        self.entries.contains_key(&key)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clones the current registrations in delivery order.
    pub(crate) fn snapshot(&self) -> Vec<(ListenerKey, Listener<A, S>)> {
        self.entries
            .iter()
            .map(|(k, l)| (*k, l.clone()))
            .collect()
    }
}
