//! # NodeCore: state shared by every node variant.
//!
//! Each variant (source, filter, map) embeds one [`NodeCore`] and only differs in how
//! it turns an incoming value into a [`notify`](NodeCore::notify) call.
//!
//! ## Architecture
//! ```text
//!            listen / unlisten            add_child / remove_child
//!                   │                              │
//!                   ▼                              ▼
//!         ┌──────────────────────── Mutex<Observers> ───────────────────────┐
//!         │ listeners: ListenerSet   children: IndexMap   connected: bool   │
//!         └─────────────────────────────────────────────────────────────────┘
//!                   │ (flag flips decided under lock, hooks run unlocked)
//!                   ▼
//!         on_connect()  on 0 → ≥1 observers
//!         on_disconnect() on ≥1 → 0 observers
//! ```
//!
//! ## Rules
//! - `connected` flips false→true before the first observer is stored, and
//!   true→false only after a removal that actually happened leaves both sets empty.
//! - A connect hook that unwinds leaves an empty node disconnected, so the next
//!   listen runs the hook again.
//! - The lock is never held while user code runs (hooks, listeners, children).
//! - `notify` walks a snapshot and skips entries removed mid-pass; entries added
//!   mid-pass are first delivered on the next fire.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;

use crate::listeners::{Listener, ListenerKey, ListenerSet};

/// Side-effecting callable run on an observer-count transition.
pub(crate) type Hook = Box<dyn Fn() + Send + Sync>;

/// Connect/disconnect pair fixed at node construction.
#[derive(Default)]
pub(crate) struct Hooks {
    on_connect: Option<Hook>,
    on_disconnect: Option<Hook>,
}

impl Hooks {
    pub(crate) fn new(on_connect: Option<Hook>, on_disconnect: Option<Hook>) -> Self {
        Self {
            on_connect,
            on_disconnect,
        }
    }
}

/// Parent-facing side of a derived node.
///
/// A parent of value type `A` only needs to push values down and cascade unlistens;
/// the child's own value type stays hidden behind this trait.
pub(crate) trait Derived<A>: Send + Sync {
    /// Applies the variant's predicate/transform and notifies on success.
    fn fire(&self, value: &A);

    /// Removes `key` from this node and, recursively, from its children.
    fn unlisten_key(&self, key: ListenerKey);
}

/// Identity of a child node (address of its allocation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ChildKey(usize);

impl ChildKey {
    #[inline]
    pub(crate) fn of<T: ?Sized>(ptr: *const T) -> Self {
        ChildKey(ptr.cast::<()>() as usize)
    }
}

struct Observers<A, S> {
    listeners: ListenerSet<A, S>,
    children: IndexMap<ChildKey, Arc<dyn Derived<A>>>,
    connected: bool,
}

impl<A, S> Observers<A, S> {
    fn is_empty(&self) -> bool {
        self.listeners.is_empty() && self.children.is_empty()
    }

    /// Flips to connected; `true` if the caller must run `on_connect`.
    fn begin_connect(&mut self) -> bool {
        if self.connected {
            return false;
        }
        self.connected = true;
        true
    }

    /// Flips to disconnected if nothing is left; `true` if the caller must run `on_disconnect`.
    fn settle_disconnect(&mut self) -> bool {
        if self.connected && self.is_empty() {
            self.connected = false;
            return true;
        }
        false
    }
}

/// Listener set, child set, hooks and sender of one node.
pub(crate) struct NodeCore<A, S> {
    name: Arc<str>,
    sender: Arc<S>,
    hooks: Hooks,
    observers: Mutex<Observers<A, S>>,
}

impl<A, S> NodeCore<A, S> {
    pub(crate) fn new(name: Arc<str>, sender: Arc<S>, hooks: Hooks) -> Self {
        Self {
            name,
            sender,
            hooks,
            observers: Mutex::new(Observers {
                listeners: ListenerSet::new(),
                children: IndexMap::new(),
                connected: false,
            }),
        }
    }

    // Listener panics run outside the lock, so poisoning only means a hook or
    // snapshot clone unwound; the sets themselves are still consistent.
    fn lock(&self) -> MutexGuard<'_, Observers<A, S>> {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub(crate) fn name(&self) -> &Arc<str> {
        &self.name
    }

    #[inline]
    pub(crate) fn sender(&self) -> &Arc<S> {
        &self.sender
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    pub(crate) fn child_count(&self) -> usize {
        self.lock().children.len()
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.lock().connected
    }

    pub(crate) fn listen(&self, listener: &Listener<A, S>) {
        let inserted = self.attach(|obs| obs.listeners.insert(listener));
        if inserted {
            tracing::trace!(event = %self.name, "listener attached");
        }
    }

    /// Removes `key`, cascades into every child, then settles the disconnect.
    pub(crate) fn unlisten_key(&self, key: ListenerKey) {
        let (removed, children) = {
            let mut obs = self.lock();
            let removed = obs.listeners.remove(key);
            let children: Vec<_> = obs.children.values().cloned().collect();
            (removed, children)
        };
        if removed {
            tracing::trace!(event = %self.name, "listener detached");
        }

        for child in children {
            child.unlisten_key(key);
        }

        if removed {
            self.settle();
        }
    }

    pub(crate) fn add_child(&self, key: ChildKey, child: Arc<dyn Derived<A>>) {
        let inserted = self.attach(|obs| {
            if obs.children.contains_key(&key) {
                return false;
            }
            obs.children.insert(key, child);
            true
        });
        if inserted {
            tracing::trace!(event = %self.name, "child attached");
        }
    }

    pub(crate) fn remove_child(&self, key: ChildKey) {
        let removed = self.lock().children.shift_remove(&key).is_some();
        if removed {
            tracing::trace!(event = %self.name, "child detached");
            self.settle();
        }
    }

    /// Delivers `value` to listeners in registration order, then to each child subtree.
    pub(crate) fn notify(&self, value: &A) {
        let (listeners, children) = {
            let obs = self.lock();
            let children: Vec<_> = obs
                .children
                .iter()
                .map(|(k, c)| (*k, Arc::clone(c)))
                .collect();
            (obs.listeners.snapshot(), children)
        };
        tracing::trace!(
            event = %self.name,
            listeners = listeners.len(),
            children = children.len(),
            "fire"
        );

        for (key, listener) in listeners {
            if self.has_listener(key) {
                listener.call(value, &self.sender);
            }
        }
        for (key, child) in children {
            if self.has_child(key) {
                child.fire(value);
            }
        }
    }

    fn has_listener(&self, key: ListenerKey) -> bool {
        self.lock().listeners.contains(key)
    }

    fn has_child(&self, key: ChildKey) -> bool {
        self.lock().children.contains_key(&key)
    }

    /// Connects (if needed) before running `insert`.
    ///
    /// If a reentrant hook disconnected the node between the two steps, the
    /// fresh insertion is a new 0 → 1 transition and connects again.
    fn attach(&self, insert: impl FnOnce(&mut Observers<A, S>) -> bool) -> bool {
        let connect = self.lock().begin_connect();
        if connect {
            self.run_connect();
        }

        let (inserted, reconnect) = {
            let mut obs = self.lock();
            let inserted = insert(&mut obs);
            (inserted, inserted && obs.begin_connect())
        };
        if reconnect {
            self.run_connect();
        }
        inserted
    }

    fn settle(&self) {
        let disconnect = self.lock().settle_disconnect();
        if disconnect {
            tracing::trace!(event = %self.name, "disconnect");
            if let Some(hook) = &self.hooks.on_disconnect {
                hook();
            }
        }
    }

    /// Runs `on_connect`; if it unwinds, an empty node flips back to disconnected
    /// so the next attach retries the hook.
    fn run_connect(&self) {
        tracing::trace!(event = %self.name, "connect");
        let Some(hook) = &self.hooks.on_connect else {
            return;
        };
        let guard = ConnectGuard { core: self };
        hook();
        std::mem::forget(guard);
    }
}

struct ConnectGuard<'a, A, S> {
    core: &'a NodeCore<A, S>,
}

impl<A, S> Drop for ConnectGuard<'_, A, S> {
    fn drop(&mut self) {
        let mut obs = self.core.lock();
        if obs.is_empty() {
            obs.connected = false;
            tracing::debug!(event = %self.core.name, "connect hook unwound");
        }
    }
}

impl<A, S> fmt::Debug for NodeCore<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let obs = self.lock();
        f.debug_struct("NodeCore")
            .field("name", &self.name)
            .field("listeners", &obs.listeners.len())
            .field("children", &obs.children.len())
            .field("connected", &obs.connected)
            .finish()
    }
}
