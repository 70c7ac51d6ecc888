//! # Listener handle with reference identity.
//!
//! A [`Listener`] wraps a closure `Fn(&A, &S)` in an `Arc`. Registration and
//! removal key off the allocation, not the closure's behavior: two listeners built
//! from identical closures are distinct, and clones of one listener are the same.
//!
//! ## Example
//! ```rust
//! use singlevent::Listener;
//!
//! let a = Listener::<u32>::new(|v, _| println!("{v}"));
//! let b = a.clone();
//! let c = Listener::<u32>::new(|v, _| println!("{v}"));
//!
//! assert_eq!(a, b);
//! assert_ne!(a, c);
//! ```

use std::fmt;
use std::sync::Arc;

/// Identity of a registered listener (address of its shared closure).
///
/// Type-erased so an unlisten cascade can cross map nodes whose value type differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ListenerKey(usize);

/// Shared, identity-compared callback invoked with `(value, sender)`.
pub struct Listener<A, S = ()> {
    f: Arc<dyn Fn(&A, &S) + Send + Sync>,
}

impl<A, S> Listener<A, S> {
    /// Wraps a closure into a new listener with a fresh identity.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&A, &S) + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    #[inline]
    pub(crate) fn key(&self) -> ListenerKey {
        ListenerKey(Arc::as_ptr(&self.f).cast::<()>() as usize)
    }

    #[inline]
    pub(crate) fn call(&self, value: &A, sender: &S) {
        (self.f)(value, sender);
    }
}

impl<A, S> Clone for Listener<A, S> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<A, S> PartialEq for Listener<A, S> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<A, S> Eq for Listener<A, S> {}

impl<A, S> fmt::Debug for Listener<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener").field(&self.key().0).finish()
    }
}
