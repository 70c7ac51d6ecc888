//! # Event tree configuration.
//!
//! Provides [`EventConfig`], settings shared by a source node and every node derived
//! from it.
//!
//! Config is used in two ways:
//! 1. **Builder input**: `SingleEvent::builder().with_config(cfg)`
//! 2. **Derived labels**: children are named `"<name>.filter"` / `"<name>.map"`

use std::sync::Arc;

/// Configuration of one event tree.
///
/// ## Field semantics
/// - `name`: label of the source node, recorded as the `event` field of every
///   tracing record the tree emits (empty names fall back to the default)
#[derive(Clone, Debug)]
pub struct EventConfig {
    /// Label of the source node.
    pub name: Arc<str>,
}

impl EventConfig {
    /// Default label used when none (or an empty one) is configured.
    pub const DEFAULT_NAME: &'static str = "event";

    /// Returns a configuration with the given label.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the label, falling back to [`EventConfig::DEFAULT_NAME`] when empty.
    #[inline]
    pub fn name_or_default(&self) -> Arc<str> {
        if self.name.is_empty() {
            Arc::from(Self::DEFAULT_NAME)
        } else {
            Arc::clone(&self.name)
        }
    }
}

impl Default for EventConfig {
    /// Default configuration:
    ///
    /// - `name = "event"`
    fn default() -> Self {
        Self::named(Self::DEFAULT_NAME)
    }
}
