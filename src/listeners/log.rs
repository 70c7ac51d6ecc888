//! # LogWriter: tracing-backed listener
//!
//! A minimal listener factory that writes every delivered value through `tracing`
//! at `info` level. Use it for tests or demos.
//!
//! ## Example output (with `tracing_subscriber::fmt`)
//! ```text
//! INFO singlevent::listeners::log: delivered event="clicks" value=3 sender=()
//! INFO singlevent::listeners::log: delivered event="clicks.map" value=6 sender=()
//! ```

use std::fmt::Debug;
use std::sync::Arc;

use super::Listener;

/// Builds logging listeners tagged with an event label.
#[derive(Debug, Clone)]
pub struct LogWriter {
    label: Arc<str>,
}

impl LogWriter {
    /// Construct a new [`LogWriter`] that tags each record with `label`.
    #[must_use]
    pub fn new(label: impl Into<Arc<str>>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Returns a fresh listener that logs `(value, sender)` on every delivery.
    pub fn listener<A, S>(&self) -> Listener<A, S>
    where
        A: Debug + 'static,
        S: Debug + 'static,
    {
        let label = Arc::clone(&self.label);
        Listener::new(move |value: &A, sender: &S| {
            tracing::info!(event = %label, ?value, ?sender, "delivered");
        })
    }
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::new("event")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listeners_are_distinct() {
        let w = LogWriter::new("clicks");
        let a = w.listener::<u32, ()>();
        let b = w.listener::<u32, ()>();
        assert_ne!(a, b);
        a.call(&1, &());
    }
}
