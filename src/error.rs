//! Error types used by the async bridge.
//!
//! Propagation itself has no error channel: a panicking listener, predicate or
//! transform unwinds straight out of [`Trigger::trigger`](crate::Trigger::trigger).
//! The only failure a caller can observe is a pending [`Next`](crate::Next) whose
//! event tree went away before it fired.

use thiserror::Error;

/// # Errors produced while awaiting an event.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The one-shot listener behind `next()`/`take()` was dropped without firing.
    ///
    /// Happens when every handle to the event tree (events and trigger) is dropped
    /// while the future is still pending.
    #[error("event closed before it fired")]
    Closed,
}

impl EventError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use singlevent::EventError;
    ///
    /// assert_eq!(EventError::Closed.as_label(), "event_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EventError::Closed => "event_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            EventError::Closed => "event tree dropped while awaiting".to_string(),
        }
    }
}
