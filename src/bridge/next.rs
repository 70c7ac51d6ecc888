//! # One-shot awaiting on top of listen/unlisten.
//!
//! [`Next`] resolves with the first value fired after it was created. The value is
//! handed over through a `tokio::sync::oneshot` channel by a self-removing listener:
//!
//! ```text
//! next() ──► listen(once) ──────────────── fire(v) ──► once(v)
//!                                                       ├─ tx.send(v.clone())   (resolve)
//!                                                       └─ unlisten(once)       (detach)
//! await Next ◄──────────────────────────────────────── rx
//! ```
//!
//! ## Rules
//! - The listener delivers at most once, even if the node fires again (or
//!   reentrantly) before the consumer observes the future.
//! - Resolution happens synchronously inside the triggering call; the awaiting task
//!   resumes on its executor's next turn.
//! - Dropping the [`Next`] does not detach the listener; it stays registered until
//!   the next fire and then removes itself.
//! - If the whole tree is dropped first, the future completes with
//!   [`EventError::Closed`].

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::EventError;
use crate::listeners::{Listener, ListenerKey};
use crate::nodes::Node;

/// Future returned by [`Event::next`](crate::Event::next).
#[must_use = "futures do nothing unless awaited"]
#[derive(Debug)]
pub struct Next<A> {
    rx: oneshot::Receiver<A>,
}

impl<A> Future for Next<A> {
    type Output = Result<A, EventError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map_err(|_| {
            tracing::debug!("pending next() dropped by its event");
            EventError::Closed
        })
    }
}

/// Registers a self-removing listener on `node` and returns the matching future.
pub(crate) fn register<A, S>(node: &Arc<dyn Node<A, S>>) -> Next<A>
where
    A: Clone + Send + 'static,
    S: Send + Sync + 'static,
{
    let (tx, rx) = oneshot::channel();
    let slot = Mutex::new(Some(tx));
    let own_key: Arc<OnceLock<ListenerKey>> = Arc::default();
    let weak = Arc::downgrade(node);

    let listener = Listener::new({
        let own_key = Arc::clone(&own_key);
        move |value: &A, _sender: &S| {
            let tx = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
            if let Some(tx) = tx {
                // The receiver may be gone; that's the caller's choice.
                let _ = tx.send(value.clone());
            }
            if let (Some(node), Some(key)) = (weak.upgrade(), own_key.get()) {
                tracing::debug!(event = %node.core().name(), "next() resolved");
                node.core().unlisten_key(*key);
            }
        }
    });
    let _ = own_key.set(listener.key());

    node.core().listen(&listener);
    Next { rx }
}
