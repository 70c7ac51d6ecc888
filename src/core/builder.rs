use std::sync::Arc;

use crate::core::EventConfig;
use crate::events::{Event, Trigger};
use crate::nodes::{Hook, Hooks, Node, SourceNode};

/// Entry point for building an event tree.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use singlevent::SingleEvent;
///
/// let live = Arc::new(AtomicBool::new(false));
/// let (on, off) = (Arc::clone(&live), Arc::clone(&live));
///
/// let (ev, trigger) = SingleEvent::builder()
///     .with_name("resize")
///     .with_sender("window")
///     .on_connect(move || on.store(true, Ordering::SeqCst))
///     .on_disconnect(move || off.store(false, Ordering::SeqCst))
///     .build::<(u32, u32)>();
///
/// let l = ev.listen_fn(|size, sender| println!("{sender}: {size:?}"));
/// assert!(live.load(Ordering::SeqCst));
/// trigger.trigger((800, 600));
///
/// ev.unlisten(&l);
/// assert!(!live.load(Ordering::SeqCst));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SingleEvent;

impl SingleEvent {
    /// Starts a builder with default configuration, `()` sender and no-op hooks.
    pub fn builder() -> SingleEventBuilder {
        SingleEventBuilder::new(EventConfig::default())
    }
}

/// Builder for a source node and its trigger.
pub struct SingleEventBuilder<S = ()> {
    cfg: EventConfig,
    sender: S,
    on_connect: Option<Hook>,
    on_disconnect: Option<Hook>,
}

impl SingleEventBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: EventConfig) -> Self {
        Self {
            cfg,
            sender: (),
            on_connect: None,
            on_disconnect: None,
        }
    }
}

impl<S> SingleEventBuilder<S>
where
    S: Send + Sync + 'static,
{
    /// Replaces the whole configuration.
    pub fn with_config(mut self, cfg: EventConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the label used in tracing records and derived node names.
    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.cfg.name = name.into();
        self
    }

    /// Sets the sender passed to every listener of the tree.
    pub fn with_sender<T>(self, sender: T) -> SingleEventBuilder<T>
    where
        T: Send + Sync + 'static,
    {
        SingleEventBuilder {
            cfg: self.cfg,
            sender,
            on_connect: self.on_connect,
            on_disconnect: self.on_disconnect,
        }
    }

    /// Runs `f` when the source goes from no observers to at least one.
    pub fn on_connect<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_connect = Some(Box::new(f));
        self
    }

    /// Runs `f` when the source goes back to no observers.
    pub fn on_disconnect<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_disconnect = Some(Box::new(f));
        self
    }

    /// Builds the source node and returns its observable handle and its trigger.
    pub fn build<A>(self) -> (Event<A, S>, Trigger<A, S>)
    where
        A: 'static,
    {
        let name = self.cfg.name_or_default();
        let hooks = Hooks::new(self.on_connect, self.on_disconnect);
        let source = Arc::new(SourceNode::new(name, Arc::new(self.sender), hooks));

        let node: Arc<dyn Node<A, S>> = source.clone();
        tracing::trace!(event = %node.core().name(), "source created");
        (Event::from_node(node), Trigger::new(source))
    }
}

/// Creates a source event with an explicit sender and connect/disconnect hooks.
///
/// ## Example
/// ```rust
/// let (ev, trigger) = singlevent::create_single_event::<u8, &str>("keyboard", || {}, || {});
/// ev.listen_fn(|_key, sender| assert_eq!(*sender, "keyboard"));
/// trigger.trigger(b'a');
/// ```
pub fn create_single_event<A, S>(
    sender: S,
    on_connect: impl Fn() + Send + Sync + 'static,
    on_disconnect: impl Fn() + Send + Sync + 'static,
) -> (Event<A, S>, Trigger<A, S>)
where
    A: 'static,
    S: Send + Sync + 'static,
{
    SingleEvent::builder()
        .with_sender(sender)
        .on_connect(on_connect)
        .on_disconnect(on_disconnect)
        .build()
}

/// Creates a source event with `()` sender and no-op hooks.
pub fn single_event<A>() -> (Event<A>, Trigger<A>)
where
    A: 'static,
{
    SingleEvent::builder().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_builder_defaults() {
        let (ev, _t) = SingleEvent::builder().build::<u8>();
        assert_eq!(ev.name(), EventConfig::DEFAULT_NAME);
        assert!(!ev.is_connected());
    }

    #[test]
    fn test_with_config_and_sender() {
        let (ev, _t) = SingleEvent::builder()
            .with_config(EventConfig::named("keys"))
            .with_sender(7u16)
            .build::<char>();
        assert_eq!(ev.name(), "keys");
        assert_eq!(*ev.sender(), 7);
    }

    #[test]
    fn test_hooks_follow_observers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (c, d) = (Arc::clone(&calls), Arc::clone(&calls));
        let (ev, _t) = create_single_event::<u8, ()>(
            (),
            move || {
                c.fetch_add(1, Ordering::SeqCst);
            },
            move || {
                d.fetch_add(10, Ordering::SeqCst);
            },
        );

        let a = ev.listen_fn(|_, _| {});
        let b = ev.listen_fn(|_, _| {});
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        ev.unlisten(&a);
        ev.unlisten(&b);
        assert_eq!(calls.load(Ordering::SeqCst), 11);
        let _again = ev.listen_fn(|_, _| {});
        assert_eq!(calls.load(Ordering::SeqCst), 12);
    }
}
