//! # Public handle to a node of the propagation tree.
//!
//! [`Event`] is what consumers hold: a cheap-to-clone handle (`Arc` inside) over a
//! source, filter or map node. All handles to the same node are interchangeable.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! let (ev, trigger) = singlevent::single_event::<i32>();
//! let doubled_positives = ev.filter(|x| *x > 0).map(|x| x * 2);
//!
//! let results = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&results);
//! doubled_positives.listen_fn(move |v, _| sink.lock().unwrap().push(*v));
//!
//! trigger.trigger(-1);
//! trigger.trigger(3);
//! trigger.trigger(5);
//! assert_eq!(*results.lock().unwrap(), vec![6, 10]);
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::bridge::{self, Next};
use crate::error::EventError;
use crate::listeners::Listener;
use crate::nodes::{FilterNode, MapNode, Node, NodeKind};

/// Handle to one node: listen, derive, or await its values.
///
/// - `A`: value type delivered to listeners.
/// - `S`: sender type, shared by every node of the tree (defaults to `()`).
///
/// ## Threading
/// Handles are `Send + Sync`, but hooks are not serialized against concurrent
/// callers. While one thread's `listen` is still inside `on_connect`, a listener
/// added from another thread may already be stored and receive values, and a
/// concurrent last `unlisten` may run `on_disconnect` before `on_connect` has
/// returned. Drive listen/unlisten of one tree from a single task when hooks
/// must not overlap.
pub struct Event<A, S = ()> {
    node: Arc<dyn Node<A, S>>,
}

impl<A, S> Event<A, S>
where
    A: 'static,
    S: Send + Sync + 'static,
{
    pub(crate) fn from_node(node: Arc<dyn Node<A, S>>) -> Self {
        Self { node }
    }

    /// Registers `listener`; a listener already present is left as is.
    ///
    /// Runs the node's connect hook first if this is its first observer.
    pub fn listen(&self, listener: &Listener<A, S>) {
        self.node.core().listen(listener);
    }

    /// Wraps `f` in a new [`Listener`], registers it and returns it for later removal.
    pub fn listen_fn<F>(&self, f: F) -> Listener<A, S>
    where
        F: Fn(&A, &S) + Send + Sync + 'static,
    {
        let listener = Listener::new(f);
        self.listen(&listener);
        listener
    }

    /// Removes `listener` from this node and from every derived node below it.
    ///
    /// Removing an absent listener is a no-op. Runs the disconnect hook if the node
    /// is left with no listeners and no children.
    pub fn unlisten(&self, listener: &Listener<A, S>) {
        self.node.core().unlisten_key(listener.key());
    }

    /// Derives an event that re-fires only values for which `predicate` returns `true`.
    #[must_use]
    pub fn filter<P>(&self, predicate: P) -> Event<A, S>
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
    {
        let node: Arc<dyn Node<A, S>> = FilterNode::new(&self.node, predicate);
        Event::from_node(node)
    }

    /// Derives an event that re-fires `transform(value)` for every value.
    #[must_use]
    pub fn map<B, F>(&self, transform: F) -> Event<B, S>
    where
        B: 'static,
        F: Fn(&A) -> B + Send + Sync + 'static,
    {
        let node: Arc<dyn Node<B, S>> = MapNode::new(&self.node, transform);
        Event::from_node(node)
    }

    /// Resolves with the next value fired on this node.
    ///
    /// The listener is registered immediately (not on first poll) and removes
    /// itself after delivering once.
    pub fn next(&self) -> Next<A>
    where
        A: Clone + Send,
    {
        bridge::register(&self.node)
    }

    /// Resolves with the next `count` values, awaited one after another.
    ///
    /// `take(0)` resolves to an empty vector without registering anything.
    pub fn take(
        &self,
        count: usize,
    ) -> impl Future<Output = Result<Vec<A>, EventError>> + Send + use<A, S>
    where
        A: Clone + Send,
    {
        bridge::take(self.clone(), count)
    }

    /// Sender passed to every listener of this tree.
    pub fn sender(&self) -> &S {
        self.node.core().sender()
    }

    /// Label of this node (`"<root>"`, `"<root>.filter"`, `"<root>.filter.map"`, ...).
    pub fn name(&self) -> &str {
        self.node.core().name()
    }

    /// Variant of this node.
    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }

    /// Number of listeners registered directly on this node.
    pub fn listener_count(&self) -> usize {
        self.node.core().listener_count()
    }

    /// Number of derived nodes currently attached (derived nodes attach while observed).
    pub fn child_count(&self) -> usize {
        self.node.core().child_count()
    }

    /// `true` between a connect and the matching disconnect.
    pub fn is_connected(&self) -> bool {
        self.node.core().is_connected()
    }
}

impl<A, S> Clone for Event<A, S> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<A, S> fmt::Debug for Event<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.node.kind())
            .field("node", self.node.core())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SingleEvent, create_single_event, single_event};
    use proptest::prelude::*;
    use std::panic::AssertUnwindSafe;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    type Log<T> = Arc<Mutex<Vec<T>>>;

    fn recorder<A, S>() -> (Log<A>, impl Fn(&A, &S) + Send + Sync + 'static)
    where
        A: Clone + Send + 'static,
        S: 'static,
    {
        let log: Log<A> = Arc::default();
        let sink = Arc::clone(&log);
        (log, move |v: &A, _: &S| sink.lock().unwrap().push(v.clone()))
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let n = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&n);
        (n, move || {
            c.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_filter_map_pipeline() {
        let (ev, trigger) = single_event::<i32>();
        let ev2 = ev.filter(|x| *x > 0).map(|x| x * 2);
        let (results, f) = recorder::<i32, ()>();
        ev2.listen_fn(f);

        trigger.trigger(-1);
        trigger.trigger(3);
        trigger.trigger(5);
        assert_eq!(*results.lock().unwrap(), vec![6, 10]);
    }

    #[test]
    fn test_delivery_order_listeners_then_children() {
        let (ev, trigger) = single_event::<u8>();
        let order: Log<&'static str> = Arc::default();

        let o = Arc::clone(&order);
        ev.map(|v| *v).listen_fn(move |_, _| o.lock().unwrap().push("child-a"));
        let o = Arc::clone(&order);
        ev.listen_fn(move |_, _| o.lock().unwrap().push("l1"));
        let o = Arc::clone(&order);
        ev.filter(|_| true)
            .listen_fn(move |_, _| o.lock().unwrap().push("child-b"));
        let o = Arc::clone(&order);
        ev.listen_fn(move |_, _| o.lock().unwrap().push("l2"));

        trigger.trigger(0);
        assert_eq!(
            *order.lock().unwrap(),
            vec!["l1", "l2", "child-a", "child-b"]
        );
    }

    #[test]
    fn test_child_subtree_completes_before_next_sibling() {
        let (ev, trigger) = single_event::<u8>();
        let order: Log<&'static str> = Arc::default();

        let first = ev.map(|v| *v);
        let o = Arc::clone(&order);
        first.listen_fn(move |_, _| o.lock().unwrap().push("first"));
        let o = Arc::clone(&order);
        first
            .map(|v| *v)
            .listen_fn(move |_, _| o.lock().unwrap().push("first.grandchild"));
        let o = Arc::clone(&order);
        ev.map(|v| *v)
            .listen_fn(move |_, _| o.lock().unwrap().push("second"));

        trigger.trigger(0);
        assert_eq!(
            *order.lock().unwrap(),
            vec!["first", "first.grandchild", "second"]
        );
    }

    #[test]
    fn test_predicate_runs_once_per_fire() {
        let (ev, trigger) = single_event::<u8>();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let filtered = ev.filter(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            true
        });
        filtered.listen_fn(|_, _| {});
        filtered.listen_fn(|_, _| {});
        filtered.map(|v| *v).listen_fn(|_, _| {});
        filtered.filter(|_| true).listen_fn(|_, _| {});

        trigger.trigger(1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_filter_rejects_block_subtree() {
        let (ev, trigger) = single_event::<i32>();
        let even = ev.filter(|x| x % 2 == 0);
        let (direct, f) = recorder::<i32, ()>();
        even.listen_fn(f);
        let (below, g) = recorder::<String, ()>();
        even.map(|x| format!("#{x}")).listen_fn(g);

        for v in 1..=4 {
            trigger.trigger(v);
        }
        assert_eq!(*direct.lock().unwrap(), vec![2, 4]);
        assert_eq!(*below.lock().unwrap(), vec!["#2", "#4"]);
    }

    #[test]
    fn test_sender_reaches_derived_listeners() {
        let (ev, trigger) = create_single_event::<u8, &'static str>("button", || {}, || {});
        let seen: Log<&'static str> = Arc::default();

        let s = Arc::clone(&seen);
        ev.listen_fn(move |_, sender| s.lock().unwrap().push(*sender));
        let s = Arc::clone(&seen);
        ev.filter(|_| true)
            .map(|v| *v as u32)
            .listen_fn(move |_, sender| s.lock().unwrap().push(*sender));

        trigger.trigger(7);
        assert_eq!(*seen.lock().unwrap(), vec!["button", "button"]);
        assert_eq!(*ev.sender(), "button");
    }

    #[test]
    fn test_derived_node_connects_parent_lazily() {
        let (connects, on_connect) = counter();
        let (disconnects, on_disconnect) = counter();
        let (ev, _trigger) = SingleEvent::builder()
            .on_connect(on_connect)
            .on_disconnect(on_disconnect)
            .build::<u8>();

        let derived = ev.filter(|_| true);
        assert_eq!(connects.load(Ordering::SeqCst), 0);
        assert_eq!(ev.child_count(), 0);

        let l = derived.listen_fn(|_, _| {});
        assert_eq!(connects.load(Ordering::SeqCst), 1);
        assert_eq!(ev.child_count(), 1);

        derived.unlisten(&l);
        assert_eq!(disconnects.load(Ordering::SeqCst), 1);
        assert_eq!(ev.child_count(), 0);
        assert!(!ev.is_connected());
    }

    #[test]
    fn test_duplicate_listen_delivers_once() {
        let (ev, trigger) = single_event::<u8>();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let l = Listener::new(move |_: &u8, _: &()| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        ev.listen(&l);
        ev.listen(&l.clone());

        trigger.trigger(1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(ev.listener_count(), 1);
    }

    #[test]
    fn test_unlisten_cascades_into_children() {
        let (connects, on_connect) = counter();
        let (disconnects, on_disconnect) = counter();
        let (ev, trigger) = SingleEvent::builder()
            .on_connect(on_connect)
            .on_disconnect(on_disconnect)
            .build::<u8>();
        let child = ev.filter(|_| true);

        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let l = Listener::new(move |_: &u8, _: &()| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        ev.listen(&l);
        child.listen(&l);
        trigger.trigger(0);
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        ev.unlisten(&l);
        trigger.trigger(0);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(child.listener_count(), 0);
        assert_eq!(connects.load(Ordering::SeqCst), 1);
        assert_eq!(disconnects.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_may_unlisten_itself() {
        let (ev, trigger) = single_event::<u8>();
        let hits = Arc::new(AtomicUsize::new(0));
        let own: Arc<Mutex<Option<Listener<u8>>>> = Arc::default();

        let (h, me, handle) = (Arc::clone(&hits), Arc::clone(&own), ev.clone());
        let l = ev.listen_fn(move |_, _| {
            h.fetch_add(1, Ordering::SeqCst);
            if let Some(l) = me.lock().unwrap().take() {
                handle.unlisten(&l);
            }
        });
        *own.lock().unwrap() = Some(l);

        trigger.trigger(1);
        trigger.trigger(2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(ev.listener_count(), 0);
    }

    #[test]
    fn test_connect_hook_may_fire_event() {
        let slot: Arc<Mutex<Option<crate::Trigger<u8>>>> = Arc::default();
        let s = Arc::clone(&slot);
        let (ev, trigger) = SingleEvent::builder()
            .on_connect(move || {
                if let Some(t) = s.lock().unwrap().as_ref() {
                    t.trigger(99);
                }
            })
            .build::<u8>();
        *slot.lock().unwrap() = Some(trigger.clone());

        let (got, f) = recorder::<u8, ()>();
        ev.listen_fn(f);
        trigger.trigger(1);
        assert_eq!(*got.lock().unwrap(), vec![1]);

        slot.lock().unwrap().take();
    }

    #[test]
    #[should_panic(expected = "transform failed")]
    fn test_transform_panic_propagates_to_trigger() {
        let (ev, trigger) = single_event::<u8>();
        ev.map(|_| -> u8 { panic!("transform failed") })
            .listen_fn(|_, _| {});
        trigger.trigger(1);
    }

    #[test]
    fn test_names_follow_derivation() {
        let (ev, _t) = SingleEvent::builder().with_name("clicks").build::<u8>();
        let derived = ev.filter(|_| true).map(|v| *v);
        assert_eq!(ev.name(), "clicks");
        assert_eq!(derived.name(), "clicks.filter.map");
        assert_eq!(derived.kind(), NodeKind::Map);
        assert_eq!(ev.kind(), NodeKind::Source);
    }

    #[tokio::test]
    async fn test_next_resolves_with_first_value() {
        let (ev, trigger) = single_event::<&'static str>();
        let next = ev.next();
        assert_eq!(ev.listener_count(), 1);

        trigger.trigger("a");
        assert_eq!(ev.listener_count(), 0);
        trigger.trigger("b");

        assert_eq!(next.await, Ok("a"));
    }

    #[tokio::test]
    async fn test_next_detaches_and_disconnects() {
        let (connects, on_connect) = counter();
        let (disconnects, on_disconnect) = counter();
        let (ev, trigger) = create_single_event::<u8, ()>((), on_connect, on_disconnect);

        let next = ev.filter(|v| *v > 1).next();
        assert_eq!(connects.load(Ordering::SeqCst), 1);
        trigger.trigger(1);
        assert_eq!(disconnects.load(Ordering::SeqCst), 0);
        trigger.trigger(2);
        assert_eq!(disconnects.load(Ordering::SeqCst), 1);
        assert_eq!(next.await, Ok(2));
    }

    #[tokio::test]
    async fn test_next_fails_when_tree_dropped() {
        let (ev, trigger) = single_event::<u8>();
        let next = ev.next();
        drop(ev);
        drop(trigger);
        assert_eq!(next.await, Err(EventError::Closed));
    }

    #[tokio::test]
    async fn test_derived_next_fails_when_tree_dropped() {
        let (ev, trigger) = single_event::<u8>();
        let next = ev.filter(|_| true).map(|v| *v).next();
        assert_eq!(ev.child_count(), 1);
        drop(ev);
        drop(trigger);
        assert_eq!(next.await, Err(EventError::Closed));
    }

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_observed_tree_freed_with_its_handles() {
        let dropped = Arc::new(AtomicBool::new(false));
        let (ev, trigger) =
            create_single_event::<u8, DropFlag>(DropFlag(Arc::clone(&dropped)), || {}, || {});
        ev.map(|v| *v).listen_fn(|_, _| {});
        ev.filter(|_| true).listen_fn(|_, _| {});
        assert_eq!(ev.child_count(), 2);

        drop(ev);
        assert!(!dropped.load(Ordering::SeqCst));
        drop(trigger);
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn test_derived_retries_connect_after_hook_panic() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let a = Arc::clone(&attempts);
        let (ev, trigger) = SingleEvent::builder()
            .on_connect(move || {
                if a.fetch_add(1, Ordering::SeqCst) == 0 {
                    panic!("device busy");
                }
            })
            .build::<u8>();
        let derived = ev.map(|v| *v);

        let res = std::panic::catch_unwind(AssertUnwindSafe(|| derived.listen_fn(|_, _| {})));
        assert!(res.is_err());
        assert!(!ev.is_connected());
        assert!(!derived.is_connected());
        assert_eq!(derived.listener_count(), 0);

        let (got, f) = recorder::<u8, ()>();
        derived.listen_fn(f);
        trigger.trigger(1);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(ev.child_count(), 1);
        assert_eq!(*got.lock().unwrap(), vec![1]);
    }

    proptest! {
        #[test]
        fn prop_filter_delivers_iff_predicate(
            values in proptest::collection::vec(any::<i32>(), 0..32),
            modulus in 1i32..8,
        ) {
            let (ev, trigger) = single_event::<i32>();
            let (got, f) = recorder::<i32, ()>();
            ev.filter(move |v| v.rem_euclid(modulus) == 0).listen_fn(f);

            for v in &values {
                trigger.trigger(*v);
            }
            let want: Vec<i32> = values
                .iter()
                .copied()
                .filter(|v| v.rem_euclid(modulus) == 0)
                .collect();
            prop_assert_eq!(got.lock().unwrap().clone(), want);
        }

        #[test]
        fn prop_map_delivers_transformed(
            values in proptest::collection::vec(any::<i32>(), 0..32),
            offset in any::<i32>(),
        ) {
            let (ev, trigger) = single_event::<i32>();
            let (got, f) = recorder::<i64, ()>();
            ev.map(move |v| i64::from(*v) * 3 + i64::from(offset)).listen_fn(f);

            for v in &values {
                trigger.trigger(*v);
            }
            let want: Vec<i64> = values
                .iter()
                .map(|v| i64::from(*v) * 3 + i64::from(offset))
                .collect();
            prop_assert_eq!(got.lock().unwrap().clone(), want);
        }
    }

    #[tokio::test]
    async fn test_take_zero_registers_nothing() {
        let (connects, on_connect) = counter();
        let (ev, _trigger) = SingleEvent::builder().on_connect(on_connect).build::<u8>();

        assert_eq!(ev.take(0).await, Ok(vec![]));
        assert_eq!(connects.load(Ordering::SeqCst), 0);
        assert_eq!(ev.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_take_collects_in_order() {
        let (ev, trigger) = single_event::<char>();
        let mut take = std::pin::pin!(ev.take(3));

        for v in ['a', 'b', 'c'] {
            assert!(futures::poll!(take.as_mut()).is_pending());
            assert_eq!(ev.listener_count(), 1);
            trigger.trigger(v);
        }
        assert_eq!(take.await, Ok(vec!['a', 'b', 'c']));
        assert_eq!(ev.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_take_does_not_buffer_between_resumes() {
        let (ev, trigger) = single_event::<u8>();
        let mut take = std::pin::pin!(ev.take(2));

        assert!(futures::poll!(take.as_mut()).is_pending());
        trigger.trigger(1);
        trigger.trigger(2);
        assert!(futures::poll!(take.as_mut()).is_pending());
        trigger.trigger(3);
        assert_eq!(take.await, Ok(vec![1, 3]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_next_across_tasks() {
        let (ev, trigger) = single_event::<u32>();
        let next = ev.next();
        let waiter = tokio::spawn(next);

        trigger.trigger(42);
        assert_eq!(waiter.await.unwrap(), Ok(42));
    }
}
