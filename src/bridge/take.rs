//! Sequential multi-shot awaiting: `count` chained [`Next`](super::Next) futures.
//!
//! Each `next()` registers only after the previous one resolved, so values fired
//! while the consumer has not resumed yet are not buffered.

use crate::error::EventError;
use crate::events::Event;

// Upper bound on the up-front allocation; the vector still grows to `count`.
const PREALLOC_LIMIT: usize = 64;

pub(crate) async fn take<A, S>(event: Event<A, S>, count: usize) -> Result<Vec<A>, EventError>
where
    A: Clone + Send + 'static,
    S: Send + Sync + 'static,
{
    let mut values = Vec::with_capacity(count.min(PREALLOC_LIMIT));
    for _ in 0..count {
        values.push(event.next().await?);
    }
    Ok(values)
}
