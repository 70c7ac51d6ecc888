//! # Lazy source driven by connect/disconnect hooks
//!
//! A ticker task is started when the first observer shows up and stopped when the
//! last one leaves. Every delivery is written through the `LogWriter` listener.
//!
//! ## Run
//! ```bash
//! RUST_LOG=singlevent=trace cargo run --example lazy_source --features logging
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use singlevent::{LogWriter, SingleEvent, Trigger};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

type Slot = Arc<Mutex<Option<JoinHandle<()>>>>;

fn start_ticker(slot: &Slot, trigger: Trigger<u64, &'static str>) {
    let handle = tokio::spawn(async move {
        let mut n = 0;
        loop {
            tokio::time::sleep(Duration::from_millis(100)).await;
            n += 1;
            trigger.trigger(n);
        }
    });
    *slot.lock().unwrap() = Some(handle);
}

fn stop_ticker(slot: &Slot) {
    if let Some(handle) = slot.lock().unwrap().take() {
        handle.abort();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let slot: Slot = Arc::default();
    let trigger_slot: Arc<Mutex<Option<Trigger<u64, &'static str>>>> = Arc::default();

    let (ticks, trigger) = {
        let (on, off) = (Arc::clone(&slot), Arc::clone(&slot));
        let t = Arc::clone(&trigger_slot);
        SingleEvent::builder()
            .with_name("ticks")
            .with_sender("ticker")
            .on_connect(move || {
                println!("🔌 connect: starting ticker");
                if let Some(trigger) = t.lock().unwrap().clone() {
                    start_ticker(&on, trigger);
                }
            })
            .on_disconnect(move || {
                println!("🔌 disconnect: stopping ticker");
                stop_ticker(&off);
            })
            .build::<u64>()
    };
    *trigger_slot.lock().unwrap() = Some(trigger);

    let writer = LogWriter::new("ticks.even");
    let evens = ticks.filter(|n| n % 2 == 0);
    let log = writer.listener();
    evens.listen(&log);

    let three = ticks.take(3).await?;
    println!("🎯 took {three:?}");

    evens.unlisten(&log);
    println!("✅ connected: {}", ticks.is_connected());

    trigger_slot.lock().unwrap().take();
    Ok(())
}
