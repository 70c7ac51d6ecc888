//! # Simple derived-event pipeline
//!
//! Demonstrates basic singlevent features:
//! - Filter and map children of one source
//! - Sender shared by the whole tree
//! - Awaiting values with `next()` and `take()`
//!
//! ## Run
//! ```bash
//! cargo run --example pipeline
//! ```

use std::time::Duration;

use singlevent::SingleEvent;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (readings, trigger) = SingleEvent::builder()
        .with_name("sensor")
        .with_sender("probe-1")
        .build::<f64>();

    // Valid readings only, converted to Fahrenheit.
    let fahrenheit = readings
        .filter(|c| (-50.0..=150.0).contains(c))
        .map(|c| c * 9.0 / 5.0 + 32.0);

    let printer = fahrenheit.listen_fn(|f, sender| {
        println!("📈 {sender}: {f:.1}°F");
    });

    // Registered before the producer starts, so the first valid reading is not missed.
    let first = fahrenheit.next();

    let producer = {
        let trigger = trigger.clone();
        tokio::spawn(async move {
            for c in [21.5, 999.0, 22.0, -80.0, 23.25, 24.0] {
                trigger.trigger(c);
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        })
    };

    let first = first.await?;
    println!("🎯 first valid reading: {first:.1}°F");

    let batch = fahrenheit.take(2).await?;
    println!("📦 next two: {batch:?}");

    producer.await?;
    fahrenheit.unlisten(&printer);
    println!("🔌 source connected after unlisten: {}", readings.is_connected());
    Ok(())
}
