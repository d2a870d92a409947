//! Demonstration of adaptring-queue features.
//!
//! Run with: `RUST_LOG=debug cargo run -p adaptring-queue --features demo --bin demo`

use adaptring_queue::{
    adaptive_queue, adaptive_queue_with_config, QueueConfig, QueueError, StreamExt,
    DROP_OLDEST_CONFIG,
};
use std::time::Duration;
use tokio::time::timeout;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== adaptring-queue Demo ===\n");

    demo_basic_usage().await?;
    demo_resize_bounds().await?;
    demo_drop_oldest().await?;
    demo_controller_close().await?;
    demo_receive_timeout().await?;

    println!("\n=== All demos completed successfully! ===");
    Ok(())
}

/// Demo 1: Producer, consumer, drain on close
async fn demo_basic_usage() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Demo 1: Basic Usage ---");

    let (tx, mut rx, _ctl) = adaptive_queue::<u64>();

    let producer = tokio::spawn(async move {
        for i in 0..5 {
            tx.send(i).await.expect("send failed");
            println!("  Sent: {}", i);
        }
        // Sender dropped here - the queue drains, then closes
    });

    while let Some(item) = rx.next().await {
        println!("  Received: {}", item);
    }

    producer.await?;
    println!("  ✓ Basic usage complete\n");
    Ok(())
}

/// Demo 2: Capacity follows min/max bounds
async fn demo_resize_bounds() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Demo 2: Resize Within Bounds ---");

    let (tx, _rx, ctl) = adaptive_queue_with_config::<u64>(QueueConfig::new(10, 20));

    for i in 0..15 {
        tx.send(i).await?;
    }
    let stats = ctl.stats().await?;
    println!(
        "  15 items buffered: len={} cap={} allocs={}",
        stats.ring.len, stats.ring.cap, stats.ring.allocs
    );

    ctl.shrink(0).await?;
    let stats = ctl.stats().await?;
    println!("  After shrink(0): cap={}", stats.ring.cap);

    ctl.grow(100).await?;
    let stats = ctl.stats().await?;
    println!("  After grow(100): cap={} (capped by max)", stats.ring.cap);

    let cleared = ctl.clear().await?;
    let stats = ctl.stats().await?;
    println!("  Cleared {} items: cap={}", cleared, stats.ring.cap);

    println!("  ✓ Resize complete\n");
    Ok(())
}

/// Demo 3: A max bound turns overflow into drop-oldest
async fn demo_drop_oldest() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Demo 3: Drop Oldest ---");

    let config = QueueConfig::bounded(5);
    let (tx, rx, ctl) = adaptive_queue_with_config::<u64>(config);

    for i in 1..=8 {
        tx.send(i).await?;
    }
    let stats = ctl.stats().await?;
    println!(
        "  Sent 8 into max=5: len={} dropped={}",
        stats.ring.len, stats.ring.dropped
    );

    drop(tx);
    let kept: Vec<u64> = rx.collect().await;
    println!("  Kept: {:?}", kept);

    println!(
        "  Preset DROP_OLDEST_CONFIG: min={} max={}",
        DROP_OLDEST_CONFIG.min, DROP_OLDEST_CONFIG.max
    );
    println!("  ✓ Drop oldest complete\n");
    Ok(())
}

/// Demo 4: Closing the controller leaves data flow alone
async fn demo_controller_close() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Demo 4: Controller Close ---");

    let (tx, mut rx, ctl) = adaptive_queue::<&'static str>();

    ctl.close();
    ctl.close();
    match ctl.stats().await {
        Err(QueueError::ControllerClosed) => println!("  stats() after close: ControllerClosed"),
        other => println!("  unexpected: {:?}", other),
    }

    tx.send("still flowing").await?;
    println!("  Received: {:?}", rx.recv().await);

    println!("  ✓ Controller close complete\n");
    Ok(())
}

/// Demo 5: Bounding a receive with a timeout
async fn demo_receive_timeout() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Demo 5: Receive Timeout ---");

    let (tx, mut rx, _ctl) = adaptive_queue::<u64>();

    match timeout(Duration::from_millis(50), rx.recv()).await {
        Ok(item) => println!("  unexpected item: {:?}", item),
        Err(_) => println!("  Empty queue: receive timed out"),
    }

    tx.send(42).await?;
    println!("  Received after timeout: {:?}", rx.recv().await);

    println!("  ✓ Receive timeout complete\n");
    Ok(())
}
