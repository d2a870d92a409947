//! Adaptive Queue over adaptring-rs
//!
//! A FIFO queue fronted by tokio channels. One background task owns a
//! [`RingBuffer`](adaptring_rs::RingBuffer) and moves items from the producer
//! input to the consumer output, resizing the ring as it fills and empties.
//! A separate [`Controller`] reads statistics and issues resize/clear
//! commands; it can be closed without affecting data flow.
//!
//! # Features
//!
//! - **No locks around the ring**: a single coordinator task is its only owner
//! - **Acknowledged sends**: `send` returns once the item is in the ring
//! - **Lossless hand-off**: an item leaves the ring only once a consumer is
//!   waiting, and a cancelled receive puts it back at the front
//! - **Drain on close**: dropping every sender lets buffered items flow out
//!   before the receiver sees `None`
//! - **Bounded mode**: a `max` bound turns overflow into drop-oldest
//!
//! # Example
//!
//! ```ignore
//! use adaptring_queue::{adaptive_queue_with_config, QueueConfig, StreamExt};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (tx, mut rx, ctl) = adaptive_queue_with_config::<u64>(QueueConfig::new(10, 20));
//!
//!     for i in 0..15 {
//!         tx.send(i).await.unwrap();
//!     }
//!
//!     let stats = ctl.stats().await.unwrap();
//!     println!("buffered {} in {} slots", stats.ring.len, stats.ring.cap);
//!
//!     drop(tx);
//!     while let Some(item) = rx.next().await {
//!         println!("Received: {}", item);
//!     }
//! }
//! ```

mod channel;
mod config;
mod controller;
mod error;
mod invariants;
mod queue;
mod receiver;
mod sender;
mod state;

pub use channel::{adaptive_queue, adaptive_queue_with_config};
pub use config::{QueueConfig, DROP_OLDEST_CONFIG, UNBOUNDED_CONFIG};
pub use controller::Controller;
pub use error::{QueueError, SendError};
pub use receiver::QueueReceiver;
pub use sender::QueueSender;
pub use state::{QueueState, QueueStats};

pub use adaptring_rs::Stats;

// Re-export useful stream combinators
pub use tokio_stream::StreamExt;
