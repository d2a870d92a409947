//! AdaptRing - Adaptive Circular Buffer
//!
//! A generic FIFO ring buffer whose backing storage grows and shrinks with
//! demand. Storage is a single contiguous slice addressed by a start offset
//! and a length; every capacity change reallocates and re-packs the items so
//! the oldest one sits at slot 0.
//!
//! # Key Features
//!
//! - Amortized ~1.5x growth, ~2/3 shrink (hysteresis against thrashing)
//! - Optional `min` floor and `max` ceiling; `min > max` disables both
//! - Drop-oldest overwrite once a valid `max` is reached
//! - Usage counters (`Stats`) for grows, shrinks, allocations and drops
//!
//! `RingBuffer` is single-owner and unsynchronized. The `adaptring-queue`
//! crate wraps it in a tokio task with channel endpoints.
//!
//! # Example
//!
//! ```
//! use adaptring_rs::RingBuffer;
//!
//! // Keep at most 3 items, dropping the oldest on overflow.
//! let mut ring = RingBuffer::with_bounds(0, 3);
//! for i in 1..=5 {
//!     ring.enqueue(i);
//! }
//!
//! assert_eq!(ring.peek(), Some(&3));
//! assert_eq!(ring.stats().dropped, 2);
//!
//! let drained: Vec<_> = std::iter::from_fn(|| ring.dequeue()).collect();
//! assert_eq!(drained, vec![3, 4, 5]);
//! ```

mod bounds;
mod invariants;
mod ring;
mod stats;

pub use bounds::{fix_alloc_size, max_is_valid, min_is_valid};
pub use ring::RingBuffer;
pub use stats::Stats;
