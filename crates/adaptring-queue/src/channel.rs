//! Queue construction.

use crate::config::QueueConfig;
use crate::controller::Controller;
use crate::queue::AdaptiveQueue;
use crate::receiver::QueueReceiver;
use crate::sender::QueueSender;
use adaptring_rs::RingBuffer;
use tokio::sync::mpsc;

/// Creates an unbounded adaptive queue.
///
/// Returns the producer endpoint, the consumer endpoint and the administrative
/// controller. The coordinator runs as a tokio task until the input closes and
/// the queue has drained.
///
/// # Panics
///
/// Panics if called outside of a tokio runtime.
///
/// # Example
///
/// ```ignore
/// use adaptring_queue::adaptive_queue;
///
/// let (tx, mut rx, ctl) = adaptive_queue::<u64>();
/// tx.send(1).await?;
/// drop(tx);
///
/// assert_eq!(rx.recv().await, Some(1));
/// assert_eq!(rx.recv().await, None);
/// ```
pub fn adaptive_queue<T: Send + 'static>() -> (QueueSender<T>, QueueReceiver<T>, Controller) {
    adaptive_queue_with_config(QueueConfig::default())
}

/// Creates an adaptive queue with custom bounds and channel sizes.
///
/// # Arguments
///
/// * `config` - initial ring bounds (`min`, `max`) and channel capacities
///
/// # Panics
///
/// Panics if called outside of a tokio runtime.
pub fn adaptive_queue_with_config<T: Send + 'static>(
    config: QueueConfig,
) -> (QueueSender<T>, QueueReceiver<T>, Controller) {
    let (input_tx, input_rx) = mpsc::channel(config.input_slots());
    // Each receiver has at most one request outstanding.
    let (demand_tx, demand_rx) = mpsc::unbounded_channel();
    let (stats_tx, stats_rx) = mpsc::channel(config.admin_slots());
    let (command_tx, command_rx) = mpsc::channel(config.admin_slots());

    let queue = AdaptiveQueue::new(
        RingBuffer::with_bounds(config.min, config.max),
        input_rx,
        demand_rx,
        stats_rx,
        command_rx,
    );
    tokio::spawn(queue.run());

    (
        QueueSender::new(input_tx),
        QueueReceiver::new(demand_tx),
        Controller::new(command_tx, stats_tx),
    )
}
