//! Producer endpoint.

use crate::error::SendError;
use tokio::sync::{mpsc, oneshot};

/// An item on its way to the coordinator.
///
/// `ack` is answered once the item is in the ring. A submission whose `ack`
/// receiver is gone belongs to a cancelled send and is discarded unqueued.
pub(crate) struct Submission<T> {
    pub(crate) item: T,
    pub(crate) ack: Option<oneshot::Sender<()>>,
}

/// Producer-facing input of an adaptive queue.
///
/// `QueueSender` is `Clone`; every clone feeds the same queue. The input
/// closes once every clone has been dropped (or passed to [`close`]), after
/// which the queue drains and shuts its output.
///
/// Items from one sender arrive in the order they were sent. The relative
/// order between different senders is unspecified.
///
/// [`close`]: QueueSender::close
pub struct QueueSender<T> {
    tx: mpsc::Sender<Submission<T>>,
}

impl<T> Clone for QueueSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: Send + 'static> QueueSender<T> {
    pub(crate) fn new(tx: mpsc::Sender<Submission<T>>) -> Self {
        Self { tx }
    }

    /// Sends an item and waits until the coordinator has enqueued it.
    ///
    /// When this returns `Ok`, the item is counted in the ring's stats and
    /// is subject to `clear` and resize commands.
    ///
    /// Cancel safe: if the future is dropped before completing, the item is
    /// discarded without being enqueued.
    pub async fn send(&self, item: T) -> Result<(), SendError<T>> {
        let permit = match self.tx.reserve().await {
            Ok(permit) => permit,
            Err(_) => return Err(SendError(item)),
        };

        let (ack, enqueued) = oneshot::channel();
        permit.send(Submission {
            item,
            ack: Some(ack),
        });

        // The coordinator only leaves an ack unanswered when it is torn down
        // with the runtime, taking every buffered item with it.
        let _ = enqueued.await;
        Ok(())
    }

    /// Attempts to hand an item over without waiting.
    ///
    /// Returns `Err(item)` if the hand-off channel is full or the queue is
    /// gone. On `Ok` the item is accepted but may not be in the ring yet.
    pub fn try_send(&self, item: T) -> Result<(), T> {
        self.tx
            .try_send(Submission { item, ack: None })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(submission)
                | mpsc::error::TrySendError::Closed(submission) => submission.item,
            })
    }

    /// Returns `true` if the queue no longer accepts items.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Releases this sender. The input closes when the last sender is released.
    pub fn close(self) {
        drop(self);
    }
}
