//! Error types for adaptive queue operations.

use thiserror::Error;

/// Errors returned by [`Controller`](crate::Controller) operations.
///
/// Timeouts are not represented here: bound a call with
/// `tokio::time::timeout` and the timer's own `Elapsed` error is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The queue has drained after its input closed; data flow has ended.
    #[error("queue is closed")]
    QueueClosed,

    /// The controller was closed by its owner.
    #[error("controller is closed")]
    ControllerClosed,
}

impl QueueError {
    /// Returns `true` if the data flow itself has ended.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::QueueClosed)
    }

    /// Returns `true` if only the administrative handle was closed.
    #[inline]
    pub fn is_administrative(&self) -> bool {
        matches!(self, Self::ControllerClosed)
    }
}

/// Returned by [`QueueSender::send`](crate::QueueSender::send) when the queue
/// no longer accepts items. Carries the rejected item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("queue input is closed")]
pub struct SendError<T>(pub T);
