//! Consumer endpoint implementing `futures::Stream`.

use futures_core::Stream;
use std::future::{poll_fn, Future};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};

/// Consumer-side messages to the coordinator, in the order a receiver sends
/// them.
pub(crate) enum Demand<T> {
    /// A receiver is waiting for the next item.
    Take(oneshot::Sender<T>),
    /// A delivered item reached its receiver.
    Received,
    /// A delivered item was withdrawn before its receiver saw it. It goes
    /// back to the front of the ring.
    Return(T),
}

/// Consumer-facing output of an adaptive queue.
///
/// Yields items in FIFO order. `recv()` returning `None` (or the stream
/// ending) means the producers have closed the input and every buffered item
/// has been delivered: no further item will ever arrive.
///
/// Each receiver asks the coordinator for one item at a time. A cancelled
/// `recv()` withdraws its request; an item already on its way is returned to
/// the front of the queue, so cancellation never consumes an item.
/// `QueueReceiver` is `Clone`; clones compete for items.
pub struct QueueReceiver<T> {
    demands: mpsc::UnboundedSender<Demand<T>>,
    /// Outstanding request, if any.
    pending: Option<oneshot::Receiver<T>>,
}

impl<T> Clone for QueueReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            demands: self.demands.clone(),
            pending: None,
        }
    }
}

impl<T> QueueReceiver<T> {
    pub(crate) fn new(demands: mpsc::UnboundedSender<Demand<T>>) -> Self {
        Self {
            demands,
            pending: None,
        }
    }

    /// Returns `true` if the queue has stopped and will never yield again.
    pub fn is_closed(&self) -> bool {
        self.pending.is_none() && self.demands.is_closed()
    }

    /// Drops the outstanding request and hands back an item that was already
    /// delivered into it.
    fn withdraw(&mut self) {
        let Some(mut response) = self.pending.take() else {
            return;
        };

        // After close() the coordinator can no longer deliver, so whatever
        // try_recv finds is the only copy.
        response.close();
        if let Ok(item) = response.try_recv() {
            // The coordinator keeps running while a delivery is unconfirmed,
            // so this send cannot fail.
            let _ = self.demands.send(Demand::Return(item));
        }
    }
}

impl<T: Send + 'static> QueueReceiver<T> {
    /// Receives the next item, waiting while the queue is empty.
    ///
    /// Cancel safe: if the future is dropped before completing, no item is
    /// consumed.
    pub async fn recv(&mut self) -> Option<T> {
        let mut guard = WithdrawOnDrop(self);
        poll_fn(|cx| Pin::new(&mut *guard.0).poll_next(cx)).await
    }
}

impl<T> Drop for QueueReceiver<T> {
    fn drop(&mut self) {
        self.withdraw();
    }
}

/// Withdraws the receiver's request if a `recv()` future is dropped early.
/// Once `recv()` completes nothing is pending and this is a no-op.
struct WithdrawOnDrop<'a, T>(&'a mut QueueReceiver<T>);

impl<T> Drop for WithdrawOnDrop<'_, T> {
    fn drop(&mut self) {
        self.0.withdraw();
    }
}

impl<T: Send + 'static> Stream for QueueReceiver<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(response) = this.pending.as_mut() {
                let ready = match Pin::new(response).poll(cx) {
                    Poll::Pending => return Poll::Pending,
                    Poll::Ready(ready) => ready,
                };
                this.pending = None;

                // The coordinator only drops a request unanswered when it exits,
                // and it exits only once nothing is left to deliver.
                return match ready {
                    Ok(item) => {
                        let _ = this.demands.send(Demand::Received);
                        Poll::Ready(Some(item))
                    }
                    Err(_) => Poll::Ready(None),
                };
            }

            let (request, response) = oneshot::channel();
            if this.demands.send(Demand::Take(request)).is_err() {
                return Poll::Ready(None);
            }
            this.pending = Some(response);
        }
    }
}
