//! Administrative handle: resize and clear commands plus statistics.

use crate::error::QueueError;
use crate::state::QueueStats;
use adaptring_rs::Stats;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// A resize or clear request serviced by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    SetMin(usize),
    SetMax(usize),
    Grow(usize),
    Shrink(usize),
    Clear,
}

/// A command plus the channel its result is sent back on.
///
/// The reply carries the number of items removed, which is only non-zero
/// for `Command::Clear`.
pub(crate) struct CommandRequest {
    pub(crate) command: Command,
    pub(crate) reply: oneshot::Sender<usize>,
}

pub(crate) type StatsRequest = oneshot::Sender<QueueStats>;

/// Sending halves of the two administrative paths.
#[derive(Clone)]
struct Endpoints {
    commands: mpsc::Sender<CommandRequest>,
    stats: mpsc::Sender<StatsRequest>,
}

/// Administrative handle for an adaptive queue.
///
/// Every operation waits until the coordinator services it. Bound a call with
/// `tokio::time::timeout` (or drop its future) to give up early; an abandoned
/// command is skipped by the coordinator and has no effect.
///
/// Closing the controller stops administration only. Producers and consumers
/// are unaffected.
///
/// # Errors
///
/// - [`QueueError::ControllerClosed`] after [`close`](Controller::close), on
///   this handle or any clone of it.
/// - [`QueueError::QueueClosed`] once the queue has drained and stopped.
#[derive(Clone)]
pub struct Controller {
    /// `None` once closed. Dropping the endpoints lets the coordinator stop
    /// polling the administrative paths.
    endpoints: Arc<Mutex<Option<Endpoints>>>,
}

impl Controller {
    pub(crate) fn new(
        commands: mpsc::Sender<CommandRequest>,
        stats: mpsc::Sender<StatsRequest>,
    ) -> Self {
        Self {
            endpoints: Arc::new(Mutex::new(Some(Endpoints { commands, stats }))),
        }
    }

    fn endpoints(&self) -> Result<Endpoints, QueueError> {
        self.endpoints
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(QueueError::ControllerClosed)
    }

    async fn command(&self, command: Command) -> Result<usize, QueueError> {
        let endpoints = self.endpoints()?;
        let (reply, response) = oneshot::channel();
        endpoints
            .commands
            .send(CommandRequest { command, reply })
            .await
            .map_err(|_| QueueError::QueueClosed)?;
        // A dropped reply means the coordinator exited with the request unserviced.
        response.await.map_err(|_| QueueError::QueueClosed)
    }

    /// Sets the ring's capacity floor (0 = unset). Applies on the next resize.
    pub async fn set_min(&self, min: usize) -> Result<(), QueueError> {
        self.command(Command::SetMin(min)).await.map(|_| ())
    }

    /// Sets the ring's capacity ceiling (0 = unset). Applies on the next resize.
    pub async fn set_max(&self, max: usize) -> Result<(), QueueError> {
        self.command(Command::SetMax(max)).await.map(|_| ())
    }

    /// Ensures the ring has at least `n` free slots, subject to its bounds.
    pub async fn grow(&self, n: usize) -> Result<(), QueueError> {
        self.command(Command::Grow(n)).await.map(|_| ())
    }

    /// Ensures the ring has at most `n` free slots, subject to its bounds.
    pub async fn shrink(&self, n: usize) -> Result<(), QueueError> {
        self.command(Command::Shrink(n)).await.map(|_| ())
    }

    /// Discards every buffered item and returns how many were discarded.
    ///
    /// Items still in the producer hand-off channel are not yet buffered and
    /// are not affected.
    pub async fn clear(&self) -> Result<usize, QueueError> {
        self.command(Command::Clear).await
    }

    /// Returns a snapshot of the ring counters and the queue state.
    pub async fn stats(&self) -> Result<QueueStats, QueueError> {
        let endpoints = self.endpoints()?;
        let (reply, response) = oneshot::channel();
        endpoints
            .stats
            .send(reply)
            .await
            .map_err(|_| QueueError::QueueClosed)?;
        response.await.map_err(|_| QueueError::QueueClosed)
    }

    /// Writes the ring counters into `dst`.
    ///
    /// `dst` is left untouched on error.
    pub async fn write_stats(&self, dst: &mut Stats) -> Result<(), QueueError> {
        *dst = self.stats().await?.ring;
        Ok(())
    }

    /// Closes this controller and all of its clones.
    ///
    /// Idempotent and safe to call concurrently. Afterwards every operation
    /// fails with [`QueueError::ControllerClosed`] without contacting the queue.
    pub fn close(&self) {
        let released = self
            .endpoints
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if released.is_some() {
            debug!("queue controller closed");
        }
    }

    /// Returns `true` if [`close`](Controller::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.endpoints
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}
