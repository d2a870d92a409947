//! Queue lifecycle state and the snapshot returned to controllers.

use adaptring_rs::Stats;
use std::fmt;

/// Lifecycle of an adaptive queue.
///
/// `Open → Draining → Closed`, or `Open → Closed` when the ring is already
/// empty as the input closes. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueState {
    /// Producers may still send.
    #[default]
    Open,
    /// Input closed; buffered items are still being delivered.
    Draining,
    /// Input closed, ring empty, output closed.
    Closed,
}

impl fmt::Display for QueueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Draining => "draining",
            Self::Closed => "closed",
        })
    }
}

/// A point-in-time view of a running queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueStats {
    /// Ring buffer counters.
    pub ring: Stats,
    /// Lifecycle state when the snapshot was taken.
    pub state: QueueState,
}
