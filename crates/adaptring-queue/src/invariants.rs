//! Debug assertion macros for coordinator invariants.
//!
//! These macros are only active in debug builds (`#[cfg(debug_assertions)]`),
//! so there is zero overhead in release builds.

// =============================================================================
// Drain before close
// =============================================================================

/// Assert that the output is only closed once nothing deliverable remains.
///
/// **Invariant**: `output closed → input closed ∧ (nothing buffered or in flight ∨ consumer gone)`
///
/// Used in: `AdaptiveQueue::run()` on exit
macro_rules! debug_assert_drained_before_close {
    ($input_open:expr, $undelivered:expr, $consumer_gone:expr) => {
        debug_assert!(
            !$input_open && ($undelivered == 0 || $consumer_gone),
            "drain-before-close violated: closing output with input_open={} and {} items undelivered",
            $input_open,
            $undelivered
        )
    };
}

// =============================================================================
// Offer served from the ring
// =============================================================================

/// Assert that a waiting consumer is only served while the ring has an item.
///
/// **Invariant**: `request served → ring non-empty`
///
/// Used in: `AdaptiveQueue::serve()`
macro_rules! debug_assert_offer_from_ring {
    ($item_present:expr) => {
        debug_assert!(
            $item_present,
            "offer violated: consumer request served but the ring had no front item"
        )
    };
}

// =============================================================================
// Lifecycle monotonic
// =============================================================================

/// Assert that the queue state only moves forward.
///
/// **Invariant**: `Open → Draining → Closed`, `Open → Closed`
///
/// Used in: `AdaptiveQueue::transition()`
macro_rules! debug_assert_forward_transition {
    ($from:expr, $to:expr) => {
        debug_assert!(
            matches!(
                ($from, $to),
                (QueueState::Open, QueueState::Draining)
                    | (QueueState::Open, QueueState::Closed)
                    | (QueueState::Draining, QueueState::Closed)
            ),
            "lifecycle violated: {} -> {}",
            $from,
            $to
        )
    };
}

pub(crate) use debug_assert_drained_before_close;
pub(crate) use debug_assert_forward_transition;
pub(crate) use debug_assert_offer_from_ring;
