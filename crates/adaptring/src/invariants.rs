//! Debug assertion macros for ring buffer invariants.
//!
//! These macros are only active in debug builds (`#[cfg(debug_assertions)]`), so
//! there is zero overhead in release builds.

// =============================================================================
// Bounded length
// =============================================================================

/// Assert that the ring never holds more items than it has slots.
///
/// **Invariant**: `0 ≤ len ≤ cap`
///
/// Used in: `enqueue()`, `migrate()`
macro_rules! debug_assert_bounded_len {
    ($len:expr, $cap:expr) => {
        debug_assert!(
            $len <= $cap,
            "bounded length violated: len {} exceeds capacity {}",
            $len,
            $cap
        )
    };
}

// =============================================================================
// Start offset in range
// =============================================================================

/// Assert that the logical start offset addresses a real slot.
///
/// **Invariant**: `start ∈ [0, cap)`, or `start == 0` when `cap == 0`
///
/// Used in: `enqueue()`, `dequeue()`
macro_rules! debug_assert_start_in_range {
    ($start:expr, $cap:expr) => {
        debug_assert!(
            ($cap == 0 && $start == 0) || $start < $cap,
            "start offset violated: start {} with capacity {}",
            $start,
            $cap
        )
    };
}

// =============================================================================
// Order-preserving migration
// =============================================================================

/// Assert that a reallocation copied every stored item and has room for them.
///
/// **Invariant**: `copied == len ∧ new_cap ≥ len`
///
/// Used in: `migrate()`
macro_rules! debug_assert_migration_complete {
    ($copied:expr, $len:expr, $new_cap:expr) => {
        debug_assert!(
            $copied == $len && $new_cap >= $len,
            "migration violated: copied {} of {} items into capacity {}",
            $copied,
            $len,
            $new_cap
        )
    };
}

pub(crate) use debug_assert_bounded_len;
pub(crate) use debug_assert_migration_complete;
pub(crate) use debug_assert_start_in_range;
