//! Capacity bounds and the allocation clamp shared by every resize path.
//!
//! A bound of `0` means "unset". A configuration where `min > max` (with both
//! set) is not rejected: both bounds are simply ignored and the ring behaves as
//! if it were unbounded.

/// Returns `true` if `min` acts as a capacity floor for the given pair.
#[inline]
pub const fn min_is_valid(min: usize, max: usize) -> bool {
    min > 0 && (max == 0 || min <= max)
}

/// Returns `true` if `max` acts as a capacity ceiling for the given pair.
#[inline]
pub const fn max_is_valid(min: usize, max: usize) -> bool {
    max > 0 && min <= max
}

/// Clamps a requested capacity against the current length and the bounds.
///
/// - never below `len` (reallocation must not discard items)
/// - raised to `min` when the floor is valid
/// - lowered to `max` when the ceiling is valid, but still not below `len`
///
/// ```
/// use adaptring_rs::fix_alloc_size;
///
/// assert_eq!(fix_alloc_size(15, 10, 20, 15), 15);
/// assert_eq!(fix_alloc_size(0, 10, 20, 2), 10);
/// assert_eq!(fix_alloc_size(3, 0, 5, 40), 5);
/// // min > max: both ignored
/// assert_eq!(fix_alloc_size(3, 9, 4, 40), 40);
/// ```
#[inline]
pub fn fix_alloc_size(len: usize, min: usize, max: usize, needed: usize) -> usize {
    let mut cap = needed.max(len);
    if min_is_valid(min, max) {
        cap = cap.max(min);
    }
    if max_is_valid(min, max) {
        cap = cap.min(max);
    }
    cap.max(len)
}
