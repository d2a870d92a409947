#[cfg(debug_assertions)]
use crate::invariants::{
    debug_assert_bounded_len, debug_assert_migration_complete, debug_assert_start_in_range,
};
use crate::{fix_alloc_size, max_is_valid, min_is_valid, Stats};
use std::fmt;
use tracing::{debug, trace};

// =============================================================================
// RESIZE POLICY
// =============================================================================
//
// Storage is a boxed slice addressed by a logical `start` offset and `len`.
// The item at logical index `i` lives at physical slot `(start + i) % cap`.
// Storage is never resized in place: every capacity change allocates a new
// slice and copies the logical contents into it starting at slot 0.
//
// ## Growth (enqueue)
//
// When the ring is full, or smaller than a valid `min`, it asks for
// `(len + 1) * 3 / 2 + 1 - len` free slots (~1.5x), clamped by
// `fix_alloc_size`. If a valid `max` stops the growth and the ring is still
// full, the oldest item is overwritten instead (drop-oldest).
//
// ## Shrink (dequeue)
//
// Only with a valid `min`. Once `len < cap / 2 + 1` the ring asks for
// `cap * 2 / 3 + 1 - len` free slots, clamped the same way. The gap between
// the 1.5x growth and the 2/3 shrink keeps an alternating enqueue/dequeue
// pattern from reallocating on every call.
//
// =============================================================================

/// A growable circular FIFO buffer with optional capacity bounds.
///
/// `RingBuffer` is not synchronized. It is meant to be owned by exactly one
/// task; see `adaptring-queue` for the channel-fronted wrapper.
///
/// Capacity bounds use `0` for "unset":
/// - `min` is a soft floor: the ring grows to at least `min` on the next
///   enqueue and never shrinks below it.
/// - `max` is a hard ceiling: once reached, enqueueing into a full ring
///   overwrites the oldest item.
///
/// If both are set and `min > max`, both are ignored.
pub struct RingBuffer<T> {
    /// Backing storage. Vacant slots hold `None`.
    ///
    /// Uses `Box<[Option<T>]>` instead of `Vec<T>` because the slice length is
    /// the capacity and only changes through `migrate`.
    buffer: Box<[Option<T>]>,
    /// Physical index of the oldest item.
    start: usize,
    /// Number of stored items.
    len: usize,
    min: usize,
    max: usize,
    stats: Stats,
}

impl<T> RingBuffer<T> {
    /// Creates an empty, unbounded ring with no storage allocated.
    pub fn new() -> Self {
        Self {
            buffer: Box::default(),
            start: 0,
            len: 0,
            min: 0,
            max: 0,
            stats: Stats::new(),
        }
    }

    /// Creates an empty ring with the given bounds. Nothing is allocated until
    /// the first enqueue.
    pub fn with_bounds(min: usize, max: usize) -> Self {
        let mut ring = Self::new();
        ring.min = min;
        ring.max = max;
        ring
    }

    /// Creates an empty, unbounded ring with `capacity` slots preallocated.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut ring = Self::new();
        if capacity > 0 {
            ring.migrate(capacity);
        }
        ring
    }

    // ---------------------------------------------------------------------
    // STATUS & BOUNDS
    // ---------------------------------------------------------------------

    /// Returns the number of stored items.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the ring holds no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in the current backing storage.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn min(&self) -> usize {
        self.min
    }

    #[inline]
    pub fn max(&self) -> usize {
        self.max
    }

    /// Sets the capacity floor. Takes effect on the next resize.
    pub fn set_min(&mut self, min: usize) {
        self.min = min;
    }

    /// Sets the capacity ceiling. Takes effect on the next resize.
    pub fn set_max(&mut self, max: usize) {
        self.max = max;
    }

    #[inline]
    pub fn min_is_valid(&self) -> bool {
        min_is_valid(self.min, self.max)
    }

    #[inline]
    pub fn max_is_valid(&self) -> bool {
        max_is_valid(self.min, self.max)
    }

    /// Returns a snapshot of the usage counters.
    pub fn stats(&self) -> Stats {
        Stats {
            len: self.len,
            cap: self.capacity(),
            ..self.stats
        }
    }

    /// Writes a snapshot of the usage counters into `dst`.
    pub fn write_stats(&self, dst: &mut Stats) {
        *dst = self.stats();
    }

    /// Grows ahead of an insert if the ring is full or below a valid `min`.
    fn make_room(&mut self) {
        if self.len == self.capacity() || (self.min_is_valid() && self.capacity() < self.min) {
            let free = (self.len + 1) * 3 / 2 + 1 - self.len;
            self.grow(free);
        }
    }

    /// Maps a logical index to its physical slot. Requires `cap > 0`.
    #[inline]
    fn slot(&self, logical: usize) -> usize {
        (self.start + logical) % self.buffer.len()
    }

    // ---------------------------------------------------------------------
    // FIFO API
    // ---------------------------------------------------------------------

    /// Appends `value` at the logical end.
    ///
    /// Grows the storage if the ring is full or below a valid `min`. If a
    /// valid `max` prevents growth, the oldest item is overwritten and
    /// counted in `Stats::dropped`.
    pub fn enqueue(&mut self, value: T) {
        self.make_room();

        let cap = self.capacity();
        self.stats.enqueued += 1;

        if self.len == cap {
            // Still full: a valid max capped the growth. cap > 0 here since
            // fix_alloc_size never returns 0 for a request of at least 2.
            let slot = self.start;
            self.buffer[slot] = Some(value);
            self.start = (self.start + 1) % cap;
            self.stats.dropped += 1;
            trace!(cap, dropped = self.stats.dropped, "ring full, oldest item overwritten");
        } else {
            let slot = self.slot(self.len);
            self.buffer[slot] = Some(value);
            self.len += 1;
        }

        #[cfg(debug_assertions)]
        {
            debug_assert_bounded_len!(self.len, cap);
            debug_assert_start_in_range!(self.start, cap);
        }
    }

    /// Removes and returns the oldest item, or `None` if the ring is empty.
    ///
    /// The vacated slot is reset so the value is released immediately. With a
    /// valid `min`, a ring that has fallen below half full is shrunk.
    pub fn dequeue(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        let cap = self.capacity();
        let value = self.buffer[self.start].take();
        self.start = (self.start + 1) % cap;
        self.len -= 1;
        self.stats.dequeued += 1;

        #[cfg(debug_assertions)]
        debug_assert_start_in_range!(self.start, cap);

        if self.min_is_valid() && self.len < cap / 2 + 1 {
            self.shrink((cap * 2 / 3 + 1).saturating_sub(self.len));
        }

        value
    }

    /// Returns a reference to the oldest item without removing it.
    pub fn peek(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        self.buffer[self.start].as_ref()
    }

    /// Puts a previously dequeued item back at the logical front.
    ///
    /// Reverts the item's `Stats::dequeued` count. Grows like `enqueue`; if a
    /// valid `max` keeps the ring full, the restored item is the oldest one
    /// and is dropped instead.
    pub fn restore(&mut self, value: T) {
        self.make_room();

        let cap = self.capacity();
        self.stats.dequeued = self.stats.dequeued.saturating_sub(1);

        if self.len == cap {
            self.stats.dropped += 1;
            trace!(cap, dropped = self.stats.dropped, "ring full, restored item dropped");
            return;
        }

        self.start = (self.start + cap - 1) % cap;
        self.buffer[self.start] = Some(value);
        self.len += 1;

        #[cfg(debug_assertions)]
        {
            debug_assert_bounded_len!(self.len, cap);
            debug_assert_start_in_range!(self.start, cap);
        }
    }

    /// Removes every item and returns how many were removed.
    ///
    /// With a valid `min` and more than `min` slots, the storage is replaced by
    /// a `min`-sized allocation. Otherwise the current storage is kept.
    pub fn clear(&mut self) -> usize {
        let count = self.len;

        if self.min_is_valid() && self.capacity() > self.min {
            // The old slice, and every item in it, is dropped by migrate.
            self.len = 0;
            self.start = 0;
            self.migrate(self.min);
        } else {
            for logical in 0..self.len {
                let slot = self.slot(logical);
                self.buffer[slot] = None;
            }
            self.len = 0;
            self.start = 0;
        }

        self.stats.dequeued += count as u64;
        count
    }

    /// Ensures at least `n` free slots, subject to the bounds.
    ///
    /// No-op if the clamped target does not exceed the current capacity.
    pub fn grow(&mut self, n: usize) {
        let target = fix_alloc_size(self.len, self.min, self.max, self.len.saturating_add(n));
        if target > self.capacity() {
            self.migrate(target);
        }
    }

    /// Ensures at most `n` free slots, subject to the bounds.
    ///
    /// No-op if the clamped target is not below the current capacity.
    pub fn shrink(&mut self, n: usize) {
        let target = fix_alloc_size(self.len, self.min, self.max, self.len.saturating_add(n));
        if target < self.capacity() {
            self.migrate(target);
        }
    }

    /// Iterates over the stored items, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).filter_map(move |logical| self.buffer[self.slot(logical)].as_ref())
    }

    // ---------------------------------------------------------------------
    // REALLOCATION
    // ---------------------------------------------------------------------

    /// Moves the stored items into fresh storage of `new_cap` slots.
    ///
    /// The logical contents are copied as at most two contiguous runs,
    /// `start..end` and then the wrapped remainder `0..rest`, so the oldest
    /// item lands in slot 0.
    fn migrate(&mut self, new_cap: usize) {
        let old_cap = self.capacity();
        let mut next: Vec<Option<T>> = Vec::with_capacity(new_cap);

        if self.len > 0 {
            let head_end = (self.start + self.len).min(old_cap);
            let rest = self.len - (head_end - self.start);
            next.extend(self.buffer[self.start..head_end].iter_mut().map(Option::take));
            next.extend(self.buffer[..rest].iter_mut().map(Option::take));
        }

        #[cfg(debug_assertions)]
        debug_assert_migration_complete!(next.len(), self.len, new_cap);

        next.resize_with(new_cap, || None);
        self.buffer = next.into_boxed_slice();
        self.start = 0;
        self.stats.allocs += 1;

        if new_cap > old_cap {
            self.stats.grown += 1;
        } else if new_cap < old_cap {
            self.stats.shrunk += 1;
        }

        debug!(old_cap, new_cap, len = self.len, "ring storage reallocated");
    }
}

impl<T> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for RingBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.enqueue(value);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("len", &self.len)
            .field("cap", &self.capacity())
            .field("min", &self.min)
            .field("max", &self.max)
            .field("items", &DebugItems(self))
            .finish()
    }
}

struct DebugItems<'a, T>(&'a RingBuffer<T>);

impl<T: fmt::Debug> fmt::Debug for DebugItems<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<T>(ring: &mut RingBuffer<T>) -> Vec<T> {
        std::iter::from_fn(|| ring.dequeue()).collect()
    }

    #[test]
    fn test_ring_basic() {
        let mut ring = RingBuffer::new();
        assert!(ring.is_empty());
        assert_eq!(ring.capacity(), 0);
        assert_eq!(ring.peek(), None);
        assert_eq!(ring.dequeue(), None::<u64>);

        ring.enqueue(100);
        ring.enqueue(200);
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.peek(), Some(&100));
        assert_eq!(ring.len(), 2);

        assert_eq!(ring.dequeue(), Some(100));
        assert_eq!(ring.dequeue(), Some(200));
        assert!(ring.is_empty());
    }

    #[test]
    fn test_growth_sequence_unbounded() {
        let mut ring = RingBuffer::new();
        let mut caps = Vec::new();
        for i in 0..20u32 {
            ring.enqueue(i);
            caps.push(ring.capacity());
        }
        // 0 -> 2 -> 5 -> 10 -> 17 -> 28
        assert_eq!(caps[0], 2);
        assert_eq!(caps[2], 5);
        assert_eq!(caps[5], 10);
        assert_eq!(caps[10], 17);
        assert_eq!(caps[17], 28);

        let stats = ring.stats();
        assert_eq!(stats.grown, 5);
        assert_eq!(stats.allocs, 5);
        assert_eq!(stats.shrunk, 0);
        assert_eq!(stats.dropped, 0);
    }

    #[test]
    fn test_fifo_across_wrap_and_growth() {
        let mut ring = RingBuffer::new();
        let mut expected = Vec::new();
        let mut got = Vec::new();

        // Interleave so start moves away from 0 before a growth migrates.
        for i in 0..50u32 {
            ring.enqueue(i);
            expected.push(i);
            if i % 3 == 0 {
                got.extend(ring.dequeue());
            }
        }
        got.extend(drain(&mut ring));
        assert_eq!(got, expected);
    }

    #[test]
    fn test_min_grows_first_allocation() {
        let mut ring = RingBuffer::with_bounds(10, 20);
        ring.enqueue(1u8);
        assert_eq!(ring.capacity(), 10);
    }

    #[test]
    fn test_raising_min_grows_on_next_enqueue() {
        let mut ring = RingBuffer::new();
        ring.extend([1u8, 2]);
        assert_eq!(ring.capacity(), 2);

        ring.set_min(8);
        // Not full, but below min.
        ring.dequeue();
        ring.enqueue(3);
        assert_eq!(ring.capacity(), 8);
        assert_eq!(drain(&mut ring), vec![2, 3]);
    }

    #[test]
    fn test_bounded_overwrite_keeps_newest() {
        let mut ring = RingBuffer::with_bounds(0, 5);
        ring.extend(1..=8u32);

        let stats = ring.stats();
        assert_eq!(stats.len, 5);
        assert_eq!(stats.cap, 5);
        assert_eq!(stats.dropped, 3);
        assert_eq!(stats.enqueued, 8);
        assert_eq!(drain(&mut ring), vec![4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_inverted_bounds_never_drop() {
        let mut ring = RingBuffer::with_bounds(10, 5);
        ring.extend(0..100u32);
        assert_eq!(ring.len(), 100);
        assert_eq!(ring.stats().dropped, 0);
    }

    #[test]
    fn test_dequeue_shrinks_down_to_min() {
        let mut ring = RingBuffer::with_bounds(10, 0);
        ring.extend(0..17u32);
        assert_eq!(ring.capacity(), 17);

        while ring.len() > 1 {
            ring.dequeue();
        }
        assert_eq!(ring.capacity(), 10);
        assert!(ring.stats().shrunk >= 1);
        assert_eq!(ring.dequeue(), Some(16));
        assert_eq!(ring.capacity(), 10);
    }

    #[test]
    fn test_no_shrink_without_min() {
        let mut ring = RingBuffer::new();
        ring.extend(0..100u32);
        let cap = ring.capacity();
        drain(&mut ring);
        assert_eq!(ring.capacity(), cap);
        assert_eq!(ring.stats().shrunk, 0);
    }

    #[test]
    fn test_alternating_pairs_do_not_reallocate() {
        let mut ring = RingBuffer::with_bounds(4, 0);
        ring.extend(0..6u32);
        assert_eq!(ring.capacity(), 8);
        let allocs = ring.stats().allocs;

        for i in 0..1000u32 {
            ring.enqueue(i);
            ring.dequeue();
        }
        assert_eq!(ring.stats().allocs, allocs);
    }

    #[test]
    fn test_restore_returns_item_to_front() {
        let mut ring = RingBuffer::new();
        ring.extend(0..4u32);
        let first = ring.dequeue();
        assert_eq!(first, Some(0));
        assert_eq!(ring.stats().dequeued, 1);

        ring.restore(0);
        assert_eq!(ring.peek(), Some(&0));
        assert_eq!(ring.stats().dequeued, 0);
        assert_eq!(drain(&mut ring), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_restore_across_wrap_and_growth() {
        let mut ring = RingBuffer::new();
        ring.extend(0..5u32);
        assert_eq!(ring.capacity(), 5);
        // Move start away from slot 0, then refill so the ring is full.
        ring.dequeue();
        ring.dequeue();
        ring.extend(5..7u32);
        assert_eq!(ring.len(), 5);

        ring.restore(1);
        assert!(ring.capacity() > 5);
        assert_eq!(drain(&mut ring), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_restore_into_empty_ring() {
        let mut ring = RingBuffer::new();
        ring.enqueue(7u32);
        ring.dequeue();
        ring.restore(7);
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.dequeue(), Some(7));
    }

    #[test]
    fn test_restore_into_full_bounded_ring_drops_it() {
        let mut ring = RingBuffer::with_bounds(0, 3);
        ring.extend(0..3u32);
        let oldest = ring.dequeue();
        ring.enqueue(3);

        ring.restore(oldest.unwrap_or_default());
        let stats = ring.stats();
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.dequeued, 0);
        assert_eq!(drain(&mut ring), vec![1, 2, 3]);
    }

    #[test]
    fn test_clear_reallocates_to_min() {
        let mut ring = RingBuffer::with_bounds(4, 0);
        ring.extend(0..30u32);
        assert!(ring.capacity() > 4);

        assert_eq!(ring.clear(), 30);
        assert_eq!(ring.capacity(), 4);
        assert!(ring.is_empty());
        assert_eq!(ring.stats().dequeued, 30);
    }

    #[test]
    fn test_clear_keeps_storage_without_min() {
        let mut ring = RingBuffer::new();
        ring.extend(0..7u32);
        let cap = ring.capacity();
        let allocs = ring.stats().allocs;

        assert_eq!(ring.clear(), 7);
        assert_eq!(ring.capacity(), cap);
        assert_eq!(ring.stats().allocs, allocs);
        assert_eq!(ring.peek(), None);
    }

    #[test]
    fn test_clear_empty_at_min_is_noop() {
        let mut ring: RingBuffer<u32> = RingBuffer::with_bounds(4, 0);
        ring.grow(0);
        assert_eq!(ring.capacity(), 4);
        let before = ring.stats();

        assert_eq!(ring.clear(), 0);
        assert_eq!(ring.clear(), 0);
        assert_eq!(ring.stats(), before);
    }

    #[test]
    fn test_clear_round_trip() {
        let mut ring = RingBuffer::new();
        ring.extend(0..6u32);
        ring.clear();
        ring.extend(0..6u32);

        let stats = ring.stats();
        assert_eq!(stats.enqueued, 12);
        assert_eq!(stats.dequeued, 6);
        assert_eq!(stats.len, 6);
    }

    #[test]
    fn test_grow_and_shrink_explicit() {
        let mut ring = RingBuffer::new();
        ring.extend(0..3u32);

        ring.grow(10);
        assert_eq!(ring.capacity(), 13);
        // Already satisfied
        ring.grow(4);
        assert_eq!(ring.capacity(), 13);

        ring.shrink(1);
        assert_eq!(ring.capacity(), 4);
        // Already satisfied
        ring.shrink(5);
        assert_eq!(ring.capacity(), 4);

        assert_eq!(drain(&mut ring), vec![0, 1, 2]);
    }

    #[test]
    fn test_shrink_zero_respects_min_and_len() {
        let mut ring = RingBuffer::with_bounds(10, 20);
        ring.extend(0..15u32);
        assert!((10..=20).contains(&ring.capacity()));

        ring.shrink(0);
        assert_eq!(ring.capacity(), 15);
    }

    #[test]
    fn test_with_capacity_counts_allocation() {
        let ring: RingBuffer<u8> = RingBuffer::with_capacity(16);
        let stats = ring.stats();
        assert_eq!(stats.cap, 16);
        assert_eq!(stats.allocs, 1);
        assert_eq!(stats.grown, 1);
    }

    #[test]
    fn test_write_stats() {
        let mut ring = RingBuffer::new();
        ring.enqueue('a');
        let mut stats = Stats::new();
        ring.write_stats(&mut stats);
        assert_eq!(stats, ring.stats());
        assert_eq!(stats.len, 1);
    }

    #[test]
    fn test_iter_and_debug_follow_logical_order() {
        let mut ring = RingBuffer::with_bounds(0, 3);
        ring.extend([1, 2, 3, 4]);
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);

        let rendered = format!("{:?}", ring);
        assert!(rendered.contains("items: [2, 3, 4]"), "{}", rendered);
    }

    #[test]
    fn test_dequeue_releases_items() {
        use std::rc::Rc;

        let tracked = Rc::new(());
        let mut ring = RingBuffer::new();
        ring.enqueue(Rc::clone(&tracked));
        ring.enqueue(Rc::clone(&tracked));
        assert_eq!(Rc::strong_count(&tracked), 3);

        drop(ring.dequeue());
        assert_eq!(Rc::strong_count(&tracked), 2);

        ring.clear();
        assert_eq!(Rc::strong_count(&tracked), 1);
    }

    #[test]
    fn test_overwrite_releases_oldest() {
        use std::rc::Rc;

        let first = Rc::new(1);
        let mut ring = RingBuffer::with_bounds(0, 1);
        ring.enqueue(Rc::clone(&first));
        ring.enqueue(Rc::new(2));
        assert_eq!(Rc::strong_count(&first), 1);
        assert_eq!(ring.peek().map(|v| **v), Some(2));
    }
}
