/// Usage counters for a [`RingBuffer`](crate::RingBuffer).
///
/// `len` and `cap` are refreshed whenever a snapshot is taken; the remaining
/// fields are monotonic counters over the lifetime of the ring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    /// Items currently stored.
    pub len: usize,
    /// Slots in the current backing storage.
    pub cap: usize,
    /// Reallocations that increased capacity.
    pub grown: u64,
    /// Reallocations that decreased capacity.
    pub shrunk: u64,
    /// Backing storage allocations of any kind.
    pub allocs: u64,
    /// Items accepted by `enqueue`, including ones later overwritten.
    pub enqueued: u64,
    /// Items removed by `dequeue` or `clear`.
    pub dequeued: u64,
    /// Items overwritten by the drop-oldest policy.
    pub dropped: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }
}
