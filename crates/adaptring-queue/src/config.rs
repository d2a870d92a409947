//! Configuration for queue construction.

/// Configuration for an adaptive queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueConfig {
    /// Initial capacity floor of the ring (0 = unset).
    ///
    /// Default: 0
    pub min: usize,

    /// Initial capacity ceiling of the ring (0 = unset).
    ///
    /// Once the ring holds `max` items, each new item overwrites the oldest.
    ///
    /// Default: 0
    pub max: usize,

    /// Slots in the producer hand-off channel in front of the ring.
    ///
    /// Items waiting here are not yet counted in the ring's stats. Values
    /// below 1 are raised to 1.
    ///
    /// Default: 1
    pub input_capacity: usize,

    /// Slots in each of the stats and command channels.
    ///
    /// Values below 1 are raised to 1.
    ///
    /// Default: 1
    pub admin_capacity: usize,
}

impl QueueConfig {
    /// Creates a configuration with the given ring bounds and single-slot channels.
    pub const fn new(min: usize, max: usize) -> Self {
        Self {
            min,
            max,
            input_capacity: 1,
            admin_capacity: 1,
        }
    }

    /// Creates a configuration with no ring bounds: nothing is ever dropped.
    pub const fn unbounded() -> Self {
        Self::new(0, 0)
    }

    /// Creates a drop-oldest configuration holding at most `max` items.
    pub const fn bounded(max: usize) -> Self {
        Self::new(0, max)
    }

    /// Sets the capacity floor.
    pub fn with_min(mut self, min: usize) -> Self {
        self.min = min;
        self
    }

    /// Sets the capacity ceiling.
    pub fn with_max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    /// Sets the producer hand-off channel size.
    pub fn with_input_capacity(mut self, slots: usize) -> Self {
        self.input_capacity = slots;
        self
    }

    /// Sets the stats and command channel size.
    pub fn with_admin_capacity(mut self, slots: usize) -> Self {
        self.admin_capacity = slots;
        self
    }

    #[inline]
    pub(crate) fn input_slots(&self) -> usize {
        self.input_capacity.max(1)
    }

    #[inline]
    pub(crate) fn admin_slots(&self) -> usize {
        self.admin_capacity.max(1)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Unbounded queue, single-slot channels.
pub const UNBOUNDED_CONFIG: QueueConfig = QueueConfig::unbounded();

/// Drop-oldest queue retaining the newest 1024 items, with a 64-slot floor.
pub const DROP_OLDEST_CONFIG: QueueConfig = QueueConfig::new(64, 1024);
