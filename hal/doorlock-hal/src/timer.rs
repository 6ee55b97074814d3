//! Periodic timer abstraction
//!
//! Sequences are timed by a single compare-match timer clocked from the CPU
//! clock through a /1024 prescaler. Periods are kept in counts of that
//! prescaled clock so step tables read like the compare values programmed
//! into the hardware.

/// Prescaled timer clock in millihertz (8 MHz / 1024 = 7812.5 Hz)
pub const TIMER_CLOCK_MILLIHZ: u64 = 7_812_500;

/// Duration between two timer firings, in prescaled clock counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerPeriod {
    counts: u32,
}

impl TimerPeriod {
    /// Shortest programmable period, used to fire a sequence's first step
    pub const IMMEDIATE: Self = Self::from_counts(1);

    /// Longest period a 16-bit compare register can hold
    pub const MAX_16BIT: Self = Self::from_counts(u16::MAX as u32);

    /// Zero-length period
    pub const ZERO: Self = Self::from_counts(0);

    /// Create a period from raw compare counts
    pub const fn from_counts(counts: u32) -> Self {
        Self { counts }
    }

    /// Create a period from milliseconds (rounded down to whole counts)
    pub const fn from_millis(ms: u32) -> Self {
        let counts = (ms as u64 * TIMER_CLOCK_MILLIHZ) / 1_000_000;
        Self::from_counts(counts as u32)
    }

    /// Raw compare counts
    pub const fn as_counts(self) -> u32 {
        self.counts
    }

    /// Period in milliseconds (rounded down)
    pub const fn as_millis(self) -> u32 {
        ((self.counts as u64 * 1_000_000) / TIMER_CLOCK_MILLIHZ) as u32
    }

    /// Period in microseconds (rounded down)
    pub const fn as_micros(self) -> u64 {
        (self.counts as u64 * 1_000_000_000) / TIMER_CLOCK_MILLIHZ
    }

    /// Whether the period has no length
    pub const fn is_zero(self) -> bool {
        self.counts == 0
    }

    /// Subtract, clamping at zero
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self::from_counts(self.counts.saturating_sub(other.counts))
    }

    /// Add, clamping at the maximum
    pub const fn saturating_add(self, other: Self) -> Self {
        Self::from_counts(self.counts.saturating_add(other.counts))
    }
}

/// Compare-match timer that calls back into the sequencer on every firing
///
/// Arming replaces any previous period; the timer keeps firing at the armed
/// period until it is re-armed or disarmed. Firing is delivered by the
/// platform (interrupt handler or interrupt-priority task), not through this
/// trait.
pub trait PeriodicTimer {
    /// Start (or restart) firing every `period`
    fn arm(&mut self, period: TimerPeriod);

    /// Stop firing
    fn disarm(&mut self);

    /// Longest single period the hardware can be armed with
    ///
    /// Longer steps are armed in chunks by the sequencer.
    fn max_period(&self) -> TimerPeriod {
        TimerPeriod::MAX_16BIT
    }
}

impl<T: PeriodicTimer + ?Sized> PeriodicTimer for &mut T {
    fn arm(&mut self, period: TimerPeriod) {
        T::arm(self, period)
    }

    fn disarm(&mut self) {
        T::disarm(self)
    }

    fn max_period(&self) -> TimerPeriod {
        T::max_period(self)
    }
}
