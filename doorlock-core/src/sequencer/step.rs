//! Step table entries

use doorlock_hal::TimerPeriod;

/// One entry of a step table
///
/// `period` must elapse after the previous step (or after start, for the
/// first step) before this step fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step<A> {
    pub period: TimerPeriod,
    /// `None` holds the previous outputs
    pub action: Option<A>,
}

impl<A> Step<A> {
    /// Step that performs `action`
    pub const fn apply(period: TimerPeriod, action: A) -> Self {
        Self {
            period,
            action: Some(action),
        }
    }

    /// Step that only waits
    pub const fn hold(period: TimerPeriod) -> Self {
        Self {
            period,
            action: None,
        }
    }

    pub const fn is_hold(&self) -> bool {
        self.action.is_none()
    }
}

/// Receiver of sequence actions, called from the timer context
pub trait ActionSink<A> {
    type Error;

    fn apply(&mut self, action: A) -> Result<(), Self::Error>;

    /// Put the outputs in their resting state after an aborted sequence
    fn halt(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<A, T: ActionSink<A> + ?Sized> ActionSink<A> for &mut T {
    type Error = T::Error;

    fn apply(&mut self, action: A) -> Result<(), Self::Error> {
        T::apply(self, action)
    }

    fn halt(&mut self) -> Result<(), Self::Error> {
        T::halt(self)
    }
}

/// Sum of all step periods
pub const fn total_duration<A>(table: &[Step<A>]) -> TimerPeriod {
    let mut total = TimerPeriod::ZERO;
    let mut i = 0;
    while i < table.len() {
        total = total.saturating_add(table[i].period);
        i += 1;
    }
    total
}
