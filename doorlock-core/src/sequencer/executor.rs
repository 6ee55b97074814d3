//! Sequencer state and tick handling
//!
//! The sequencer owns its tick counter and table position. It is started
//! from the main flow and advanced only by [`Sequencer::tick`], which the
//! platform calls on every timer firing.

use doorlock_hal::{PeriodicTimer, TimerPeriod};

use super::step::{ActionSink, Step};

/// Sequencer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerError {
    /// A sequence is still running
    Busy,
}

/// What one timer firing did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome<A> {
    /// No sequence active; the firing was spurious
    Inactive,
    /// Intermediate chunk of a step longer than the timer can hold
    Chunk,
    /// Step `index` fired
    Fired {
        index: usize,
        action: Option<A>,
        /// This was the final step
        complete: bool,
    },
    /// An aborted sequence ended and the sink was halted
    Halted,
}

/// Walks a step table one timer firing at a time
pub struct Sequencer<A: 'static> {
    table: &'static [Step<A>],
    /// Next step to fire; equals `table.len()` once complete
    index: usize,
    ticks: u32,
    /// Part of the current step's period not yet armed
    remaining: TimerPeriod,
    /// The next firing ends the sequence
    halting: bool,
}

impl<A: Copy + 'static> Default for Sequencer<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Copy + 'static> Sequencer<A> {
    /// Create an idle sequencer
    pub const fn new() -> Self {
        Self {
            table: &[],
            index: 0,
            ticks: 0,
            remaining: TimerPeriod::ZERO,
            halting: false,
        }
    }

    /// Begin `table`, arming the timer with the first step's period
    pub fn start<T: PeriodicTimer>(
        &mut self,
        table: &'static [Step<A>],
        timer: &mut T,
    ) -> Result<(), SequencerError> {
        if self.is_active() {
            return Err(SequencerError::Busy);
        }

        self.table = table;
        self.index = 0;
        self.ticks = 0;
        self.halting = false;
        match table.first() {
            Some(first) => {
                self.remaining = first.period;
                self.arm_chunk(timer);
            }
            None => {
                self.remaining = TimerPeriod::ZERO;
                timer.disarm();
            }
        }
        Ok(())
    }

    /// Handle one timer firing
    ///
    /// The position advances and the timer is re-armed before the action is
    /// applied, so a failing sink never stalls the sequence.
    pub fn tick<T, S>(&mut self, timer: &mut T, sink: &mut S) -> Result<TickOutcome<A>, S::Error>
    where
        T: PeriodicTimer,
        S: ActionSink<A>,
    {
        let Some(step) = self.table.get(self.index).copied() else {
            timer.disarm();
            return Ok(TickOutcome::Inactive);
        };

        self.ticks = self.ticks.wrapping_add(1);

        if self.halting {
            self.halting = false;
            self.index = self.table.len();
            self.remaining = TimerPeriod::ZERO;
            timer.disarm();
            sink.halt()?;
            return Ok(TickOutcome::Halted);
        }

        if !self.remaining.is_zero() {
            self.arm_chunk(timer);
            return Ok(TickOutcome::Chunk);
        }

        let index = self.index;
        self.index += 1;
        match self.table.get(self.index) {
            Some(next) => {
                self.remaining = next.period;
                self.arm_chunk(timer);
            }
            None => timer.disarm(),
        }

        if let Some(action) = step.action {
            sink.apply(action)?;
        }

        Ok(TickOutcome::Fired {
            index,
            action: step.action,
            complete: self.is_complete(),
        })
    }

    /// Cut the running sequence short
    ///
    /// The timer is re-armed to fire at once; that firing skips the remaining
    /// steps and calls [`ActionSink::halt`]. Does nothing when idle.
    pub fn abort<T: PeriodicTimer>(&mut self, timer: &mut T) {
        if self.is_active() {
            self.halting = true;
            self.remaining = TimerPeriod::ZERO;
            timer.arm(TimerPeriod::IMMEDIATE);
        }
    }

    /// Arm the next slice of the current step's period
    fn arm_chunk<T: PeriodicTimer>(&mut self, timer: &mut T) {
        let max = timer.max_period();
        let chunk = if self.remaining > max {
            max
        } else {
            self.remaining
        };
        let chunk = if chunk.is_zero() {
            TimerPeriod::IMMEDIATE
        } else {
            chunk
        };
        self.remaining = self.remaining.saturating_sub(chunk);
        timer.arm(chunk);
    }

    /// The table has been walked to the end
    pub fn is_complete(&self) -> bool {
        self.index == self.table.len()
    }

    /// A sequence has been started and not finished
    pub fn is_active(&self) -> bool {
        !self.is_complete()
    }

    /// Firings seen since the last start
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Index of the next step to fire
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn table(&self) -> &'static [Step<A>] {
        self.table
    }
}
