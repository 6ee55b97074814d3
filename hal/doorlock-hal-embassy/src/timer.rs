//! Periodic timer driven through a signal
//!
//! Arming from the main flow or from inside a tick only posts a command;
//! the timer task owns the actual deadline.

use doorlock_hal::{PeriodicTimer, TimerPeriod};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Request sent to the timer task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerCommand {
    Arm(TimerPeriod),
    Disarm,
}

/// Mailbox between [`SignalTimer`] and the timer task; the last command wins
pub type TimerSignal = Signal<CriticalSectionRawMutex, TimerCommand>;

/// [`PeriodicTimer`] that forwards to the timer task
#[derive(Clone, Copy)]
pub struct SignalTimer<'a> {
    signal: &'a TimerSignal,
}

impl<'a> SignalTimer<'a> {
    pub const fn new(signal: &'a TimerSignal) -> Self {
        Self { signal }
    }
}

impl PeriodicTimer for SignalTimer<'_> {
    fn arm(&mut self, period: TimerPeriod) {
        self.signal.signal(TimerCommand::Arm(period));
    }

    fn disarm(&mut self) {
        self.signal.signal(TimerCommand::Disarm);
    }
}
