//! Main-flow side of a running sequence

use doorlock_protocol::WaitPolicy;
use embedded_hal::delay::DelayNs;

use super::executor::SequencerError;
use super::step::{total_duration, Step};

/// Handle the main flow uses to start a sequence and watch it finish
///
/// The ticking itself happens elsewhere (timer interrupt or tick task).
pub trait SequenceRunner {
    /// Action type of the tables this runner accepts
    type Action: 'static;

    /// Start `table`; fails if a sequence is still running
    fn start(&mut self, table: &'static [Step<Self::Action>]) -> Result<(), SequencerError>;

    /// Whether the last started sequence has fired its final step
    fn is_complete(&self) -> bool;

    /// Cut the running sequence short and halt its outputs
    ///
    /// Completion is still reported through [`is_complete`](Self::is_complete)
    /// once the halt has taken effect.
    fn abort(&mut self);
}

impl<T: SequenceRunner + ?Sized> SequenceRunner for &mut T {
    type Action = T::Action;

    fn start(&mut self, table: &'static [Step<Self::Action>]) -> Result<(), SequencerError> {
        T::start(self, table)
    }

    fn is_complete(&self) -> bool {
        T::is_complete(self)
    }

    fn abort(&mut self) {
        T::abort(self)
    }
}

/// The sequence did not complete within its budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceTimeout {
    pub waited_ms: u32,
}

/// Nominal duration of `table` plus `margin_ms`
pub fn completion_budget_ms<A>(table: &[Step<A>], margin_ms: u32) -> u32 {
    total_duration(table).as_millis().saturating_add(margin_ms)
}

/// Poll `runner` until it completes
///
/// Returns the time waited, rounded up to whole poll intervals.
pub fn wait_for_completion<R, D>(
    runner: &R,
    delay: &mut D,
    policy: WaitPolicy,
    poll_ms: u32,
) -> Result<u32, SequenceTimeout>
where
    R: SequenceRunner + ?Sized,
    D: DelayNs,
{
    let poll_ms = poll_ms.max(1);
    let mut waited_ms: u32 = 0;
    loop {
        if runner.is_complete() {
            return Ok(waited_ms);
        }
        if let WaitPolicy::Within(budget) = policy {
            if waited_ms >= budget {
                return Err(SequenceTimeout { waited_ms });
            }
        }
        delay.delay_ms(poll_ms);
        waited_ms = waited_ms.saturating_add(poll_ms);
    }
}

/// Start-to-finish wait for a sequence with a `budget_ms` limit
///
/// A sequence still running when the budget is spent is aborted and given
/// `margin_ms` more to halt. The timeout is reported either way, so the
/// caller treats the run as failed with its outputs at rest.
pub fn finish_or_abort<R, D>(
    runner: &mut R,
    delay: &mut D,
    budget_ms: u32,
    margin_ms: u32,
    poll_ms: u32,
) -> Result<u32, SequenceTimeout>
where
    R: SequenceRunner + ?Sized,
    D: DelayNs,
{
    match wait_for_completion(&*runner, delay, WaitPolicy::Within(budget_ms), poll_ms) {
        Ok(waited_ms) => Ok(waited_ms),
        Err(timeout) => {
            runner.abort();
            let _ = wait_for_completion(&*runner, delay, WaitPolicy::Within(margin_ms), poll_ms);
            Err(timeout)
        }
    }
}
