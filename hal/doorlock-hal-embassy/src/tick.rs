//! Timer task body
//!
//! Waits for the armed deadline, fires the sequencer, and picks up the
//! period the sequencer re-armed itself with. A re-arm made inside a tick
//! counts from the firing's deadline, not from when the tick finished, so
//! step periods do not accumulate task latency.

use doorlock_core::sequencer::{ActionSink, TickOutcome};
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Timer};
use portable_atomic::{AtomicU32, Ordering};

use crate::runner::SequencerCell;
use crate::timer::TimerCommand;

static FIRINGS: AtomicU32 = AtomicU32::new(0);

/// Timer firings since boot
pub fn firings() -> u32 {
    FIRINGS.load(Ordering::Relaxed)
}

/// Deadline and repeat period of the armed timer
type Armed = Option<(Instant, Duration)>;

fn schedule(command: TimerCommand, base: Instant) -> Armed {
    match command {
        TimerCommand::Arm(period) => {
            let period = Duration::from_micros(period.as_micros());
            Some((base + period, period))
        }
        TimerCommand::Disarm => None,
    }
}

/// Serve `cell`'s timer forever, applying actions to `sink`
///
/// `report` sees the outcome of every firing, for logging.
pub async fn run_ticks<A, S, F>(cell: &SequencerCell<A>, sink: &mut S, mut report: F)
where
    A: Copy + 'static,
    S: ActionSink<A>,
    F: FnMut(Result<TickOutcome<A>, S::Error>),
{
    let signal = cell.timer_signal();
    let mut armed: Armed = None;

    loop {
        let fired = match armed {
            None => Either::First(signal.wait().await),
            Some((deadline, _)) => select(signal.wait(), Timer::at(deadline)).await,
        };

        match fired {
            Either::First(command) => armed = schedule(command, Instant::now()),
            Either::Second(()) => {
                let Some((deadline, period)) = armed else {
                    continue;
                };
                // Keeps firing at the same period unless the tick re-arms
                armed = Some((deadline + period, period));
                FIRINGS.fetch_add(1, Ordering::Relaxed);

                let outcome = cell.tick(sink);
                if let Some(command) = signal.try_take() {
                    armed = schedule(command, deadline);
                }
                report(outcome);
            }
        }
    }
}
