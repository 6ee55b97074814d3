//! Tick-driven action sequencer
//!
//! A sequence is a fixed table of steps. Once started, every timer firing
//! advances the sequencer by one tick; a step fires when its period has
//! elapsed, performs its action (if any) and re-arms the timer with the
//! next step's period. The main flow only starts sequences and polls for
//! completion.

pub mod executor;
pub mod sinks;
pub mod step;
pub mod tables;
pub mod wait;

pub use executor::{Sequencer, SequencerError, TickOutcome};
pub use sinks::{ActuatorError, ControlActuators, ScreenSink};
pub use step::{total_duration, ActionSink, Step};
pub use tables::{ControlAction, ScreenAction, Sequence};
pub use wait::{
    completion_budget_ms, finish_or_abort, wait_for_completion, SequenceRunner, SequenceTimeout,
};
