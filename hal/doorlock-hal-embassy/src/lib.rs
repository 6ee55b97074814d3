//! Embassy glue shared by both doorlock firmwares
//!
//! The node main flows are blocking and run in thread mode. Sequences are
//! ticked by an async task on a higher-priority interrupt executor, which
//! preempts the main flow the way a compare-match interrupt would:
//!
//! - [`timer`]: `PeriodicTimer` backed by a command signal
//! - [`tick`]: the timer task that fires the sequencer
//! - [`runner`]: sequencer shared between the main flow and the timer task
//! - [`display`]: character display shared the same way

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod runner;
pub mod tick;
pub mod timer;

pub use display::{DisplayCell, SharedDisplay};
pub use runner::{SequencerCell, SequencerHandle};
pub use tick::{firings, run_ticks};
pub use timer::{SignalTimer, TimerCommand, TimerSignal};
