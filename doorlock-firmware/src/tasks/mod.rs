//! Embassy tasks

mod tick;

pub use tick::{tick_task, SEQUENCER};
