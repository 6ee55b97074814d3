//! Alarm outputs

pub mod buzzer;

pub use buzzer::Buzzer;
