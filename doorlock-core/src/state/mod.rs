//! Node state machine
//!
//! Both nodes walk the same states; what each does inside a state differs.
//! The machine is explicit, finite and deterministic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{State, Transition};
