//! Collaborator traits
//!
//! These traits define the interface between the application logic and the
//! actuators and human interface of each node.

pub mod alarm;
pub mod display;
pub mod keypad;
pub mod motor;

pub use alarm::{Alarm, AlarmError};
pub use display::{CharDisplay, DISPLAY_COLUMNS, DISPLAY_ROWS};
pub use keypad::{Key, Keypad};
pub use motor::{Motor, MotorDirection, MotorError};
