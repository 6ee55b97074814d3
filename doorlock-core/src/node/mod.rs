//! Per-node orchestrators
//!
//! Each orchestrator owns its link and collaborators and performs the work
//! of one state per call to `step()`. Firmware calls `step()` in a loop and
//! logs the returned transition or error.

pub mod control;
pub mod hmi;

pub use control::{ControlError, ControlNode};
pub use hmi::{HmiError, HmiNode, NodeError};
