//! Board-agnostic core logic for the doorlock nodes
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (motor, alarm, character display, keypad)
//! - Password lifecycle (creation, persistence, verification)
//! - Tick-driven action sequencer and the fixed step tables
//! - Node state machine
//! - The control-node and HMI-node orchestrators
//! - Compile-time configuration

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod node;
pub mod password;
pub mod sequencer;
pub mod state;
pub mod traits;
