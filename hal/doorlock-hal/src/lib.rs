//! Doorlock Hardware Abstraction Layer
//!
//! This crate defines the narrow hardware contracts the door-lock nodes are
//! written against. Chip support (embassy-rp, embassy-stm32) implements them
//! in the firmware crates, and host tests implement them with in-memory fakes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Orchestrators (doorlock-core)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  doorlock-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ control node  │       │   HMI node    │
//! │   (RP2040)    │       │  (STM32F042)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial link to the peer node
//! - [`storage::ByteStorage`] - Byte-addressed non-volatile memory
//! - [`timer::PeriodicTimer`] - The compare-match timer driving sequences

#![no_std]
#![deny(unsafe_code)]

pub mod storage;
pub mod timer;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use storage::ByteStorage;
pub use timer::{PeriodicTimer, TimerPeriod};
pub use uart::{DataBits, IoUart, Parity, StopBits, UartConfig, UartRx, UartTx};
