//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in doorlock-core and doorlock-hal on top of embedded-hal 1.0:
//!
//! - H-bridge DC door motor (two direction pins and a PWM enable)
//! - GPIO buzzer
//! - AT24C16 I2C EEPROM
//! - 4x4 matrix keypad
//! - HD44780 character LCD in 4-bit mode

#![no_std]
#![deny(unsafe_code)]

pub mod alarm;
pub mod keypad;
pub mod lcd;
pub mod motor;
pub mod storage;
