//! Non-volatile storage drivers

pub mod at24c16;

pub use at24c16::At24c16;
