//! Keypad drivers

pub mod matrix;

pub use matrix::{KeypadError, MatrixKeypad, LAYOUT_4X4};
