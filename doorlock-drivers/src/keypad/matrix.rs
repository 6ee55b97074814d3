//! 4x4 matrix keypad
//!
//! Rows are driven low one at a time, columns are inputs with pull-ups. A
//! key at (row, col) pulls its column low while its row is driven.
//!
//! ```text
//!        c0  c1  c2  c3
//!   r0    7   8   9   %
//!   r1    4   5   6   *
//!   r2    1   2   3   -
//!   r3  Ent   0   =   +
//! ```

use doorlock_core::traits::{Key, Keypad};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// Labels of the calculator-style 4x4 keypad; `'\r'` is the Enter key
pub const LAYOUT_4X4: [[char; 4]; 4] = [
    ['7', '8', '9', '%'],
    ['4', '5', '6', '*'],
    ['1', '2', '3', '-'],
    ['\r', '0', '=', '+'],
];

/// Row settle time after driving a row, in microseconds
const SETTLE_US: u32 = 5;

/// Pause between scans while waiting for a press or release
const DEBOUNCE_MS: u32 = 20;

/// Errors from the keypad pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeypadError {
    /// A row or column pin could not be accessed
    Pin,
}

/// Matrix keypad scanned over GPIO
pub struct MatrixKeypad<R, C, D> {
    rows: [R; 4],
    cols: [C; 4],
    delay: D,
    layout: [[char; 4]; 4],
}

impl<R, C, D> MatrixKeypad<R, C, D>
where
    R: OutputPin,
    C: InputPin,
    D: DelayNs,
{
    /// Keypad with the default layout, all rows released
    pub fn new(rows: [R; 4], cols: [C; 4], delay: D) -> Result<Self, KeypadError> {
        Self::with_layout(rows, cols, delay, LAYOUT_4X4)
    }

    pub fn with_layout(
        rows: [R; 4],
        cols: [C; 4],
        delay: D,
        layout: [[char; 4]; 4],
    ) -> Result<Self, KeypadError> {
        let mut keypad = Self {
            rows,
            cols,
            delay,
            layout,
        };
        keypad.release_rows()?;
        Ok(keypad)
    }

    /// Scan the matrix once; returns the first pressed key in row order
    pub fn scan(&mut self) -> Result<Option<Key>, KeypadError> {
        for row in 0..self.rows.len() {
            self.rows[row].set_low().map_err(|_| KeypadError::Pin)?;
            self.delay.delay_us(SETTLE_US);

            let mut pressed = None;
            for (col, pin) in self.cols.iter_mut().enumerate() {
                if pin.is_low().map_err(|_| KeypadError::Pin)? {
                    pressed = Some(col);
                    break;
                }
            }

            self.rows[row].set_high().map_err(|_| KeypadError::Pin)?;
            if let Some(col) = pressed {
                return Ok(Some(Key::from_label(self.layout[row][col])));
            }
        }
        Ok(None)
    }

    fn release_rows(&mut self) -> Result<(), KeypadError> {
        for row in self.rows.iter_mut() {
            row.set_high().map_err(|_| KeypadError::Pin)?;
        }
        Ok(())
    }
}

impl<R, C, D> Keypad for MatrixKeypad<R, C, D>
where
    R: OutputPin,
    C: InputPin,
    D: DelayNs,
{
    type Error = KeypadError;

    fn read_key(&mut self) -> Result<Key, KeypadError> {
        let key = loop {
            if let Some(key) = self.scan()? {
                break key;
            }
            self.delay.delay_ms(DEBOUNCE_MS);
        };

        // Wait for release so a held key is reported once
        loop {
            self.delay.delay_ms(DEBOUNCE_MS);
            if self.scan()?.is_none() {
                return Ok(key);
            }
        }
    }
}
