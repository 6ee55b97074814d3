//! HD44780 character LCD, 4-bit interface, 2x16
//!
//! Write-only wiring: RS, E and D4..D7; RW is tied low. Every byte goes out
//! as two nibbles, high nibble first, each latched on the falling edge of E.
//!
//! Start-up sequence:
//!
//! | Command | Meaning                              |
//! |---------|--------------------------------------|
//! | 0x33    | wake up in 8-bit mode (twice)         |
//! | 0x32    | switch to 4-bit mode                  |
//! | 0x28    | 4-bit, two lines, 5x8 font            |
//! | 0x0C    | display on, cursor off                |
//! | 0x01    | clear                                 |

use doorlock_core::traits::{CharDisplay, DISPLAY_COLUMNS, DISPLAY_ROWS};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

const CMD_CLEAR: u8 = 0x01;
const CMD_WAKE: u8 = 0x33;
const CMD_FOUR_BIT: u8 = 0x32;
const CMD_FUNCTION_2LINE: u8 = 0x28;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM address of the first character of each row
const ROW_OFFSETS: [u8; DISPLAY_ROWS as usize] = [0x00, 0x40];

/// Errors from the LCD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError {
    /// A control or data pin could not be driven
    Pin,
    /// Row or column outside the 2x16 panel
    Position,
}

/// HD44780 over six GPIO pins
pub struct Hd44780<P, D> {
    rs: P,
    en: P,
    data: [P; 4],
    delay: D,
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    /// Take the pins and run the start-up sequence
    ///
    /// `data` is D4..D7 in that order.
    pub fn new(rs: P, en: P, data: [P; 4], delay: D) -> Result<Self, LcdError> {
        let mut lcd = Self {
            rs,
            en,
            data,
            delay,
        };
        lcd.init()?;
        Ok(lcd)
    }

    fn init(&mut self) -> Result<(), LcdError> {
        // Power-on settle
        self.delay.delay_ms(40);
        self.en.set_low().map_err(|_| LcdError::Pin)?;
        for command in [CMD_WAKE, CMD_FOUR_BIT, CMD_FUNCTION_2LINE, CMD_DISPLAY_ON] {
            self.command(command)?;
        }
        self.clear_display()
    }

    /// Send an instruction byte
    pub fn command(&mut self, command: u8) -> Result<(), LcdError> {
        self.rs.set_low().map_err(|_| LcdError::Pin)?;
        self.write_byte(command)?;
        self.delay.delay_us(50);
        Ok(())
    }

    /// Write a byte to DDRAM at the cursor
    pub fn data(&mut self, value: u8) -> Result<(), LcdError> {
        self.rs.set_high().map_err(|_| LcdError::Pin)?;
        self.write_byte(value)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn clear_display(&mut self) -> Result<(), LcdError> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    fn write_byte(&mut self, value: u8) -> Result<(), LcdError> {
        self.write_nibble(value >> 4)?;
        self.write_nibble(value & 0x0F)
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), LcdError> {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            pin.set_state((nibble & (1 << bit) != 0).into())
                .map_err(|_| LcdError::Pin)?;
        }
        self.en.set_high().map_err(|_| LcdError::Pin)?;
        self.delay.delay_us(1);
        self.en.set_low().map_err(|_| LcdError::Pin)?;
        self.delay.delay_us(1);
        Ok(())
    }

    /// Glyph code for `c`; characters outside ASCII show as '?'
    fn glyph(c: char) -> u8 {
        if c.is_ascii() {
            c as u8
        } else {
            b'?'
        }
    }
}

impl<P: OutputPin, D: DelayNs> CharDisplay for Hd44780<P, D> {
    type Error = LcdError;

    fn show_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), LcdError> {
        self.move_cursor(row, col)?;
        // The controller wraps into hidden DDRAM; cut at the panel edge
        let room = usize::from(DISPLAY_COLUMNS - col);
        for c in text.chars().take(room) {
            self.data(Self::glyph(c))?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), LcdError> {
        self.clear_display()
    }

    fn put_char(&mut self, c: char) -> Result<(), LcdError> {
        self.data(Self::glyph(c))
    }

    fn move_cursor(&mut self, row: u8, col: u8) -> Result<(), LcdError> {
        if row >= DISPLAY_ROWS || col >= DISPLAY_COLUMNS {
            return Err(LcdError::Position);
        }
        self.command(CMD_SET_DDRAM | (ROW_OFFSETS[usize::from(row)] + col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::{Cell, RefCell};
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use heapless::Vec;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Write {
        Command(u8),
        Data(u8),
    }

    /// Latches nibbles on the falling edge of E and pairs them into bytes
    #[derive(Default)]
    struct Bus {
        rs: Cell<bool>,
        en: Cell<bool>,
        data: Cell<u8>,
        pending: Cell<Option<u8>>,
        writes: RefCell<Vec<Write, 64>>,
    }

    impl Bus {
        fn latch(&self) {
            let nibble = self.data.get();
            match self.pending.take() {
                None => self.pending.set(Some(nibble)),
                Some(high) => {
                    let byte = (high << 4) | nibble;
                    let write = if self.rs.get() {
                        Write::Data(byte)
                    } else {
                        Write::Command(byte)
                    };
                    self.writes.borrow_mut().push(write).unwrap();
                }
            }
        }

        fn text(&self) -> Vec<u8, 64> {
            self.writes
                .borrow()
                .iter()
                .filter_map(|w| match w {
                    Write::Data(b) => Some(*b),
                    Write::Command(_) => None,
                })
                .collect()
        }
    }

    #[derive(Clone, Copy)]
    enum Line {
        Rs,
        En,
        Data(u8),
    }

    struct BusPin<'a> {
        bus: &'a Bus,
        line: Line,
    }

    impl ErrorType for BusPin<'_> {
        type Error = Infallible;
    }

    impl BusPin<'_> {
        fn drive(&mut self, high: bool) {
            match self.line {
                Line::Rs => self.bus.rs.set(high),
                Line::En => {
                    let was_high = self.bus.en.replace(high);
                    if was_high && !high {
                        self.bus.latch();
                    }
                }
                Line::Data(bit) => {
                    let mask = 1 << bit;
                    let value = self.bus.data.get();
                    self.bus
                        .data
                        .set(if high { value | mask } else { value & !mask });
                }
            }
        }
    }

    impl OutputPin for BusPin<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.drive(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.drive(true);
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn lcd(bus: &Bus) -> Hd44780<BusPin<'_>, NoDelay> {
        let pin = |line| BusPin { bus, line };
        let data = [0, 1, 2, 3].map(|bit| pin(Line::Data(bit)));
        Hd44780::new(pin(Line::Rs), pin(Line::En), data, NoDelay).unwrap()
    }

    #[test]
    fn test_init_sequence() {
        let bus = Bus::default();
        let _lcd = lcd(&bus);

        assert_eq!(
            &bus.writes.borrow()[..],
            &[
                Write::Command(0x33),
                Write::Command(0x32),
                Write::Command(0x28),
                Write::Command(0x0C),
                Write::Command(0x01),
            ]
        );
    }

    #[test]
    fn test_show_text_positions_cursor() {
        let bus = Bus::default();
        let mut lcd = lcd(&bus);
        bus.writes.borrow_mut().clear();

        lcd.show_text(1, 3, "Unlocking").unwrap();

        assert_eq!(bus.writes.borrow()[0], Write::Command(0xC3));
        assert_eq!(&bus.text()[..], b"Unlocking");
    }

    #[test]
    fn test_text_cut_at_panel_edge() {
        let bus = Bus::default();
        let mut lcd = lcd(&bus);
        bus.writes.borrow_mut().clear();

        lcd.show_text(0, 10, "abcdefghij").unwrap();
        assert_eq!(&bus.text()[..], b"abcdef");
    }

    #[test]
    fn test_masked_entry() {
        let bus = Bus::default();
        let mut lcd = lcd(&bus);
        bus.writes.borrow_mut().clear();

        lcd.move_cursor(1, 0).unwrap();
        for _ in 0..5 {
            lcd.put_char('*').unwrap();
        }
        lcd.put_char('é').unwrap();

        assert_eq!(bus.writes.borrow()[0], Write::Command(0xC0));
        assert_eq!(&bus.text()[..], b"*****?");
    }

    #[test]
    fn test_rejects_off_panel_position() {
        let bus = Bus::default();
        let mut lcd = lcd(&bus);

        assert_eq!(lcd.move_cursor(2, 0), Err(LcdError::Position));
        assert_eq!(lcd.show_text(0, 16, "x"), Err(LcdError::Position));
    }
}
