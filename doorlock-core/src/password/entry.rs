//! Keypad password entry on the HMI node

use heapless::Vec;

use super::lifecycle::Password;
use crate::config::{MASK_CHAR, PASSWORD_LEN};
use crate::traits::{CharDisplay, Key, Keypad};

/// Errors while reading a password from the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EntryError<K, D> {
    Keypad(K),
    Display(D),
}

/// Effect of one key press on an entry in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EntryProgress {
    /// Key not accepted at this point
    Ignored,
    /// Digit stored; echo the mask
    Digit,
    /// All digits stored; waiting for Enter
    Full,
    /// Enter after a full entry
    Complete(Password),
}

/// Collects exactly `PASSWORD_LEN` digits followed by Enter
///
/// Non-digit keys are ignored while a digit is expected; once full, every
/// key but Enter is ignored.
#[derive(Debug, Default)]
pub struct PasswordEntry {
    digits: Vec<u8, PASSWORD_LEN>,
}

impl PasswordEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Digits stored so far
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.digits.is_full()
    }

    /// Feed one key press
    pub fn feed(&mut self, key: Key) -> EntryProgress {
        if self.is_full() {
            return match key {
                Key::Enter => match Password::from_digits(&self.digits) {
                    Ok(password) => EntryProgress::Complete(password),
                    Err(_) => EntryProgress::Ignored,
                },
                _ => EntryProgress::Ignored,
            };
        }

        match key.digit() {
            Some(d) if d <= 9 => match self.digits.push(d) {
                Ok(()) if self.is_full() => EntryProgress::Full,
                Ok(()) => EntryProgress::Digit,
                Err(_) => EntryProgress::Ignored,
            },
            _ => EntryProgress::Ignored,
        }
    }
}

/// Read one complete password, echoing a mask per digit at the cursor
pub fn read_password<K, D>(
    keypad: &mut K,
    display: &mut D,
) -> Result<Password, EntryError<K::Error, D::Error>>
where
    K: Keypad,
    D: CharDisplay,
{
    let mut entry = PasswordEntry::new();
    loop {
        let key = keypad.read_key().map_err(EntryError::Keypad)?;
        match entry.feed(key) {
            EntryProgress::Ignored => {}
            EntryProgress::Digit | EntryProgress::Full => {
                display.put_char(MASK_CHAR).map_err(EntryError::Display)?;
            }
            EntryProgress::Complete(password) => return Ok(password),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    struct ScriptedKeys<'a> {
        keys: &'a [Key],
        next: usize,
    }

    impl Keypad for ScriptedKeys<'_> {
        type Error = ();

        fn read_key(&mut self) -> Result<Key, ()> {
            let key = self.keys.get(self.next).copied().ok_or(())?;
            self.next += 1;
            Ok(key)
        }
    }

    #[derive(Default)]
    struct EchoLog {
        echoed: heapless::String<32>,
    }

    impl CharDisplay for EchoLog {
        type Error = Infallible;

        fn show_text(&mut self, _row: u8, _col: u8, _text: &str) -> Result<(), Infallible> {
            Ok(())
        }

        fn clear(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        fn put_char(&mut self, c: char) -> Result<(), Infallible> {
            let _ = self.echoed.push(c);
            Ok(())
        }

        fn move_cursor(&mut self, _row: u8, _col: u8) -> Result<(), Infallible> {
            Ok(())
        }
    }

    #[test]
    fn test_feed_ignores_non_digits() {
        let mut entry = PasswordEntry::new();
        assert_eq!(entry.feed(Key::Enter), EntryProgress::Ignored);
        assert_eq!(entry.feed(Key::Plus), EntryProgress::Ignored);
        assert_eq!(entry.feed(Key::Digit(1)), EntryProgress::Digit);
        assert_eq!(entry.feed(Key::Other('%')), EntryProgress::Ignored);
        assert_eq!(entry.len(), 1);
    }

    #[test]
    fn test_enter_required_after_full() {
        let mut entry = PasswordEntry::new();
        for d in [1, 2, 3, 4] {
            assert_eq!(entry.feed(Key::Digit(d)), EntryProgress::Digit);
        }
        assert_eq!(entry.feed(Key::Digit(5)), EntryProgress::Full);
        // Extra digits are dropped
        assert_eq!(entry.feed(Key::Digit(6)), EntryProgress::Ignored);
        assert_eq!(
            entry.feed(Key::Enter),
            EntryProgress::Complete(Password::new([1, 2, 3, 4, 5]))
        );
    }

    #[test]
    fn test_read_password_masks_digits() {
        let keys = [
            Key::Minus,
            Key::Digit(9),
            Key::Digit(8),
            Key::Enter,
            Key::Digit(7),
            Key::Digit(6),
            Key::Digit(5),
            Key::Digit(0),
            Key::Enter,
        ];
        let mut keypad = ScriptedKeys { keys: &keys, next: 0 };
        let mut display = EchoLog::default();

        let password = read_password(&mut keypad, &mut display).unwrap();
        assert_eq!(password, Password::new([9, 8, 7, 6, 5]));
        assert_eq!(display.echoed.as_str(), "*****");
        assert_eq!(keypad.next, keys.len());
    }

    #[test]
    fn test_keypad_error_propagates() {
        let mut keypad = ScriptedKeys { keys: &[Key::Digit(1)], next: 0 };
        let mut display = EchoLog::default();
        assert_eq!(
            read_password(&mut keypad, &mut display),
            Err(EntryError::Keypad(()))
        );
    }
}
