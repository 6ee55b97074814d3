//! Keypad trait for the HMI node

/// One decoded key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// Digit 0-9
    Digit(u8),
    /// Terminates a password entry
    Enter,
    /// Menu: open the door
    Plus,
    /// Menu: change the password
    Minus,
    /// Any other labelled key
    Other(char),
}

impl Key {
    /// Digit value, if this is a digit key
    pub const fn digit(self) -> Option<u8> {
        match self {
            Key::Digit(d) => Some(d),
            _ => None,
        }
    }

    /// Decode a keypad label
    pub const fn from_label(label: char) -> Self {
        match label {
            '0'..='9' => Key::Digit(label as u8 - b'0'),
            '\r' => Key::Enter,
            '+' => Key::Plus,
            '-' => Key::Minus,
            other => Key::Other(other),
        }
    }
}

/// Blocking keypad
pub trait Keypad {
    /// Error type for keypad scanning
    type Error;

    /// Block until a key is pressed and released
    fn read_key(&mut self) -> Result<Key, Self::Error>;
}

impl<T: Keypad + ?Sized> Keypad for &mut T {
    type Error = T::Error;

    fn read_key(&mut self) -> Result<Key, Self::Error> {
        T::read_key(self)
    }
}
