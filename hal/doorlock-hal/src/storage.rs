//! Non-volatile byte storage abstractions
//!
//! The control node keeps its password in a small external EEPROM addressed
//! byte by byte. Wear levelling and integrity checking are out of scope; the
//! device is written only when the password changes.

/// Errors from byte storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Bus transaction failed (NACK, arbitration, ...)
    Bus,
    /// Address is outside the device
    OutOfRange,
}

/// Byte-addressed non-volatile memory
///
/// Implementations perform a single bus transaction per call. Any settle
/// time the part needs after a write is the caller's responsibility.
pub trait ByteStorage {
    /// Error type for storage operations
    type Error;

    /// Read the byte stored at `address`
    fn read_byte(&mut self, address: u16) -> Result<u8, Self::Error>;

    /// Write `value` at `address`
    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), Self::Error>;
}

impl<T: ByteStorage + ?Sized> ByteStorage for &mut T {
    type Error = T::Error;

    fn read_byte(&mut self, address: u16) -> Result<u8, Self::Error> {
        T::read_byte(self, address)
    }

    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), Self::Error> {
        T::write_byte(self, address, value)
    }
}
