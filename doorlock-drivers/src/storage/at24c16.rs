//! AT24C16 16 Kbit I2C EEPROM
//!
//! 2048 bytes in eight 256-byte blocks. The block number (address bits
//! 10..8) travels in the low bits of the device address, the rest as a
//! single word-address byte:
//!
//! ```text
//! device address: 1 0 1 0 A10 A9 A8   (0x50 | address >> 8)
//! word address:   A7..A0
//! ```
//!
//! Each write is a single-byte write; the part needs up to 10 ms per write
//! cycle before it acknowledges again, which the caller provides.

use doorlock_hal::storage::StorageError;
use doorlock_hal::ByteStorage;
use embedded_hal::i2c::I2c;

/// Base 7-bit device address
pub const DEVICE_ADDRESS: u8 = 0x50;

/// Bytes in the device
pub const CAPACITY: u16 = 2048;

/// AT24C16 on a blocking I2C bus
pub struct At24c16<I> {
    i2c: I,
}

impl<I: I2c> At24c16<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Release the bus
    pub fn release(self) -> I {
        self.i2c
    }

    /// Split a memory address into device address and word address
    fn split(address: u16) -> Result<(u8, u8), StorageError> {
        if address >= CAPACITY {
            return Err(StorageError::OutOfRange);
        }
        let block = (address >> 8) as u8;
        Ok((DEVICE_ADDRESS | block, address as u8))
    }
}

impl<I: I2c> ByteStorage for At24c16<I> {
    type Error = StorageError;

    fn read_byte(&mut self, address: u16) -> Result<u8, StorageError> {
        let (device, word) = Self::split(address)?;
        let mut value = [0u8];
        self.i2c
            .write_read(device, &[word], &mut value)
            .map_err(|_| StorageError::Bus)?;
        Ok(value[0])
    }

    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), StorageError> {
        let (device, word) = Self::split(address)?;
        self.i2c
            .write(device, &[word, value])
            .map_err(|_| StorageError::Bus)
    }
}
