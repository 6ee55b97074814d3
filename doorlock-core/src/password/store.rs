//! Persistent password storage on the control node

use doorlock_hal::ByteStorage;
use embedded_hal::delay::DelayNs;

use super::lifecycle::{Password, Verdict};
use crate::config::{EEPROM_WRITE_SETTLE_MS, PASSWORD_BASE_ADDRESS, PASSWORD_LEN};

/// Errors from the password store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError<E> {
    /// The storage device failed at this address
    Storage { address: u16, error: E },
}

/// Password kept in consecutive bytes of non-volatile storage
pub struct PasswordStore<S, D> {
    storage: S,
    delay: D,
    base: u16,
}

impl<S, D> PasswordStore<S, D>
where
    S: ByteStorage,
    D: DelayNs,
{
    /// Store at the default base address
    pub fn new(storage: S, delay: D) -> Self {
        Self::at(storage, delay, PASSWORD_BASE_ADDRESS)
    }

    /// Store at an explicit base address
    pub fn at(storage: S, delay: D, base: u16) -> Self {
        Self {
            storage,
            delay,
            base,
        }
    }

    pub fn base_address(&self) -> u16 {
        self.base
    }

    /// Overwrite the stored password
    ///
    /// Every byte write is followed by the part's settle time.
    pub fn persist(&mut self, password: &Password) -> Result<(), StoreError<S::Error>> {
        for (offset, &byte) in password.as_bytes().iter().enumerate() {
            let address = self.base.wrapping_add(offset as u16);
            self.storage
                .write_byte(address, byte)
                .map_err(|error| StoreError::Storage { address, error })?;
            self.delay.delay_ms(EEPROM_WRITE_SETTLE_MS);
        }
        Ok(())
    }

    /// Read the stored password
    pub fn load(&mut self) -> Result<Password, StoreError<S::Error>> {
        let mut bytes = [0u8; PASSWORD_LEN];
        for (offset, slot) in bytes.iter_mut().enumerate() {
            let address = self.base.wrapping_add(offset as u16);
            *slot = self
                .storage
                .read_byte(address)
                .map_err(|error| StoreError::Storage { address, error })?;
        }
        Ok(Password::new(bytes))
    }

    /// Compare a candidate against the stored password
    pub fn verify(&mut self, candidate: &Password) -> Result<Verdict, StoreError<S::Error>> {
        let stored = self.load()?;
        Ok(candidate.verify(&stored))
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Release the storage device and delay
    pub fn into_parts(self) -> (S, D) {
        (self.storage, self.delay)
    }
}
