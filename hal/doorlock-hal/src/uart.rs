//! UART serial communication abstractions
//!
//! The inter-node link is byte oriented with no framing, so the traits only
//! deal in single bytes and small slices.

use embedded_io::{Read, ReadReady, Write};

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Write a single byte
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.write_blocking(&[byte])
    }
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read one byte if one has already arrived
    ///
    /// Returns `Ok(None)` immediately when the receive buffer is empty.
    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error>;
}

/// Combined UART interface
///
/// For UARTs that provide both TX and RX on a single peripheral.
pub trait Uart: UartTx + UartRx {}

// Blanket implementation
impl<T: UartTx + UartRx> Uart for T {}

/// Adapter from an `embedded-io` serial port to the doorlock UART traits
///
/// Works with any buffered UART that can report whether a read would block,
/// which covers the embassy buffered UART drivers.
pub struct IoUart<T> {
    inner: T,
}

impl<T> IoUart<T> {
    /// Wrap a serial port
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Release the wrapped serial port
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Write> UartTx for IoUart<T> {
    type Error = T::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}

impl<T: Read + ReadReady> UartRx for IoUart<T> {
    type Error = T::Error;

    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        if !self.inner.read_ready()? {
            return Ok(None);
        }
        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy)]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    /// The fixed 9600 8N1 link both nodes are built for
    fn default() -> Self {
        Self {
            baudrate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per frame
///
/// Frames carry one byte at most.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}
