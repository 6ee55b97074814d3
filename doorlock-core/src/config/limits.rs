//! Fixed system constants

/// Number of digits in a password
pub const PASSWORD_LEN: usize = 5;

/// Failed attempts allowed per verification round
pub const MAX_TRIALS: u8 = 3;

/// First EEPROM address of the stored password
pub const PASSWORD_BASE_ADDRESS: u16 = 0x0310;

/// Settle time after every EEPROM byte write
pub const EEPROM_WRITE_SETTLE_MS: u32 = 10;

/// Door motor duty while opening and closing (percent)
pub const MOTOR_SPEED_PERCENT: u8 = 100;

/// Inter-node link baud rate
pub const LINK_BAUDRATE: u32 = 9600;

/// Slack added to a sequence's nominal duration before it is declared stuck
pub const SEQUENCE_MARGIN_MS: u32 = 2_000;

/// Interval at which the main flow polls for sequence completion
pub const SEQUENCE_POLL_MS: u32 = 10;

/// Mask echoed on the display for every entered digit
pub const MASK_CHAR: char = '*';
