//! Command vocabulary for the doorlock link
//!
//! Command IDs are divided into two categories:
//! - Readiness: each node's "ready for the next byte" sentinel
//! - Dispatch: what the HMI node asks the control node to do

// Readiness
pub const HMI_READY: u8 = 0x10;
pub const CONTROL_READY: u8 = 0x20;

// Dispatch: HMI → control
pub const OPEN_DOOR: u8 = 0x30;
pub const CHANGE_PASSWORD: u8 = 0x40;
pub const WRONG_PASSWORD: u8 = 0x50;

// Verdict replies
pub const REPLY_POSITIVE: u8 = 1;
pub const REPLY_NEGATIVE: u8 = 0;

/// Single-byte command codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// HMI node is ready for the next byte
    HmiReady = HMI_READY,
    /// Control node is ready for the next byte
    ControlReady = CONTROL_READY,
    /// Password matched: run the door-open sequence
    OpenDoor = OPEN_DOOR,
    /// Password matched: run a new password-creation round
    ChangePassword = CHANGE_PASSWORD,
    /// Trials exhausted: run the alarm sequence
    WrongPasswordAlarm = WRONG_PASSWORD,
}

impl Command {
    /// Get the command as its wire byte
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// Decode a wire byte
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            HMI_READY => Some(Command::HmiReady),
            CONTROL_READY => Some(Command::ControlReady),
            OPEN_DOOR => Some(Command::OpenDoor),
            CHANGE_PASSWORD => Some(Command::ChangePassword),
            WRONG_PASSWORD => Some(Command::WrongPasswordAlarm),
            _ => None,
        }
    }

    /// Whether this is one of the two readiness sentinels
    pub const fn is_ready(self) -> bool {
        matches!(self, Command::HmiReady | Command::ControlReady)
    }
}

/// Which end of the link a node is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NodeRole {
    /// Keypad and display node
    Hmi,
    /// Password storage, motor and alarm node
    Control,
}

impl NodeRole {
    /// This node's readiness sentinel
    pub const fn ready(self) -> Command {
        match self {
            NodeRole::Hmi => Command::HmiReady,
            NodeRole::Control => Command::ControlReady,
        }
    }

    /// The peer node's readiness sentinel
    pub const fn peer_ready(self) -> Command {
        self.peer().ready()
    }

    /// The other end of the link
    pub const fn peer(self) -> Self {
        match self {
            NodeRole::Hmi => NodeRole::Control,
            NodeRole::Control => NodeRole::Hmi,
        }
    }
}

/// Boolean verdict carried as a reply byte
///
/// Used both for password creation (`Same`/`NotSame`) and verification
/// (`Matched`/`NotMatched`); the protocol position tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    Positive,
    Negative,
}

impl Reply {
    /// Get the reply as its wire byte
    pub const fn to_byte(self) -> u8 {
        match self {
            Reply::Positive => REPLY_POSITIVE,
            Reply::Negative => REPLY_NEGATIVE,
        }
    }

    /// Decode a wire byte
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            REPLY_POSITIVE => Some(Reply::Positive),
            REPLY_NEGATIVE => Some(Reply::Negative),
            _ => None,
        }
    }

    /// Build a reply from a boolean outcome
    pub const fn from_bool(positive: bool) -> Self {
        if positive {
            Reply::Positive
        } else {
            Reply::Negative
        }
    }

    /// Whether the reply is positive
    pub const fn is_positive(self) -> bool {
        matches!(self, Reply::Positive)
    }
}
