//! Password values, comparison and the creation/verification bookkeeping

use doorlock_protocol::Reply;

use crate::config::{MAX_TRIALS, PASSWORD_LEN};

/// Errors building a password from user digits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PasswordError {
    /// Wrong number of digits
    Length,
    /// A value above 9
    NotADigit(u8),
}

/// A fixed-length password
///
/// Only bytewise equality matters. Bytes received over the link or read
/// back from storage are taken as-is.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Password([u8; PASSWORD_LEN]);

// Keep digits out of debug output
impl core::fmt::Debug for Password {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Password(*****)")
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Password {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Password(*****)")
    }
}

impl Password {
    /// Wrap raw bytes
    pub const fn new(bytes: [u8; PASSWORD_LEN]) -> Self {
        Self(bytes)
    }

    /// Build from user digits, rejecting anything but 0-9
    pub fn from_digits(digits: &[u8]) -> Result<Self, PasswordError> {
        if digits.len() != PASSWORD_LEN {
            return Err(PasswordError::Length);
        }
        let mut bytes = [0u8; PASSWORD_LEN];
        for (slot, &d) in bytes.iter_mut().zip(digits) {
            if d > 9 {
                return Err(PasswordError::NotADigit(d));
            }
            *slot = d;
        }
        Ok(Self(bytes))
    }

    pub const fn as_bytes(&self) -> &[u8; PASSWORD_LEN] {
        &self.0
    }

    /// Compare against the stored password
    pub fn verify(&self, stored: &Password) -> Verdict {
        if digits_equal(&self.0, &stored.0) {
            Verdict::Matched
        } else {
            Verdict::NotMatched
        }
    }
}

/// Outcome of comparing the two creation entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reconcile {
    Same,
    NotSame,
}

impl Reconcile {
    pub const fn reply(self) -> Reply {
        Reply::from_bool(matches!(self, Reconcile::Same))
    }

    pub const fn from_reply(reply: Reply) -> Self {
        if reply.is_positive() {
            Reconcile::Same
        } else {
            Reconcile::NotSame
        }
    }
}

/// Outcome of one verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verdict {
    Matched,
    NotMatched,
}

impl Verdict {
    pub const fn reply(self) -> Reply {
        Reply::from_bool(matches!(self, Verdict::Matched))
    }

    pub const fn from_reply(reply: Reply) -> Self {
        if reply.is_positive() {
            Verdict::Matched
        } else {
            Verdict::NotMatched
        }
    }
}

/// Digit-wise comparison, stopping at the first difference
fn digits_equal(a: &[u8; PASSWORD_LEN], b: &[u8; PASSWORD_LEN]) -> bool {
    a.iter().zip(b).all(|(x, y)| x == y)
}

/// Compare the first and second creation entries
pub fn reconcile(first: &Password, second: &Password) -> Reconcile {
    if digits_equal(&first.0, &second.0) {
        Reconcile::Same
    } else {
        Reconcile::NotSame
    }
}

/// Double-entry password creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Creation {
    AwaitingFirstEntry,
    AwaitingConfirmEntry(Password),
    Confirmed(Password),
    Mismatch,
}

impl Default for Creation {
    fn default() -> Self {
        Creation::AwaitingFirstEntry
    }
}

impl Creation {
    /// Feed one complete entry
    ///
    /// After `Confirmed` or `Mismatch` the entry starts a fresh round.
    pub fn enter(self, entry: Password) -> Self {
        match self {
            Creation::AwaitingConfirmEntry(first) => match reconcile(&first, &entry) {
                Reconcile::Same => Creation::Confirmed(first),
                Reconcile::NotSame => Creation::Mismatch,
            },
            Creation::AwaitingFirstEntry | Creation::Confirmed(_) | Creation::Mismatch => {
                Creation::AwaitingConfirmEntry(entry)
            }
        }
    }

    /// Run both entries of a round at once
    pub fn round(first: Password, second: Password) -> Self {
        Creation::AwaitingFirstEntry.enter(first).enter(second)
    }

    /// The password to persist, once confirmed
    pub fn confirmed(&self) -> Option<Password> {
        match self {
            Creation::Confirmed(p) => Some(*p),
            _ => None,
        }
    }

    /// Whether the round finished, either way
    pub fn is_settled(&self) -> bool {
        matches!(self, Creation::Confirmed(_) | Creation::Mismatch)
    }
}

/// Result of recording one verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrialOutcome {
    Matched,
    /// Wrong, with this many attempts left
    Retry { remaining: u8 },
    LockedOut,
}

/// Per-round failed attempt counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrialCounter {
    failed: u8,
    max: u8,
}

impl Default for TrialCounter {
    fn default() -> Self {
        Self::new(MAX_TRIALS)
    }
}

impl TrialCounter {
    pub const fn new(max: u8) -> Self {
        Self { failed: 0, max }
    }

    /// Start a new round
    pub fn reset(&mut self) {
        self.failed = 0;
    }

    /// Failed attempts so far in this round
    pub fn failed(&self) -> u8 {
        self.failed
    }

    pub fn is_locked_out(&self) -> bool {
        self.failed >= self.max
    }

    /// Record an attempt's verdict
    pub fn record(&mut self, verdict: Verdict) -> TrialOutcome {
        match verdict {
            Verdict::Matched => TrialOutcome::Matched,
            Verdict::NotMatched => {
                self.failed = self.failed.saturating_add(1).min(self.max);
                if self.is_locked_out() {
                    TrialOutcome::LockedOut
                } else {
                    TrialOutcome::Retry {
                        remaining: self.max - self.failed,
                    }
                }
            }
        }
    }
}
