//! Password lifecycle
//!
//! Double-entry creation, persistence on the control node, and verification
//! with a bounded number of trials per round.

pub mod entry;
pub mod lifecycle;
pub mod store;

pub use entry::{read_password, EntryError, EntryProgress, PasswordEntry};
pub use lifecycle::{
    reconcile, Creation, Password, PasswordError, Reconcile, TrialCounter, TrialOutcome, Verdict,
};
pub use store::{PasswordStore, StoreError};
