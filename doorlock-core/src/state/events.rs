//! Events that trigger state transitions

use doorlock_protocol::Command;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Creation events
    /// Both entries agreed and the password was accepted
    PasswordCreated,
    /// The two entries differed
    CreationMismatch,

    // Verification events
    /// A verification round began
    RoundStarted,
    /// A wrong password with trials left
    TrialFailed,
    /// The password matched
    Matched,
    /// The last trial failed
    TrialsExhausted,

    // Dispatch events
    /// A command was sent or received
    Command(Command),
    /// The running sequence fired its final step
    SequenceFinished,

    // Fault events
    /// The link timed out, failed or desynchronized
    LinkFault,
}

impl Event {
    /// Check if this event comes from the password lifecycle
    pub fn is_password_event(&self) -> bool {
        matches!(
            self,
            Event::PasswordCreated
                | Event::CreationMismatch
                | Event::RoundStarted
                | Event::TrialFailed
                | Event::Matched
                | Event::TrialsExhausted
        )
    }

    /// Check if this event indicates a fault
    pub fn is_fault(&self) -> bool {
        matches!(self, Event::LinkFault)
    }
}
