//! State machine definition

use doorlock_protocol::Command;

use super::events::Event;
use crate::sequencer::Sequence;

/// Node states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Creating (or re-creating) the password
    SetPassword,
    /// Password established, waiting for the user
    Idle,
    /// Verification round in progress
    Verifying,
    /// Password matched, waiting for the command
    Authorized,
    /// Trials exhausted, waiting for the alarm command
    LockedOut,
    /// Running a step table until its final tick
    Actuating(Sequence),
}

/// A state change as observed by firmware logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: State,
    pub event: Event,
    pub to: State,
}

impl Transition {
    /// Whether the state actually changed
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

impl State {
    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use State::*;

        match (self, event) {
            // SetPassword transitions
            (SetPassword, Event::PasswordCreated) => Idle,
            (SetPassword, Event::CreationMismatch) => SetPassword,
            (SetPassword, Event::LinkFault) => SetPassword,

            // Idle transitions
            (Idle, Event::RoundStarted) => Verifying,

            // Verifying transitions
            (Verifying, Event::TrialFailed) => Verifying,
            (Verifying, Event::Matched) => Authorized,
            (Verifying, Event::TrialsExhausted) => LockedOut,

            // Authorized transitions
            (Authorized, Event::Command(Command::OpenDoor)) => Actuating(Sequence::DoorOpen),
            (Authorized, Event::Command(Command::ChangePassword)) => SetPassword,

            // LockedOut transitions
            (LockedOut, Event::Command(Command::WrongPasswordAlarm)) => Actuating(Sequence::Alarm),

            // Any other command is ignored
            (Authorized | LockedOut, Event::Command(_)) => Idle,

            // Actuating transitions
            (Actuating(_), Event::SequenceFinished) => Idle,

            // Faults fall back to waiting for the user
            (_, Event::LinkFault) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }

    /// Transition and record the change
    pub fn step(self, event: Event) -> Transition {
        Transition {
            from: self,
            event,
            to: self.transition(event),
        }
    }
}
