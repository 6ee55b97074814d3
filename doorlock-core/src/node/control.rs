//! Control node orchestrator
//!
//! Owns the stored password and the actuator sequences. Every exchange is
//! driven by the HMI node; the control node only answers.

use doorlock_hal::{ByteStorage, UartRx, UartTx};
use doorlock_protocol::{Link, LinkError};
use embedded_hal::delay::DelayNs;

use crate::config::{NodeConfig, PASSWORD_LEN};
use crate::password::{
    Creation, Password, PasswordStore, Reconcile, StoreError, TrialCounter, TrialOutcome,
};
use crate::sequencer::{
    completion_budget_ms, finish_or_abort, ControlAction, Sequence, SequenceRunner,
    SequenceTimeout, SequencerError,
};
use crate::state::{Event, State, Transition};

/// Errors reported by [`ControlNode::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlError<U, S> {
    Link(LinkError<U>),
    Store(StoreError<S>),
    Sequencer(SequencerError),
    SequenceTimeout(SequenceTimeout),
}

impl<U, S> From<LinkError<U>> for ControlError<U, S> {
    fn from(e: LinkError<U>) -> Self {
        ControlError::Link(e)
    }
}

impl<U, S> From<StoreError<S>> for ControlError<U, S> {
    fn from(e: StoreError<S>) -> Self {
        ControlError::Store(e)
    }
}

impl<U, S> From<SequencerError> for ControlError<U, S> {
    fn from(e: SequencerError) -> Self {
        ControlError::Sequencer(e)
    }
}

impl<U, S> From<SequenceTimeout> for ControlError<U, S> {
    fn from(e: SequenceTimeout) -> Self {
        ControlError::SequenceTimeout(e)
    }
}

/// Control node main flow
pub struct ControlNode<U, D, S, W, R> {
    link: Link<U, D>,
    store: PasswordStore<S, W>,
    runner: R,
    state: State,
    trials: TrialCounter,
    config: NodeConfig,
}

impl<U, D, S, W, R, E> ControlNode<U, D, S, W, R>
where
    U: UartTx<Error = E> + UartRx<Error = E>,
    D: DelayNs,
    S: ByteStorage,
    W: DelayNs,
    R: SequenceRunner<Action = ControlAction>,
{
    /// Start in `SetPassword`
    pub fn new(
        link: Link<U, D>,
        store: PasswordStore<S, W>,
        runner: R,
        config: NodeConfig,
    ) -> Self {
        Self {
            link,
            store,
            runner,
            state: State::SetPassword,
            trials: TrialCounter::new(config.max_trials),
            config,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn store_mut(&mut self) -> &mut PasswordStore<S, W> {
        &mut self.store
    }

    /// Do the work of the current state and move to the next one
    ///
    /// On error the link is drained and the node falls back as for a link
    /// fault, so the caller can log and keep stepping.
    pub fn step(&mut self) -> Result<Transition, ControlError<E, S::Error>> {
        let from = self.state;
        match self.run_state(from) {
            Ok(event) => {
                let transition = from.step(event);
                self.state = transition.to;
                Ok(transition)
            }
            Err(e) => {
                let _ = self.link.drain();
                self.state = from.transition(Event::LinkFault);
                Err(e)
            }
        }
    }

    fn run_state(&mut self, state: State) -> Result<Event, ControlError<E, S::Error>> {
        match state {
            State::SetPassword => self.receive_new_password(),
            State::Idle => {
                self.trials.reset();
                Ok(Event::RoundStarted)
            }
            State::Verifying => self.verify_candidate(),
            State::Authorized | State::LockedOut => {
                let command = self.link.receive_command()?;
                Ok(Event::Command(command))
            }
            State::Actuating(sequence) => self.run_sequence(sequence),
        }
    }

    /// Receive both entries, reply, and persist on agreement
    fn receive_new_password(&mut self) -> Result<Event, ControlError<E, S::Error>> {
        let mut first = [0u8; PASSWORD_LEN];
        let mut second = [0u8; PASSWORD_LEN];
        self.link.collect_bytes(&mut first)?;
        self.link.collect_bytes(&mut second)?;

        let creation = Creation::round(Password::new(first), Password::new(second));
        let Some(password) = creation.confirmed() else {
            self.link.respond(Reconcile::NotSame.reply().to_byte())?;
            return Ok(Event::CreationMismatch);
        };

        // A password that could not be stored is refused so both nodes retry
        if let Err(e) = self.store.persist(&password) {
            self.link.respond(Reconcile::NotSame.reply().to_byte())?;
            return Err(e.into());
        }
        self.link.respond(Reconcile::Same.reply().to_byte())?;
        Ok(Event::PasswordCreated)
    }

    /// One trial of a verification round
    fn verify_candidate(&mut self) -> Result<Event, ControlError<E, S::Error>> {
        let mut candidate = [0u8; PASSWORD_LEN];
        self.link.collect_bytes(&mut candidate)?;

        let verdict = self.store.verify(&Password::new(candidate))?;
        self.link.respond(verdict.reply().to_byte())?;

        Ok(match self.trials.record(verdict) {
            TrialOutcome::Matched => Event::Matched,
            TrialOutcome::Retry { .. } => Event::TrialFailed,
            TrialOutcome::LockedOut => Event::TrialsExhausted,
        })
    }

    /// Start the actuator table and block until its final tick
    ///
    /// A sequence that overruns its budget is aborted, which stops the motor
    /// and the buzzer before the timeout is reported.
    fn run_sequence(&mut self, sequence: Sequence) -> Result<Event, ControlError<E, S::Error>> {
        let table = sequence.control_table();
        self.runner.start(table)?;
        let margin = self.config.sequence_margin_ms;
        finish_or_abort(
            &mut self.runner,
            self.link.delay_mut(),
            completion_budget_ms(table, margin),
            margin,
            self.config.sequence_poll_ms,
        )?;
        Ok(Event::SequenceFinished)
    }
}
