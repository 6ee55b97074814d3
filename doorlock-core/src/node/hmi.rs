//! HMI node orchestrator
//!
//! Drives the conversation: collects passwords from the keypad, submits
//! them, and tells the control node what to do. Screen sequences run
//! locally alongside the control node's actuator sequences.

use doorlock_hal::{UartRx, UartTx};
use doorlock_protocol::{Command, Link, LinkError, Reply};
use embedded_hal::delay::DelayNs;

use crate::config::NodeConfig;
use crate::password::{
    read_password, EntryError, Password, Reconcile, TrialCounter, TrialOutcome, Verdict,
};
use crate::sequencer::{
    completion_budget_ms, finish_or_abort, ScreenAction, Sequence, SequenceRunner,
    SequenceTimeout, SequencerError,
};
use crate::state::{Event, State, Transition};
use crate::traits::{CharDisplay, Key, Keypad};

pub const PROMPT_ENTER: &str = "plz enter pass:";
pub const PROMPT_CONFIRM: (&str, &str) = ("plz re-enter the", "same pass: ");
pub const MENU: (&str, &str) = ("+ : Open Door", "- : Change Pass");

/// Errors reported by [`HmiNode::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HmiError<U, K, D> {
    Link(LinkError<U>),
    Keypad(K),
    Display(D),
    /// Reply byte that is neither verdict
    UnexpectedReply(u8),
    Sequencer(SequencerError),
    SequenceTimeout(SequenceTimeout),
}

impl<U, K, D> From<LinkError<U>> for HmiError<U, K, D> {
    fn from(e: LinkError<U>) -> Self {
        HmiError::Link(e)
    }
}

impl<U, K, D> From<EntryError<K, D>> for HmiError<U, K, D> {
    fn from(e: EntryError<K, D>) -> Self {
        match e {
            EntryError::Keypad(e) => HmiError::Keypad(e),
            EntryError::Display(e) => HmiError::Display(e),
        }
    }
}

impl<U, K, D> From<SequencerError> for HmiError<U, K, D> {
    fn from(e: SequencerError) -> Self {
        HmiError::Sequencer(e)
    }
}

impl<U, K, D> From<SequenceTimeout> for HmiError<U, K, D> {
    fn from(e: SequenceTimeout) -> Self {
        HmiError::SequenceTimeout(e)
    }
}

/// [`HmiError`] for a given keypad and display
pub type NodeError<E, K, D> = HmiError<E, <K as Keypad>::Error, <D as CharDisplay>::Error>;

/// HMI node main flow
pub struct HmiNode<U, L, K, D, R> {
    link: Link<U, L>,
    keypad: K,
    display: D,
    runner: R,
    state: State,
    trials: TrialCounter,
    /// Command chosen from the menu, sent once the password matches
    intent: Command,
    config: NodeConfig,
}

impl<U, L, K, D, R, E> HmiNode<U, L, K, D, R>
where
    U: UartTx<Error = E> + UartRx<Error = E>,
    L: DelayNs,
    K: Keypad,
    D: CharDisplay,
    R: SequenceRunner<Action = ScreenAction>,
{
    /// Start in `SetPassword`
    pub fn new(link: Link<U, L>, keypad: K, display: D, runner: R, config: NodeConfig) -> Self {
        Self {
            link,
            keypad,
            display,
            runner,
            state: State::SetPassword,
            trials: TrialCounter::new(config.max_trials),
            intent: Command::OpenDoor,
            config,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Menu choice of the current round
    pub fn intent(&self) -> Command {
        self.intent
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Do the work of the current state and move to the next one
    ///
    /// On error the link is drained and the node falls back as for a link
    /// fault, so the caller can log and keep stepping.
    pub fn step(&mut self) -> Result<Transition, NodeError<E, K, D>> {
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

    fn run_state(&mut self, state: State) -> Result<Event, NodeError<E, K, D>> {
        match state {
            State::SetPassword => self.create_and_submit(),
            State::Idle => self.choose_from_menu(),
            State::Verifying => self.submit_candidate(),
            State::Authorized => {
                let command = self.intent;
                self.link.send_command(command)?;
                Ok(Event::Command(command))
            }
            State::LockedOut => {
                self.link.send_command(Command::WrongPasswordAlarm)?;
                Ok(Event::Command(Command::WrongPasswordAlarm))
            }
            State::Actuating(sequence) => self.run_screen(sequence),
        }
    }

    /// Collect two entries from the keypad
    pub fn create_password(&mut self) -> Result<(Password, Password), NodeError<E, K, D>> {
        self.prompt_entry()?;
        let first = read_password(&mut self.keypad, &mut self.display)?;

        self.display
            .show_lines(PROMPT_CONFIRM.0, PROMPT_CONFIRM.1)
            .map_err(NodeError::<E, K, D>::Display)?;
        let second = read_password(&mut self.keypad, &mut self.display)?;

        self.display.clear().map_err(NodeError::<E, K, D>::Display)?;
        Ok((first, second))
    }

    fn create_and_submit(&mut self) -> Result<Event, NodeError<E, K, D>> {
        let (first, second) = self.create_password()?;
        self.link.exchange_bytes(first.as_bytes())?;
        self.link.exchange_bytes(second.as_bytes())?;

        Ok(match Reconcile::from_reply(self.query_reply()?) {
            Reconcile::Same => Event::PasswordCreated,
            Reconcile::NotSame => Event::CreationMismatch,
        })
    }

    fn choose_from_menu(&mut self) -> Result<Event, NodeError<E, K, D>> {
        self.display
            .show_lines(MENU.0, MENU.1)
            .map_err(NodeError::<E, K, D>::Display)?;

        self.intent = loop {
            match self.keypad.read_key().map_err(NodeError::<E, K, D>::Keypad)? {
                Key::Plus => break Command::OpenDoor,
                Key::Minus => break Command::ChangePassword,
                _ => {}
            }
        };
        self.trials.reset();
        Ok(Event::RoundStarted)
    }

    /// One trial of a verification round
    fn submit_candidate(&mut self) -> Result<Event, NodeError<E, K, D>> {
        self.prompt_entry()?;
        let candidate = read_password(&mut self.keypad, &mut self.display)?;
        self.display.clear().map_err(NodeError::<E, K, D>::Display)?;

        self.link.exchange_bytes(candidate.as_bytes())?;
        let verdict = Verdict::from_reply(self.query_reply()?);

        Ok(match self.trials.record(verdict) {
            TrialOutcome::Matched => Event::Matched,
            TrialOutcome::Retry { .. } => Event::TrialFailed,
            TrialOutcome::LockedOut => Event::TrialsExhausted,
        })
    }

    /// Start the screen table and block until its final tick
    ///
    /// An overrunning table is aborted, leaving the screen blank.
    fn run_screen(&mut self, sequence: Sequence) -> Result<Event, NodeError<E, K, D>> {
        let table = sequence.screen_table();
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

    fn prompt_entry(&mut self) -> Result<(), NodeError<E, K, D>> {
        self.display.clear().map_err(NodeError::<E, K, D>::Display)?;
        self.display
            .show_text(0, 0, PROMPT_ENTER)
            .map_err(NodeError::<E, K, D>::Display)?;
        self.display.move_cursor(1, 0).map_err(NodeError::<E, K, D>::Display)
    }

    fn query_reply(&mut self) -> Result<Reply, NodeError<E, K, D>> {
        let byte = self.link.query()?;
        Reply::from_byte(byte).ok_or(HmiError::UnexpectedReply(byte))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::step::Step;
    use crate::sequencer::tables::{DOOR_STATUS_SCREEN, LOCKOUT_SCREEN};
    use core::convert::Infallible;
    use doorlock_protocol::command::{
        CHANGE_PASSWORD, CONTROL_READY, HMI_READY, OPEN_DOOR, WRONG_PASSWORD,
    };
    use doorlock_protocol::{LinkConfig, NodeRole, WaitPolicy};
    use heapless::{Deque, String, Vec};

    struct ScriptedUart {
        rx: Deque<u8, 64>,
        tx: Vec<u8, 64>,
    }

    impl UartTx for ScriptedUart {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            self.tx.extend_from_slice(data)
        }

        fn flush(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    impl UartRx for ScriptedUart {
        type Error = ();

        fn try_read_byte(&mut self) -> Result<Option<u8>, ()> {
            Ok(self.rx.pop_front())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    struct ScriptedKeys {
        keys: Deque<Key, 64>,
    }

    impl Keypad for ScriptedKeys {
        type Error = ();

        fn read_key(&mut self) -> Result<Key, ()> {
            self.keys.pop_front().ok_or(())
        }
    }

    /// Keeps the last text written to each row
    #[derive(Default)]
    struct RowDisplay {
        rows: [String<32>; 2],
        masks: usize,
    }

    impl CharDisplay for RowDisplay {
        type Error = Infallible;

        fn show_text(&mut self, row: u8, _col: u8, text: &str) -> Result<(), Infallible> {
            let line = &mut self.rows[row as usize];
            line.clear();
            let _ = line.push_str(text);
            Ok(())
        }

        fn clear(&mut self) -> Result<(), Infallible> {
            self.rows.iter_mut().for_each(|r| r.clear());
            Ok(())
        }

        fn put_char(&mut self, _c: char) -> Result<(), Infallible> {
            self.masks += 1;
            Ok(())
        }

        fn move_cursor(&mut self, _row: u8, _col: u8) -> Result<(), Infallible> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct InstantRunner {
        started: Option<&'static [Step<ScreenAction>]>,
    }

    impl SequenceRunner for InstantRunner {
        type Action = ScreenAction;

        fn start(&mut self, table: &'static [Step<ScreenAction>]) -> Result<(), SequencerError> {
            self.started = Some(table);
            Ok(())
        }

        fn is_complete(&self) -> bool {
            true
        }

        fn abort(&mut self) {}
    }

    /// Never finishes a table on its own; an abort ends it
    #[derive(Default)]
    struct StuckRunner {
        starts: usize,
        aborts: usize,
        running: bool,
    }

    impl SequenceRunner for StuckRunner {
        type Action = ScreenAction;

        fn start(&mut self, _table: &'static [Step<ScreenAction>]) -> Result<(), SequencerError> {
            if self.running {
                return Err(SequencerError::Busy);
            }
            self.starts += 1;
            self.running = true;
            Ok(())
        }

        fn is_complete(&self) -> bool {
            !self.running
        }

        fn abort(&mut self) {
            self.aborts += 1;
            self.running = false;
        }
    }

    type Node = HmiNode<ScriptedUart, NoDelay, ScriptedKeys, RowDisplay, InstantRunner>;

    fn digits(pw: [u8; 5]) -> impl Iterator<Item = Key> {
        pw.into_iter().map(Key::Digit).chain(core::iter::once(Key::Enter))
    }

    fn node(script: &[u8], keys: impl IntoIterator<Item = Key>) -> Node {
        node_with(script, keys, InstantRunner::default())
    }

    fn node_with<R: SequenceRunner<Action = ScreenAction>>(
        script: &[u8],
        keys: impl IntoIterator<Item = Key>,
        runner: R,
    ) -> HmiNode<ScriptedUart, NoDelay, ScriptedKeys, RowDisplay, R> {
        let mut rx = Deque::new();
        for &b in script {
            rx.push_back(b).unwrap();
        }
        let mut key_queue = Deque::new();
        for key in keys {
            key_queue.push_back(key).unwrap();
        }
        let config = LinkConfig {
            poll_interval_us: 1,
            handshake_wait: WaitPolicy::Within(1),
            payload_wait: WaitPolicy::Within(1),
            ..LinkConfig::default()
        };
        HmiNode::new(
            Link::with_config(
                ScriptedUart { rx, tx: Vec::new() },
                NoDelay,
                NodeRole::Hmi,
                config,
            ),
            ScriptedKeys { keys: key_queue },
            RowDisplay::default(),
            runner,
            NodeConfig::default(),
        )
    }

    fn sent(node: Node) -> Vec<u8, 64> {
        let (uart, _) = node.link.into_parts();
        uart.tx
    }

    const PW: [u8; 5] = [4, 2, 4, 2, 0];

    #[test]
    fn test_creation_submits_both_entries() {
        let mut script = [CONTROL_READY; 11];
        script[10] = 1;
        let mut node = node(&script, digits(PW).chain(digits(PW)));

        let t = node.step().unwrap();
        assert_eq!(t.event, Event::PasswordCreated);
        assert_eq!(node.state(), State::Idle);
        assert_eq!(node.display().masks, 10);

        let tx = sent(node);
        assert_eq!(&tx[..5], &PW);
        assert_eq!(&tx[5..10], &PW);
        assert_eq!(tx[10], HMI_READY);
    }

    #[test]
    fn test_creation_not_same_repeats() {
        let mut script = [CONTROL_READY; 11];
        script[10] = 0;
        let mut node = node(&script, digits(PW).chain(digits([1, 1, 1, 1, 1])));

        assert_eq!(node.step().unwrap().event, Event::CreationMismatch);
        assert_eq!(node.state(), State::SetPassword);
    }

    #[test]
    fn test_menu_sets_intent() {
        let mut node = node(&[], [Key::Digit(3), Key::Enter, Key::Minus]);
        node.state = State::Idle;

        assert_eq!(node.step().unwrap().to, State::Verifying);
        assert_eq!(node.intent(), Command::ChangePassword);
        assert_eq!(node.display().rows[1].as_str(), MENU.1);
    }

    #[test]
    fn test_matched_open_door_runs_screen() {
        let script = [
            CONTROL_READY,
            CONTROL_READY,
            CONTROL_READY,
            CONTROL_READY,
            CONTROL_READY,
            1,
            CONTROL_READY,
        ];
        let mut node = node(&script, core::iter::once(Key::Plus).chain(digits(PW)));
        node.state = State::Idle;

        node.step().unwrap();
        assert_eq!(node.step().unwrap().to, State::Authorized);
        assert_eq!(node.step().unwrap().to, State::Actuating(Sequence::DoorOpen));
        assert_eq!(node.step().unwrap().to, State::Idle);
        assert_eq!(
            node.runner().started.unwrap().as_ptr(),
            DOOR_STATUS_SCREEN.as_ptr()
        );

        let tx = sent(node);
        assert_eq!(&tx[..5], &PW);
        assert_eq!(&tx[5..], &[HMI_READY, OPEN_DOOR]);
    }

    #[test]
    fn test_matched_change_password() {
        let mut script: Vec<u8, 64> = Vec::new();
        script.extend_from_slice(&[CONTROL_READY; 5]).unwrap();
        script.push(1).unwrap();
        script.push(CONTROL_READY).unwrap();
        let mut node = node(&script, core::iter::once(Key::Minus).chain(digits(PW)));
        node.state = State::Idle;

        node.step().unwrap();
        node.step().unwrap();
        assert_eq!(node.step().unwrap().to, State::SetPassword);
        assert_eq!(sent(node).last(), Some(&CHANGE_PASSWORD));
    }

    #[test]
    fn test_lockout_sends_alarm_command() {
        let mut script: Vec<u8, 64> = Vec::new();
        for _ in 0..3 {
            script.extend_from_slice(&[CONTROL_READY; 5]).unwrap();
            script.push(0).unwrap();
        }
        script.push(CONTROL_READY).unwrap();
        let keys = core::iter::once(Key::Plus)
            .chain(digits([0; 5]))
            .chain(digits([0; 5]))
            .chain(digits([0; 5]));
        let mut node = node(&script, keys);
        node.state = State::Idle;

        node.step().unwrap();
        assert_eq!(node.step().unwrap().event, Event::TrialFailed);
        assert_eq!(node.step().unwrap().event, Event::TrialFailed);
        assert_eq!(node.step().unwrap().to, State::LockedOut);
        assert_eq!(node.step().unwrap().to, State::Actuating(Sequence::Alarm));
        assert_eq!(node.step().unwrap().to, State::Idle);
        assert_eq!(
            node.runner().started.unwrap().as_ptr(),
            LOCKOUT_SCREEN.as_ptr()
        );
        assert_eq!(sent(node).last(), Some(&WRONG_PASSWORD));
    }

    #[test]
    fn test_garbage_reply_is_reported() {
        let mut script = [CONTROL_READY; 11];
        script[10] = 0x42;
        let mut node = node(&script, digits(PW).chain(digits(PW)));

        assert_eq!(node.step(), Err(HmiError::UnexpectedReply(0x42)));
        assert_eq!(node.state(), State::SetPassword);
    }

    #[test]
    fn test_silent_peer_times_out() {
        let mut node = node(&[], digits(PW).chain(digits(PW)));
        assert!(matches!(
            node.step(),
            Err(HmiError::Link(LinkError::Timeout { .. }))
        ));
        assert_eq!(node.state(), State::SetPassword);
    }

    #[test]
    fn test_stuck_screen_is_aborted() {
        let mut node = node_with(&[], core::iter::empty(), StuckRunner::default());
        node.state = State::Actuating(Sequence::Alarm);

        assert!(matches!(node.step(), Err(HmiError::SequenceTimeout(_))));
        assert_eq!(node.state(), State::Idle);
        assert_eq!(node.runner().aborts, 1);

        // Not left busy: the next screen starts
        node.state = State::Actuating(Sequence::DoorOpen);
        assert!(matches!(node.step(), Err(HmiError::SequenceTimeout(_))));
        assert_eq!(node.runner().starts, 2);
        assert_eq!(node.runner().aborts, 2);
    }
}
