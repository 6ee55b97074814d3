//! Host doubles shared by the integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use doorlock_core::sequencer::{ActionSink, SequenceRunner, Sequencer, SequencerError, Step};
use doorlock_core::traits::{
    Alarm, AlarmError, CharDisplay, Key, Keypad, Motor, MotorDirection, MotorError,
};
use doorlock_hal::{ByteStorage, PeriodicTimer, TimerPeriod, UartRx, UartTx};
use embedded_hal::delay::DelayNs;

/// The other end of the pipe went away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hangup;

/// One end of an in-memory serial line
pub struct PipeEnd {
    tx: Sender<u8>,
    rx: Receiver<u8>,
}

/// Two connected pipe ends
pub fn serial_pair() -> (PipeEnd, PipeEnd) {
    let (a_tx, b_rx) = mpsc::channel();
    let (b_tx, a_rx) = mpsc::channel();
    (
        PipeEnd { tx: a_tx, rx: a_rx },
        PipeEnd { tx: b_tx, rx: b_rx },
    )
}

impl UartTx for PipeEnd {
    type Error = Hangup;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Hangup> {
        for &byte in data {
            self.tx.send(byte).map_err(|_| Hangup)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Hangup> {
        Ok(())
    }
}

impl UartRx for PipeEnd {
    type Error = Hangup;

    fn try_read_byte(&mut self) -> Result<Option<u8>, Hangup> {
        match self.rx.try_recv() {
            Ok(byte) => Ok(Some(byte)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(Hangup),
        }
    }
}

/// Delay backed by the host scheduler
pub struct SleepDelay;

impl DelayNs for SleepDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// 2 KiB of RAM standing in for the EEPROM
pub struct RamEeprom {
    pub cells: Vec<u8>,
    /// Reads still to fail before the part recovers
    pub failing_reads: usize,
}

impl Default for RamEeprom {
    fn default() -> Self {
        Self {
            cells: vec![0xFF; 2048],
            failing_reads: 0,
        }
    }
}

/// Injected EEPROM read failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EepromFault;

impl ByteStorage for RamEeprom {
    type Error = EepromFault;

    fn read_byte(&mut self, address: u16) -> Result<u8, EepromFault> {
        if self.failing_reads > 0 {
            self.failing_reads -= 1;
            return Err(EepromFault);
        }
        Ok(self.cells[usize::from(address)])
    }

    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), EepromFault> {
        self.cells[usize::from(address)] = value;
        Ok(())
    }
}

/// Keypad that replays a fixed script, then reports exhaustion
pub struct ScriptedKeypad {
    keys: VecDeque<Key>,
}

impl ScriptedKeypad {
    pub fn new() -> Self {
        Self {
            keys: VecDeque::new(),
        }
    }

    /// Digits of `password` followed by Enter
    pub fn password(mut self, password: &str) -> Self {
        self.keys.extend(password.bytes().map(|b| Key::Digit(b - b'0')));
        self.keys.push_back(Key::Enter);
        self
    }

    pub fn key(mut self, key: Key) -> Self {
        self.keys.push_back(key);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfKeys;

impl Keypad for ScriptedKeypad {
    type Error = OutOfKeys;

    fn read_key(&mut self) -> Result<Key, OutOfKeys> {
        self.keys.pop_front().ok_or(OutOfKeys)
    }
}

/// Display that keeps the text of both rows
#[derive(Default)]
pub struct TextDisplay {
    pub rows: [String; 2],
    cursor: (usize, usize),
}

impl TextDisplay {
    fn write(&mut self, text: &str) {
        let (row, col) = self.cursor;
        let line = &mut self.rows[row];
        while line.len() < col {
            line.push(' ');
        }
        line.truncate(col);
        line.push_str(text);
        self.cursor.1 = col + text.len();
    }
}

impl CharDisplay for TextDisplay {
    type Error = Infallible;

    fn show_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), Infallible> {
        self.cursor = (usize::from(row), usize::from(col));
        self.write(text);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Infallible> {
        self.rows = Default::default();
        self.cursor = (0, 0);
        Ok(())
    }

    fn put_char(&mut self, c: char) -> Result<(), Infallible> {
        let mut buf = [0u8; 4];
        self.write(c.encode_utf8(&mut buf));
        Ok(())
    }

    fn move_cursor(&mut self, row: u8, col: u8) -> Result<(), Infallible> {
        self.cursor = (usize::from(row), usize::from(col));
        Ok(())
    }
}

/// Motor and buzzer that log every command
#[derive(Default)]
pub struct LoggedMotor {
    pub direction: MotorDirection,
    pub log: Vec<(MotorDirection, u8)>,
}

impl Motor for LoggedMotor {
    fn set_motor(&mut self, direction: MotorDirection, speed_percent: u8) -> Result<(), MotorError> {
        self.direction = direction;
        self.log.push((direction, speed_percent));
        Ok(())
    }

    fn direction(&self) -> MotorDirection {
        self.direction
    }
}

#[derive(Default)]
pub struct LoggedBuzzer {
    pub on: bool,
    pub log: Vec<bool>,
}

impl Alarm for LoggedBuzzer {
    fn set_alarm(&mut self, on: bool) -> Result<(), AlarmError> {
        self.on = on;
        self.log.push(on);
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

/// Records armed periods and whether the timer is running
#[derive(Default)]
pub struct RecordingTimer {
    pub armed: Vec<TimerPeriod>,
    pub running: bool,
}

impl PeriodicTimer for RecordingTimer {
    fn arm(&mut self, period: TimerPeriod) {
        self.armed.push(period);
        self.running = true;
    }

    fn disarm(&mut self) {
        self.running = false;
    }
}

/// Collects every applied action
pub struct Recorder<A> {
    pub actions: Vec<A>,
}

// Derived Default would require `A: Default`
impl<A> Default for Recorder<A> {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
        }
    }
}

impl<A> ActionSink<A> for Recorder<A> {
    type Error = Infallible;

    fn apply(&mut self, action: A) -> Result<(), Infallible> {
        self.actions.push(action);
        Ok(())
    }
}

/// Runner whose timer fires once every time completion is polled
///
/// Stands in for the interrupt: a real sequencer walks the table, but time
/// only advances as fast as the main flow looks at it.
pub struct PolledRunner<A: 'static, S> {
    sequencer: RefCell<Sequencer<A>>,
    pub timer: RefCell<RecordingTimer>,
    pub sink: RefCell<S>,
    pub runs: usize,
}

impl<A: Copy + 'static, S: ActionSink<A>> PolledRunner<A, S> {
    pub fn new(sink: S) -> Self {
        Self {
            sequencer: RefCell::new(Sequencer::new()),
            timer: RefCell::new(RecordingTimer::default()),
            sink: RefCell::new(sink),
            runs: 0,
        }
    }

    pub fn ticks(&self) -> u32 {
        self.sequencer.borrow().ticks()
    }
}

impl<A: Copy + 'static, S: ActionSink<A>> SequenceRunner for PolledRunner<A, S> {
    type Action = A;

    fn start(&mut self, table: &'static [Step<A>]) -> Result<(), SequencerError> {
        self.sequencer.get_mut().start(table, self.timer.get_mut())?;
        self.runs += 1;
        Ok(())
    }

    fn is_complete(&self) -> bool {
        let mut sequencer = self.sequencer.borrow_mut();
        if sequencer.is_active() && self.timer.borrow().running {
            let _ = sequencer.tick(&mut *self.timer.borrow_mut(), &mut *self.sink.borrow_mut());
        }
        sequencer.is_complete()
    }

    fn abort(&mut self) {
        self.sequencer.get_mut().abort(self.timer.get_mut());
    }
}
