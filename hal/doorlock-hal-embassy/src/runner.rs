//! Sequencer shared between the main flow and the timer task

use core::cell::RefCell;

use doorlock_core::sequencer::{
    ActionSink, SequenceRunner, Sequencer, SequencerError, Step, TickOutcome,
};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::timer::{SignalTimer, TimerSignal};

/// Static home of one node's sequencer
pub struct SequencerCell<A: 'static> {
    sequencer: Mutex<CriticalSectionRawMutex, RefCell<Sequencer<A>>>,
    timer: TimerSignal,
}

impl<A: Copy + 'static> SequencerCell<A> {
    pub const fn new() -> Self {
        Self {
            sequencer: Mutex::new(RefCell::new(Sequencer::new())),
            timer: TimerSignal::new(),
        }
    }

    /// Commands for the timer task
    pub fn timer_signal(&self) -> &TimerSignal {
        &self.timer
    }

    /// Main-flow handle
    pub fn handle(&self) -> SequencerHandle<'_, A> {
        SequencerHandle { cell: self }
    }

    /// Fire the sequencer once; called by the timer task
    pub fn tick<S: ActionSink<A>>(&self, sink: &mut S) -> Result<TickOutcome<A>, S::Error> {
        let mut timer = SignalTimer::new(&self.timer);
        self.sequencer
            .lock(|sequencer| sequencer.borrow_mut().tick(&mut timer, sink))
    }
}

impl<A: Copy + 'static> Default for SequencerCell<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// [`SequenceRunner`] over a [`SequencerCell`]
#[derive(Clone, Copy)]
pub struct SequencerHandle<'a, A: 'static> {
    cell: &'a SequencerCell<A>,
}

impl<A: Copy + 'static> SequenceRunner for SequencerHandle<'_, A> {
    type Action = A;

    fn start(&mut self, table: &'static [Step<A>]) -> Result<(), SequencerError> {
        let mut timer = SignalTimer::new(&self.cell.timer);
        self.cell
            .sequencer
            .lock(|sequencer| sequencer.borrow_mut().start(table, &mut timer))
    }

    fn is_complete(&self) -> bool {
        self.cell
            .sequencer
            .lock(|sequencer| sequencer.borrow().is_complete())
    }

    fn abort(&mut self) {
        let mut timer = SignalTimer::new(&self.cell.timer);
        self.cell
            .sequencer
            .lock(|sequencer| sequencer.borrow_mut().abort(&mut timer))
    }
}
