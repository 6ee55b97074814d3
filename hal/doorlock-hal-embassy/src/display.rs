//! Character display shared between the main flow and the timer task
//!
//! Each call takes the lock for its duration, so a screen action fired by
//! the timer never interleaves with a half-written line from the main flow.

use core::cell::RefCell;

use doorlock_core::traits::CharDisplay;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Lock-protected display cell, usually in a `StaticCell`
pub type DisplayCell<D> = Mutex<CriticalSectionRawMutex, RefCell<D>>;

/// [`CharDisplay`] handle onto a [`DisplayCell`]
pub struct SharedDisplay<'a, D> {
    cell: &'a DisplayCell<D>,
}

impl<'a, D> SharedDisplay<'a, D> {
    pub fn new(cell: &'a DisplayCell<D>) -> Self {
        Self { cell }
    }
}

impl<D> Clone for SharedDisplay<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for SharedDisplay<'_, D> {}

impl<D: CharDisplay> SharedDisplay<'_, D> {
    fn with<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        self.cell.lock(|display| f(&mut display.borrow_mut()))
    }
}

impl<D: CharDisplay> CharDisplay for SharedDisplay<'_, D> {
    type Error = D::Error;

    fn show_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), D::Error> {
        self.with(|d| d.show_text(row, col, text))
    }

    fn clear(&mut self) -> Result<(), D::Error> {
        self.with(|d| d.clear())
    }

    fn put_char(&mut self, c: char) -> Result<(), D::Error> {
        self.with(|d| d.put_char(c))
    }

    fn move_cursor(&mut self, row: u8, col: u8) -> Result<(), D::Error> {
        self.with(|d| d.move_cursor(row, col))
    }

    fn show_lines(&mut self, first: &str, second: &str) -> Result<(), D::Error> {
        self.with(|d| d.show_lines(first, second))
    }
}
