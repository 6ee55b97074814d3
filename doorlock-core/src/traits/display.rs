//! Character display trait for the HMI node

/// Visible rows
pub const DISPLAY_ROWS: u8 = 2;

/// Visible columns per row
pub const DISPLAY_COLUMNS: u8 = 16;

/// Text-mode character display
///
/// Coordinates are zero-based. Text running past the last column is
/// clipped by the implementation.
pub trait CharDisplay {
    /// Error type for display operations
    type Error;

    /// Write `text` starting at `row`, `col`
    fn show_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), Self::Error>;

    /// Blank the screen and home the cursor
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Write one character at the cursor and advance it
    fn put_char(&mut self, c: char) -> Result<(), Self::Error>;

    /// Move the cursor without writing
    fn move_cursor(&mut self, row: u8, col: u8) -> Result<(), Self::Error>;

    /// Show two lines, clearing the screen first
    fn show_lines(&mut self, first: &str, second: &str) -> Result<(), Self::Error> {
        self.clear()?;
        self.show_text(0, 0, first)?;
        self.show_text(1, 0, second)
    }
}

impl<T: CharDisplay + ?Sized> CharDisplay for &mut T {
    type Error = T::Error;

    fn show_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), Self::Error> {
        T::show_text(self, row, col, text)
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        T::clear(self)
    }

    fn put_char(&mut self, c: char) -> Result<(), Self::Error> {
        T::put_char(self, c)
    }

    fn move_cursor(&mut self, row: u8, col: u8) -> Result<(), Self::Error> {
        T::move_cursor(self, row, col)
    }
}
