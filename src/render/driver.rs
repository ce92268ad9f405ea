//! Crossterm terminal backend.
//!
//! The `Driver` wraps a buffered stdout writer and provides methods for entering and
//! leaving raw mode / the alternate screen, applying cell updates from the compositor,
//! controlling the cursor, and blocking on the next input event.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor, event, execute, queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};

use super::cell::Attr;
use super::compositor::CellUpdate;
use crate::event::input::InputEvent;

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Terminal output backend using crossterm.
///
/// Wraps a `BufWriter<Stdout>` for batched writes. The driver does NOT touch the
/// terminal mode on creation; call [`enter`](Self::enter) explicitly.
pub struct Driver {
    writer: BufWriter<Stdout>,
    alternate_screen: bool,
    entered: bool,
}

impl Driver {
    /// Create a new driver wrapping stdout.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            writer: BufWriter::new(io::stdout()),
            alternate_screen: false,
            entered: false,
        })
    }

    /// Enable raw mode, optionally switching to the alternate screen.
    pub fn enter(&mut self, alternate_screen: bool) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        if alternate_screen {
            execute!(self.writer, EnterAlternateScreen)?;
        }
        execute!(self.writer, terminal::Clear(terminal::ClearType::All))?;
        self.alternate_screen = alternate_screen;
        self.entered = true;
        Ok(())
    }

    /// Restore the terminal to the state it had before [`enter`](Self::enter).
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        execute!(self.writer, SetAttribute(Attribute::Reset), cursor::Show)?;
        if self.alternate_screen {
            execute!(self.writer, LeaveAlternateScreen)?;
        }
        terminal::disable_raw_mode()
    }

    /// Set the terminal window title.
    pub fn set_title(&mut self, title: &str) -> io::Result<()> {
        execute!(self.writer, SetTitle(title))
    }

    /// Apply a batch of cell updates to the terminal.
    ///
    /// For each update, the cursor is moved to the cell's position, the
    /// attributes are applied, and the character is printed. Continuation
    /// cells print nothing: the wide character before them covers them. Uses
    /// `queue!` for batching; call `flush()` afterward to send to the terminal.
    pub fn apply_updates(&mut self, updates: &[CellUpdate]) -> io::Result<()> {
        for update in updates.iter().filter(|update| !update.cell.is_continuation()) {
            queue!(self.writer, cursor::MoveTo(update.x, update.y))?;
            self.apply_attr(update.cell.attr)?;
            queue!(self.writer, Print(update.cell.ch))?;
            queue!(self.writer, SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }

    /// Flush the internal write buffer to the terminal.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Get the terminal size (columns, rows) via crossterm.
    pub fn terminal_size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Show or hide the hardware cursor, placing it at `(x, y)` when shown.
    pub fn place_cursor(&mut self, position: Option<(u16, u16)>) -> io::Result<()> {
        match position {
            Some((x, y)) => queue!(self.writer, cursor::MoveTo(x, y), cursor::Show),
            None => queue!(self.writer, cursor::Hide),
        }
    }

    /// Block until the next key or resize event arrives.
    ///
    /// Events the widgets ignore (mouse, focus, paste, key releases) are
    /// skipped.
    pub fn read_event(&mut self) -> io::Result<InputEvent> {
        loop {
            if let Some(ev) = InputEvent::from_crossterm(event::read()?) {
                return Ok(ev);
            }
        }
    }

    /// Queue crossterm attribute commands for a cell's `Attr`.
    fn apply_attr(&mut self, attr: Attr) -> io::Result<()> {
        if attr.contains(Attr::REVERSE) {
            queue!(self.writer, SetAttribute(Attribute::Reverse))?;
        }
        if attr.contains(Attr::BOLD) {
            queue!(self.writer, SetAttribute(Attribute::Bold))?;
        }
        if attr.contains(Attr::UNDERLINE) {
            queue!(self.writer, SetAttribute(Attribute::Underlined))?;
        }
        if attr.contains(Attr::DIM) {
            queue!(self.writer, SetAttribute(Attribute::Dim))?;
        }
        Ok(())
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        if let Err(err) = self.leave() {
            tracing::warn!("failed to restore terminal: {err}");
        }
    }
}
