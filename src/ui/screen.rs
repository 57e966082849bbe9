use std::io::{self, Write};

use crossterm::cursor::{MoveLeft, MoveRight, RestorePosition, SavePosition};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

/// Incremental renderer for the edited line.
///
/// The screen knows nothing about the buffer. Callers pass the cursor
/// column and the bytes to draw; every token is one column wide. Output is
/// queued and only reaches the terminal on [`Screen::flush`].
#[derive(Debug)]
pub struct Screen<W: Write> {
    out: W,
}

/// Clamp a column count to what a single cursor command can carry.
fn cols(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

impl<W: Write> Screen<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Move the cursor from column `from` to column `to` of the line.
    ///
    /// Emits nothing when the columns are equal.
    ///
    /// # Errors
    /// Returns an error if writing to the sink fails.
    pub fn move_cursor(&mut self, from: usize, to: usize) -> io::Result<()> {
        if to < from {
            queue!(self.out, MoveLeft(cols(from - to)))
        } else if to > from {
            queue!(self.out, MoveRight(cols(to - from)))
        } else {
            Ok(())
        }
    }

    /// Write raw bytes at the cursor.
    ///
    /// # Errors
    /// Returns an error if writing to the sink fails.
    pub fn put(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)
    }

    /// Draw a token that was spliced in, then redraw the shifted tail.
    ///
    /// The cursor ends just after the new token.
    ///
    /// # Errors
    /// Returns an error if writing to the sink fails.
    pub fn splice(&mut self, token: &[u8], tail: &[u8]) -> io::Result<()> {
        self.out.write_all(token)?;
        self.redraw_tail(tail)
    }

    /// Erase the column left of the cursor and pull `tail` in after it.
    ///
    /// # Errors
    /// Returns an error if writing to the sink fails.
    pub fn erase_before(&mut self, tail: &[u8]) -> io::Result<()> {
        queue!(self.out, MoveLeft(1))?;
        self.redraw_tail(tail)
    }

    /// Erase the column under the cursor and pull `tail` in.
    ///
    /// # Errors
    /// Returns an error if writing to the sink fails.
    pub fn erase_at(&mut self, tail: &[u8]) -> io::Result<()> {
        self.redraw_tail(tail)
    }

    /// Redraw the whole line with the cursor at `cursor` first and the end
    /// of `line` afterwards.
    ///
    /// # Errors
    /// Returns an error if writing to the sink fails.
    pub fn redraw_line(&mut self, cursor: usize, line: &[u8]) -> io::Result<()> {
        self.move_cursor(cursor, 0)?;
        queue!(self.out, Clear(ClearType::UntilNewLine))?;
        self.out.write_all(line)
    }

    /// # Errors
    /// Returns an error if writing to the sink fails.
    pub fn newline(&mut self) -> io::Result<()> {
        self.out.write_all(b"\n")
    }

    /// # Errors
    /// Returns an error if flushing the sink fails.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Clear from the cursor to the end of the line, draw `tail`, and put
    /// the cursor back where it was.
    fn redraw_tail(&mut self, tail: &[u8]) -> io::Result<()> {
        queue!(self.out, SavePosition, Clear(ClearType::UntilNewLine))?;
        self.out.write_all(tail)?;
        queue!(self.out, RestorePosition)
    }

    pub(super) fn out_mut(&mut self) -> &mut W {
        &mut self.out
    }
}
