//! Live terminal view.
//!
//! Each reading overwrites the previous two-line display in place using ANSI
//! cursor control, so the terminal always shows the most recent frame only.

use crate::output::FrameSink;
use std::io::{self, Write};

/// Clear the whole current line and return the cursor to column 0.
const ERASE_LINE: &str = "\x1b[2K\r";
/// Move the cursor up one line.
const CURSOR_UP: &str = "\x1b[A";

const WAITING: &str = "Waiting...";

/// Writes readings to a terminal, replacing the previous one.
#[derive(Debug)]
pub struct Terminal<W: Write> {
    out: W,
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for Terminal<W> {
    fn show_reading(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{ERASE_LINE}{CURSOR_UP}{ERASE_LINE}{text}")?;
        self.out.flush()
    }

    fn show_waiting(&mut self) -> io::Result<()> {
        write!(self.out, "{ERASE_LINE}{WAITING}")?;
        self.out.flush()
    }

    fn show_notice(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_rewrites_previous_display() {
        let mut terminal = Terminal::new(Vec::<u8>::new());
        terminal.show_reading("+0123uV\nAuto ").unwrap();

        let out = String::from_utf8(terminal.into_inner()).unwrap();
        assert_eq!(out, "\x1b[2K\r\x1b[A\x1b[2K\r+0123uV\nAuto ");
    }

    #[test]
    fn test_waiting_indicator() {
        let mut terminal = Terminal::new(Vec::<u8>::new());
        terminal.show_waiting().unwrap();

        let out = String::from_utf8(terminal.into_inner()).unwrap();
        assert_eq!(out, "\x1b[2K\rWaiting...");
    }

    #[test]
    fn test_notice_ends_with_newline() {
        let mut terminal = Terminal::new(Vec::<u8>::new());
        terminal.show_notice("Listening (stdin)").unwrap();

        let out = String::from_utf8(terminal.into_inner()).unwrap();
        assert_eq!(out, "Listening (stdin)\n");
    }
}
