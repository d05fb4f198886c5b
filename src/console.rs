//! Line-oriented terminal I/O used by the menus

use std::fmt::Display;
use std::io::{BufRead, Write};

use crossterm::style::{style, Stylize};

use crate::{Error, Result};

/// Table width used when the terminal size is unknown.
pub const DEFAULT_WIDTH: u16 = 100;

pub struct Console<R, W> {
    input: R,
    output: W,
    color: bool,
    width: u16,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            color: false,
            width: DEFAULT_WIDTH,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    pub fn success(&mut self, text: &str) -> Result<()> {
        if self.color {
            writeln!(self.output, "{}", style(text).green())?;
        } else {
            writeln!(self.output, "{text}")?;
        }
        Ok(())
    }

    pub fn failure(&mut self, text: &str) -> Result<()> {
        if self.color {
            writeln!(self.output, "{}", style(text).red())?;
        } else {
            writeln!(self.output, "{text}")?;
        }
        Ok(())
    }

    pub fn warning(&mut self, text: &str) -> Result<()> {
        if self.color {
            writeln!(self.output, "{}", style(text).yellow())?;
        } else {
            writeln!(self.output, "{text}")?;
        }
        Ok(())
    }

    /// Prints `message` without a newline and reads one line of input with
    /// the line ending removed. Fails with `InputClosed` at end of input.
    pub fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(Error::InputClosed);
        }
        let len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(len);
        Ok(line)
    }

    /// Like `prompt`, but parses an integer. Non-numeric input yields `None`.
    pub fn prompt_number(&mut self, message: &str) -> Result<Option<i64>> {
        let line = self.prompt(message)?;
        Ok(line.trim().parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console(input: &str) -> Console<&[u8], Vec<u8>> {
        Console::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn test_prompt_strips_line_ending() {
        let mut console = console("  spaced title \r\nnext\n");
        assert_eq!(console.prompt("Title: ").unwrap(), "  spaced title ");
        assert_eq!(console.prompt("Again: ").unwrap(), "next");
        let output = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(output, "Title: Again: ");
    }

    #[test]
    fn test_prompt_number() {
        let mut console = console(" 7 \nabc\n\n");
        assert_eq!(console.prompt_number("> ").unwrap(), Some(7));
        assert_eq!(console.prompt_number("> ").unwrap(), None);
        assert_eq!(console.prompt_number("> ").unwrap(), None);
    }

    #[test]
    fn test_prompt_at_end_of_input() {
        let mut console = console("");
        assert!(matches!(console.prompt("> "), Err(Error::InputClosed)));
    }

    #[test]
    fn test_plain_output_has_no_escape_codes() {
        let mut console = console("");
        console.success("saved").unwrap();
        console.failure("failed").unwrap();
        let output = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(output, "saved\nfailed\n");
    }

    #[test]
    fn test_colored_failure() {
        let mut console = console("").with_color(true);
        console.failure("failed").unwrap();
        let output = String::from_utf8(console.into_output()).unwrap();
        assert!(output.contains("failed"));
    }
}
