//! Prompted, validated console input and plain console output
//!
//! [`Console`] reads whitespace-delimited tokens the way an interactive prompt
//! expects: a token that does not parse as the requested type is consumed, the
//! matching message from [`ConsoleMessages`] is printed, and reading continues
//! until a valid token arrives. After a typed read the rest of that input line
//! is discarded, so the next [`Console::read_line`] starts on a fresh line.
//!
//! The input side is a scoped resource: [`Console::close`] releases it once and
//! every read afterwards fails with [`ConsoleError::Closed`].
//!
//! ```rust,no_run
//! use trion::Console;
//!
//! let mut console = Console::stdio();
//! let age = console.read_int_prompt("Age: ")?;
//! console.write_line(format!("next year you will be {}", age + 1))?;
//! console.close();
//! # Ok::<(), trion::ConsoleError>(())
//! ```

use crate::config::ConsoleMessages;
use std::fmt::Display;
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("console input was already closed")]
    Closed,

    #[error("console input ended before a valid value was entered")]
    Eof,

    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

pub struct Console<R, W> {
    input: Option<R>,
    output: W,
    // Unread remainder of the current input line, if a token read stopped mid-line
    pending: Option<String>,
    messages: ConsoleMessages,
}

impl Console<StdinLock<'static>, Stdout> {
    /// Console bound to the process stdin and stdout
    pub fn stdio() -> Self {
        Console::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Some(input),
            output,
            pending: None,
            messages: ConsoleMessages::default(),
        }
    }

    pub fn with_messages(mut self, messages: ConsoleMessages) -> Self {
        self.messages = messages;
        self
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn is_closed(&self) -> bool {
        self.input.is_none()
    }

    /// Release the input. Returns false if it was already released.
    pub fn close(&mut self) -> bool {
        self.pending = None;
        self.input.take().is_some()
    }

    pub fn write(&mut self, value: impl Display) -> Result<()> {
        write!(self.output, "{}", value)?;
        self.output.flush()?;
        Ok(())
    }

    pub fn write_line(&mut self, value: impl Display) -> Result<()> {
        writeln!(self.output, "{}", value)?;
        self.output.flush()?;
        Ok(())
    }

    pub fn new_line(&mut self) -> Result<()> {
        self.write_line("")
    }

    /// Rest of the current line, or the next line, without its terminator
    pub fn read_line(&mut self) -> Result<String> {
        self.ensure_open()?;
        match self.pending.take() {
            Some(rest) => Ok(rest),
            None => self.next_line(),
        }
    }

    pub fn read_line_prompt(&mut self, prompt: &str) -> Result<String> {
        self.prompt(prompt)?;
        self.read_line()
    }

    pub fn read_int(&mut self) -> Result<i32> {
        let message = self.messages.invalid_int.clone();
        self.read_parsed(parse_number, &message)
    }

    pub fn read_int_prompt(&mut self, prompt: &str) -> Result<i32> {
        self.prompt(prompt)?;
        self.read_int()
    }

    pub fn read_long(&mut self) -> Result<i64> {
        let message = self.messages.invalid_long.clone();
        self.read_parsed(parse_number, &message)
    }

    pub fn read_long_prompt(&mut self, prompt: &str) -> Result<i64> {
        self.prompt(prompt)?;
        self.read_long()
    }

    pub fn read_float(&mut self) -> Result<f32> {
        let message = self.messages.invalid_float.clone();
        self.read_parsed(parse_number, &message)
    }

    pub fn read_float_prompt(&mut self, prompt: &str) -> Result<f32> {
        self.prompt(prompt)?;
        self.read_float()
    }

    pub fn read_double(&mut self) -> Result<f64> {
        let message = self.messages.invalid_double.clone();
        self.read_parsed(parse_number, &message)
    }

    pub fn read_double_prompt(&mut self, prompt: &str) -> Result<f64> {
        self.prompt(prompt)?;
        self.read_double()
    }

    /// Accepts `true` or `false` in any letter case
    pub fn read_bool(&mut self) -> Result<bool> {
        let message = self.messages.invalid_bool.clone();
        self.read_parsed(parse_bool, &message)
    }

    pub fn read_bool_prompt(&mut self, prompt: &str) -> Result<bool> {
        self.prompt(prompt)?;
        self.read_bool()
    }

    /// First character of the next token
    pub fn read_char(&mut self) -> Result<char> {
        self.read_parsed(|token| token.chars().next(), "")
    }

    pub fn read_char_prompt(&mut self, prompt: &str) -> Result<char> {
        self.prompt(prompt)?;
        self.read_char()
    }

    fn prompt(&mut self, prompt: &str) -> Result<()> {
        self.ensure_open()?;
        self.write(prompt)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.input.is_none() {
            return Err(ConsoleError::Closed);
        }
        Ok(())
    }

    fn read_parsed<T>(&mut self, parse: impl Fn(&str) -> Option<T>, invalid: &str) -> Result<T> {
        loop {
            let token = self.next_token()?;
            if let Some(value) = parse(&token) {
                // Drop the line feed and anything else typed on that line
                self.pending = None;
                return Ok(value);
            }
            self.write_line(invalid)?;
        }
    }

    fn next_token(&mut self) -> Result<String> {
        loop {
            let line = match self.pending.take() {
                Some(rest) => rest,
                None => self.next_line()?,
            };

            let trimmed = line.trim_start();
            if trimmed.is_empty() {
                continue;
            }

            let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
            self.pending = Some(trimmed[end..].to_string());
            return Ok(trimmed[..end].to_string());
        }
    }

    fn next_line(&mut self) -> Result<String> {
        let input = self.input.as_mut().ok_or(ConsoleError::Closed)?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(ConsoleError::Eof);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }
}

fn parse_number<T: FromStr>(token: &str) -> Option<T> {
    token.parse().ok()
}

fn parse_bool(token: &str) -> Option<bool> {
    if token.eq_ignore_ascii_case("true") {
        Some(true)
    } else if token.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_tokens_span_lines() {
        let mut console = console("\n   \n  7\n");
        assert_eq!(console.read_int().unwrap(), 7);
    }

    #[test]
    fn test_typed_read_discards_rest_of_line() {
        let mut console = console("5 6 7\nnext line\n");
        assert_eq!(console.read_int().unwrap(), 5);
        assert_eq!(console.read_line().unwrap(), "next line");
    }

    #[test]
    fn test_invalid_tokens_on_same_line_are_skipped_one_by_one() {
        let mut console = console("x y 3\n");
        assert_eq!(console.read_long().unwrap(), 3);

        let shown = String::from_utf8(console.output().clone()).unwrap();
        assert_eq!(shown.lines().count(), 2);
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut console = console("hello\r\n");
        assert_eq!(console.read_line().unwrap(), "hello");
    }

    #[test]
    fn test_parse_bool_ignores_case() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("False"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }
}
