//! Line-oriented prompts
//!
//! Every prompt reads from a [`BufRead`] and writes to a [`Write`], so menus
//! run the same against a terminal or an in-memory script. End of input is
//! reported as `None` (or the "leave" answer) rather than an error.

use mvb_common::Result;
use std::fmt::Display;
use std::io::{BufRead, Write};

/// Shown before every numeric selection
pub const SELECT_HINT: &str =
    "To select one of the results, enter the number to its left, or enter 0 to return to the previous menu.";

/// Prompt reader/writer pair
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print one line
    pub fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Print a question without a newline and read the answer
    ///
    /// The trailing line terminator is stripped; `None` means end of input.
    pub fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Read a number in `0..=limit`, re-prompting until one is given
    ///
    /// 0 means "back"; end of input also yields 0.
    pub fn select(&mut self, limit: usize) -> Result<usize> {
        self.say(SELECT_HINT)?;

        loop {
            let Some(answer) = self.ask("Enter your selection: ")? else {
                return Ok(0);
            };

            match answer.trim().parse::<i64>() {
                Err(_) => self.say("Please enter an integer.")?,
                Ok(n) if n < 0 || n as u64 > limit as u64 => {
                    self.say("Please enter a number that matches one of the options.")?
                }
                Ok(n) => return Ok(n as usize),
            }
        }
    }

    /// Ask until the answer is exactly `y` or `n`
    pub fn yes_no(&mut self, question: &str) -> Result<Option<bool>> {
        let mut answer = self.ask(question)?;

        loop {
            match answer.as_deref() {
                None => return Ok(None),
                Some("y") => return Ok(Some(true)),
                Some("n") => return Ok(Some(false)),
                Some(_) => answer = self.ask("Please enter y or n: ")?,
            }
        }
    }

    /// True only for an answer of exactly `y`
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self.ask(question)?.as_deref() == Some("y"))
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompt(script: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    fn printed(prompt: Prompt<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(prompt.into_output()).unwrap()
    }

    #[test]
    fn test_ask_strips_line_endings() {
        let mut p = prompt("hello\r\nworld\n");
        assert_eq!(p.ask("? ").unwrap().as_deref(), Some("hello"));
        assert_eq!(p.ask("? ").unwrap().as_deref(), Some("world"));
        assert_eq!(p.ask("? ").unwrap(), None);
    }

    #[test]
    fn test_ask_keeps_inner_whitespace() {
        let mut p = prompt("  the matrix \n");
        assert_eq!(p.ask("").unwrap().as_deref(), Some("  the matrix "));
    }

    #[test]
    fn test_select_reprompts_until_in_range() {
        let mut p = prompt("abc\n-1\n4\n3\n");
        assert_eq!(p.select(3).unwrap(), 3);

        let out = printed(p);
        assert!(out.contains(SELECT_HINT));
        assert_eq!(out.matches("Please enter an integer.").count(), 1);
        assert_eq!(
            out.matches("Please enter a number that matches one of the options.").count(),
            2
        );
    }

    #[test]
    fn test_select_zero_and_eof_mean_back() {
        assert_eq!(prompt("0\n").select(5).unwrap(), 0);
        assert_eq!(prompt("").select(5).unwrap(), 0);
        assert_eq!(prompt("x\n").select(5).unwrap(), 0);
    }

    #[test]
    fn test_select_with_empty_list_only_accepts_zero() {
        let mut p = prompt("1\n0\n");
        assert_eq!(p.select(0).unwrap(), 0);
        assert!(printed(p).contains("matches one of the options"));
    }

    #[test]
    fn test_yes_no_insists_on_y_or_n() {
        let mut p = prompt("yes\nN\nn\n");
        assert_eq!(p.yes_no("Watched? ").unwrap(), Some(false));
        assert_eq!(printed(p).matches("Please enter y or n").count(), 2);
    }

    #[test]
    fn test_yes_no_eof() {
        assert_eq!(prompt("maybe\n").yes_no("? ").unwrap(), None);
    }

    #[test]
    fn test_confirm_requires_exact_y() {
        assert!(prompt("y\n").confirm("? ").unwrap());
        assert!(!prompt("Y\n").confirm("? ").unwrap());
        assert!(!prompt("").confirm("? ").unwrap());
    }
}
