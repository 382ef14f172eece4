//! Blocking question/answer seam between the game and whoever plays Rick.
//!
//! Invalid answers are never errors: providers report the rejection and ask
//! again. The only failure is the input going away entirely.
use std::io::{BufRead, Write};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("input closed while waiting for an answer to {prompt:?}")]
    Closed { prompt: String },
    #[error("failed to exchange answer: {0}")]
    Io(#[from] std::io::Error),
}

/// Caller-supplied predicate turning a raw answer into a value or a rejection message.
pub type Validator<'a> = &'a dyn Fn(&str) -> Result<u32, String>;

/// Source of Rick's answers.
pub trait AnswerProvider {
    /// Ask `prompt` until `validate` accepts the answer.
    ///
    /// # Errors
    ///
    /// Returns an error only when no further answers can be obtained.
    fn prompt(&mut self, prompt: &str, validate: Validator<'_>) -> Result<u32, AnswerError>;

    /// Ask for an integer in `[0, range)`.
    ///
    /// # Errors
    ///
    /// Returns an error only when no further answers can be obtained.
    fn prompt_in_range(
        &mut self,
        prompt: &str,
        range: u32,
        rejection: &str,
    ) -> Result<u32, AnswerError> {
        self.prompt(prompt, &|answer| {
            parse_in_range(answer, range).ok_or_else(|| rejection.to_string())
        })
    }

    /// Ask a yes/no question; anything other than `y`/`yes` declines.
    ///
    /// # Errors
    ///
    /// Returns an error only when no further answers can be obtained.
    fn confirm(&mut self, prompt: &str) -> Result<bool, AnswerError> {
        self.prompt(prompt, &|answer| Ok(u32::from(is_affirmative(answer))))
            .map(|value| value == 1)
    }
}

impl<T: AnswerProvider + ?Sized> AnswerProvider for &mut T {
    fn prompt(&mut self, prompt: &str, validate: Validator<'_>) -> Result<u32, AnswerError> {
        (**self).prompt(prompt, validate)
    }
}

/// Parse a trimmed non-negative integer strictly below `range`.
#[must_use]
pub fn parse_in_range(answer: &str, range: u32) -> Option<u32> {
    answer
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|value| *value < range)
}

#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// Line-oriented provider over any reader/writer pair (a terminal, a pipe, a script).
pub struct LineAnswers<R, W> {
    input: R,
    output: W,
    rejection_style: fn(&str) -> String,
}

impl<R: BufRead, W: Write> LineAnswers<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            rejection_style: |message| message.to_string(),
        }
    }

    /// Decorate rejection messages before they are written (e.g. colour them).
    #[must_use]
    pub fn with_rejection_style(mut self, style: fn(&str) -> String) -> Self {
        self.rejection_style = style;
        self
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> AnswerProvider for LineAnswers<R, W> {
    fn prompt(&mut self, prompt: &str, validate: Validator<'_>) -> Result<u32, AnswerError> {
        let mut line = String::new();
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Err(AnswerError::Closed {
                    prompt: prompt.trim().to_string(),
                });
            }
            match validate(line.trim()) {
                Ok(value) => return Ok(value),
                Err(message) => {
                    log::debug!("rejected answer {:?}: {message}", line.trim());
                    writeln!(self.output, "{}", (self.rejection_style)(&message))?;
                }
            }
        }
    }
}
