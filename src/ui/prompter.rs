//! Terminal input for the chat loop.
//!
//! Everything the loop asks of the user goes through [`Prompter`], so the
//! interaction logic can be driven by a script in tests. The terminal
//! implementation is line based: rustyline for text (with initial values
//! and path completion), rpassword for secrets, and a numbered list for
//! choices.

use std::path::PathBuf;

use crossterm::style::Stylize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, DefaultEditor, Editor, Helper};
use thiserror::Error;

use crate::utils::editor::{edit_in_external_editor, EditorError};
use crate::utils::paths::suggest_paths;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Input interrupted")]
    Interrupted,

    #[error("End of input")]
    Eof,

    #[error("Terminal input failed: {0}")]
    Readline(ReadlineError),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Editor(#[from] EditorError),
}

impl From<ReadlineError> for PromptError {
    fn from(err: ReadlineError) -> Self {
        match err {
            ReadlineError::Interrupted => PromptError::Interrupted,
            ReadlineError::Eof => PromptError::Eof,
            ReadlineError::Io(err) => PromptError::Io(err),
            other => PromptError::Readline(other),
        }
    }
}

impl PromptError {
    /// Cancellations and editor failures end the current action only; a
    /// broken terminal ends the session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PromptError::Readline(_) | PromptError::Io(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    Info,
    Success,
    Warning,
    Error,
}

pub trait Prompter {
    /// Read one line, pre-filled with `initial`.
    fn read_line(&mut self, message: &str, initial: Option<&str>) -> Result<String, PromptError>;

    /// Like [`Prompter::read_line`], with filesystem path completion.
    fn read_path(&mut self, message: &str, initial: Option<&str>) -> Result<String, PromptError>;

    /// Read a secret without echoing it.
    fn read_password(&mut self, message: &str) -> Result<String, PromptError>;

    /// Pick one of `choices`; returns its index.
    fn select(&mut self, message: &str, choices: &[String]) -> Result<usize, PromptError>;

    /// Let the user edit `initial` in a full editor.
    fn edit_text(&mut self, initial: &str, extension: Option<&str>) -> Result<String, PromptError>;

    fn notify(&mut self, notice: Notice, text: &str);
}

pub struct TerminalPrompter {
    lines: DefaultEditor,
    paths: Editor<PathHelper, DefaultHistory>,
}

impl TerminalPrompter {
    pub fn new() -> Result<Self, PromptError> {
        let lines = DefaultEditor::new()?;
        let mut paths = Editor::<PathHelper, DefaultHistory>::new()?;
        paths.set_helper(Some(PathHelper));
        Ok(Self { lines, paths })
    }
}

fn prompt_text(message: &str) -> String {
    format!("{} {} ", "?".green().bold(), message.bold())
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, message: &str, initial: Option<&str>) -> Result<String, PromptError> {
        let line = self
            .lines
            .readline_with_initial(&prompt_text(message), (initial.unwrap_or_default(), ""))?;
        if !line.trim().is_empty() {
            let _ = self.lines.add_history_entry(line.as_str());
        }
        Ok(line)
    }

    fn read_path(&mut self, message: &str, initial: Option<&str>) -> Result<String, PromptError> {
        Ok(self
            .paths
            .readline_with_initial(&prompt_text(message), (initial.unwrap_or_default(), ""))?)
    }

    fn read_password(&mut self, message: &str) -> Result<String, PromptError> {
        Ok(rpassword::prompt_password(prompt_text(message))?)
    }

    fn select(&mut self, message: &str, choices: &[String]) -> Result<usize, PromptError> {
        println!("{}", prompt_text(message));
        for (index, choice) in choices.iter().enumerate() {
            println!("  {} {choice}", format!("{:>2})", index + 1).cyan());
        }

        loop {
            let answer = self
                .lines
                .readline_with_initial(&prompt_text("Choice:"), ("1", ""))?;
            match answer.trim().parse::<usize>() {
                Ok(number) if (1..=choices.len()).contains(&number) => return Ok(number - 1),
                _ => self.notify(
                    Notice::Warning,
                    &format!("Enter a number between 1 and {}", choices.len()),
                ),
            }
        }
    }

    fn edit_text(&mut self, initial: &str, extension: Option<&str>) -> Result<String, PromptError> {
        Ok(edit_in_external_editor(initial, extension)?)
    }

    fn notify(&mut self, notice: Notice, text: &str) {
        match notice {
            Notice::Info => println!("{text}"),
            Notice::Success => println!("{}", text.green()),
            Notice::Warning => eprintln!("{}", text.yellow()),
            Notice::Error => eprintln!("{}", text.red()),
        }
    }
}

/// Completes the whole line as a path relative to the working directory.
pub struct PathHelper;

impl Completer for PathHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let candidates = suggest_paths(&line[..pos], &cwd)
            .into_iter()
            .map(|path| Pair {
                display: path.clone(),
                replacement: path,
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for PathHelper {
    type Hint = String;
}

impl Highlighter for PathHelper {}

impl Validator for PathHelper {}

impl Helper for PathHelper {}
