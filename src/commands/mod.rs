//! Turning a typed line into something the chat loop can act on.
//!
//! Lines starting with `!` are directives: the first word after the `!` is
//! the directive name and the remaining words are its arguments. `!!` is the
//! inline shell directive, so `!!ls -la` runs `ls -la`. Anything else that
//! is not blank is a question for the model.

mod registry;

pub use registry::{all_directives, find_directive, DirectiveKind, DirectiveSpec};

use std::path::PathBuf;

use thiserror::Error;

use crate::ui::prompter::{Notice, PromptError, Prompter};
use crate::utils::paths::expand_tilde;


/// Prompt phrasing only: the first question is asked differently from the rest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionState {
    #[default]
    Initial,
    FollowUp,
}

impl InteractionState {
    pub fn prompt(self) -> &'static str {
        match self {
            InteractionState::Initial => "What's up?",
            InteractionState::FollowUp => "Anything else?",
        }
    }
}

/// A `!name arg ...` line split into its parts.
#[derive(Debug, PartialEq, Eq)]
pub struct DirectiveInvocation<'a> {
    pub name: &'a str,
    pub args: Vec<&'a str>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Directive {
    File(Option<String>),
    Save,
    Exit,
    Execute,
    Edit,
    Inline(Vec<String>),
}

#[derive(Debug, PartialEq, Eq)]
pub enum ParsedInput {
    Empty,
    Question(String),
    Directive(Directive),
    Unknown(String),
}

/// Work for the chat loop, produced by [`read_action`].
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Question(String),
    File { path: String, content: String },
    Save,
    Execute,
    Edit,
    ExecuteInline(Vec<String>),
    Exit,
}

#[derive(Debug, Error)]
#[error("Failed to load file {}: {source}", path.display())]
pub struct FileLoadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

pub fn split_directive(line: &str) -> Option<DirectiveInvocation<'_>> {
    let body = line.strip_prefix('!')?;
    let (name, rest) = if let Some(rest) = body.strip_prefix('!') {
        ("!", rest)
    } else {
        match body.find(char::is_whitespace) {
            Some(end) => (&body[..end], &body[end..]),
            None => (body, ""),
        }
    };

    Some(DirectiveInvocation {
        name,
        args: rest.split_whitespace().collect(),
    })
}

pub fn parse_input(line: &str) -> ParsedInput {
    let line = line.trim();
    if line.is_empty() {
        return ParsedInput::Empty;
    }

    let Some(invocation) = split_directive(line) else {
        return ParsedInput::Question(line.to_string());
    };

    let Some(known) = find_directive(invocation.name) else {
        return ParsedInput::Unknown(invocation.name.to_string());
    };

    let directive = match known.kind {
        DirectiveKind::File => Directive::File(invocation.args.first().map(|s| s.to_string())),
        DirectiveKind::Save => Directive::Save,
        DirectiveKind::Exit => Directive::Exit,
        DirectiveKind::Execute => Directive::Execute,
        DirectiveKind::Edit => Directive::Edit,
        DirectiveKind::Inline => {
            Directive::Inline(invocation.args.iter().map(|s| s.to_string()).collect())
        }
    };
    ParsedInput::Directive(directive)
}

/// Prompt until the user produces an action. Unknown directives and failed
/// file loads are reported and re-prompted; interrupt or end-of-input at the
/// main prompt means exit.
pub fn read_action(
    prompter: &mut dyn Prompter,
    state: &mut InteractionState,
) -> Result<Action, PromptError> {
    loop {
        let line = match prompter.read_line(state.prompt(), None) {
            Ok(line) => line,
            Err(PromptError::Interrupted | PromptError::Eof) => return Ok(Action::Exit),
            Err(err) => return Err(err),
        };

        let directive = match parse_input(&line) {
            ParsedInput::Empty => continue,
            ParsedInput::Question(question) => {
                *state = InteractionState::FollowUp;
                return Ok(Action::Question(question));
            }
            ParsedInput::Unknown(name) => {
                prompter.notify(Notice::Error, &unknown_directive_message(&name));
                continue;
            }
            ParsedInput::Directive(directive) => directive,
        };

        let action = match directive {
            Directive::File(path) => match load_file(prompter, path) {
                Ok(Some(action)) => action,
                Ok(None) => continue,
                Err(err) => {
                    prompter.notify(Notice::Error, &err.to_string());
                    continue;
                }
            },
            Directive::Save => Action::Save,
            Directive::Exit => Action::Exit,
            Directive::Execute => Action::Execute,
            Directive::Edit => Action::Edit,
            Directive::Inline(words) => Action::ExecuteInline(words),
        };
        return Ok(action);
    }
}

fn load_file(
    prompter: &mut dyn Prompter,
    path: Option<String>,
) -> Result<Option<Action>, FileLoadError> {
    let path = match path {
        Some(path) => path,
        None => match prompter.read_path("File to load:", None) {
            Ok(path) if !path.trim().is_empty() => path.trim().to_string(),
            Ok(_) | Err(PromptError::Interrupted | PromptError::Eof) => return Ok(None),
            Err(err) => {
                prompter.notify(Notice::Error, &err.to_string());
                return Ok(None);
            }
        },
    };

    let resolved = expand_tilde(&path);
    let content = std::fs::read_to_string(&resolved).map_err(|source| FileLoadError {
        path: resolved.clone(),
        source,
    })?;

    Ok(Some(Action::File { path, content }))
}

fn unknown_directive_message(name: &str) -> String {
    let known = all_directives()
        .iter()
        .map(|directive| directive.usage)
        .collect::<Vec<_>>()
        .join(", ");
    format!("Unknown directive: {name} (try {known})")
}
