//! Doubles for the chat loop's collaborators.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::{CompletionClient, CompletionError};
use crate::core::message::Message;
use crate::ui::prompter::{Notice, PromptError, Prompter};
use crate::ui::render::Renderer;

/// One scripted answer. Each prompter call consumes the next entry and
/// panics if it is of the wrong kind.
#[derive(Debug)]
pub enum Scripted {
    Line(String),
    Path(String),
    Password(String),
    Select(usize),
    Edit(String),
    Interrupt,
}

#[derive(Default)]
pub struct ScriptedPrompter {
    script: VecDeque<Scripted>,
    /// `(message, initial)` for every line and path prompt.
    pub prompts: Vec<(String, Option<String>)>,
    pub selections: Vec<(String, Vec<String>)>,
    pub edits: Vec<(String, Option<String>)>,
    pub notices: Vec<(Notice, String)>,
}

impl Scripted {
    pub fn line(text: impl Into<String>) -> Self {
        Scripted::Line(text.into())
    }

    pub fn path(text: impl Into<String>) -> Self {
        Scripted::Path(text.into())
    }

    pub fn password(text: impl Into<String>) -> Self {
        Scripted::Password(text.into())
    }

    pub fn edit(text: impl Into<String>) -> Self {
        Scripted::Edit(text.into())
    }
}

impl ScriptedPrompter {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: script.into(),
            ..Default::default()
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.script.is_empty()
    }

    fn next(&mut self, wanted: &str) -> Scripted {
        self.script
            .pop_front()
            .unwrap_or_else(|| panic!("script exhausted while waiting for {wanted}"))
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, message: &str, initial: Option<&str>) -> Result<String, PromptError> {
        self.prompts
            .push((message.to_string(), initial.map(str::to_string)));
        match self.next("a line") {
            Scripted::Line(line) => Ok(line),
            Scripted::Interrupt => Err(PromptError::Interrupted),
            other => panic!("expected a line answer, script has {other:?}"),
        }
    }

    fn read_path(&mut self, message: &str, initial: Option<&str>) -> Result<String, PromptError> {
        self.prompts
            .push((message.to_string(), initial.map(str::to_string)));
        match self.next("a path") {
            Scripted::Path(path) => Ok(path),
            Scripted::Interrupt => Err(PromptError::Interrupted),
            other => panic!("expected a path answer, script has {other:?}"),
        }
    }

    fn read_password(&mut self, _message: &str) -> Result<String, PromptError> {
        match self.next("a password") {
            Scripted::Password(password) => Ok(password),
            Scripted::Interrupt => Err(PromptError::Interrupted),
            other => panic!("expected a password answer, script has {other:?}"),
        }
    }

    fn select(&mut self, message: &str, choices: &[String]) -> Result<usize, PromptError> {
        self.selections.push((message.to_string(), choices.to_vec()));
        match self.next("a selection") {
            Scripted::Select(index) => {
                assert!(index < choices.len(), "selection {index} out of range");
                Ok(index)
            }
            Scripted::Interrupt => Err(PromptError::Interrupted),
            other => panic!("expected a selection, script has {other:?}"),
        }
    }

    fn edit_text(&mut self, initial: &str, extension: Option<&str>) -> Result<String, PromptError> {
        self.edits
            .push((initial.to_string(), extension.map(str::to_string)));
        match self.next("an edit") {
            Scripted::Edit(text) => Ok(text),
            Scripted::Interrupt => Err(PromptError::Interrupted),
            other => panic!("expected an edit, script has {other:?}"),
        }
    }

    fn notify(&mut self, notice: Notice, text: &str) {
        self.notices.push((notice, text.to_string()));
    }
}

/// Completion client replaying canned results and recording what it was sent.
#[derive(Default)]
pub struct StubClient {
    replies: Mutex<VecDeque<Result<Message, CompletionError>>>,
    pub requests: Mutex<Vec<(String, Vec<Message>)>>,
}

impl StubClient {
    pub fn replying(replies: Vec<Result<Message, CompletionError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for StubClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<Message, CompletionError> {
        self.requests
            .lock()
            .unwrap()
            .push((model.to_string(), messages.to_vec()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(CompletionError::NoChoices))
    }
}

/// Lets a test keep a handle on the stub after boxing it into a session.
#[async_trait]
impl CompletionClient for Arc<StubClient> {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<Message, CompletionError> {
        <StubClient as CompletionClient>::complete(self, model, messages).await
    }
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub rendered: Vec<String>,
}

impl Renderer for RecordingRenderer {
    fn render_markdown(&mut self, markdown: &str) {
        self.rendered.push(markdown.to_string());
    }
}
