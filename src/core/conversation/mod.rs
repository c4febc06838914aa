//! The append-only transcript sent to the completion endpoint.
//!
//! Every append that documents code (loaded files, executed scripts, inline
//! commands) also registers that code in the [`FileCache`], and every
//! assistant reply is scanned for fenced blocks, so the cache always mirrors
//! the code that appeared in the conversation.

use std::path::Path;

use tracing::{debug, warn};

use crate::api::{CompletionClient, CompletionError};
use crate::core::extract::extract_into;
use crate::core::file_cache::{fenced, FileCache, Snippet};
use crate::core::language::{language_from_command, split_command};
use crate::core::message::{Message, Role};
use crate::utils::logging::LoggingState;


/// Opening instructions for the model.
pub const SYSTEM_PROMPT: &str = "\
You are a debugging client embedded into the terminal.
You can ask questions, execute code, and save files.
Here are some additional instructions:
1. Please ensure all code is properly listed with its file type.
2. You may optionally give code blocks a name in addition to their type.
For example, here is a javascript file with the name foo.js:
```js:foo.js
console.log(\"Hello world!\");
```
3. When suggesting changes, please print the full file with the change.";

pub struct Conversation {
    messages: Vec<Message>,
    model: String,
    logging: LoggingState,
}

impl Conversation {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            model: model.into(),
            logging: LoggingState::disabled(),
        }
    }

    pub fn with_logging(mut self, logging: LoggingState) -> Self {
        self.logging = logging;
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn append_message(&mut self, role: Role, content: impl Into<String>) {
        self.push(Message::new(role, content));
    }

    /// Record a file the user loaded or edited. The language is taken from
    /// the name's extension.
    pub fn append_file(
        &mut self,
        cache: &mut FileCache,
        name: Option<&str>,
        content: impl Into<String>,
    ) {
        let language = name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str());
        let file = Snippet::new(content)
            .with_language(language)
            .with_name(name);

        self.append_message(
            Role::System,
            format!("User sent file:\n{}", file.to_markdown()),
        );
        cache.add(file);
    }

    /// Record an ad-hoc shell command and its combined output. Everything
    /// after the executable is cached as a snippet in the executable's language.
    pub fn append_inline_command(&mut self, cache: &mut FileCache, command: &str, result: &str) {
        let (executable, arguments) = split_command(command);
        cache.add(Snippet::new(arguments).with_language(language_from_command(executable)));

        self.append_message(
            Role::System,
            format!(
                "User executed command: `{command}`\nCommand returned:\n{}",
                fenced("", result)
            ),
        );
    }

    /// Record a script execution: the command, the script, and its output.
    pub fn append_command_result(
        &mut self,
        cache: &mut FileCache,
        command: &str,
        file: Snippet,
        result: &str,
    ) {
        let content = format!(
            "User executed command: `{command}`\nWith script:\n{}\nCommand returned:\n{}",
            file.to_markdown(),
            fenced("", result)
        );
        cache.add(file);
        self.append_message(Role::System, content);
    }

    /// Send the whole transcript, append the reply, and harvest its code
    /// blocks into `cache`. On failure the transcript is left untouched.
    pub async fn complete_once(
        &mut self,
        client: &dyn CompletionClient,
        cache: &mut FileCache,
    ) -> Result<String, CompletionError> {
        let reply = client.complete(&self.model, &self.messages).await?;
        let content = reply.content.clone();
        self.push(reply);

        let blocks = extract_into(cache, &content);
        debug!(blocks, transcript_len = self.messages.len(), "Completion appended");
        Ok(content)
    }

    fn push(&mut self, message: Message) {
        if let Err(err) = self.logging.log_message(&message) {
            warn!(error = %err, "Failed to write transcript log");
        }
        self.messages.push(message);
    }
}
