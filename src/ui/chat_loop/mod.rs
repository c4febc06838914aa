//! The interactive session: prompt, dispatch, repeat.
//!
//! [`Session`] owns the transcript and the snippet cache and routes each
//! [`Action`] produced by [`read_action`] to its flow. Cancelling a nested
//! prompt abandons only the action in progress; terminal failures end the
//! session.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::api::CompletionClient;
use crate::commands::{read_action, Action, InteractionState};
use crate::core::conversation::Conversation;
use crate::core::file_cache::{FileCache, Snippet};
use crate::core::language::{
    command_from_language, extension_from_language, language_from_command, split_command,
};
use crate::core::message::Role;
use crate::ui::picker::{resolve_edit_target, resolve_execution_target, resolve_save_target};
use crate::ui::prompter::{Notice, PromptError, Prompter};
use crate::ui::render::Renderer;
use crate::utils::exec::{execute_script, run_captured};
use crate::utils::paths::expand_tilde;


#[derive(Debug, Error)]
#[error("Failed to save file {}: {source}", path.display())]
pub struct FileSaveError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

pub struct Session<P: Prompter, R: Renderer> {
    conversation: Conversation,
    cache: FileCache,
    client: Box<dyn CompletionClient>,
    prompter: P,
    renderer: R,
    state: InteractionState,
}

impl<P: Prompter, R: Renderer> Session<P, R> {
    pub fn new(
        conversation: Conversation,
        client: Box<dyn CompletionClient>,
        prompter: P,
        renderer: R,
    ) -> Self {
        Self {
            conversation,
            cache: FileCache::new(),
            client,
            prompter,
            renderer,
            state: InteractionState::Initial,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn cache(&self) -> &FileCache {
        &self.cache
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Run until the user exits. Only terminal failures are returned.
    pub async fn run(&mut self) -> Result<(), PromptError> {
        loop {
            let action = read_action(&mut self.prompter, &mut self.state)?;
            match self.handle(action).await {
                Ok(true) => {}
                Ok(false) => {
                    info!(messages = self.conversation.len(), "Session finished");
                    return Ok(());
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(PromptError::Interrupted | PromptError::Eof) => {
                    self.prompter.notify(Notice::Info, "Cancelled");
                }
                Err(err) => self.prompter.notify(Notice::Error, &err.to_string()),
            }
        }
    }

    /// Perform one action. Returns `false` when the session should end.
    pub async fn handle(&mut self, action: Action) -> Result<bool, PromptError> {
        debug!(action = ?action, "Handling action");
        match action {
            Action::Question(question) => {
                self.conversation.append_message(Role::User, question);
                self.ask().await;
            }
            Action::File { path, content } => {
                self.conversation
                    .append_file(&mut self.cache, Some(path.as_str()), content);
            }
            Action::Save => self.save()?,
            Action::Execute => self.execute().await?,
            Action::ExecuteInline(words) => self.execute_inline(words).await,
            Action::Edit => self.edit()?,
            Action::Exit => return Ok(false),
        }
        Ok(true)
    }

    async fn ask(&mut self) {
        match self
            .conversation
            .complete_once(&*self.client, &mut self.cache)
            .await
        {
            Ok(answer) => self.renderer.render_markdown(&answer),
            Err(err) => self.prompter.notify(Notice::Error, &err.to_string()),
        }
    }

    fn save(&mut self) -> Result<(), PromptError> {
        let Some(snippet) = resolve_save_target(&mut self.prompter, &self.cache)? else {
            return Ok(());
        };

        let name = self
            .prompter
            .read_path("Save file as:", self.cache.latest_name())?;
        let name = name.trim();
        if name.is_empty() {
            self.prompter.notify(Notice::Warning, "No file name given");
            return Ok(());
        }

        match write_snippet(&expand_tilde(name), &snippet) {
            Ok(()) => self
                .prompter
                .notify(Notice::Success, &format!("Saved file as {name}")),
            Err(err) => self.prompter.notify(Notice::Error, &err.to_string()),
        }
        Ok(())
    }

    async fn execute(&mut self) -> Result<(), PromptError> {
        let target = resolve_execution_target(&mut self.prompter, &self.cache)?;
        let (content, name, language) = match target {
            Some(snippet) => (snippet.content, snippet.name, snippet.language),
            None => (self.prompter.edit_text("", None)?, None, None),
        };

        let suggested = language.as_deref().and_then(command_from_language);
        let command = self
            .prompter
            .read_line("Command to execute:", suggested)?;
        let command = command.trim();

        match execute_script(command, &content, name.as_deref()).await {
            Ok(output) => {
                let (executable, _) = split_command(command);
                let file = Snippet::new(content)
                    .with_language(language_from_command(executable))
                    .with_name(name);
                self.conversation
                    .append_command_result(&mut self.cache, command, file, &output);
            }
            Err(err) => self.prompter.notify(Notice::Error, &err.to_string()),
        }
        Ok(())
    }

    async fn execute_inline(&mut self, words: Vec<String>) {
        let command = words.join(" ");
        match run_captured("bash", &["-c".to_string(), command.clone()]).await {
            Ok(output) => {
                self.conversation
                    .append_inline_command(&mut self.cache, &command, &output);
            }
            Err(err) => self.prompter.notify(Notice::Error, &err.to_string()),
        }
    }

    fn edit(&mut self) -> Result<(), PromptError> {
        let target = resolve_edit_target(&mut self.prompter, &self.cache)?;
        let (initial, name, language) = match target {
            Some(snippet) => (snippet.content, snippet.name, snippet.language),
            None => (String::new(), None, None),
        };

        let extension = name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .or_else(|| language.as_deref().and_then(extension_from_language));

        let edited = self.prompter.edit_text(&initial, extension)?;
        self.conversation
            .append_file(&mut self.cache, name.as_deref(), edited);
        Ok(())
    }
}

fn write_snippet(path: &Path, snippet: &Snippet) -> Result<(), FileSaveError> {
    std::fs::write(path, &snippet.content).map_err(|source| FileSaveError {
        path: path.to_path_buf(),
        source,
    })
}
