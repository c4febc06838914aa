//! Making sure an API token is available before the session starts.

use tracing::debug;

use crate::core::config::Config;
use crate::ui::prompter::{Notice, PromptError, Prompter};

pub const TOKEN_PROMPT: &str = "Please provide an OpenAI API key to continue";

/// Return the configured token, asking for one (and storing it in `config`)
/// when none is set. Blank answers are rejected and asked again.
pub fn ensure_api_token(
    config: &mut Config,
    prompter: &mut dyn Prompter,
) -> Result<String, PromptError> {
    if let Some(token) = config.token() {
        return Ok(token.to_string());
    }

    loop {
        let answer = prompter.read_password(TOKEN_PROMPT)?;
        let token = answer.trim();
        if token.is_empty() {
            prompter.notify(Notice::Warning, "The API key cannot be empty");
            continue;
        }

        debug!("API token provided interactively");
        config.set_token(token);
        return Ok(token.to_string());
    }
}
