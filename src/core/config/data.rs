use std::path::Path;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::api::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Credentials and endpoint settings for the completion API.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct OpenAiConfig {
    pub token: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub openai: OpenAiConfig,
}

impl Config {
    /// The stored API token, if one is set and not blank.
    pub fn token(&self) -> Option<&str> {
        self.openai
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.openai.token = Some(token.into());
    }

    pub fn base_url(&self) -> &str {
        non_blank(self.openai.base_url.as_deref()).unwrap_or(DEFAULT_BASE_URL)
    }

    /// Model to use: `cli_model` when given, then the configured model,
    /// then the built-in default.
    pub fn model<'a>(&'a self, cli_model: Option<&'a str>) -> &'a str {
        non_blank(cli_model)
            .or_else(|| non_blank(self.openai.model.as_deref()))
            .unwrap_or(DEFAULT_MODEL)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Display `path` with the home directory abbreviated to `~`.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    if let Some(dirs) = BaseDirs::new() {
        if let Ok(relative) = path.strip_prefix(dirs.home_dir()) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}
