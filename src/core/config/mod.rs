//! The `~/.config/halp-gpt.toml` settings file.

pub mod data;
pub mod io;

pub use data::{path_display, Config, OpenAiConfig};
pub use io::{default_config_path, ensure_config_dir, ConfigError};
