//! Command-line interface parsing and session startup
//!
//! This module parses arguments, loads and completes the configuration, and
//! hands control to the interactive [`Session`].

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use crate::api::OpenAiClient;
use crate::auth::ensure_api_token;
use crate::commands::all_directives;
use crate::core::config::{default_config_path, ensure_config_dir, path_display, Config};
use crate::core::conversation::{Conversation, SYSTEM_PROMPT};
use crate::core::message::Role;
use crate::logging::init_tracing;
use crate::ui::chat_loop::Session;
use crate::ui::prompter::TerminalPrompter;
use crate::ui::render::GlowRenderer;
use crate::utils::logging::LoggingState;


const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "halp")]
#[command(version = VERSION)]
#[command(about = "Ask a language model for help without leaving the terminal")]
#[command(
    long_about = "halp is a line-based chat client for OpenAI-compatible completion APIs. \
Code blocks in answers are collected so they can be saved, edited, or run, and \
their output is sent back into the conversation.\n\n\
Configuration lives in ~/.config/halp-gpt.toml under an [openai] table \
(token, base_url, model). You are asked for a token on first start.\n\n\
Set HALP_LOG (e.g. HALP_LOG=debug) to see diagnostics on stderr."
)]
#[command(after_long_help = directive_help())]
pub struct Args {
    /// Model to use for chat (overrides the config file)
    #[arg(short = 'm', long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Append the conversation to the specified file
    #[arg(short = 'l', long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Use a different configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

fn directive_help() -> String {
    let mut help = String::from("Directives:\n");
    for directive in all_directives() {
        help.push_str(&format!("  {:<18}{}\n", directive.usage, directive.help));
    }
    help.push_str("\nCtrl-C or Ctrl-D at the main prompt exits.");
    help
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing();

    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    ensure_config_dir(&config_path)?;

    let mut config = Config::load_or_default(&config_path);
    let mut prompter = TerminalPrompter::new()?;

    let token = ensure_api_token(&mut config, &mut prompter)?;
    config.save_to_path(&config_path)?;
    info!(path = %path_display(&config_path), "Config ready");

    let logging = match args.log {
        Some(path) => LoggingState::to_file(&path).map_err(|err| {
            format!("Failed to open log file {}: {err}", path_display(&path))
        })?,
        None => LoggingState::disabled(),
    };

    let model = config.model(args.model.as_deref()).to_string();
    let base_url = config.base_url().to_string();
    info!(model = %model, base_url = %base_url, "Starting session");
    if logging.is_active() {
        info!("Transcript logging enabled");
    }

    let mut conversation = Conversation::new(model).with_logging(logging);
    conversation.append_message(Role::System, SYSTEM_PROMPT);

    let client = OpenAiClient::new(base_url, token);
    let mut session = Session::new(
        conversation,
        Box::new(client),
        prompter,
        GlowRenderer,
    );

    if let Err(err) = session.run().await {
        warn!(error = %err, "Session ended abnormally");
        return Err(err.into());
    }
    Ok(())
}
