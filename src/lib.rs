//! halp is a line-based terminal chat client for OpenAI-compatible APIs that
//! collects the code it is shown so it can be saved, edited, and run.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the transcript, the snippet cache, fenced-code extraction,
//!   language tables, and configuration.
//! - [`commands`] turns typed lines into directives and actions.
//! - [`ui`] runs the interactive session: prompting, snippet selection, and
//!   rendering answers.
//! - [`api`] defines the chat-completion payloads and the HTTP client.
//! - [`utils`] holds process execution, external editing, path completion,
//!   and transcript logging.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`].

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;
