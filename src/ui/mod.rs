//! Interactive layer for chat sessions.
//!
//! - [`chat_loop`]: the session that dispatches actions from
//!   [`crate::commands`] to their flows.
//! - [`prompter`]: every question asked of the user, behind a trait.
//! - [`picker`]: choosing a cached snippet.
//! - [`render`]: showing assistant answers.

pub mod chat_loop;
pub mod picker;
pub mod prompter;
pub mod render;
