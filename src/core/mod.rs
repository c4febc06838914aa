pub mod config;
pub mod conversation;
pub mod extract;
pub mod file_cache;
pub mod language;
pub mod message;
