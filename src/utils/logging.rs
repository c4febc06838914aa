use crate::core::message::Message;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Optional plain-text copy of the transcript, appended as messages arrive.
#[derive(Debug, Default)]
pub struct LoggingState {
    file_path: Option<PathBuf>,
}

impl LoggingState {
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Start logging to `path`, creating it if needed and writing a session header.
    pub fn to_file(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let logging = Self {
            file_path: Some(path.into()),
        };
        logging.write_to_log(&format!(
            "## halp session started {}",
            Local::now().to_rfc3339()
        ))?;
        Ok(logging)
    }

    pub fn is_active(&self) -> bool {
        self.file_path.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn log_message(&self, message: &Message) -> std::io::Result<()> {
        if !self.is_active() {
            return Ok(());
        }
        self.write_to_log(&format!("{}: {}", message.role, message.content))
    }

    fn write_to_log(&self, content: &str) -> std::io::Result<()> {
        let Some(file_path) = &self.file_path else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        // Blank line between entries.
        writeln!(writer)?;

        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn appends_messages_after_session_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("halp.log");

        let logging = LoggingState::to_file(&path).unwrap();
        logging.log_message(&Message::user("hello\nthere")).unwrap();
        logging.log_message(&Message::assistant("hi")).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert!(lines.next().unwrap().starts_with("## halp session started "));
        assert_eq!(
            lines.collect::<Vec<_>>(),
            vec!["", "user: hello", "there", "", "assistant: hi", ""]
        );
    }

    #[test]
    fn disabled_logging_writes_nothing() {
        let logging = LoggingState::disabled();
        assert!(!logging.is_active());
        assert!(logging.log_message(&Message::user("x")).is_ok());
    }
}
