//! External editor integration
//!
//! Content is staged in a temporary file, the user's editor is run on it,
//! and the saved text is read back. The temporary file is removed when the
//! function returns, whether or not the editor succeeded.

use std::io::Write;
use std::process::{Command, ExitStatus};

use tempfile::Builder;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Editor command `{0}` could not be parsed")]
    InvalidCommand(String),

    #[error("Failed to launch editor `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Editor exited with non-zero status: {0}")]
    Failed(ExitStatus),

    #[error("Editor file error: {0}")]
    Io(#[from] std::io::Error),
}

/// `$VISUAL`, then `$EDITOR`, then `vi`.
pub fn resolve_editor() -> String {
    ["VISUAL", "EDITOR"]
        .into_iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string())
}

pub fn edit_in_external_editor(
    initial: &str,
    extension: Option<&str>,
) -> Result<String, EditorError> {
    edit_with(&resolve_editor(), initial, extension)
}

/// Run `editor` (which may carry arguments, e.g. `code --wait`) on a
/// temporary file seeded with `initial`.
pub fn edit_with(
    editor: &str,
    initial: &str,
    extension: Option<&str>,
) -> Result<String, EditorError> {
    let words = shlex::split(editor).ok_or_else(|| EditorError::InvalidCommand(editor.into()))?;
    let (program, args) = words
        .split_first()
        .ok_or_else(|| EditorError::InvalidCommand(editor.into()))?;

    let suffix = extension.map(|ext| format!(".{ext}")).unwrap_or_default();
    let mut temp_file = Builder::new().prefix("halp-").suffix(&suffix).tempfile()?;
    temp_file.write_all(initial.as_bytes())?;
    temp_file.flush()?;

    debug!(editor = %program, path = %temp_file.path().display(), "Opening external editor");
    let status = Command::new(program)
        .args(args)
        .arg(temp_file.path())
        .status()
        .map_err(|source| EditorError::Spawn {
            program: program.clone(),
            source,
        })?;

    if !status.success() {
        return Err(EditorError::Failed(status));
    }

    Ok(std::fs::read_to_string(temp_file.path())?)
}
