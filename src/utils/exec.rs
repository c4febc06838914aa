//! Running commands and scripts while mirroring their output.
//!
//! Output is echoed to the terminal as it arrives and captured in arrival
//! order (stdout and stderr interleaved) so it can be shared with the model.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tempfile::{Builder, NamedTempFile, TempDir};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::debug;

use crate::core::language::{extension_from_language, language_from_command};

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("No command given")]
    EmptyCommand,

    #[error("Could not parse command `{0}`")]
    InvalidCommand(String),

    #[error("Failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while running `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to stage script: {0}")]
    Stage(#[source] std::io::Error),
}

/// Run `program` with `args`, stream its output live, and return everything
/// it printed once it exits. A non-zero exit status is not an error.
pub async fn run_captured(program: &str, args: &[String]) -> Result<String, ExecutionError> {
    debug!(program = %program, args = ?args, "Spawning command");
    let io_error = |source| ExecutionError::Io {
        program: program.to_string(),
        source,
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ExecutionError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let missing_pipe = || io_error(std::io::Error::other("child pipe unavailable"));
    let mut stdout = child.stdout.take().ok_or_else(missing_pipe)?;
    let mut stderr = child.stderr.take().ok_or_else(missing_pipe)?;

    let mut terminal_out = tokio::io::stdout();
    let mut terminal_err = tokio::io::stderr();
    let mut captured = Vec::new();
    let mut out_chunk = [0u8; 4096];
    let mut err_chunk = [0u8; 4096];
    let (mut out_open, mut err_open) = (true, true);

    while out_open || err_open {
        tokio::select! {
            read = stdout.read(&mut out_chunk), if out_open => {
                let read = read.map_err(io_error)?;
                if read == 0 {
                    out_open = false;
                } else {
                    // Echo failures (e.g. a closed terminal) must not lose the capture.
                    let _ = terminal_out.write_all(&out_chunk[..read]).await;
                    let _ = terminal_out.flush().await;
                    captured.extend_from_slice(&out_chunk[..read]);
                }
            }
            read = stderr.read(&mut err_chunk), if err_open => {
                let read = read.map_err(io_error)?;
                if read == 0 {
                    err_open = false;
                } else {
                    let _ = terminal_err.write_all(&err_chunk[..read]).await;
                    let _ = terminal_err.flush().await;
                    captured.extend_from_slice(&err_chunk[..read]);
                }
            }
        }
    }

    let status = child.wait().await.map_err(io_error)?;
    debug!(program = %program, status = %status, bytes = captured.len(), "Command finished");
    Ok(String::from_utf8_lossy(&captured).into_owned())
}

/// Stage `content` in a temporary file and run `command` on it, i.e.
/// `<command words...> <temp file>`. The file is named `file_name` when
/// given, otherwise it gets an extension matching the command's language.
/// It is removed on every path out of this function.
pub async fn execute_script(
    command: &str,
    content: &str,
    file_name: Option<&str>,
) -> Result<String, ExecutionError> {
    let words =
        shlex::split(command).ok_or_else(|| ExecutionError::InvalidCommand(command.into()))?;
    let (program, args) = words.split_first().ok_or(ExecutionError::EmptyCommand)?;

    let extension = language_from_command(program).and_then(extension_from_language);
    let staged = StagedScript::create(content, file_name, extension)
        .map_err(ExecutionError::Stage)?;

    let mut args = args.to_vec();
    args.push(staged.path().to_string_lossy().into_owned());
    run_captured(program, &args).await
}

enum StagedScript {
    Anonymous(NamedTempFile),
    Named { _dir: TempDir, path: PathBuf },
}

impl StagedScript {
    fn create(
        content: &str,
        file_name: Option<&str>,
        extension: Option<&str>,
    ) -> std::io::Result<Self> {
        // Only the final component is kept; a snippet named `src/app.py` is staged as `app.py`.
        let file_name = file_name
            .and_then(|name| Path::new(name).file_name())
            .map(|name| name.to_os_string());

        match file_name {
            Some(name) => {
                let dir = Builder::new().prefix("halp-").tempdir()?;
                let path = dir.path().join(name);
                std::fs::write(&path, content)?;
                Ok(StagedScript::Named { _dir: dir, path })
            }
            None => {
                let suffix = extension.map(|ext| format!(".{ext}")).unwrap_or_default();
                let mut file = Builder::new().prefix("halp-").suffix(&suffix).tempfile()?;
                file.write_all(content.as_bytes())?;
                file.flush()?;
                Ok(StagedScript::Anonymous(file))
            }
        }
    }

    fn path(&self) -> &Path {
        match self {
            StagedScript::Anonymous(file) => file.path(),
            StagedScript::Named { path, .. } => path,
        }
    }
}
