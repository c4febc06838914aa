//! Path expansion and completion candidates for path prompts.

use directories::BaseDirs;
use std::path::{Path, PathBuf};

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(input: &str) -> PathBuf {
    let home = || BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());

    if input == "~" {
        if let Some(home) = home() {
            return home;
        }
    } else if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = home() {
            return home.join(rest);
        }
    }
    PathBuf::from(input)
}

/// Completion candidates for a partially typed path.
///
/// A path naming a directory lists that directory; anything else lists the
/// parent's entries whose names start with the final component. Candidates
/// are sorted, relative to `cwd` when inside it, and directories end in `/`.
pub fn suggest_paths(input: &str, cwd: &Path) -> Vec<String> {
    let typed = if input.is_empty() { "." } else { input };
    let target = cwd.join(expand_tilde(typed));

    let (directory, filter) = if target.is_dir() {
        (target, String::new())
    } else {
        let filter = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let directory = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.to_path_buf());
        (directory, filter)
    };

    let Ok(entries) = std::fs::read_dir(&directory) else {
        return Vec::new();
    };

    let mut candidates: Vec<(String, bool)> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            name.starts_with(&filter).then_some((name, is_dir))
        })
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .map(|(name, is_dir)| {
            let mut display = display_path(&directory.join(name), cwd);
            if is_dir {
                display.push('/');
            }
            display
        })
        .collect()
}

fn display_path(path: &Path, cwd: &Path) -> String {
    let path = normalize(path);
    match path.strip_prefix(normalize(cwd)) {
        Ok(relative) => relative.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}

/// Lexically drop `.` components so `cwd/./src` displays as `src`.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, std::path::Component::CurDir))
        .collect()
}
