//! Mappings between interpreters, language tags, and file extensions.

/// Language produced by running code through `executable`.
pub fn language_from_command(executable: &str) -> Option<&'static str> {
    match executable {
        "python3" | "python" => Some("python"),
        "node" => Some("javascript"),
        "ts-node" => Some("typescript"),
        "bash" => Some("bash"),
        _ => None,
    }
}

/// Interpreter suggested for a language tag.
pub fn command_from_language(language: &str) -> Option<&'static str> {
    match language.trim().to_lowercase().as_str() {
        "python" | "py" => Some("python3"),
        "javascript" | "js" => Some("node"),
        "typescript" | "ts" => Some("ts-node"),
        "bash" | "shell" => Some("bash"),
        _ => None,
    }
}

/// File extension used when staging code of `language` on disk.
pub fn extension_from_language(language: &str) -> Option<&'static str> {
    match language.trim().to_lowercase().as_str() {
        "python" => Some("py"),
        "javascript" | "js" => Some("js"),
        "typescript" | "ts" => Some("ts"),
        "bash" | "shell" => Some("sh"),
        _ => None,
    }
}

/// Split a command line on its first whitespace run into the executable
/// and the (untouched) remainder.
pub fn split_command(command: &str) -> (&str, &str) {
    let command = command.trim_start();
    match command.find(char::is_whitespace) {
        Some(end) => (&command[..end], command[end..].trim_start()),
        None => (command, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpreters_round_trip_through_languages() {
        for executable in ["python3", "node", "ts-node", "bash"] {
            let language = language_from_command(executable).unwrap();
            assert_eq!(command_from_language(language), Some(executable));
        }
        assert_eq!(language_from_command("python"), Some("python"));
        assert_eq!(language_from_command("ruby"), None);
    }

    #[test]
    fn language_lookup_ignores_case_and_padding() {
        assert_eq!(command_from_language(" PY "), Some("python3"));
        assert_eq!(extension_from_language("Shell"), Some("sh"));
        assert_eq!(extension_from_language("rust"), None);
    }

    #[test]
    fn split_command_keeps_argument_string() {
        assert_eq!(split_command("python3 -c  'print(1)'"), ("python3", "-c  'print(1)'"));
        assert_eq!(split_command("ls"), ("ls", ""));
        assert_eq!(split_command("  node\tapp.js"), ("node", "app.js"));
    }
}
