//! Fenced code block extraction.
//!
//! Replies are scanned line by line with two states, outside a fence and
//! inside one. A fence opens on a line starting with three backticks; the
//! rest of that line is the annotation (`language:name`). The block ends at
//! the next triple-backtick sequence, so a body never contains a fence
//! marker. Blocks that are never closed are dropped.

use memchr::memmem;
use tracing::debug;

use crate::core::file_cache::{FileCache, Snippet};

const FENCE: &[u8] = b"```";

enum ScanState<'a> {
    Outside,
    InFence { annotation: &'a str, body: String },
}

/// Collect every closed fenced block in `text`, in order of appearance.
pub fn extract_snippets(text: &str) -> Vec<Snippet> {
    let finder = memmem::Finder::new(FENCE);
    let mut snippets = Vec::new();
    let mut state = ScanState::Outside;

    for line in text.split_inclusive('\n') {
        state = match state {
            ScanState::Outside => match opening_annotation(line, &finder) {
                Some(annotation) => ScanState::InFence {
                    annotation,
                    body: String::new(),
                },
                None => ScanState::Outside,
            },
            ScanState::InFence {
                annotation,
                mut body,
            } => match finder.find(line.as_bytes()) {
                Some(position) => {
                    let before = &line[..position];
                    // Indentation ahead of a closing fence is not part of the body.
                    if !before.trim().is_empty() {
                        body.push_str(before);
                    }
                    snippets.push(snippet_from(annotation, body));
                    ScanState::Outside
                }
                None => {
                    body.push_str(line);
                    ScanState::InFence { annotation, body }
                }
            },
        };
    }

    if let ScanState::InFence { annotation, .. } = state {
        debug!(annotation = %annotation, "Dropping unterminated code fence");
    }

    snippets
}

/// Extract every block in `text` into `cache`. Returns how many blocks were found.
pub fn extract_into(cache: &mut FileCache, text: &str) -> usize {
    let snippets = extract_snippets(text);
    let count = snippets.len();
    for snippet in snippets {
        cache.add(snippet);
    }
    if count > 0 {
        debug!(blocks = count, cached = cache.len(), "Extracted code blocks");
    }
    count
}

/// Split an annotation into `(language, name)`. Only the first colon
/// separates, so names may contain colons.
pub fn parse_annotation(annotation: &str) -> (Option<String>, Option<String>) {
    let mut parts = annotation.trim().splitn(2, ':');
    let mut next_part = || {
        parts
            .next()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
    };
    let language = next_part();
    let name = next_part();
    (language, name)
}

fn opening_annotation<'a>(line: &'a str, finder: &memmem::Finder<'_>) -> Option<&'a str> {
    // The body starts on the following line, so the opener needs its newline.
    let line = line.strip_suffix('\n')?;
    let line = line.strip_suffix('\r').unwrap_or(line);
    let rest = line.trim_start().strip_prefix("```")?;

    // ```inline``` spans are not block openers.
    if finder.find(rest.as_bytes()).is_some() {
        return None;
    }
    Some(rest)
}

fn snippet_from(annotation: &str, content: String) -> Snippet {
    let (language, name) = parse_annotation(annotation);
    Snippet {
        content,
        language,
        name,
    }
}
