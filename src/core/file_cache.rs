//! Content-addressed store of code snippets collected during a session.
//!
//! Snippets come from three places: fenced blocks in assistant replies,
//! files the user loads or edits, and commands the user runs. Two snippets
//! are the same snippet when their `content` is byte-equal; language and
//! name are metadata that get merged when a known snippet is seen again.

use tracing::debug;

/// A cached block of code or text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snippet {
    pub content: String,
    /// Language tag, e.g. `py` or `python`.
    pub language: Option<String>,
    /// Display or file name, e.g. `foo.py`.
    pub name: Option<String>,
}

impl Snippet {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            language: None,
            name: None,
        }
    }

    pub fn with_language(mut self, language: Option<impl Into<String>>) -> Self {
        self.language = language.map(Into::into);
        self
    }

    pub fn with_name(mut self, name: Option<impl Into<String>>) -> Self {
        self.name = name.map(Into::into);
        self
    }

    /// Choice-list label: `(language) name`, falling back to the first
    /// content line when the snippet is unnamed.
    pub fn label(&self) -> String {
        let message = match &self.name {
            Some(name) => name.clone(),
            None => format!("{} ...", self.content.split('\n').next().unwrap_or_default()),
        };

        match &self.language {
            Some(language) => format!("({language}) {message}"),
            None => message,
        }
    }

    /// Fence annotation: `language:name`, or whichever part is known.
    pub fn annotation(&self) -> String {
        let language = self.language.as_deref().map(str::trim).unwrap_or_default();
        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        match (language.is_empty(), name.is_empty()) {
            (false, false) => format!("{language}:{name}"),
            (false, true) => language.to_string(),
            (true, false) => name.to_string(),
            (true, true) => String::new(),
        }
    }

    /// Render as a fenced markdown block.
    pub fn to_markdown(&self) -> String {
        fenced(&self.annotation(), &self.content)
    }
}

/// Wrap `body` in a fence annotated with `annotation`. A single trailing
/// newline in the body is absorbed so the closing fence sits on its own line.
pub fn fenced(annotation: &str, body: &str) -> String {
    let body = body.strip_suffix('\n').unwrap_or(body);
    format!("```{annotation}\n{body}\n```")
}

/// Most-recently-touched-first snippet store, unique on `content`.
#[derive(Debug, Default, Clone)]
pub struct FileCache {
    snippets: Vec<Snippet>,
}

impl FileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `snippet` at the front. If a snippet with identical content is
    /// already cached it is removed first and its existing language/name win
    /// over the incoming ones.
    pub fn add(&mut self, snippet: Snippet) {
        let existing = self
            .snippets
            .iter()
            .position(|cached| cached.content == snippet.content);

        let entry = match existing {
            Some(index) => {
                let existing = self.snippets.remove(index);
                debug!(
                    from_position = index,
                    "Merging snippet with already cached content"
                );
                Snippet {
                    content: snippet.content,
                    language: existing.language.or(snippet.language),
                    name: existing.name.or(snippet.name),
                }
            }
            None => snippet,
        };

        self.snippets.insert(0, entry);
    }

    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn get(&self, index: usize) -> Option<&Snippet> {
        self.snippets.get(index)
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// Name of the most recently touched snippet that has one.
    pub fn latest_name(&self) -> Option<&str> {
        self.snippets.iter().find_map(|s| s.name.as_deref())
    }
}
