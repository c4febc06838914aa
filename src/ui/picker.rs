//! Choosing a cached snippet to act on.

use crate::core::file_cache::{FileCache, Snippet};
use crate::ui::prompter::{Notice, PromptError, Prompter};

pub const NEW_FILE_CHOICE: &str = "New file";

/// Offer every cached snippet, most recent first, plus a "New file" entry
/// when `allow_new` is set. `None` means either the cache is empty or the
/// user asked for new content.
pub fn choose_snippet(
    prompter: &mut dyn Prompter,
    cache: &FileCache,
    prompt: &str,
    allow_new: bool,
) -> Result<Option<Snippet>, PromptError> {
    if cache.is_empty() {
        if !allow_new {
            prompter.notify(Notice::Warning, "Nothing to act on");
        }
        return Ok(None);
    }

    let mut choices: Vec<String> = cache.snippets().iter().map(Snippet::label).collect();
    if allow_new {
        choices.push(NEW_FILE_CHOICE.to_string());
    }

    let index = prompter.select(prompt, &choices)?;
    Ok(cache.get(index).cloned())
}

pub fn resolve_execution_target(
    prompter: &mut dyn Prompter,
    cache: &FileCache,
) -> Result<Option<Snippet>, PromptError> {
    choose_snippet(prompter, cache, "Which file do you want to execute?", true)
}

pub fn resolve_edit_target(
    prompter: &mut dyn Prompter,
    cache: &FileCache,
) -> Result<Option<Snippet>, PromptError> {
    choose_snippet(prompter, cache, "Which file do you want to edit?", true)
}

pub fn resolve_save_target(
    prompter: &mut dyn Prompter,
    cache: &FileCache,
) -> Result<Option<Snippet>, PromptError> {
    if cache.is_empty() {
        prompter.notify(Notice::Warning, "No files to save");
        return Ok(None);
    }
    choose_snippet(prompter, cache, "Which file do you want to save?", false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{Scripted, ScriptedPrompter};

    fn cache_with(contents: &[&str]) -> FileCache {
        let mut cache = FileCache::new();
        for content in contents {
            cache.add(Snippet::new(*content).with_language(Some("py")));
        }
        cache
    }

    #[test]
    fn empty_cache_returns_none_without_prompting() {
        let mut prompter = ScriptedPrompter::new(vec![]);
        let cache = FileCache::new();

        assert_eq!(resolve_execution_target(&mut prompter, &cache).unwrap(), None);
        assert!(prompter.notices.is_empty());

        assert_eq!(
            choose_snippet(&mut prompter, &cache, "Pick", false).unwrap(),
            None
        );
        assert_eq!(prompter.notices, vec![(Notice::Warning, "Nothing to act on".to_string())]);
    }

    #[test]
    fn save_reports_nothing_to_save() {
        let mut prompter = ScriptedPrompter::new(vec![]);
        assert_eq!(resolve_save_target(&mut prompter, &FileCache::new()).unwrap(), None);
        assert_eq!(prompter.notices, vec![(Notice::Warning, "No files to save".to_string())]);
    }

    #[test]
    fn choices_are_most_recent_first_with_new_entry_last() {
        let cache = cache_with(&["first", "second"]);
        let mut prompter = ScriptedPrompter::new(vec![Scripted::Select(0)]);

        let chosen = resolve_edit_target(&mut prompter, &cache).unwrap();
        assert_eq!(chosen.map(|s| s.content), Some("second".to_string()));
        assert_eq!(
            prompter.selections,
            vec![(
                "Which file do you want to edit?".to_string(),
                vec![
                    "(py) second ...".to_string(),
                    "(py) first ...".to_string(),
                    NEW_FILE_CHOICE.to_string(),
                ]
            )]
        );
    }

    #[test]
    fn new_file_choice_returns_none() {
        let cache = cache_with(&["only"]);
        let mut prompter = ScriptedPrompter::new(vec![Scripted::Select(1)]);
        assert_eq!(resolve_execution_target(&mut prompter, &cache).unwrap(), None);
    }

    #[test]
    fn save_offers_no_new_entry() {
        let cache = cache_with(&["only"]);
        let mut prompter = ScriptedPrompter::new(vec![Scripted::Select(0)]);
        let chosen = resolve_save_target(&mut prompter, &cache).unwrap();
        assert_eq!(chosen.map(|s| s.content), Some("only".to_string()));
        assert_eq!(prompter.selections[0].1, vec!["(py) only ...".to_string()]);
    }
}
