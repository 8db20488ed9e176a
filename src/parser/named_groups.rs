//! Named capture group extraction.

use super::regex_error::RegexError;
use regex::Regex;
use std::collections::BTreeMap;

/// Captured text keyed by group name.
pub type NamedCaptures = BTreeMap<String, String>;

/// Match `text` against `pattern` and collect every named group.
///
/// Each group declared in the pattern is present in the result: groups that
/// did not participate in the match map to an empty string. Returns
/// [`RegexError::NoMatch`] when the pattern matches nowhere in `text`.
pub fn extract_named_groups(
    pattern: &Regex,
    name: &str,
    text: &str,
) -> Result<NamedCaptures, RegexError> {
    let captures = pattern.captures(text).ok_or_else(|| RegexError::NoMatch {
        name: name.to_string(),
    })?;

    let mut groups: NamedCaptures = pattern
        .capture_names()
        .flatten()
        .map(|group| (group.to_string(), String::new()))
        .collect();

    for (group, value) in &mut groups {
        if let Some(m) = captures.name(group) {
            *value = m.as_str().to_string();
        }
    }

    Ok(groups)
}
