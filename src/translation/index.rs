/*!
 * Text index: distinct fragments mapped to the slides they appear on.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

static LETTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Alphabetic}").expect("letter pattern is valid"));

/// Trim a raw text run and keep it only if it carries translatable content
///
/// Whitespace-only, numeric-only and symbol-only runs are rejected.
pub fn normalize_fragment(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !LETTER.is_match(trimmed) {
        return None;
    }
    Some(trimmed)
}

/// Mapping from each distinct fragment to the set of slide ids containing it
///
/// Keys are compared exactly (case-sensitive). A fragment repeated on the same
/// slide, or across shapes, groups and table cells, collapses into one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextIndex {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl TextIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `fragment` occurs on `slide_id`
    pub fn insert(&mut self, fragment: &str, slide_id: &str) {
        match self.entries.get_mut(fragment) {
            Some(locations) => {
                locations.insert(slide_id.to_string());
            }
            None => {
                let mut locations = BTreeSet::new();
                locations.insert(slide_id.to_string());
                self.entries.insert(fragment.to_string(), locations);
            }
        }
    }

    /// Slides a fragment occurs on
    pub fn locations(&self, fragment: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(fragment)
    }

    /// Distinct fragments in lexical order
    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over fragments and their locations
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.entries.iter().map(|(fragment, slides)| (fragment.as_str(), slides))
    }

    /// Number of distinct fragments
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no fragment was found
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct slides holding at least one fragment
    pub fn slide_count(&self) -> usize {
        self.entries
            .values()
            .flatten()
            .collect::<BTreeSet<_>>()
            .len()
    }
}
