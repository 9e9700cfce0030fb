//! Tag index for filter menus.
use std::{cmp::Ordering, collections::HashSet};

use log::debug;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::Note;

/// Distinct tags across active notes, sorted for display.
///
/// Trashed notes do not contribute. Tags are collated the way a dictionary
/// orders words: base letters first, then accents, then lowercase before
/// uppercase, so "apple" < "Apple" < "école" < "zebra".
pub fn distinct_tags(notes: &[Note]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags: Vec<String> = notes
        .iter()
        .filter(|n| n.is_active())
        .flat_map(|n| n.tags.iter().map(String::as_str))
        .filter(|t| seen.insert(*t))
        .map(str::to_string)
        .collect();
    tags.sort_by(|a, b| compare_tags(a, b));
    debug!("Tag index holds {} distinct tags", tags.len());
    tags
}

fn compare_tags(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| a.nfd().flat_map(char::to_lowercase).cmp(b.nfd().flat_map(char::to_lowercase)))
        .then_with(|| a.chars().map(char::is_uppercase).cmp(b.chars().map(char::is_uppercase)))
        .then_with(|| a.cmp(b))
}

/// Lowercased with diacritics stripped.
fn base_letters(tag: &str) -> String {
    tag.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
