//! View projection: status partition, search, tag filter and ordering.
//!
//! The result is the same for every renderer; only the renderer choice depends
//! on the view mode.
use std::cmp::Ordering;

use log::debug;

use crate::{Note, NoteStatus};

/// Which side of the active/trashed partition to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    Active,
    Trashed,
}

impl StatusFilter {
    fn admits(self, status: NoteStatus) -> bool {
        match self {
            StatusFilter::Active => status == NoteStatus::Active,
            StatusFilter::Trashed => status == NoteStatus::Trashed,
        }
    }
}

/// Filters applied on top of the canonical collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionFilter {
    pub mode: StatusFilter,
    pub search_term: String,
    pub tag_filter: Option<String>,
}

impl ProjectionFilter {
    pub fn active() -> Self {
        Self::default()
    }

    pub fn trashed() -> Self {
        Self {
            mode: StatusFilter::Trashed,
            ..Self::default()
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag_filter = Some(tag.into());
        self
    }
}

/// Derives the ordered list a renderer shows.
pub fn project<'a>(notes: &'a [Note], filter: &ProjectionFilter) -> Vec<&'a Note> {
    // a blank term passes everything; otherwise it is matched as typed
    let needle = if filter.search_term.trim().is_empty() {
        String::new()
    } else {
        filter.search_term.to_lowercase()
    };

    let mut projected: Vec<&Note> = notes
        .iter()
        .filter(|note| filter.mode.admits(note.status))
        .filter(|note| matches_search(note, &needle))
        .filter(|note| match &filter.tag_filter {
            Some(tag) => note.has_tag(tag),
            None => true,
        })
        .collect();

    // sort_by is stable: equal keys keep collection order
    match filter.mode {
        StatusFilter::Active => projected.sort_by(|a, b| compare_active(a, b)),
        StatusFilter::Trashed => projected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
    }

    debug!(
        "Projected {} of {} notes ({:?}, search='{}', tag={:?})",
        projected.len(),
        notes.len(),
        filter.mode,
        needle,
        filter.tag_filter
    );
    projected
}

/// Pinned first, then newest first.
fn compare_active(a: &Note, b: &Note) -> Ordering {
    b.is_pinned
        .cmp(&a.is_pinned)
        .then_with(|| b.timestamp.cmp(&a.timestamp))
}

/// `needle` is already lowercased; empty matches everything.
fn matches_search(note: &Note, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    note.title.to_lowercase().contains(needle)
        || note.content.to_lowercase().contains(needle)
        || note.tags.iter().any(|t| t.to_lowercase().contains(needle))
}
