//! Core data structures for the pixelnotes application.
//!
//! This module contains the Note entity and the draft type used to create
//! and edit notes.
use serde::{Deserialize, Serialize};

use crate::parse_tags;

/// Lifecycle flag of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    #[default]
    Active,
    /// Reserved, no operation produces it.
    Archived,
    Trashed,
}

/// Represents a single note in our system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier for the note, immutable once assigned
    pub id: String,
    /// Note title, never blank
    pub title: String,
    /// Serialized content produced by the editor; never interpreted here
    pub content: String,
    /// Tags for organization, display order preserved
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub status: NoteStatus,
    /// Last touched, epoch milliseconds
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminders: Option<Vec<i64>>,
}

impl Note {
    /// Notes without an explicit status count as active.
    pub fn is_active(&self) -> bool {
        self.status == NoteStatus::Active
    }

    pub fn is_trashed(&self) -> bool {
        self.status == NoteStatus::Trashed
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// User-supplied fields for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub is_pinned: bool,
    pub reminders: Option<Vec<i64>>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        NoteDraft {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Takes tags the way the note form does: one comma-separated field.
    pub fn with_tag_list(mut self, tags: &str) -> Self {
        self.tags = parse_tags(Some(tags.to_string()));
        self
    }

    pub fn pinned(mut self, is_pinned: bool) -> Self {
        self.is_pinned = is_pinned;
        self
    }

    pub fn with_reminders(mut self, reminders: Vec<i64>) -> Self {
        self.reminders = Some(reminders);
        self
    }

    /// Starts a draft from an existing note, for edit forms.
    pub fn from_note(note: &Note) -> Self {
        NoteDraft {
            title: note.title.clone(),
            content: note.content.clone(),
            tags: note.tags.clone(),
            is_pinned: note.is_pinned,
            reminders: note.reminders.clone(),
        }
    }
}
