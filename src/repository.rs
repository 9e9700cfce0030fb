//! Note repository: the mutation operations over the canonical collection.
//!
//! Every operation takes the current collection and returns a new one. Nothing
//! here sorts; ordering belongs to the projection step.
use log::{debug, info, warn};

use crate::{generate_note_id, normalize_tags, Clock, Note, NoteDraft, NoteStatus, NotesError, Result, SystemClock};

/// Applies create/update/pin/trash/restore/delete to a collection of notes.
#[derive(Debug, Default)]
pub struct NoteRepository<C: Clock = SystemClock> {
    clock: C,
}

impl NoteRepository<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> NoteRepository<C> {
    /// Creates a repository stamping timestamps from the given clock.
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Creates a new active note and puts it at the front of the collection.
    ///
    /// # Errors
    ///
    /// `Validation` when the trimmed title is empty; the collection is not touched.
    pub fn create(&self, notes: &[Note], draft: NoteDraft) -> Result<Vec<Note>> {
        validate_title(&draft.title)?;

        let mut id = generate_note_id();
        while notes.iter().any(|n| n.id == id) {
            warn!("Generated id {} collides with an existing note, regenerating", id);
            id = generate_note_id();
        }

        let note = Note {
            id,
            title: draft.title,
            content: draft.content,
            tags: normalize_tags(&draft.tags),
            is_pinned: draft.is_pinned,
            status: NoteStatus::Active,
            timestamp: self.clock.now_millis(),
            reminders: draft.reminders,
        };
        info!("Created note {} ('{}')", note.id, note.title);

        let mut next = Vec::with_capacity(notes.len() + 1);
        next.push(note);
        next.extend_from_slice(notes);
        Ok(next)
    }

    /// Replaces title, content, tags and pin state of an existing note.
    ///
    /// Status is left alone. A trashed note stays unpinned whatever the draft says.
    pub fn update(&self, notes: &[Note], id: &str, draft: NoteDraft) -> Result<Vec<Note>> {
        validate_title(&draft.title)?;
        let now = self.clock.now_millis();
        let next = self.modify(notes, id, |note| {
            note.title = draft.title;
            note.content = draft.content;
            note.tags = normalize_tags(&draft.tags);
            note.is_pinned = draft.is_pinned && !note.is_trashed();
            if draft.reminders.is_some() {
                note.reminders = draft.reminders;
            }
            note.timestamp = now;
        })?;
        info!("Updated note {}", id);
        Ok(next)
    }

    /// Flips the pin flag. A trashed note cannot be pinned; it is only re-stamped.
    pub fn toggle_pin(&self, notes: &[Note], id: &str) -> Result<Vec<Note>> {
        let now = self.clock.now_millis();
        let next = self.modify(notes, id, |note| {
            note.is_pinned = !note.is_pinned && !note.is_trashed();
            note.timestamp = now;
        })?;
        info!("Toggled pin on note {}", id);
        Ok(next)
    }

    /// Soft-deletes a note and clears its pin. Re-trashing only re-stamps.
    pub fn move_to_trash(&self, notes: &[Note], id: &str) -> Result<Vec<Note>> {
        let now = self.clock.now_millis();
        let next = self.modify(notes, id, |note| {
            note.status = NoteStatus::Trashed;
            note.is_pinned = false;
            note.timestamp = now;
        })?;
        info!("Moved note {} to trash", id);
        Ok(next)
    }

    /// Makes a note active again. The pin cleared on trash is not brought back.
    pub fn restore(&self, notes: &[Note], id: &str) -> Result<Vec<Note>> {
        let now = self.clock.now_millis();
        let next = self.modify(notes, id, |note| {
            note.status = NoteStatus::Active;
            note.timestamp = now;
        })?;
        info!("Restored note {}", id);
        Ok(next)
    }

    /// Removes a note outright, whatever its status.
    pub fn delete_permanently(&self, notes: &[Note], id: &str) -> Result<Vec<Note>> {
        if !notes.iter().any(|n| n.id == id) {
            debug!("Cannot delete note {}: not in collection", id);
            return Err(NotesError::NoteNotFound { id: id.to_string() });
        }
        let next: Vec<Note> = notes.iter().filter(|n| n.id != id).cloned().collect();
        info!("Permanently deleted note {}", id);
        Ok(next)
    }

    fn modify<F>(&self, notes: &[Note], id: &str, apply: F) -> Result<Vec<Note>>
    where
        F: FnOnce(&mut Note),
    {
        let index = notes.iter().position(|n| n.id == id).ok_or_else(|| {
            debug!("Note {} not found in collection of {}", id, notes.len());
            NotesError::NoteNotFound { id: id.to_string() }
        })?;

        let mut next = notes.to_vec();
        apply(&mut next[index]);
        Ok(next)
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(NotesError::Validation {
            message: "Title cannot be empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::ManualClock;

    fn repo() -> NoteRepository<ManualClock> {
        NoteRepository::with_clock(ManualClock::new(1_000, 10))
    }

    #[test]
    fn create_defaults_fields() {
        let notes = repo()
            .create(&[], NoteDraft::new("Groceries", "Milk"))
            .unwrap();
        assert_eq!(notes.len(), 1);
        let note = &notes[0];
        assert_eq!(note.status, NoteStatus::Active);
        assert!(!note.is_pinned);
        assert!(note.tags.is_empty());
        assert_eq!(note.timestamp, 1_000);
        assert_eq!(note.content, "Milk");
    }

    #[test]
    fn create_puts_new_note_first() {
        let repo = repo();
        let notes = repo.create(&[], NoteDraft::new("A", "")).unwrap();
        let notes = repo.create(&notes, NoteDraft::new("B", "")).unwrap();
        assert_eq!(notes[0].title, "B");
        assert_eq!(notes[1].title, "A");
    }

    #[test]
    fn blank_title_is_rejected_on_create_and_update() {
        let repo = repo();
        let err = repo.create(&[], NoteDraft::new("   ", "x")).unwrap_err();
        assert!(err.is_validation());

        let notes = repo.create(&[], NoteDraft::new("Keep", "x")).unwrap();
        let id = notes[0].id.clone();
        let err = repo.update(&notes, &id, NoteDraft::new("\t", "y")).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(notes[0].title, "Keep");
    }

    #[test]
    fn ids_are_unique_across_creates() {
        let repo = repo();
        let mut notes = Vec::new();
        for i in 0..50 {
            notes = repo.create(&notes, NoteDraft::new(format!("n{i}"), "")).unwrap();
        }
        let ids: HashSet<_> = notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn create_normalizes_tags() {
        let notes = repo()
            .create(&[], NoteDraft::new("t", "").with_tags([" a ", "", "b", "a"]))
            .unwrap();
        assert_eq!(notes[0].tags, vec!["a", "b"]);
    }

    #[test]
    fn update_replaces_fields_but_keeps_status() {
        let repo = repo();
        let notes = repo.create(&[], NoteDraft::new("Old", "c")).unwrap();
        let id = notes[0].id.clone();
        let notes = repo.move_to_trash(&notes, &id).unwrap();
        let notes = repo
            .update(&notes, &id, NoteDraft::new("New", "d").with_tags(["x"]).pinned(true))
            .unwrap();
        let note = &notes[0];
        assert_eq!(note.title, "New");
        assert_eq!(note.content, "d");
        assert_eq!(note.tags, vec!["x"]);
        assert_eq!(note.status, NoteStatus::Trashed);
        assert!(!note.is_pinned);
        assert_eq!(note.timestamp, 1_020);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let repo = repo();
        assert!(repo.toggle_pin(&[], "nope").unwrap_err().is_not_found());
        assert!(repo.move_to_trash(&[], "nope").unwrap_err().is_not_found());
        assert!(repo.restore(&[], "nope").unwrap_err().is_not_found());
        assert!(repo.delete_permanently(&[], "nope").unwrap_err().is_not_found());
        assert!(repo
            .update(&[], "nope", NoteDraft::new("t", ""))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn trash_clears_pin_and_restore_does_not_bring_it_back() {
        let repo = repo();
        let notes = repo
            .create(&[], NoteDraft::new("A", "").pinned(true))
            .unwrap();
        let id = notes[0].id.clone();
        let notes = repo.move_to_trash(&notes, &id).unwrap();
        assert!(notes[0].is_trashed());
        assert!(!notes[0].is_pinned);

        let notes = repo.restore(&notes, &id).unwrap();
        assert!(notes[0].is_active());
        assert!(!notes[0].is_pinned);
    }

    #[test]
    fn toggle_pin_leaves_trashed_note_unpinned() {
        let repo = repo();
        let notes = repo.create(&[], NoteDraft::new("A", "")).unwrap();
        let id = notes[0].id.clone();
        let trashed = repo.move_to_trash(&notes, &id).unwrap();

        let toggled = repo.toggle_pin(&trashed, &id).unwrap();
        assert!(toggled[0].is_trashed());
        assert!(!toggled[0].is_pinned);
        assert!(toggled[0].timestamp > trashed[0].timestamp);
    }

    #[test]
    fn trash_twice_restamps() {
        let repo = repo();
        let notes = repo.create(&[], NoteDraft::new("A", "")).unwrap();
        let id = notes[0].id.clone();
        let once = repo.move_to_trash(&notes, &id).unwrap();
        let twice = repo.move_to_trash(&once, &id).unwrap();
        assert_eq!(twice[0].status, NoteStatus::Trashed);
        assert!(twice[0].timestamp > once[0].timestamp);
    }

    #[test]
    fn restore_active_note_stays_active() {
        let repo = repo();
        let notes = repo.create(&[], NoteDraft::new("A", "")).unwrap();
        let id = notes[0].id.clone();
        let notes = repo.restore(&notes, &id).unwrap();
        assert_eq!(notes[0].status, NoteStatus::Active);
    }

    #[test]
    fn toggle_pin_flips_and_stamps() {
        let repo = repo();
        let notes = repo.create(&[], NoteDraft::new("A", "")).unwrap();
        let id = notes[0].id.clone();
        let pinned = repo.toggle_pin(&notes, &id).unwrap();
        assert!(pinned[0].is_pinned);
        assert_eq!(pinned[0].timestamp, 1_010);
        let unpinned = repo.toggle_pin(&pinned, &id).unwrap();
        assert!(!unpinned[0].is_pinned);
    }

    #[test]
    fn delete_removes_regardless_of_status_and_then_not_found() {
        let repo = repo();
        let notes = repo.create(&[], NoteDraft::new("A", "")).unwrap();
        let notes = repo.create(&notes, NoteDraft::new("B", "")).unwrap();
        let a = notes[1].id.clone();
        let notes = repo.delete_permanently(&notes, &a).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "B");
        assert!(repo.restore(&notes, &a).unwrap_err().is_not_found());
    }

    #[test]
    fn input_collection_is_not_mutated() {
        let repo = repo();
        let notes = repo.create(&[], NoteDraft::new("A", "")).unwrap();
        let id = notes[0].id.clone();
        let _ = repo.move_to_trash(&notes, &id).unwrap();
        assert!(notes[0].is_active());
    }
}
