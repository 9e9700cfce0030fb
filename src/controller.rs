//! The top-level state container.
//!
//! Owns the canonical collection together with view and palette state, is the
//! single place where a new collection replaces the old one, and writes every
//! committed change back through the store adapter. Renderers read from it
//! and call its operations; nothing else mutates notes.
use log::{debug, info};

use crate::{
    distinct_tags, find_preset, orbit, project, resolve_palette, derive_custom_palette, Clock,
    ColorSet, KeyValueStore, Note, NoteDraft, NoteRepository, NotesError, Orbit, ProjectionFilter,
    Result, StatusFilter, StoreAdapter, SystemClock, ViewMode, CUSTOM_PALETTE, PALETTE_PRESETS,
};

/// Summary numbers for status lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoteCounts {
    pub active: usize,
    pub trashed: usize,
    pub pinned: usize,
}

pub struct NotesController<S: KeyValueStore, C: Clock = SystemClock> {
    repository: NoteRepository<C>,
    adapter: StoreAdapter<S>,
    notes: Vec<Note>,
    view_mode: ViewMode,
    palette_name: String,
    custom_palette: ColorSet,
    search_term: String,
    tag_filter: Option<String>,
    show_trashed: bool,
    central_note_id: Option<String>,
}

impl<S: KeyValueStore> NotesController<S, SystemClock> {
    /// Hydrates a controller stamping times from the wall clock.
    pub fn load(adapter: StoreAdapter<S>) -> Self {
        Self::load_with(adapter, NoteRepository::new())
    }
}

impl<S: KeyValueStore, C: Clock> NotesController<S, C> {
    /// Hydrates all persisted state from the adapter.
    pub fn load_with(mut adapter: StoreAdapter<S>, repository: NoteRepository<C>) -> Self {
        let notes = adapter.load_notes(repository.clock());
        let view_mode = adapter.load_view_mode();
        let palette_name = adapter.load_palette_name();
        let custom_palette = adapter.load_custom_palette();
        info!(
            "Controller ready: {} notes, view {}, palette {}",
            notes.len(),
            view_mode,
            palette_name
        );

        Self {
            repository,
            adapter,
            notes,
            view_mode,
            palette_name,
            custom_palette,
            search_term: String::new(),
            tag_filter: None,
            show_trashed: false,
            central_note_id: None,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn adapter(&self) -> &StoreAdapter<S> {
        &self.adapter
    }

    pub fn into_adapter(self) -> StoreAdapter<S> {
        self.adapter
    }

    // --- note operations ---

    /// Creates a note and returns it.
    pub fn create(&mut self, draft: NoteDraft) -> Result<Note> {
        let next = self.repository.create(&self.notes, draft)?;
        let created = next[0].clone();
        self.commit(next)?;
        Ok(created)
    }

    pub fn update(&mut self, id: &str, draft: NoteDraft) -> Result<()> {
        let next = self.repository.update(&self.notes, id, draft)?;
        self.commit(next)
    }

    pub fn toggle_pin(&mut self, id: &str) -> Result<()> {
        let next = self.repository.toggle_pin(&self.notes, id)?;
        self.commit(next)
    }

    pub fn move_to_trash(&mut self, id: &str) -> Result<()> {
        let next = self.repository.move_to_trash(&self.notes, id)?;
        self.commit(next)
    }

    pub fn restore(&mut self, id: &str) -> Result<()> {
        let next = self.repository.restore(&self.notes, id)?;
        self.commit(next)
    }

    pub fn delete_permanently(&mut self, id: &str) -> Result<()> {
        let next = self.repository.delete_permanently(&self.notes, id)?;
        if self.central_note_id.as_deref() == Some(id) {
            self.central_note_id = None;
        }
        self.commit(next)
    }

    /// Swaps in the new collection, then saves it. The in-memory state is
    /// updated even when the save fails.
    fn commit(&mut self, next: Vec<Note>) -> Result<()> {
        self.notes = next;
        self.adapter.save_notes(&self.notes).map_err(|e| NotesError::Storage {
            key: self.adapter.keys().notes.clone(),
            message: e.to_string(),
        })
    }

    // --- filters (session only) ---

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn tag_filter(&self) -> Option<&str> {
        self.tag_filter.as_deref()
    }

    pub fn set_tag_filter(&mut self, tag: Option<String>) {
        self.tag_filter = tag;
    }

    /// Selecting the active tag again clears the filter.
    pub fn toggle_tag_filter(&mut self, tag: &str) {
        if self.tag_filter.as_deref() == Some(tag) {
            self.tag_filter = None;
        } else {
            self.tag_filter = Some(tag.to_string());
        }
        debug!("Tag filter now {:?}", self.tag_filter);
    }

    pub fn clear_tag_filter(&mut self) {
        self.tag_filter = None;
    }

    pub fn show_trashed(&self) -> bool {
        self.show_trashed
    }

    pub fn set_show_trashed(&mut self, show_trashed: bool) {
        self.show_trashed = show_trashed;
    }

    /// The filter implied by the current session state.
    pub fn filter(&self) -> ProjectionFilter {
        ProjectionFilter {
            mode: if self.show_trashed {
                StatusFilter::Trashed
            } else {
                StatusFilter::Active
            },
            search_term: self.search_term.clone(),
            tag_filter: self.tag_filter.clone(),
        }
    }

    // --- derived views ---

    /// Notes for the current session filters, in display order.
    pub fn projected_notes(&self) -> Vec<&Note> {
        project(&self.notes, &self.filter())
    }

    pub fn project(&self, filter: &ProjectionFilter) -> Vec<&Note> {
        project(&self.notes, filter)
    }

    pub fn distinct_tags(&self) -> Vec<String> {
        distinct_tags(&self.notes)
    }

    pub fn counts(&self) -> NoteCounts {
        self.notes.iter().fold(NoteCounts::default(), |mut counts, note| {
            if note.is_active() {
                counts.active += 1;
                if note.is_pinned {
                    counts.pinned += 1;
                }
            } else if note.is_trashed() {
                counts.trashed += 1;
            }
            counts
        })
    }

    pub fn central_note_id(&self) -> Option<&str> {
        self.central_note_id.as_deref()
    }

    pub fn set_central_note(&mut self, id: Option<String>) {
        self.central_note_id = id;
    }

    /// Orbit around the chosen central note, if it is still active.
    pub fn orbit(&self) -> Option<Orbit<'_>> {
        self.central_note_id
            .as_deref()
            .and_then(|id| orbit(&self.notes, id))
    }

    // --- view and palette (persisted) ---

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) -> Result<()> {
        self.view_mode = mode;
        info!("View mode set to {}", mode);
        self.adapter.save_view_mode(mode)
    }

    pub fn palette_name(&self) -> &str {
        &self.palette_name
    }

    pub fn custom_palette(&self) -> &ColorSet {
        &self.custom_palette
    }

    /// Selects a preset or sentinel by name.
    pub fn select_palette(&mut self, name: &str) -> Result<()> {
        if find_preset(name).is_none() {
            return Err(NotesError::Validation {
                message: format!("Unknown palette '{}'", name),
            });
        }
        self.palette_name = name.to_string();
        info!("Palette set to {}", name);
        self.adapter.save_palette_name(name)
    }

    /// Derives the custom slot from one background colour and selects it.
    pub fn set_custom_palette(&mut self, background_hex: &str) -> Result<ColorSet> {
        let colors = derive_custom_palette(background_hex)?;
        self.custom_palette = colors.clone();
        self.adapter.save_custom_palette(&colors)?;
        self.select_palette(CUSTOM_PALETTE)?;
        Ok(colors)
    }

    /// Colours for the bubble view; `None` means use the theme.
    pub fn resolved_palette(&self) -> Option<ColorSet> {
        resolve_palette(&self.palette_name, PALETTE_PRESETS, &self.custom_palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ManualClock, MemoryStore, THEME_DEFAULT_PALETTE};

    fn controller() -> NotesController<MemoryStore, ManualClock> {
        let adapter = StoreAdapter::new(MemoryStore::new()).with_seed(false);
        NotesController::load_with(adapter, NoteRepository::with_clock(ManualClock::new(1_000, 10)))
    }

    fn titles(notes: &[&Note]) -> Vec<String> {
        notes.iter().map(|n| n.title.clone()).collect()
    }

    #[test]
    fn walkthrough_of_pin_trash_delete() {
        let mut c = controller();
        let a = c.create(NoteDraft::new("A", "")).unwrap();
        let b = c.create(NoteDraft::new("B", "")).unwrap();
        assert_eq!(titles(&c.projected_notes()), ["B", "A"]);

        c.toggle_pin(&a.id).unwrap();
        assert_eq!(titles(&c.projected_notes()), ["A", "B"]);

        c.move_to_trash(&a.id).unwrap();
        assert_eq!(titles(&c.projected_notes()), ["B"]);
        assert_eq!(titles(&c.project(&ProjectionFilter::trashed())), ["A"]);
        assert!(!c.note(&a.id).unwrap().is_pinned);

        c.delete_permanently(&a.id).unwrap();
        assert!(c.project(&ProjectionFilter::trashed()).is_empty());
        assert!(c.restore(&a.id).unwrap_err().is_not_found());
        assert_eq!(c.counts(), NoteCounts { active: 1, trashed: 0, pinned: 0 });
        assert!(c.note(&b.id).is_some());
    }

    #[test]
    fn every_mutation_is_saved() {
        let mut c = controller();
        let note = c.create(NoteDraft::new("Groceries", "Milk")).unwrap();
        c.move_to_trash(&note.id).unwrap();

        let mut adapter = c.into_adapter();
        let reloaded = adapter.load_notes(&ManualClock::new(0, 0));
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded[0].is_trashed());
    }

    #[test]
    fn failed_validation_leaves_state_untouched() {
        let mut c = controller();
        assert!(c.create(NoteDraft::new(" ", "")).unwrap_err().is_validation());
        assert!(c.notes().is_empty());
        assert!(c.adapter().store().is_empty());
    }

    #[test]
    fn session_filters_drive_projection() {
        let mut c = controller();
        c.create(NoteDraft::new("Groceries", "Milk").with_tags(["food"])).unwrap();
        c.create(NoteDraft::new("Work", "Slides").with_tags(["work"])).unwrap();

        c.set_search_term("milk");
        assert_eq!(titles(&c.projected_notes()), ["Groceries"]);
        c.set_search_term("");

        c.toggle_tag_filter("work");
        assert_eq!(titles(&c.projected_notes()), ["Work"]);
        c.toggle_tag_filter("work");
        assert_eq!(c.tag_filter(), None);
        assert_eq!(c.projected_notes().len(), 2);

        c.set_show_trashed(true);
        assert!(c.projected_notes().is_empty());
        assert_eq!(c.distinct_tags(), vec!["food", "work"]);
    }

    #[test]
    fn view_and_palette_persist() {
        let mut c = controller();
        c.set_view_mode(ViewMode::List).unwrap();
        c.select_palette("sunset").unwrap();
        assert!(c.select_palette("nope").unwrap_err().is_validation());
        assert_eq!(c.resolved_palette().unwrap().background, "20 90% 55%");

        let custom = c.set_custom_palette("#3366cc").unwrap();
        assert_eq!(c.palette_name(), CUSTOM_PALETTE);
        assert_eq!(c.resolved_palette(), Some(custom.clone()));

        let adapter = c.into_adapter();
        assert_eq!(adapter.load_view_mode(), ViewMode::List);
        assert_eq!(adapter.load_palette_name(), CUSTOM_PALETTE);
        assert_eq!(adapter.load_custom_palette(), custom);

        let c = NotesController::load_with(adapter, NoteRepository::with_clock(ManualClock::new(0, 1)));
        assert_eq!(c.view_mode(), ViewMode::List);
    }

    #[test]
    fn theme_default_has_no_override() {
        let mut c = controller();
        c.select_palette(THEME_DEFAULT_PALETTE).unwrap();
        assert!(c.resolved_palette().is_none());
    }

    #[test]
    fn orbit_follows_central_note() {
        let mut c = controller();
        let centre = c.create(NoteDraft::new("Centre", "").with_tags(["x"])).unwrap();
        c.create(NoteDraft::new("Friend", "").with_tags(["x"])).unwrap();
        assert!(c.orbit().is_none());

        c.set_central_note(Some(centre.id.clone()));
        assert_eq!(c.orbit().unwrap().orbiting_count(), 1);

        c.move_to_trash(&centre.id).unwrap();
        assert!(c.orbit().is_none());
        c.delete_permanently(&centre.id).unwrap();
        assert_eq!(c.central_note_id(), None);
    }
}
