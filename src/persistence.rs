//! Persistent store adapter.
//!
//! Loads and saves the four persisted slots (note collection, view mode,
//! palette name, custom palette). Loading never fails: unreadable or malformed
//! data is logged and replaced by defaults. Every record that survives loading
//! goes through [`normalize_note`] so consumers only ever see canonical notes.
use std::collections::HashSet;

use log::{debug, info, trace, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    default_custom_palette, find_preset, normalize_tags, Clock, ColorSet, KeyValueStore, Note,
    NoteStatus, Result, ViewMode, THEME_DEFAULT_PALETTE,
};

pub const DEFAULT_STORAGE_PREFIX: &str = "pixel-notes";

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Slot names derived from one prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub notes: String,
    pub view_mode: String,
    pub palette: String,
    pub custom_palette: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        StorageKeys {
            notes: prefix.to_string(),
            view_mode: format!("{}-layout", prefix),
            palette: format!("{}-palette", prefix),
            custom_palette: format!("{}-custom-palette", prefix),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_STORAGE_PREFIX)
    }
}

/// A stored record before defaulting. Only `id` and `title` are required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredNote {
    id: String,
    title: String,
    #[serde(default)]
    content: Option<Value>,
    #[serde(default)]
    tags: Option<Value>,
    #[serde(default)]
    is_pinned: Option<Value>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    timestamp: Option<Value>,
    #[serde(default)]
    reminders: Option<Value>,
}

/// Reads and writes application state through a [`KeyValueStore`].
#[derive(Debug)]
pub struct StoreAdapter<S: KeyValueStore> {
    store: S,
    keys: StorageKeys,
    seed_on_first_run: bool,
    default_view_mode: ViewMode,
}

impl<S: KeyValueStore> StoreAdapter<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            keys: StorageKeys::default(),
            seed_on_first_run: true,
            default_view_mode: ViewMode::default(),
        }
    }

    pub fn with_keys(mut self, keys: StorageKeys) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_seed(mut self, seed_on_first_run: bool) -> Self {
        self.seed_on_first_run = seed_on_first_run;
        self
    }

    pub fn with_default_view_mode(mut self, mode: ViewMode) -> Self {
        self.default_view_mode = mode;
        self
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Loads the note collection, falling back to the seed set (or nothing).
    /// A seed set is written back at once so its timestamps stay fixed.
    pub fn load_notes<C: Clock>(&mut self, clock: &C) -> Vec<Note> {
        let Some(raw) = self.store.get(&self.keys.notes) else {
            info!("No stored notes under '{}', starting fresh", self.keys.notes);
            return self.fallback_notes(clock);
        };

        match parse_notes(&raw) {
            Ok(notes) => {
                info!("Loaded {} notes from '{}'", notes.len(), self.keys.notes);
                notes
            }
            Err(e) => {
                warn!("Stored notes under '{}' are unusable: {}", self.keys.notes, e);
                self.fallback_notes(clock)
            }
        }
    }

    pub fn save_notes(&mut self, notes: &[Note]) -> Result<()> {
        let json = serde_json::to_string(notes)?;
        debug!("Saving {} notes ({} bytes)", notes.len(), json.len());
        self.store.set(&self.keys.notes, &json)
    }

    pub fn load_view_mode(&self) -> ViewMode {
        match self.store.get(&self.keys.view_mode) {
            Some(raw) => match raw.trim().parse::<ViewMode>() {
                Ok(mode) => mode,
                Err(e) => {
                    warn!("{}; using {}", e, self.default_view_mode);
                    self.default_view_mode
                }
            },
            None => self.default_view_mode,
        }
    }

    pub fn save_view_mode(&mut self, mode: ViewMode) -> Result<()> {
        debug!("Saving view mode {}", mode);
        self.store.set(&self.keys.view_mode, mode.as_str())
    }

    /// Loads the selected palette name; unknown names become the theme default.
    pub fn load_palette_name(&self) -> String {
        match self.store.get(&self.keys.palette) {
            Some(raw) => {
                let name = raw.trim();
                if find_preset(name).is_some() {
                    name.to_string()
                } else {
                    warn!("Stored palette '{}' is not a known preset", name);
                    THEME_DEFAULT_PALETTE.to_string()
                }
            }
            None => THEME_DEFAULT_PALETTE.to_string(),
        }
    }

    pub fn save_palette_name(&mut self, name: &str) -> Result<()> {
        debug!("Saving palette name {}", name);
        self.store.set(&self.keys.palette, name)
    }

    pub fn load_custom_palette(&self) -> ColorSet {
        let Some(raw) = self.store.get(&self.keys.custom_palette) else {
            return default_custom_palette();
        };
        match serde_json::from_str::<ColorSet>(&raw) {
            Ok(set) if set.is_well_formed() => set,
            Ok(_) => {
                warn!("Stored custom palette has malformed colours, using default");
                default_custom_palette()
            }
            Err(e) => {
                warn!("Failed to parse stored custom palette: {}", e);
                default_custom_palette()
            }
        }
    }

    pub fn save_custom_palette(&mut self, colors: &ColorSet) -> Result<()> {
        let json = serde_json::to_string(colors)?;
        self.store.set(&self.keys.custom_palette, &json)
    }

    fn fallback_notes<C: Clock>(&mut self, clock: &C) -> Vec<Note> {
        if !self.seed_on_first_run {
            return Vec::new();
        }
        let seed = seed_notes(clock.now_millis());
        if let Err(e) = self.save_notes(&seed) {
            warn!("Failed to store seed notes under '{}': {}", self.keys.notes, e);
        }
        seed
    }
}

/// Parses a stored collection. Fails when the payload is not an array of
/// records that each carry a string `id` and `title`.
pub fn parse_notes(raw: &str) -> Result<Vec<Note>> {
    let stored: Vec<StoredNote> = serde_json::from_str(raw)?;
    let mut notes: Vec<Note> = Vec::with_capacity(stored.len());
    let mut seen = HashSet::with_capacity(stored.len());
    for record in stored {
        if !seen.insert(record.id.clone()) {
            warn!("Dropping duplicate stored note id {}", record.id);
            continue;
        }
        notes.push(normalize_note(record));
    }
    Ok(notes)
}

/// Fills every missing or ill-typed field with its default and re-establishes
/// the entity invariants.
fn normalize_note(record: StoredNote) -> Note {
    trace!("Normalizing stored note {}", record.id);

    let status = match record.status.as_ref().and_then(Value::as_str) {
        Some("trashed") => NoteStatus::Trashed,
        Some("archived") => NoteStatus::Archived,
        _ => NoteStatus::Active,
    };

    let tags = match record.tags {
        Some(Value::Array(items)) => normalize_tags(items.iter().filter_map(Value::as_str)),
        _ => Vec::new(),
    };

    let reminders = match record.reminders {
        Some(Value::Array(items)) => Some(items.iter().filter_map(Value::as_i64).collect()),
        _ => None,
    };

    let title = if record.title.trim().is_empty() {
        warn!("Stored note {} has a blank title", record.id);
        "Untitled".to_string()
    } else {
        record.title
    };

    let is_pinned = record.is_pinned.as_ref().and_then(Value::as_bool).unwrap_or(false);

    Note {
        id: record.id,
        title,
        content: record
            .content
            .as_ref()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        tags,
        is_pinned: is_pinned && status != NoteStatus::Trashed,
        status,
        timestamp: record
            .timestamp
            .as_ref()
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
            .unwrap_or(0),
        reminders,
    }
}

/// Built-in notes shown on first run.
pub fn seed_notes(now: i64) -> Vec<Note> {
    let seed = |id: &str, title: &str, content: &str, age: i64, tags: &[&str], pinned: bool| Note {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        is_pinned: pinned,
        status: NoteStatus::Active,
        timestamp: now - age,
        reminders: None,
    };

    vec![
        seed("1", "Grocery List", "Milk, Eggs, Bread, Pixelated Apples", 2 * DAY_MS, &["shopping", "food"], true),
        seed("2", "Meeting Ideas", "Discuss project Omega, Review timeline, Assign pixel tasks", 5 * HOUR_MS, &["work", "project omega"], false),
        seed("3", "Game Dev Log", "Fixed player jump bug. Added new level with retro theme.", 30 * MINUTE_MS, &["devlog", "gamedev"], false),
        seed("4", "To-Do Today", "1. Finish styling app\n2. Test note CRUD\n3. Drink coffee", 0, &["todo"], true),
        seed("5", "Recipe for Pixel Pie", "Ingredients: Digital flour, virtual sugar, 1 byte of spice.", 5 * DAY_MS, &["food", "recipe"], false),
    ]
}
