//! CLI module for the pixelnotes application
//!
//! This module turns parsed subcommands into controller operations and
//! prints the results.
use chrono::DateTime;
use log::{debug, info};

use crate::{
    find_preset, parse_tags, ColorSet, Commands, KeyValueStore, Note, NoteDraft, NotesController,
    NotesError, ProjectionFilter, Result, StatusFilter, PALETTE_PRESETS,
};

/// CLI Application handler - processes CLI commands against the controller
pub struct App<S: KeyValueStore> {
    controller: NotesController<S>,

    /// Whether to display verbose output
    verbose: bool,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(controller: NotesController<S>, verbose: bool) -> Self {
        Self {
            controller,
            verbose,
        }
    }

    pub fn controller(&self) -> &NotesController<S> {
        &self.controller
    }

    /// Run the CLI application with the given command
    pub fn run(&mut self, command: Commands) -> Result<()> {
        debug!("Running command {:?}", command);
        match command {
            Commands::Add {
                title,
                content,
                tags,
                pin,
            } => {
                let draft = NoteDraft::new(title, content)
                    .with_tags(parse_tags(tags))
                    .pinned(pin);
                let note = self.controller.create(draft)?;
                println!("Note created with ID: {}", note.id);
            }

            Commands::Edit {
                id,
                title,
                content,
                tags,
            } => self.edit_note(&id, title, content, tags)?,

            Commands::Pin { id } => {
                let outcome = self.controller.toggle_pin(&id);
                if self.settled(outcome, &id)? {
                    let pinned = self.controller.note(&id).is_some_and(|n| n.is_pinned);
                    println!("Note {} {}", id, if pinned { "pinned" } else { "unpinned" });
                }
            }

            Commands::Trash { id } => {
                let outcome = self.controller.move_to_trash(&id);
                if self.settled(outcome, &id)? {
                    println!("Note {} moved to trash", id);
                }
            }

            Commands::Restore { id } => {
                let outcome = self.controller.restore(&id);
                if self.settled(outcome, &id)? {
                    println!("Note {} restored", id);
                }
            }

            Commands::Delete { id } => {
                let outcome = self.controller.delete_permanently(&id);
                if self.settled(outcome, &id)? {
                    println!("Note {} deleted permanently", id);
                }
            }

            Commands::List {
                trashed,
                search,
                tag,
                json,
            } => {
                let filter = ProjectionFilter {
                    mode: if trashed {
                        StatusFilter::Trashed
                    } else {
                        StatusFilter::Active
                    },
                    search_term: search.unwrap_or_default(),
                    tag_filter: tag,
                };
                self.list_notes(&filter, json)?;
            }

            Commands::Tags => {
                let tags = self.controller.distinct_tags();
                if tags.is_empty() {
                    println!("No tags in use.");
                }
                for tag in tags {
                    println!("{}", console::style(format!("#{}", tag)).cyan());
                }
            }

            Commands::View { mode } => match mode {
                Some(mode) => {
                    self.controller.set_view_mode(mode)?;
                    println!("View mode set to {}", mode);
                }
                None => println!("{}", self.controller.view_mode()),
            },

            Commands::Palette { name, custom } => self.handle_palette(name, custom)?,

            Commands::Orbit { id } => self.show_orbit(id)?,
        }

        Ok(())
    }

    /// Stale ids mean the desired state already holds: report and carry on.
    fn settled(&self, outcome: Result<()>, id: &str) -> Result<bool> {
        match outcome {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => {
                info!("Ignoring operation on missing note {}", id);
                println!("No note with ID {}; nothing to do.", id);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn edit_note(
        &mut self,
        id: &str,
        title: Option<String>,
        content: Option<String>,
        tags: Option<String>,
    ) -> Result<()> {
        let current = self
            .controller
            .note(id)
            .ok_or_else(|| NotesError::NoteNotFound { id: id.to_string() })?;

        let mut draft = NoteDraft::from_note(current);
        if let Some(title) = title {
            draft.title = title;
        }
        if let Some(content) = content {
            draft.content = content;
        }
        if let Some(tags) = tags {
            draft.tags = parse_tags(Some(tags));
        }

        self.controller.update(id, draft)?;
        println!("Note {} updated", id);
        Ok(())
    }

    /// List notes according to the provided filter
    fn list_notes(&self, filter: &ProjectionFilter, json: bool) -> Result<()> {
        let notes = self.controller.project(filter);

        if json {
            println!("{}", serde_json::to_string_pretty(&notes)?);
            return Ok(());
        }

        if notes.is_empty() {
            if filter.search_term.trim().is_empty() && filter.tag_filter.is_none() {
                println!("You have no notes. Use 'add' to create one!");
            } else {
                println!("No notes match your filters.");
            }
            return Ok(());
        }

        self.display_notes_text(&notes);
        println!(
            "\nFound {} note{}",
            notes.len(),
            if notes.len() == 1 { "" } else { "s" }
        );
        Ok(())
    }

    /// Display notes in text format
    fn display_notes_text(&self, notes: &[&Note]) {
        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, note) in notes.iter().enumerate() {
            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }

            let touched = DateTime::from_timestamp_millis(note.timestamp)
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            let marker = if note.is_pinned { "* " } else { "" };

            println!("ID: {} | Updated: {}", note.id, touched);
            println!("Title: {}{}", marker, console::style(&note.title).bold());

            if !note.tags.is_empty() {
                let tags = note
                    .tags
                    .iter()
                    .map(|tag| format!("#{}", tag))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("Tags: {}", console::style(tags).cyan());
            }

            let preview = content_preview(&note.content, 100);
            if !preview.is_empty() {
                println!("\n{}", preview);
            }
            if self.verbose {
                if let Some(reminders) = &note.reminders {
                    println!("Reminders: {:?}", reminders);
                }
            }
        }
    }

    fn handle_palette(&mut self, name: Option<String>, custom: Option<String>) -> Result<()> {
        if let Some(hex) = custom {
            let colors = self.controller.set_custom_palette(&hex)?;
            println!("Custom palette selected");
            print_color_set(&colors);
            return Ok(());
        }

        if let Some(name) = name {
            self.controller.select_palette(&name)?;
            println!("Palette set to {}", name);
        } else {
            for preset in PALETTE_PRESETS {
                let marker = if preset.name == self.controller.palette_name() {
                    "*"
                } else {
                    " "
                };
                println!("{} {:<10} {}", marker, preset.name, preset.label);
            }
        }

        let label = find_preset(self.controller.palette_name())
            .map(|p| p.label)
            .unwrap_or("Theme Default");
        match self.controller.resolved_palette() {
            Some(colors) => {
                println!("Active: {}", label);
                print_color_set(&colors);
            }
            None => println!("Active: {} (theme colours)", label),
        }
        Ok(())
    }

    fn show_orbit(&mut self, id: String) -> Result<()> {
        self.controller.set_central_note(Some(id.clone()));
        let Some(orbit) = self.controller.orbit() else {
            println!("No active note with ID {} to centre the orbit on.", id);
            return Ok(());
        };

        println!("Centre: {}", console::style(&orbit.central.title).bold());
        if orbit.rings.is_empty() {
            println!("No other notes share a tag with it.");
        }
        for ring in &orbit.rings {
            let titles: Vec<&str> = ring.notes.iter().map(|n| n.title.as_str()).collect();
            println!("Ring {}: {}", ring.level, titles.join(", "));
        }
        Ok(())
    }
}

fn print_color_set(colors: &ColorSet) {
    println!("  background: {}", colors.background);
    println!("  text:       {}", colors.text);
    println!("  glow1:      {}", colors.glow1);
    println!("  glow2:      {}", colors.glow2);
}

/// First line of the content, cut at `max_chars`.
fn content_preview(content: &str, max_chars: usize) -> String {
    let first_line = content.lines().next().unwrap_or("").trim();
    if first_line.chars().count() > max_chars {
        let cut: String = first_line.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        first_line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, StoreAdapter};

    fn app() -> App<MemoryStore> {
        let adapter = StoreAdapter::new(MemoryStore::new()).with_seed(false);
        App::new(NotesController::load(adapter), false)
    }

    #[test]
    fn preview_truncates_first_line() {
        assert_eq!(content_preview("short\nsecond", 100), "short");
        assert_eq!(content_preview("abcdef", 3), "abc...");
        assert_eq!(content_preview("", 3), "");
    }

    #[test]
    fn missing_ids_are_not_errors() {
        let mut app = app();
        app.run(Commands::Trash { id: "gone".into() }).unwrap();
        app.run(Commands::Delete { id: "gone".into() }).unwrap();
        app.run(Commands::Restore { id: "gone".into() }).unwrap();
    }

    #[test]
    fn edit_keeps_omitted_fields() {
        let mut app = app();
        app.run(Commands::Add {
            title: "Groceries".into(),
            content: "Milk".into(),
            tags: Some("food, shop".into()),
            pin: true,
        })
        .unwrap();
        let id = app.controller().notes()[0].id.clone();

        app.run(Commands::Edit {
            id: id.clone(),
            title: None,
            content: Some("Eggs".into()),
            tags: None,
        })
        .unwrap();

        let note = app.controller().note(&id).unwrap();
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content, "Eggs");
        assert_eq!(note.tags, vec!["food", "shop"]);
        assert!(note.is_pinned);
    }

    #[test]
    fn blank_title_is_reported() {
        let mut app = app();
        let err = app
            .run(Commands::Add {
                title: "  ".into(),
                content: String::new(),
                tags: None,
                pin: false,
            })
            .unwrap_err();
        assert!(err.is_validation());
    }
}
