//! Shared types for the pixelnotes application.
//!
//! This module contains the crate-wide Result alias, the display-mode
//! enumeration and the CLI subcommands.
use std::{fmt, str::FromStr};

use clap::{Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::NotesError;

/// A specialized Result type for pixelnotes operations.
pub type Result<T> = std::result::Result<T, NotesError>;

/// How the projected notes are rendered. The projection itself does not
/// depend on this; only the renderer choice does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Floating bubbles, the primary mode
    #[default]
    Bubble,
    Grid,
    List,
    /// Radial view around one central note
    Orbit,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [ViewMode::Bubble, ViewMode::Grid, ViewMode::List, ViewMode::Orbit];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Bubble => "bubble",
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
            ViewMode::Orbit => "orbit",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = NotesError;

    fn from_str(s: &str) -> Result<Self> {
        ViewMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| NotesError::Validation {
                message: format!("Unknown view mode '{}'", s),
            })
    }
}

/// Available subcommands for the pixelnotes application
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new note
    Add {
        /// Title of the note
        #[clap(short = 'T', long)]
        title: String,

        /// Content of the note, stored as given
        #[clap(short, long, default_value = "")]
        content: String,

        /// Tags to associate with the note (comma-separated)
        #[clap(short = 't', long)]
        tags: Option<String>,

        /// Pin the note on creation
        #[clap(short, long)]
        pin: bool,
    },

    /// Edit an existing note; omitted fields keep their current value
    Edit {
        /// ID of the note to edit
        id: String,

        /// New title for the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New content for the note
        #[clap(short, long)]
        content: Option<String>,

        /// Replacement tags (comma-separated)
        #[clap(short = 't', long)]
        tags: Option<String>,
    },

    /// Toggle the pin on a note
    Pin {
        /// ID of the note
        id: String,
    },

    /// Move a note to the trash
    Trash {
        /// ID of the note
        id: String,
    },

    /// Bring a note back from the trash
    Restore {
        /// ID of the note
        id: String,
    },

    /// Delete a note permanently
    Delete {
        /// ID of the note to delete
        id: String,
    },

    /// List notes with optional filtering
    List {
        /// Show the trash instead of active notes
        #[clap(long)]
        trashed: bool,

        /// Case-insensitive substring to look for in title, content and tags
        #[clap(short, long)]
        search: Option<String>,

        /// Only notes carrying exactly this tag
        #[clap(short, long)]
        tag: Option<String>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// List the distinct tags of active notes
    Tags,

    /// Show or set the display mode
    View {
        /// Mode to switch to
        #[clap(value_enum)]
        mode: Option<ViewMode>,
    },

    /// Show or select the bubble palette
    Palette {
        /// Preset name, "default" or "custom"
        name: Option<String>,

        /// Derive the custom palette from this background colour (#RRGGBB)
        #[clap(long)]
        custom: Option<String>,
    },

    /// Show the notes orbiting a central note through shared tags
    Orbit {
        /// ID of the central note
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_mode_parses_known_names_only() {
        for mode in ViewMode::ALL {
            assert_eq!(mode.as_str().parse::<ViewMode>().unwrap(), mode);
        }
        assert!("Bubble".parse::<ViewMode>().is_err());
        assert!("".parse::<ViewMode>().is_err());
        assert_eq!(ViewMode::default(), ViewMode::Bubble);
    }
}
