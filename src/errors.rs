//! Error types for the pixelnotes application.
//!
//! This module defines the error taxonomy shared by the repository, the
//! persistence adapter and the command line front end.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the pixelnotes application.
#[derive(Error, Debug)]
pub enum NotesError {
    /// Bad input, e.g. an empty title. The operation did not commit.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Operation referenced a note id that is no longer in the collection.
    #[error("Note not found: {id}")]
    NoteNotFound { id: String },

    /// A persisted slot could not be read or written.
    #[error("Storage error for key '{key}': {message}")]
    Storage { key: String, message: String },

    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl NotesError {
    /// True for stale-id errors, which callers treat as already satisfied.
    pub fn is_not_found(&self) -> bool {
        matches!(self, NotesError::NoteNotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, NotesError::Validation { .. })
    }
}
