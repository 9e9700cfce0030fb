//! Pixel notes library
//!
//! This library owns a collection of notes and everything derived from it:
//! mutations that keep the note invariants, filtered and ordered projections
//! for each display mode, the tag index, palette resolution, and persistence
//! of all of it through a simple key-value store.

mod cli;
mod color;
mod config;
mod controller;
mod errors;
mod helper;
mod note;
mod orbit;
mod palette;
mod persistence;
mod projection;
mod repository;
mod store;
mod tags;
mod types;

// Re-export key components
pub use cli::*;
pub use color::*;
pub use config::*;
pub use controller::*;
pub use errors::*;
pub use helper::*;
pub use note::*;
pub use orbit::*;
pub use palette::*;
pub use persistence::*;
pub use projection::*;
pub use repository::*;
pub use store::*;
pub use tags::*;
pub use types::*;
