//! Command-line front end over the notes controller.
mod app;
mod args;

pub use app::*;
pub use args::*;
