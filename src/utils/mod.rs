//! Utility functions shared across the crate

pub mod filesystem;
pub mod formatting;
pub mod sanitizers;

pub use filesystem::{ensure_directory_exists, write_text_file};
pub use formatting::{thousands, title_case};
pub use sanitizers::{sanitize_for_filename, slugify};
