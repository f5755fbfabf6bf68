//! Documentation prose and the on-disk tree

pub mod diagrams;
pub mod examples;
pub mod generate;
pub mod writer;

pub use generate::{ContentGenerator, GenerationReport, attach, is_file_documentation, section_fallback};
pub use writer::{repository_output_dir, write_documentation};
