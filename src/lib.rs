//! Repowiki - index source repositories into searchable chunks and
//! documentation outlines

pub mod analysis;
pub mod chunking;
pub mod commands;
pub mod config;
pub mod constants;
pub mod docs;
pub mod error;
pub mod generation;
pub mod git;
pub mod ignore;
pub mod logging;
pub mod pipeline;
pub mod planner;
pub mod scanner;
pub mod store;
pub mod utils;

pub type Result<T> = anyhow::Result<T>;

// Re-export commonly used types
pub use commands::{Command, CommandContext};
pub use config::IndexerConfig;
pub use error::{ErrorKind, IndexError};
pub use pipeline::{BatchSummary, Indexer, IndexerBuilder};

/// Load the default configuration file, falling back to built-in defaults
pub fn load_default_config() -> anyhow::Result<IndexerConfig> {
    IndexerConfig::load_or_default(constants::config::DEFAULT_CONFIG_FILE)
}
