//! Base types and traits for the command pattern

use crate::config::IndexerConfig;
use crate::logging::Logger;
use anyhow::Result;

/// Context passed to all commands containing shared configuration and options
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// The loaded and validated configuration
    pub config: IndexerConfig,
    /// Console logger; quiet when output must stay machine-readable
    pub logger: Logger,
}

impl CommandContext {
    pub fn new(config: IndexerConfig, logger: Logger) -> Self {
        Self { config, logger }
    }
}

/// Trait that all commands must implement
#[async_trait::async_trait]
pub trait Command {
    /// Execute the command with the given context
    async fn execute(&self, context: &CommandContext) -> Result<()>;
}
