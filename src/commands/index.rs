//! Index command implementation

use super::{Command, CommandContext};
use crate::error::RecordedError;
use crate::generation::{DisabledGenerator, OpenAiCompatibleGenerator, TextGenerator};
use crate::pipeline::{BatchSummary, Indexer};
use crate::utils::thousands;
use anyhow::Result;
use async_trait::async_trait;
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

/// Index command for running the full pipeline over a batch of repositories
pub struct IndexCommand {
    pub paths: Vec<PathBuf>,
    /// Print the batch summary as JSON
    pub json: bool,
    /// Use the text-generation endpoint; placeholders are written otherwise
    pub generate: bool,
}

#[async_trait]
impl Command for IndexCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let generator = self.generator(context);
        let indexer = Indexer::builder(context.config.clone())
            .generator(generator)
            .logger(context.logger)
            .build();

        let cancel = indexer.cancellation_token();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });

        let summary = indexer.run(self.paths.clone()).await;
        interrupt.abort();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&summary);
        }

        if !summary.success {
            anyhow::bail!(
                "{} of {} repositories failed to index",
                summary.failed_count(),
                summary.outcomes.len()
            );
        }
        Ok(())
    }
}

impl IndexCommand {
    fn generator(&self, context: &CommandContext) -> Arc<dyn TextGenerator> {
        if !self.generate {
            return Arc::new(DisabledGenerator);
        }
        match OpenAiCompatibleGenerator::from_config(&context.config.generation) {
            Ok(generator) => Arc::new(generator),
            Err(e) => {
                context
                    .logger
                    .warn("generation", &format!("{}, writing placeholders instead", e));
                Arc::new(DisabledGenerator)
            }
        }
    }
}

fn print_summary(summary: &BatchSummary) {
    println!();
    for outcome in &summary.outcomes {
        match &outcome.error {
            None => println!(
                "{} {} ({} files analyzed, {} sections, {} chunks)",
                "✓".green(),
                outcome.name.bold(),
                thousands(outcome.analyzed_files as u64),
                outcome.section_count,
                thousands(outcome.chunk_count as u64)
            ),
            Some(error) => println!("{} {} {}", "✗".red(), outcome.name.bold(), describe(error)),
        }
        for warning in &outcome.warnings {
            println!("    {} {}", "!".yellow(), describe(warning));
        }
    }

    if summary.cancelled {
        println!("{}", "Batch was cancelled".yellow());
    }
    println!();
    println!("{}", summary.narrative);
}

fn describe(error: &RecordedError) -> String {
    format!("[{}] {}", error.kind, error.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Logger;
    use std::fs;
    use tempfile::TempDir;

    fn context() -> CommandContext {
        CommandContext::new(Default::default(), Logger::quiet())
    }

    #[tokio::test]
    async fn test_index_command_succeeds_for_existing_repository() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("README.md"), "# Demo\n").unwrap();

        let command = IndexCommand {
            paths: vec![temp_dir.path().to_path_buf()],
            json: true,
            generate: false,
        };
        assert!(command.execute(&context()).await.is_ok());
    }

    #[tokio::test]
    async fn test_index_command_fails_when_nothing_indexed() {
        let temp_dir = TempDir::new().unwrap();
        let command = IndexCommand {
            paths: vec![temp_dir.path().join("missing")],
            json: true,
            generate: false,
        };

        let error = command.execute(&context()).await.unwrap_err();
        assert_eq!(error.to_string(), "1 of 1 repositories failed to index");
    }
}
