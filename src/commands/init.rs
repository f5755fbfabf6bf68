//! Init command implementation

use super::{Command, CommandContext};
use crate::config::IndexerConfig;
use anyhow::Result;
use async_trait::async_trait;
use colored::*;
use std::path::PathBuf;

/// Init command for writing a configuration file populated with the defaults
pub struct InitCommand {
    pub output: PathBuf,
    pub overwrite: bool,
}

#[async_trait]
impl Command for InitCommand {
    async fn execute(&self, _context: &CommandContext) -> Result<()> {
        if self.output.exists() && !self.overwrite {
            return Err(anyhow::anyhow!(
                "Output file '{}' already exists. Use --overwrite to replace it.",
                self.output.display()
            ));
        }

        IndexerConfig::default().save(&self.output)?;

        println!(
            "{}",
            format!("Configuration saved to '{}'", self.output.display()).green()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_writes_loadable_config() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("repowiki.yaml");
        let command = InitCommand {
            output: output.clone(),
            overwrite: false,
        };

        command.execute(&CommandContext::default()).await.unwrap();

        let loaded = IndexerConfig::load(&output).unwrap();
        assert_eq!(loaded, IndexerConfig::default());
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("repowiki.yaml");
        fs::write(&output, "custom: true").unwrap();

        let command = InitCommand {
            output: output.clone(),
            overwrite: false,
        };
        let error = command
            .execute(&CommandContext::default())
            .await
            .unwrap_err();

        assert!(error.to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(&output).unwrap(), "custom: true");
    }

    #[tokio::test]
    async fn test_init_overwrite_replaces_file() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("repowiki.yaml");
        fs::write(&output, "custom: true").unwrap();

        let command = InitCommand {
            output: output.clone(),
            overwrite: true,
        };
        command.execute(&CommandContext::default()).await.unwrap();

        assert!(fs::read_to_string(&output).unwrap().starts_with("---\n"));
    }
}
