//! Scan command implementation

use super::{Command, CommandContext};
use crate::git::{GitMetadataProvider, SystemGit};
use crate::scanner::{
    FileCategory, FileRecord, RepositoryMetadata, RepositoryScanner, repository_name,
};
use crate::utils::thousands;
use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::*;
use std::path::{Path, PathBuf};

/// Scan command for inspecting what the scanner keeps from a repository
pub struct ScanCommand {
    pub path: PathBuf,
    /// Output in JSON format for machine consumption
    pub json: bool,
}

#[async_trait]
impl Command for ScanCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let (metadata, _) = scan_repository(&self.path, context)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&metadata)?);
            return Ok(());
        }

        println!("{}", metadata.name.bold());
        println!(
            "  {} files, {} bytes, primary language {}",
            thousands(metadata.summary.file_count as u64),
            thousands(metadata.summary.total_size),
            metadata.primary_language()
        );
        for category in FileCategory::ALL {
            let count = metadata.summary.count(category);
            if count > 0 {
                println!("  {:<14} {}", category.as_str(), count);
            }
        }
        if !metadata.summary.extension_histogram.is_empty() {
            let extensions: Vec<String> = metadata
                .summary
                .extension_histogram
                .iter()
                .map(|(ext, count)| format!("{} ({})", ext, count))
                .collect();
            println!("  extensions     {}", extensions.join(", "));
        }
        if let Some(git) = &metadata.git {
            println!(
                "  git            {} @ {} by {}",
                git.branch.cyan(),
                git.commit,
                git.author
            );
        }
        Ok(())
    }
}

/// Scan `path`, returning its metadata and priority-ordered records
pub fn scan_repository(
    path: &Path,
    context: &CommandContext,
) -> Result<(RepositoryMetadata, Vec<FileRecord>)> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Cannot open repository '{}'", path.display()))?;
    let scanner = RepositoryScanner::new(context.config.scanner.clone(), context.logger);
    let (records, summary) = scanner.scan_with_summary(&root)?;
    let git = SystemGit.metadata(&root);
    let metadata = RepositoryMetadata::new(repository_name(&root), root, &records, summary, git);
    Ok((metadata, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Logger;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_metadata_counts_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("src")).unwrap();
        fs::write(temp_dir.path().join("src/main.rs"), "fn main() {}\n").unwrap();
        fs::write(temp_dir.path().join("Cargo.toml"), "[package]\n").unwrap();

        let context = CommandContext::new(Default::default(), Logger::quiet());
        let (metadata, records) = scan_repository(temp_dir.path(), &context).unwrap();

        assert_eq!(metadata.summary.file_count, 2);
        assert_eq!(records[0].relative_path, "src/main.rs");
        assert_eq!(metadata.primary_language(), "Rust");
        assert!(metadata.config_files.contains(&"Cargo.toml".to_string()));
    }

    #[tokio::test]
    async fn test_scan_command_missing_path() {
        let command = ScanCommand {
            path: PathBuf::from("/definitely/not/here"),
            json: false,
        };
        let context = CommandContext::new(Default::default(), Logger::quiet());
        let error = command.execute(&context).await.unwrap_err();
        assert!(error.to_string().contains("Cannot open repository"));
    }
}
