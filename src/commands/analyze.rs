//! Analyze command implementation

use super::scan::scan_repository;
use super::{Command, CommandContext};
use crate::analysis::{AnalysisMap, AnalysisScheduler};
use anyhow::Result;
use async_trait::async_trait;
use colored::*;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Analyze command for printing the structural facts of one repository
pub struct AnalyzeCommand {
    pub path: PathBuf,
    /// Output in JSON format for machine consumption
    pub json: bool,
}

#[async_trait]
impl Command for AnalyzeCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let analysis = analyze_path(&self.path, context).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&analysis)?);
            return Ok(());
        }

        if analysis.is_empty() {
            println!("{}", "No files were eligible for analysis".yellow());
            return Ok(());
        }

        for (path, facts) in &analysis {
            println!(
                "{} {} {}",
                path.bold(),
                format!("[{}]", facts.language).cyan(),
                format!(
                    "{} functions, {} classes, {} endpoints",
                    facts.functions.len(),
                    facts.classes.len(),
                    facts.apis.len()
                )
                .dimmed()
            );
        }
        Ok(())
    }
}

/// Scan and analyze `path`
pub async fn analyze_path(path: &Path, context: &CommandContext) -> Result<AnalysisMap> {
    let (metadata, records) = scan_repository(path, context)?;

    let scheduler = AnalysisScheduler::new(context.config.analysis.clone(), context.logger)
        .with_scope(metadata.name);
    Ok(scheduler
        .analyze_repository(&records, &CancellationToken::new())
        .await)
}
