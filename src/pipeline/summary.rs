//! Per-repository outcomes and the batch summary

use crate::constants::fallback::NOTHING_INDEXED;
use crate::error::RecordedError;
use crate::planner::PlanOrigin;
use crate::scanner::RepositoryMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::PathBuf;
use uuid::Uuid;

/// What happened to one repository of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryOutcome {
    pub name: String,
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RepositoryMetadata>,
    pub analyzed_files: usize,
    pub folder_count: usize,
    pub section_count: usize,
    pub chunk_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_origin: Option<PlanOrigin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// Fallbacks taken while still indexing the repository
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<RecordedError>,
    /// Set when the repository could not be indexed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RecordedError>,
}

impl RepositoryOutcome {
    /// Outcome for a repository that never got past its first step
    pub fn failed(name: impl Into<String>, path: impl Into<PathBuf>, error: RecordedError) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            metadata: None,
            analyzed_files: 0,
            folder_count: 0,
            section_count: 0,
            chunk_count: 0,
            plan_origin: None,
            output_dir: None,
            warnings: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of one indexer run over a list of repositories
///
/// Holds one outcome per requested path, in request order, whether or not
/// the repository was indexed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// True when at least one repository was indexed or nothing was requested
    pub success: bool,
    pub cancelled: bool,
    pub outcomes: Vec<RepositoryOutcome>,
    pub narrative: String,
}

impl BatchSummary {
    pub fn indexed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_indexed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.indexed_count()
    }

    /// Whether a batch with these outcomes counts as successful
    pub fn is_successful(outcomes: &[RepositoryOutcome]) -> bool {
        outcomes.is_empty() || outcomes.iter().any(RepositoryOutcome::is_indexed)
    }
}

/// Narrative used when the generator is unavailable
pub fn fallback_narrative(outcomes: &[RepositoryOutcome]) -> String {
    let indexed: Vec<&RepositoryOutcome> = outcomes.iter().filter(|o| o.is_indexed()).collect();
    if indexed.is_empty() {
        return NOTHING_INDEXED.to_string();
    }

    let mut text = format!(
        "Indexed {} of {} repositories.\n\n",
        indexed.len(),
        outcomes.len()
    );
    for outcome in outcomes {
        match (&outcome.metadata, &outcome.error) {
            (_, Some(error)) => {
                let _ = writeln!(text, "- {}: not indexed ({})", outcome.name, error.kind);
            }
            (Some(metadata), None) => {
                let _ = writeln!(
                    text,
                    "- {}: {}, {} files, {} documentation sections",
                    outcome.name,
                    metadata.primary_language(),
                    metadata.summary.file_count,
                    outcome.section_count
                );
            }
            (None, None) => {
                let _ = writeln!(text, "- {}", outcome.name);
            }
        }
    }
    text
}

/// Prompt asking the generator to describe the batch as a whole
pub fn narrative_prompt(outcomes: &[RepositoryOutcome]) -> String {
    let mut prompt = String::from(
        "You are a technical writer. Write a short overview (under 300 words, markdown) of how \
         the following repositories relate to each other and what each one is for.\n\n",
    );
    for outcome in outcomes.iter().filter(|o| o.is_indexed()) {
        if let Some(metadata) = &outcome.metadata {
            let _ = writeln!(
                prompt,
                "- {} ({}, {} files, configuration: {})",
                outcome.name,
                metadata.primary_language(),
                metadata.summary.file_count,
                metadata.config_files.join(", ")
            );
        }
    }
    prompt
}
