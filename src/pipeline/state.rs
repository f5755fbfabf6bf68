//! Mutable state threaded through the pipeline stages

use super::summary::RepositoryOutcome;
use crate::analysis::AnalysisMap;
use crate::error::{IndexError, RecordedError};
use crate::planner::DocumentationStructure;
use crate::scanner::{FileRecord, RepositoryMetadata, repository_name};
use std::path::{Path, PathBuf};

/// Everything the state machine knows during one run
///
/// The per-repository group (`metadata` through `warnings`) is cleared when
/// the machine advances, so no repository ever sees another's analysis.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    pub repo_paths: Vec<PathBuf>,
    /// Index of the repository being processed
    pub index: usize,

    pub metadata: Option<RepositoryMetadata>,
    pub records: Vec<FileRecord>,
    pub analysis: AnalysisMap,
    pub structure: Option<DocumentationStructure>,
    pub chunk_count: usize,
    pub output: Option<PathBuf>,
    pub warnings: Vec<RecordedError>,

    pub outcomes: Vec<RepositoryOutcome>,
    pub last_error: Option<IndexError>,
    pub narrative: Option<String>,
    pub success: bool,
    pub cancelled: bool,
}

impl PipelineState {
    pub fn new(repo_paths: Vec<PathBuf>) -> Self {
        Self {
            repo_paths,
            ..Self::default()
        }
    }

    pub fn current_path(&self) -> Result<&Path, IndexError> {
        self.repo_paths
            .get(self.index)
            .map(PathBuf::as_path)
            .ok_or_else(|| {
                IndexError::Fatal(format!(
                    "repository index {} out of range for {} paths",
                    self.index,
                    self.repo_paths.len()
                ))
            })
    }

    pub fn has_current(&self) -> bool {
        self.index < self.repo_paths.len()
    }

    /// Name used in logs for the current repository
    pub fn scope(&self) -> String {
        match &self.metadata {
            Some(metadata) => metadata.name.clone(),
            None => self
                .current_path()
                .map(repository_name)
                .unwrap_or_else(|_| "pipeline".to_string()),
        }
    }

    /// Record a fallback taken for the current repository
    pub fn warn(&mut self, error: &IndexError) {
        self.warnings.push(RecordedError::from(error));
    }

    /// Record a repository-scoped failure
    pub fn fail(&mut self, error: IndexError) {
        self.last_error = Some(error);
    }

    /// Close out the current repository and move to the next one
    ///
    /// Appends the current repository's outcome, clears the
    /// per-repository fields, and advances the index.
    pub fn advance(&mut self) {
        if let Ok(path) = self.current_path() {
            let path = path.to_path_buf();
            let outcome = self.outcome_for(&path);
            self.outcomes.push(outcome);
        }
        self.clear_repository();
        self.index += 1;
    }

    /// Record every repository not yet started as failed with `error`
    pub fn abandon_remaining(&mut self, error: &IndexError) {
        let recorded = RecordedError::from(error);
        while self.outcomes.len() < self.repo_paths.len() {
            let path = &self.repo_paths[self.outcomes.len()];
            self.outcomes.push(RepositoryOutcome::failed(
                repository_name(path),
                path.clone(),
                recorded.clone(),
            ));
        }
        self.index = self.repo_paths.len();
    }

    fn outcome_for(&mut self, path: &Path) -> RepositoryOutcome {
        let name = self
            .metadata
            .as_ref()
            .map(|metadata| metadata.name.clone())
            .unwrap_or_else(|| repository_name(path));
        let error = self.last_error.as_ref().map(RecordedError::from);

        RepositoryOutcome {
            name,
            path: path.to_path_buf(),
            metadata: self.metadata.take(),
            analyzed_files: self.analysis.len(),
            folder_count: self.structure.as_ref().map_or(0, |s| s.folders.len()),
            section_count: self.structure.as_ref().map_or(0, |s| s.section_count()),
            chunk_count: self.chunk_count,
            plan_origin: self.structure.as_ref().map(|s| s.origin),
            output_dir: self.output.take(),
            warnings: std::mem::take(&mut self.warnings),
            error,
        }
    }

    fn clear_repository(&mut self) {
        self.metadata = None;
        self.records.clear();
        self.analysis.clear();
        self.structure = None;
        self.chunk_count = 0;
        self.output = None;
        self.warnings.clear();
        self.last_error = None;
    }
}
