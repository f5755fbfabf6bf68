//! Error taxonomy for the indexing pipeline
//!
//! Every variant is scoped: scan and fatal errors cost one repository, analysis
//! errors cost one file, and planning, generation and storage errors are always
//! replaced by a fallback artifact before they can reach the batch.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by pipeline stages
#[derive(Debug, Clone, Error)]
pub enum IndexError {
    /// Repository path missing or unreadable
    #[error("cannot scan {path}: {reason}")]
    Scan { path: PathBuf, reason: String },

    /// A single file could not be analyzed
    #[error("cannot analyze {path}: {reason}")]
    Analysis { path: String, reason: String },

    /// Structure inference failed
    #[error("structure planning failed: {0}")]
    Planning(String),

    /// The text-generation collaborator failed
    #[error("text generation failed: {0}")]
    Generation(String),

    /// The content store or the documentation writer failed
    #[error("storage failed: {0}")]
    Storage(String),

    /// An internal invariant was violated
    #[error("pipeline invariant violated: {0}")]
    Fatal(String),
}

/// Stable error classification carried into batch summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    ScanError,
    AnalysisError,
    PlanningError,
    GenerationError,
    StorageError,
    FatalPipelineError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::ScanError => "ScanError",
            ErrorKind::AnalysisError => "AnalysisError",
            ErrorKind::PlanningError => "PlanningError",
            ErrorKind::GenerationError => "GenerationError",
            ErrorKind::StorageError => "StorageError",
            ErrorKind::FatalPipelineError => "FatalPipelineError",
        };
        write!(f, "{}", name)
    }
}

impl IndexError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IndexError::Scan { .. } => ErrorKind::ScanError,
            IndexError::Analysis { .. } => ErrorKind::AnalysisError,
            IndexError::Planning(_) => ErrorKind::PlanningError,
            IndexError::Generation(_) => ErrorKind::GenerationError,
            IndexError::Storage(_) => ErrorKind::StorageError,
            IndexError::Fatal(_) => ErrorKind::FatalPipelineError,
        }
    }

    pub fn scan(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        IndexError::Scan {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn analysis(path: impl Into<String>, reason: impl Into<String>) -> Self {
        IndexError::Analysis {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Error recorded against one repository in a batch summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&IndexError> for RecordedError {
    fn from(error: &IndexError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}
