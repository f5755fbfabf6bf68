//! Configuration validation
//!
//! Validators collect every problem instead of stopping at the first one so a
//! user can fix a configuration file in one pass.

use super::IndexerConfig;
use anyhow::anyhow;

/// Enumeration of possible validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Worker pool must have at least one worker
    ZeroWorkers,
    /// Eligible-file cap must keep at least one file
    ZeroFileCap,
    /// Chunk overlap must be smaller than the chunk target size
    OverlapTooLarge { overlap: usize, target_size: usize },
    /// Chunk target size must be positive
    ZeroChunkSize,
    /// Minimum batch size exceeds maximum batch size
    BatchBoundsInverted { min: usize, max: usize },
    /// Minimum code size exceeds the file size ceiling
    CodeSizeBoundsInverted { min: u64, max: u64 },
    /// Documentation ceiling exceeds the general file ceiling
    DocCeilingTooLarge { doc: u64, max: u64 },
    /// Generation endpoint is empty
    EmptyBaseUrl,
    /// Excluded directory entry is empty or contains a separator
    InvalidExcludedDir(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::ZeroWorkers => write!(f, "analysis.workers must be at least 1"),
            ValidationError::ZeroFileCap => write!(f, "analysis.max_files must be at least 1"),
            ValidationError::OverlapTooLarge {
                overlap,
                target_size,
            } => write!(
                f,
                "chunking.overlap ({}) must be smaller than chunking.target_size ({})",
                overlap, target_size
            ),
            ValidationError::ZeroChunkSize => {
                write!(f, "chunking.target_size must be at least 1")
            }
            ValidationError::BatchBoundsInverted { min, max } => write!(
                f,
                "store.min_batch_size ({}) cannot exceed store.max_batch_size ({})",
                min, max
            ),
            ValidationError::CodeSizeBoundsInverted { min, max } => write!(
                f,
                "analysis.min_code_size ({}) cannot exceed analysis.max_file_size ({})",
                min, max
            ),
            ValidationError::DocCeilingTooLarge { doc, max } => write!(
                f,
                "analysis.max_doc_size ({}) cannot exceed analysis.max_file_size ({})",
                doc, max
            ),
            ValidationError::EmptyBaseUrl => write!(f, "generation.base_url cannot be empty"),
            ValidationError::InvalidExcludedDir(dir) => {
                write!(f, "Invalid scanner.excluded_dirs entry: '{}'", dir)
            }
        }
    }
}

/// Validates a complete configuration object
pub fn validate_config(config: &IndexerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let analysis = &config.analysis;
    if analysis.workers == 0 {
        errors.push(ValidationError::ZeroWorkers);
    }
    if analysis.max_files == 0 {
        errors.push(ValidationError::ZeroFileCap);
    }
    if analysis.min_code_size > analysis.max_file_size {
        errors.push(ValidationError::CodeSizeBoundsInverted {
            min: analysis.min_code_size,
            max: analysis.max_file_size,
        });
    }
    if analysis.max_doc_size > analysis.max_file_size {
        errors.push(ValidationError::DocCeilingTooLarge {
            doc: analysis.max_doc_size,
            max: analysis.max_file_size,
        });
    }

    if let Err(mut chunk_errors) = validate_chunking(config.chunking.target_size, config.chunking.overlap)
    {
        errors.append(&mut chunk_errors);
    }

    if config.store.min_batch_size > config.store.max_batch_size {
        errors.push(ValidationError::BatchBoundsInverted {
            min: config.store.min_batch_size,
            max: config.store.max_batch_size,
        });
    }

    if config.generation.base_url.trim().is_empty() {
        errors.push(ValidationError::EmptyBaseUrl);
    }

    for dir in &config.scanner.excluded_dirs {
        if dir.trim().is_empty() || dir.contains('/') || dir.contains('\\') {
            errors.push(ValidationError::InvalidExcludedDir(dir.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates chunk sizing on its own, for callers that chunk with ad-hoc sizes
pub fn validate_chunking(target_size: usize, overlap: usize) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    if target_size == 0 {
        errors.push(ValidationError::ZeroChunkSize);
    }
    if overlap >= target_size {
        errors.push(ValidationError::OverlapTooLarge {
            overlap,
            target_size,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Convert a list of validation errors into an anyhow error
pub fn validation_errors_to_anyhow(errors: Vec<ValidationError>) -> anyhow::Error {
    let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    anyhow!("Invalid configuration:\n  - {}", messages.join("\n  - "))
}
