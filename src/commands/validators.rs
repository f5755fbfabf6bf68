//! Command argument validation utilities
//!
//! Checks that go beyond what clap enforces while parsing: repository paths
//! and output locations must be non-blank, and a batch needs at least one
//! repository.

use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};

/// Validation errors for command arguments
#[derive(Debug, PartialEq)]
pub enum CommandValidationError {
    /// Invalid argument value
    InvalidValue {
        argument: String,
        value: String,
        reason: String,
    },
    /// Empty collection when at least one item is required
    EmptyCollection { argument: String },
}

impl std::fmt::Display for CommandValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandValidationError::InvalidValue {
                argument,
                value,
                reason,
            } => {
                write!(f, "Invalid value '{}' for {}: {}", value, argument, reason)
            }
            CommandValidationError::EmptyCollection { argument } => {
                write!(f, "{} cannot be empty", argument)
            }
        }
    }
}

impl std::error::Error for CommandValidationError {}

/// Convert validation error to anyhow::Error
pub fn validation_error_to_anyhow(error: CommandValidationError) -> anyhow::Error {
    anyhow!(error.to_string())
}

/// Validate the repository paths handed to `index`
pub fn validate_repository_paths(paths: &[PathBuf]) -> Result<()> {
    if paths.is_empty() {
        return Err(validation_error_to_anyhow(
            CommandValidationError::EmptyCollection {
                argument: "repository paths".to_string(),
            },
        ));
    }
    for path in paths {
        validate_path("repository path", path)?;
    }
    Ok(())
}

/// Validate output directory path
pub fn validate_output_directory(output_dir: &Option<PathBuf>) -> Result<()> {
    match output_dir {
        Some(dir) => validate_path("output-dir", dir),
        None => Ok(()),
    }
}

fn validate_path(argument: &str, path: &Path) -> Result<()> {
    if path.as_os_str().to_string_lossy().trim().is_empty() {
        return Err(validation_error_to_anyhow(
            CommandValidationError::InvalidValue {
                argument: argument.to_string(),
                value: path.display().to_string(),
                reason: "path cannot be empty or whitespace only".to_string(),
            },
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_repository_paths() {
        assert!(validate_repository_paths(&["./repo".into()]).is_ok());

        let empty = validate_repository_paths(&[]).unwrap_err();
        assert_eq!(empty.to_string(), "repository paths cannot be empty");

        let blank = validate_repository_paths(&["  ".into()]).unwrap_err();
        assert!(blank.to_string().contains("repository path"));
    }

    #[test]
    fn test_validate_output_directory() {
        assert!(validate_output_directory(&None).is_ok());
        assert!(validate_output_directory(&Some("wiki".into())).is_ok());
        assert!(validate_output_directory(&Some(" ".into())).is_err());
    }

    #[test]
    fn test_validation_error_display() {
        let error = CommandValidationError::InvalidValue {
            argument: "output-dir".to_string(),
            value: "".to_string(),
            reason: "path cannot be empty or whitespace only".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid value '' for output-dir: path cannot be empty or whitespace only"
        );
    }
}
