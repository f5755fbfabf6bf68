//! Configuration file loading and saving

use super::validation;
use crate::constants;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn enabled() -> bool {
    true
}

/// Static exclusions applied while walking a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub excluded_dirs: Vec<String>,
    pub excluded_extensions: Vec<String>,
    /// Global ignore file; `None` falls back to `~/.gitignore_global`
    pub global_ignore_file: Option<PathBuf>,
    pub respect_ignore_files: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            excluded_dirs: strings(constants::scanner::EXCLUDED_DIRS),
            excluded_extensions: strings(constants::scanner::EXCLUDED_EXTENSIONS),
            global_ignore_file: None,
            respect_ignore_files: true,
        }
    }
}

/// Eligibility thresholds and worker-pool sizing for structural analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub max_file_size: u64,
    pub max_doc_size: u64,
    pub min_code_size: u64,
    pub workers: usize,
    pub max_files: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_file_size: constants::analysis::MAX_FILE_SIZE,
            max_doc_size: constants::analysis::MAX_DOC_SIZE,
            min_code_size: constants::analysis::MIN_CODE_SIZE,
            workers: constants::analysis::WORKERS,
            max_files: constants::analysis::MAX_FILES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub target_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_size: constants::chunking::TARGET_SIZE,
            overlap: constants::chunking::OVERLAP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub max_batch_size: usize,
    pub min_batch_size: usize,
    /// Also chunk raw source files into the search corpus
    pub index_source_files: bool,
    pub max_indexed_file_size: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_batch_size: constants::store::MAX_BATCH_SIZE,
            min_batch_size: constants::store::MIN_BATCH_SIZE,
            index_source_files: true,
            max_indexed_file_size: constants::store::MAX_INDEXED_FILE_SIZE,
        }
    }
}

/// Connection settings for the OpenAI-compatible text-generation endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_output: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: constants::generation::DEFAULT_BASE_URL.to_string(),
            model: constants::generation::DEFAULT_MODEL.to_string(),
            api_key_env: constants::generation::API_KEY_ENV.to_string(),
            timeout_secs: constants::generation::TIMEOUT_SECS,
            temperature: constants::generation::TEMPERATURE,
            max_output: constants::generation::MAX_OUTPUT,
        }
    }
}

/// Feature switches fixed for the lifetime of an indexer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Infer the documentation outline from code signals before asking the generator
    #[serde(default = "enabled")]
    pub intelligent_structure: bool,
    /// Ask the generator for section prose instead of writing placeholders
    #[serde(default = "enabled")]
    pub generate_sections: bool,
    /// Attach Mermaid diagrams drawn from the analysis to matching sections
    #[serde(default = "enabled")]
    pub include_diagrams: bool,
    /// Append usage examples lifted from the code to matching sections
    #[serde(default = "enabled")]
    pub include_examples: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            intelligent_structure: true,
            generate_sections: true,
            include_diagrams: true,
            include_examples: true,
        }
    }
}

/// Complete indexer configuration
///
/// Built once and handed to the indexer at construction; nothing mutates it
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexerConfig {
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub features: FeatureFlags,
    /// Where generated documentation is written; `None` disables writing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl IndexerConfig {
    /// Create the built-in configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: IndexerConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file if it exists, otherwise use defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path.as_ref(), format!("---\n{}", yaml))?;
        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self).map_err(validation::validation_errors_to_anyhow)
    }

    /// Return a copy with a different output location
    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }
}
