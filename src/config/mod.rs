//! Configuration management module

pub mod loader;
pub mod validation;

pub use loader::{
    AnalysisConfig, ChunkingConfig, FeatureFlags, GenerationConfig, IndexerConfig, ScannerConfig,
    StoreConfig,
};
pub use validation::{ValidationError, validate_config};
