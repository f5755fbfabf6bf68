//! Configuration files as users write them

use repowiki::config::{IndexerConfig, ValidationError, validate_config};
use repowiki::generation::{GenerationError, OpenAiCompatibleGenerator, TextGenerator};
use serial_test::serial;
use std::path::PathBuf;
use tempfile::TempDir;

const KEY_ENV: &str = "REPOWIKI_CONFIG_TEST_API_KEY";

#[test]
fn test_full_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("repowiki.yaml");

    let mut config = IndexerConfig::default().with_output_dir(Some(PathBuf::from("docs/wiki")));
    config.analysis.workers = 8;
    config.scanner.excluded_dirs.push("generated".to_string());
    config.generation.model = "local-model".to_string();
    config.save(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("---\n"));
    assert!(content.contains("local-model"));

    let loaded = IndexerConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_sections_default_independently() {
    let yaml = r#"
chunking:
  target_size: 400
  overlap: 40
store:
  index_source_files: false
output_dir: out
"#;
    let config = IndexerConfig::from_yaml(yaml).unwrap();
    let defaults = IndexerConfig::default();

    assert_eq!(config.chunking.target_size, 400);
    assert_eq!(config.chunking.overlap, 40);
    assert!(!config.store.index_source_files);
    assert_eq!(config.store.max_batch_size, defaults.store.max_batch_size);
    assert_eq!(config.scanner, defaults.scanner);
    assert_eq!(config.generation, defaults.generation);
    assert_eq!(config.output_dir, Some(PathBuf::from("out")));
}

#[test]
fn test_every_problem_is_reported() {
    let mut config = IndexerConfig::default();
    config.analysis.workers = 0;
    config.chunking.target_size = 100;
    config.chunking.overlap = 150;
    config.store.min_batch_size = 64;
    config.store.max_batch_size = 8;

    let errors = validate_config(&config).unwrap_err();
    assert!(errors.contains(&ValidationError::ZeroWorkers));
    assert!(errors.contains(&ValidationError::OverlapTooLarge {
        overlap: 150,
        target_size: 100
    }));
    assert!(errors.contains(&ValidationError::BatchBoundsInverted { min: 64, max: 8 }));
}

#[test]
fn test_invalid_file_fails_to_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("repowiki.yaml");
    std::fs::write(&path, "analysis:\n  workers: 0\n").unwrap();

    let error = IndexerConfig::load_or_default(&path).unwrap_err();
    assert!(error.to_string().contains("analysis.workers"));
}

#[test]
fn test_malformed_yaml_is_an_error() {
    assert!(IndexerConfig::from_yaml("analysis: [unterminated").is_err());
    assert!(IndexerConfig::from_yaml("analysis:\n  workers: many\n").is_err());
}

#[tokio::test]
#[serial]
async fn test_api_key_is_read_from_configured_variable() {
    let original = std::env::var(KEY_ENV).ok();
    unsafe {
        std::env::remove_var(KEY_ENV);
    }

    let mut config = IndexerConfig::default().generation;
    config.api_key_env = KEY_ENV.to_string();
    // Nothing listens on the discard port, so a key gets as far as the transport
    config.base_url = "http://127.0.0.1:9".to_string();
    config.timeout_secs = 2;
    let generator = OpenAiCompatibleGenerator::from_config(&config).unwrap();

    let without_key = generator.generate("prompt", 0.0, 10).await;

    unsafe {
        std::env::set_var(KEY_ENV, "test-key");
    }
    let with_key = generator.generate("prompt", 0.0, 10).await;

    unsafe {
        match original {
            Some(value) => std::env::set_var(KEY_ENV, value),
            None => std::env::remove_var(KEY_ENV),
        }
    }

    assert!(matches!(without_key, Err(GenerationError::Unavailable(_))));
    assert!(matches!(
        with_key,
        Err(GenerationError::Http(_)) | Err(GenerationError::Timeout(_))
    ));
}

#[test]
#[serial]
fn test_blank_api_key_counts_as_missing() {
    let original = std::env::var(KEY_ENV).ok();
    unsafe {
        std::env::set_var(KEY_ENV, "   ");
    }

    let mut config = IndexerConfig::default().generation;
    config.api_key_env = KEY_ENV.to_string();
    let generator = OpenAiCompatibleGenerator::from_config(&config).unwrap();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let result = runtime.block_on(generator.generate("prompt", 0.0, 10));

    unsafe {
        match original {
            Some(value) => std::env::set_var(KEY_ENV, value),
            None => std::env::remove_var(KEY_ENV),
        }
    }

    assert!(matches!(result, Err(GenerationError::Unavailable(_))));
}
