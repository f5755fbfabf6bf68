//! End-to-end batches through the indexer

mod support;

use async_trait::async_trait;
use repowiki::config::{FeatureFlags, IndexerConfig, StoreConfig};
use repowiki::constants::fallback::{FILE_NOTICE, NOTHING_INDEXED, SECTION_NOTICE};
use repowiki::error::ErrorKind;
use repowiki::generation::{DisabledGenerator, GenerationError, TextGenerator};
use repowiki::logging::Logger;
use repowiki::pipeline::{BatchSummary, Indexer};
use repowiki::planner::PlanOrigin;
use repowiki::store::InMemoryStore;
use std::fs;
use std::sync::Arc;
use support::{NoGit, StaticGenerator, TimeoutGenerator, Workspace, indexer, isolated_config};
use tokio_util::sync::CancellationToken;

/// Generator that cancels the batch the first time it is asked for text
struct CancellingGenerator {
    cancel: CancellationToken,
}

#[async_trait]
impl TextGenerator for CancellingGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _temperature: f32,
        _max_output: u32,
    ) -> Result<String, GenerationError> {
        self.cancel.cancel();
        Err(GenerationError::Unavailable("cancelled".to_string()))
    }
}

#[tokio::test]
async fn test_missing_repository_in_middle_of_batch() {
    let workspace = Workspace::new();
    let first = workspace.python_repository("first");
    let third = workspace.python_repository("third");
    let missing = workspace.path().join("second");

    let store = Arc::new(InMemoryStore::new());
    let summary = indexer(isolated_config(&workspace), Arc::new(DisabledGenerator), store.clone())
        .run(vec![first, missing, third])
        .await;

    assert!(summary.success);
    assert_eq!(summary.outcomes.len(), 3);
    let names: Vec<&str> = summary.outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second", "third"]);

    assert!(summary.outcomes[0].is_indexed());
    assert_eq!(
        summary.outcomes[1].error.as_ref().map(|e| e.kind),
        Some(ErrorKind::ScanError)
    );
    assert!(summary.outcomes[2].is_indexed());

    for outcome in [&summary.outcomes[0], &summary.outcomes[2]] {
        assert!(outcome.analyzed_files > 0);
        assert!(outcome.section_count > 0);
        assert!(outcome.chunk_count > 0);
    }
    assert_eq!(
        store.len(),
        summary.outcomes[0].chunk_count + summary.outcomes[2].chunk_count
    );
    assert!(summary.narrative.contains("Indexed 2 of 3 repositories."));
    assert!(summary.narrative.contains("second: not indexed (ScanError)"));
}

#[tokio::test]
async fn test_per_repository_state_is_not_shared() {
    let workspace = Workspace::new();
    let python = workspace.python_repository("orders");
    workspace.write_file("docs-only/README.md", "# Handbook\n\nNothing but prose here.\n");
    let docs_only = workspace.path().join("docs-only");

    let summary = indexer(
        isolated_config(&workspace),
        Arc::new(DisabledGenerator),
        Arc::new(InMemoryStore::new()),
    )
    .run(vec![python, docs_only])
    .await;

    let orders = &summary.outcomes[0];
    let docs = &summary.outcomes[1];
    assert!(orders.is_indexed() && docs.is_indexed());
    assert!(orders.analyzed_files > docs.analyzed_files);
    assert!(docs.folder_count < orders.folder_count);
    assert!(docs.metadata.as_ref().unwrap().summary.file_count < 5);
}

#[tokio::test]
async fn test_empty_batch_reports_nothing_indexed() {
    let workspace = Workspace::new();
    let summary = indexer(
        isolated_config(&workspace),
        Arc::new(StaticGenerator::new("should not be used")),
        Arc::new(InMemoryStore::new()),
    )
    .run(Vec::new())
    .await;

    assert!(summary.success);
    assert!(summary.outcomes.is_empty());
    assert_eq!(summary.narrative, NOTHING_INDEXED);
}

#[tokio::test]
async fn test_all_failures_is_unsuccessful() {
    let workspace = Workspace::new();
    let summary = indexer(
        isolated_config(&workspace),
        Arc::new(DisabledGenerator),
        Arc::new(InMemoryStore::new()),
    )
    .run(vec![workspace.path().join("a"), workspace.path().join("b")])
    .await;

    assert!(!summary.success);
    assert_eq!(summary.failed_count(), 2);
    assert_eq!(summary.narrative, NOTHING_INDEXED);
}

#[tokio::test]
async fn test_cancellation_stops_before_next_repository() {
    let workspace = Workspace::new();
    let repos = vec![
        workspace.python_repository("one"),
        workspace.python_repository("two"),
        workspace.python_repository("three"),
    ];
    let cancel = CancellationToken::new();

    let summary = Indexer::builder(isolated_config(&workspace))
        .generator(Arc::new(CancellingGenerator {
            cancel: cancel.clone(),
        }))
        .git(Arc::new(NoGit))
        .logger(Logger::quiet())
        .cancellation(cancel)
        .build()
        .run(repos)
        .await;

    assert!(summary.cancelled);
    assert!(summary.success);
    assert_eq!(summary.outcomes.len(), 3);
    assert!(summary.outcomes[0].is_indexed());
    for outcome in &summary.outcomes[1..] {
        assert_eq!(
            outcome.error.as_ref().map(|e| e.kind),
            Some(ErrorKind::FatalPipelineError)
        );
        assert_eq!(outcome.analyzed_files, 0);
    }
}

#[tokio::test]
async fn test_generator_outage_still_completes_batch() {
    let workspace = Workspace::new();
    let repo = workspace.python_repository("orders");

    let summary = indexer(
        isolated_config(&workspace),
        Arc::new(TimeoutGenerator),
        Arc::new(InMemoryStore::new()),
    )
    .run(vec![repo])
    .await;

    assert!(summary.success);
    let outcome = &summary.outcomes[0];
    assert!(outcome.is_indexed());
    assert_eq!(outcome.plan_origin, Some(PlanOrigin::Inferred));
    assert!(
        outcome
            .warnings
            .iter()
            .any(|w| w.kind == ErrorKind::GenerationError)
    );
    assert!(summary.narrative.starts_with("Indexed 1 of 1 repositories."));
}

#[tokio::test]
async fn test_generated_text_flows_into_store_and_narrative() {
    let workspace = Workspace::new();
    let repo = workspace.python_repository("orders");
    let generator = Arc::new(StaticGenerator::new("Orders keeps track of customer orders."));
    let store = Arc::new(InMemoryStore::new());

    let summary = indexer(isolated_config(&workspace), generator.clone(), store.clone())
        .run(vec![repo])
        .await;

    assert_eq!(summary.narrative, "Orders keeps track of customer orders.");
    assert!(summary.outcomes[0].warnings.is_empty());
    let readme = store
        .chunks()
        .into_iter()
        .find(|c| c.source == "orders/README.md")
        .unwrap();
    assert_eq!(readme.text, "Orders keeps track of customer orders.");
    assert!(generator.prompts().len() > 2);
}

#[tokio::test]
async fn test_rejected_batches_are_retried_smaller() {
    let workspace = Workspace::new();
    let repo = workspace.python_repository("orders");
    let config = IndexerConfig {
        store: StoreConfig {
            max_batch_size: 16,
            min_batch_size: 2,
            ..StoreConfig::default()
        },
        ..isolated_config(&workspace)
    };
    let store = Arc::new(InMemoryStore::new().with_batch_limit(5));

    let summary = indexer(config, Arc::new(DisabledGenerator), store.clone())
        .run(vec![repo])
        .await;

    assert!(summary.outcomes[0].warnings.is_empty());
    assert_eq!(summary.outcomes[0].chunk_count, store.len());
    assert!(store.batch_sizes().iter().all(|size| *size <= 4));
}

#[tokio::test]
async fn test_store_failure_is_a_warning() {
    let workspace = Workspace::new();
    let repo = workspace.python_repository("orders");
    let config = IndexerConfig {
        store: StoreConfig {
            max_batch_size: 8,
            min_batch_size: 8,
            ..StoreConfig::default()
        },
        ..isolated_config(&workspace)
    };

    let summary = indexer(
        config,
        Arc::new(DisabledGenerator),
        Arc::new(InMemoryStore::new().with_batch_limit(1)),
    )
    .run(vec![repo])
    .await;

    let outcome = &summary.outcomes[0];
    assert!(outcome.is_indexed());
    assert_eq!(outcome.chunk_count, 0);
    assert!(
        outcome
            .warnings
            .iter()
            .any(|w| w.kind == ErrorKind::StorageError)
    );
}

#[tokio::test]
async fn test_batch_writes_one_directory_per_repository() {
    let workspace = Workspace::new();
    let repos = vec![
        workspace.python_repository("first"),
        workspace.python_repository("second"),
    ];
    let output = workspace.path().join("wiki");
    let config = isolated_config(&workspace).with_output_dir(Some(output.clone()));

    let summary = indexer(config, Arc::new(DisabledGenerator), Arc::new(InMemoryStore::new()))
        .run(repos)
        .await;

    for name in ["first", "second"] {
        let dir = output.join(name);
        assert!(dir.join("README.md").is_file());
        assert!(dir.join("index.md").is_file());
        assert!(dir.join("architecture/overview.md").is_file());
    }
    assert_eq!(
        summary.outcomes[1].output_dir.as_deref(),
        Some(output.join("second").as_path())
    );
}

#[tokio::test]
async fn test_repeated_runs_produce_identical_corpus() {
    let workspace = Workspace::new();
    let repo = workspace.python_repository("orders");

    let mut ids = Vec::new();
    for _ in 0..2 {
        let store = Arc::new(InMemoryStore::new());
        indexer(isolated_config(&workspace), Arc::new(DisabledGenerator), store.clone())
            .run(vec![repo.clone()])
            .await;
        ids.push(store.chunks().into_iter().map(|c| c.id).collect::<Vec<_>>());
    }
    assert_eq!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_summary_serializes_to_json() {
    let workspace = Workspace::new();
    let repo = workspace.python_repository("orders");
    let summary = indexer(
        isolated_config(&workspace),
        Arc::new(DisabledGenerator),
        Arc::new(InMemoryStore::new()),
    )
    .run(vec![repo, workspace.path().join("missing")])
    .await;

    let json = serde_json::to_string(&summary).unwrap();
    let parsed: BatchSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.outcomes.len(), 2);
    assert_eq!(parsed.outcomes[1].error, summary.outcomes[1].error);
    assert!(json.contains("\"ScanError\""));
}

#[tokio::test]
async fn test_written_sections_carry_diagrams_and_examples() {
    let workspace = Workspace::new();
    let repo = workspace.python_repository("orders");
    let output = workspace.path().join("wiki");
    let config = isolated_config(&workspace).with_output_dir(Some(output.clone()));

    indexer(config, Arc::new(DisabledGenerator), Arc::new(InMemoryStore::new()))
        .run(vec![repo])
        .await;

    let read = |page: &str| fs::read_to_string(output.join(page)).unwrap();

    let overview = read("architecture/overview.md");
    assert!(overview.starts_with("## System Overview\n\n### System Architecture\n\n```mermaid"));
    assert!(overview.contains("OrderService"));
    assert!(overview.contains(SECTION_NOTICE));

    let data_flow = read("architecture/data-flow.md");
    assert!(data_flow.contains("User->>API: GET /api/orders"));

    let endpoints = read("apis/endpoints.md");
    assert!(endpoints.contains("## API Usage Examples"));
    assert!(endpoints.contains("curl -X GET http://localhost:8000/api/orders"));

    let services = read("components/services.md");
    assert!(services.contains("### Component Overview"));
    assert!(!services.contains("PaymentManager"));

    let setup = read("development/setup.md");
    assert!(setup.contains("### Configuration file: requirements.txt"));
    assert!(setup.contains("flask==3.0.0"));

    let testing = read("development/testing.md");
    assert!(testing.contains("### Test case: test_list_orders"));
}

#[tokio::test]
async fn test_file_documentation_page_falls_back_per_file() {
    let workspace = Workspace::new();
    let repo = workspace.python_repository("orders");
    let output = workspace.path().join("wiki");
    let config = isolated_config(&workspace).with_output_dir(Some(output.clone()));

    indexer(config, Arc::new(DisabledGenerator), Arc::new(InMemoryStore::new()))
        .run(vec![repo])
        .await;

    let page = fs::read_to_string(output.join("components/file-documentation.md")).unwrap();
    assert!(page.starts_with("# File Documentation"));
    assert!(page.contains("## Code Files (2 files)"));
    assert!(page.contains("### src/services.py\n\n**Type**: Code file (.py)"));
    assert!(page.contains("## Config Files (1 file)"));
    assert!(page.contains(FILE_NOTICE));
    assert!(!page.contains("tests/test_app.py"));

    let index = fs::read_to_string(output.join("index.md")).unwrap();
    assert!(index.contains("file-documentation.md"));
}

#[tokio::test]
async fn test_file_documentation_page_uses_generated_batches() {
    let workspace = Workspace::new();
    let repo = workspace.python_repository("orders");
    let output = workspace.path().join("wiki");
    let config = isolated_config(&workspace).with_output_dir(Some(output.clone()));
    let generator = Arc::new(StaticGenerator::new("Described by the generator."));

    indexer(config, generator.clone(), Arc::new(InMemoryStore::new()))
        .run(vec![repo])
        .await;

    let page = fs::read_to_string(output.join("components/file-documentation.md")).unwrap();
    assert!(page.contains("Described by the generator."));
    assert!(!page.contains(FILE_NOTICE));

    let batch_prompts: Vec<String> = generator
        .prompts()
        .into_iter()
        .filter(|p| p.contains("Files to analyze"))
        .collect();
    assert_eq!(batch_prompts.len(), 3);
    assert!(batch_prompts[0].contains("### src/app.py"));
    assert!(batch_prompts[0].contains("File category: code"));
}

#[tokio::test]
async fn test_diagrams_and_examples_can_be_switched_off() {
    let workspace = Workspace::new();
    let repo = workspace.python_repository("orders");
    let output = workspace.path().join("wiki");
    let config = IndexerConfig {
        features: FeatureFlags {
            include_diagrams: false,
            include_examples: false,
            ..FeatureFlags::default()
        },
        ..isolated_config(&workspace)
    }
    .with_output_dir(Some(output.clone()));

    indexer(config, Arc::new(DisabledGenerator), Arc::new(InMemoryStore::new()))
        .run(vec![repo])
        .await;

    let overview = fs::read_to_string(output.join("architecture/overview.md")).unwrap();
    assert!(!overview.contains("```mermaid"));
    let endpoints = fs::read_to_string(output.join("apis/endpoints.md")).unwrap();
    assert!(!endpoints.contains("curl"));
}
