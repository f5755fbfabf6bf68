//! Multi-repository indexing
//!
//! The [`Indexer`] walks a list of repositories through the stages of
//! [`machine::Stage`], one repository at a time. Each stage mutates the
//! shared [`PipelineState`]; [`machine::transition`] decides what runs
//! next. A failing repository is recorded in the batch summary and the
//! batch moves on.
//!
//! ## Example
//!
//! ```rust,no_run
//! use repowiki::config::IndexerConfig;
//! use repowiki::pipeline::Indexer;
//!
//! # async fn run() {
//! let indexer = Indexer::builder(IndexerConfig::default()).build();
//! let summary = indexer.run(vec!["./my-repo".into()]).await;
//! println!("{}", summary.narrative);
//! # }
//! ```

pub mod machine;
pub mod state;
pub mod summary;

pub use machine::{Stage, transition};
pub use state::PipelineState;
pub use summary::{BatchSummary, RepositoryOutcome, fallback_narrative};

use crate::analysis::AnalysisScheduler;
use crate::chunking::{Chunker, MetadataMap, MetadataValue};
use crate::config::IndexerConfig;
use crate::constants::docs::README_FILE;
use crate::constants::pipeline::{SCOPE, step_budget};
use crate::docs::{ContentGenerator, repository_output_dir, section_fallback, write_documentation};
use crate::error::IndexError;
use crate::generation::{DisabledGenerator, TextGenerator};
use crate::git::{GitMetadataProvider, SystemGit};
use crate::logging::Logger;
use crate::planner::StructurePlanner;
use crate::scanner::{RepositoryMetadata, RepositoryScanner, repository_name};
use crate::store::{ContentStore, CorpusBuilder, InMemoryStore, should_index_file, upsert_batched};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Builder for [`Indexer`]
///
/// Collaborators that are not supplied fall back to a disabled generator,
/// an in-memory store and the system `git` binary.
pub struct IndexerBuilder {
    config: IndexerConfig,
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn ContentStore>,
    git: Arc<dyn GitMetadataProvider>,
    logger: Logger,
    cancel: CancellationToken,
}

impl IndexerBuilder {
    pub fn new(config: IndexerConfig) -> Self {
        Self {
            config,
            generator: Arc::new(DisabledGenerator),
            store: Arc::new(InMemoryStore::new()),
            git: Arc::new(SystemGit),
            logger: Logger::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn store(mut self, store: Arc<dyn ContentStore>) -> Self {
        self.store = store;
        self
    }

    pub fn git(mut self, git: Arc<dyn GitMetadataProvider>) -> Self {
        self.git = git;
        self
    }

    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Token the caller cancels to stop the batch before its next repository
    pub fn cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn build(self) -> Indexer {
        Indexer {
            scanner: RepositoryScanner::new(self.config.scanner.clone(), self.logger),
            planner: StructurePlanner::new(
                self.generator.clone(),
                self.config.features.clone(),
                self.logger,
            ),
            writer: ContentGenerator::new(
                self.generator.clone(),
                self.config.generation.clone(),
                self.config.features.clone(),
                self.logger,
            ),
            config: self.config,
            generator: self.generator,
            store: self.store,
            git: self.git,
            logger: self.logger,
            cancel: self.cancel,
        }
    }
}

/// Indexes batches of repositories
pub struct Indexer {
    config: IndexerConfig,
    scanner: RepositoryScanner,
    planner: StructurePlanner,
    writer: ContentGenerator,
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn ContentStore>,
    git: Arc<dyn GitMetadataProvider>,
    logger: Logger,
    cancel: CancellationToken,
}

impl Indexer {
    pub fn builder(config: IndexerConfig) -> IndexerBuilder {
        IndexerBuilder::new(config)
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Token that cancels this indexer's batches
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Index every path in order and summarize the batch
    ///
    /// Always returns a summary with one outcome per path. Repositories are
    /// processed strictly one after another.
    pub async fn run(&self, repo_paths: Vec<PathBuf>) -> BatchSummary {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let mut state = PipelineState::new(repo_paths);
        let budget = step_budget(state.repo_paths.len());

        let mut stage = Stage::Init;
        let mut steps = 0;
        while !stage.is_terminal() {
            if steps == budget {
                let error = IndexError::Fatal(format!(
                    "step budget of {} exhausted in stage {}",
                    budget, stage
                ));
                self.logger.error(SCOPE, &error.to_string());
                state.abandon_remaining(&error);
                stage = Stage::Failed;
                break;
            }
            steps += 1;

            self.execute(stage, &mut state).await;
            stage = transition(stage, &state, self.cancel.is_cancelled());
        }

        let success = stage == Stage::Finished && state.success;
        let narrative = state
            .narrative
            .take()
            .unwrap_or_else(|| fallback_narrative(&state.outcomes));

        BatchSummary {
            run_id,
            started_at,
            finished_at: Utc::now(),
            success,
            cancelled: state.cancelled,
            outcomes: state.outcomes,
            narrative,
        }
    }

    async fn execute(&self, stage: Stage, state: &mut PipelineState) {
        let result = match stage {
            Stage::Init => {
                self.logger.info(
                    SCOPE,
                    &format!("Indexing {} repositories", state.repo_paths.len()),
                );
                Ok(())
            }
            Stage::Scan => self.scan(state),
            Stage::Analyze => self.analyze(state).await,
            Stage::PlanStructure => self.plan(state).await,
            Stage::Generate => self.generate(state).await,
            Stage::Write => self.write(state),
            Stage::Store => self.store_content(state).await,
            Stage::Advance => {
                self.advance(state);
                Ok(())
            }
            Stage::Summarize => {
                self.summarize(state).await;
                Ok(())
            }
            Stage::Finished | Stage::Failed => Ok(()),
        };

        if let Err(error) = result {
            self.logger.error(&state.scope(), &error.to_string());
            state.fail(error);
        }
    }

    fn scan(&self, state: &mut PipelineState) -> Result<(), IndexError> {
        let path = state.current_path()?.to_path_buf();
        self.logger.step(
            &repository_name(&path),
            1,
            &format!("Scanning {}", path.display()),
        );

        let root = path
            .canonicalize()
            .map_err(|e| IndexError::scan(&path, e.to_string()))?;
        let (records, summary) = self.scanner.scan_with_summary(&root)?;
        let git = self.git.metadata(&root);

        let metadata = RepositoryMetadata::new(repository_name(&root), root, &records, summary, git);
        self.logger.info(
            &metadata.name,
            &format!(
                "Found {} files, primary language {}",
                metadata.summary.file_count,
                metadata.primary_language()
            ),
        );
        state.metadata = Some(metadata);
        state.records = records;
        Ok(())
    }

    async fn analyze(&self, state: &mut PipelineState) -> Result<(), IndexError> {
        let name = current_metadata(state)?.name.clone();
        self.logger.step(&name, 2, "Analyzing code structure");

        let scheduler =
            AnalysisScheduler::new(self.config.analysis.clone(), self.logger).with_scope(&name);
        state.analysis = scheduler
            .analyze_repository(&state.records, &self.cancel)
            .await;
        Ok(())
    }

    async fn plan(&self, state: &mut PipelineState) -> Result<(), IndexError> {
        let metadata = current_metadata(state)?;
        self.logger.step(&metadata.name, 3, "Planning documentation structure");

        let structure = self
            .planner
            .plan(metadata, &state.analysis, &state.records)
            .await;
        self.logger.info(
            &metadata.name,
            &format!(
                "Planned {} folders with {} sections",
                structure.folders.len(),
                structure.section_count()
            ),
        );
        state.structure = Some(structure);
        Ok(())
    }

    async fn generate(&self, state: &mut PipelineState) -> Result<(), IndexError> {
        let metadata = state.metadata.as_ref().ok_or_else(missing_metadata)?;
        let structure = state.structure.as_mut().ok_or_else(missing_structure)?;
        self.logger.step(&metadata.name, 4, "Generating documentation");

        let report = self
            .writer
            .fill(structure, metadata, &state.analysis, &state.records)
            .await;
        if report.fallbacks > 0 {
            state.warn(&IndexError::Generation(format!(
                "{} of {} documents used fallback text",
                report.fallbacks,
                report.generated + report.fallbacks
            )));
        }
        Ok(())
    }

    fn write(&self, state: &mut PipelineState) -> Result<(), IndexError> {
        let metadata = current_metadata(state)?;
        let structure = state.structure.as_ref().ok_or_else(missing_structure)?;
        let Some(output_dir) = &self.config.output_dir else {
            return Ok(());
        };
        self.logger.step(&metadata.name, 5, "Writing documentation");

        let dir = repository_output_dir(output_dir, &metadata.name, state.repo_paths.len());
        match write_documentation(&dir, &metadata.name, structure) {
            Ok(written) => {
                self.logger.info(
                    &metadata.name,
                    &format!("Wrote {} files to {}", written.len(), dir.display()),
                );
                state.output = Some(dir);
            }
            Err(e) => {
                let error = IndexError::Storage(format!("{:#}", e));
                self.logger.warn(&metadata.name, &error.to_string());
                state.warn(&error);
            }
        }
        Ok(())
    }

    async fn store_content(&self, state: &mut PipelineState) -> Result<(), IndexError> {
        let metadata = current_metadata(state)?;
        let structure = state.structure.as_ref().ok_or_else(missing_structure)?;
        self.logger.step(&metadata.name, 6, "Storing searchable content");

        let chunker = Chunker::new(self.config.chunking.target_size, self.config.chunking.overlap);
        let mut corpus = CorpusBuilder::new(chunker, &metadata.name, metadata.to_flat_metadata());
        corpus.add_document(README_FILE, &structure.readme_text, "readme", MetadataMap::new());

        for folder in &structure.folders {
            for section in &folder.sections {
                let text = section
                    .generated_content
                    .clone()
                    .unwrap_or_else(|| section_fallback(section));
                let mut extra = MetadataMap::new();
                extra.insert("folder".into(), MetadataValue::from(folder.name.as_str()));
                extra.insert("section".into(), MetadataValue::from(section.name.as_str()));
                extra.insert("title".into(), MetadataValue::from(section.title.as_str()));
                corpus.add_document(
                    &format!("{}/{}.md", folder.name, section.name),
                    &text,
                    "documentation_section",
                    extra,
                );
            }
        }

        if self.config.store.index_source_files {
            for record in state
                .records
                .iter()
                .filter(|r| should_index_file(r, &self.config.store))
            {
                // Unreadable or non-UTF-8 files stay out of the corpus
                if let Ok(content) = std::fs::read_to_string(&record.absolute_path) {
                    corpus.add_file(record, &content);
                }
            }
        }

        let chunks = corpus.finish();
        match upsert_batched(
            self.store.as_ref(),
            &chunks,
            self.config.store.max_batch_size,
            self.config.store.min_batch_size,
            &self.logger,
        )
        .await
        {
            Ok(stored) => {
                self.logger
                    .info(&metadata.name, &format!("Stored {} chunks", stored));
                state.chunk_count = stored;
            }
            Err(e) => {
                let error = IndexError::Storage(e.to_string());
                self.logger.warn(&metadata.name, &error.to_string());
                state.warn(&error);
            }
        }
        Ok(())
    }

    fn advance(&self, state: &mut PipelineState) {
        if state.last_error.is_none()
            && let Some(metadata) = &state.metadata
        {
            self.logger.success(&metadata.name, "Indexed");
        }
        state.advance();
    }

    async fn summarize(&self, state: &mut PipelineState) {
        if state.outcomes.len() < state.repo_paths.len() {
            let error = IndexError::Fatal("batch cancelled before this repository".to_string());
            self.logger.warn(SCOPE, "Batch cancelled, skipping remaining repositories");
            state.abandon_remaining(&error);
            state.cancelled = true;
        }
        state.success = BatchSummary::is_successful(&state.outcomes);

        let indexed = state.outcomes.iter().filter(|o| o.is_indexed()).count();
        if indexed == 0 {
            state.narrative = Some(fallback_narrative(&state.outcomes));
            return;
        }

        let prompt = summary::narrative_prompt(&state.outcomes);
        let generated = self
            .generator
            .generate(
                &prompt,
                self.config.generation.temperature,
                self.config.generation.max_output,
            )
            .await;
        state.narrative = Some(match generated {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => fallback_narrative(&state.outcomes),
            Err(e) => {
                self.logger
                    .warn(SCOPE, &format!("{}, using the fallback summary", e));
                fallback_narrative(&state.outcomes)
            }
        });

        self.logger.success(
            SCOPE,
            &format!(
                "Indexed {} of {} repositories",
                indexed,
                state.outcomes.len()
            ),
        );
    }
}

fn current_metadata(state: &PipelineState) -> Result<&RepositoryMetadata, IndexError> {
    state.metadata.as_ref().ok_or_else(missing_metadata)
}

fn missing_metadata() -> IndexError {
    IndexError::Fatal("stage reached before the repository was scanned".to_string())
}

fn missing_structure() -> IndexError {
    IndexError::Fatal("stage reached before the structure was planned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    struct NoGit;

    impl GitMetadataProvider for NoGit {
        fn metadata(&self, _repo_path: &std::path::Path) -> Option<crate::git::GitMetadata> {
            None
        }
    }

    fn repository(root: &std::path::Path, name: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(dir.join("src")).unwrap();
        fs::write(dir.join("README.md"), "# Demo\n\nA small demo project.\n").unwrap();
        fs::write(
            dir.join("src/app.py"),
            "import os\n\nclass Service:\n    def run(self):\n        return os.getcwd()\n",
        )
        .unwrap();
        dir
    }

    fn indexer(config: IndexerConfig, store: Arc<InMemoryStore>) -> Indexer {
        Indexer::builder(config)
            .store(store)
            .git(Arc::new(NoGit))
            .logger(Logger::quiet())
            .build()
    }

    #[tokio::test]
    async fn test_indexes_single_repository() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(temp_dir.path(), "demo");
        let store = Arc::new(InMemoryStore::new());

        let summary = indexer(IndexerConfig::default(), store.clone())
            .run(vec![repo])
            .await;

        assert!(summary.success);
        assert_eq!(summary.outcomes.len(), 1);
        let outcome = &summary.outcomes[0];
        assert!(outcome.is_indexed());
        assert_eq!(outcome.name, "demo");
        assert!(outcome.folder_count > 0);
        assert_eq!(outcome.chunk_count, store.len());
        assert!(
            outcome
                .warnings
                .iter()
                .any(|w| w.kind == ErrorKind::GenerationError)
        );
        assert!(summary.narrative.starts_with("Indexed 1 of 1 repositories."));
    }

    #[tokio::test]
    async fn test_missing_repository_is_recorded_and_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let first = repository(temp_dir.path(), "first");
        let third = repository(temp_dir.path(), "third");
        let missing = temp_dir.path().join("missing");

        let summary = indexer(IndexerConfig::default(), Arc::new(InMemoryStore::new()))
            .run(vec![first, missing, third])
            .await;

        assert!(summary.success);
        assert_eq!(summary.indexed_count(), 2);
        assert_eq!(summary.outcomes[1].name, "missing");
        assert_eq!(
            summary.outcomes[1].error.as_ref().map(|e| e.kind),
            Some(ErrorKind::ScanError)
        );
        assert_eq!(summary.outcomes[2].name, "third");
    }

    #[tokio::test]
    async fn test_empty_batch_is_successful() {
        let summary = indexer(IndexerConfig::default(), Arc::new(InMemoryStore::new()))
            .run(Vec::new())
            .await;
        assert!(summary.success);
        assert!(summary.outcomes.is_empty());
        assert_eq!(summary.narrative, crate::constants::fallback::NOTHING_INDEXED);
    }

    #[tokio::test]
    async fn test_cancelled_batch_records_every_repository() {
        let temp_dir = TempDir::new().unwrap();
        let repos = vec![
            repository(temp_dir.path(), "one"),
            repository(temp_dir.path(), "two"),
        ];
        let cancel = CancellationToken::new();
        cancel.cancel();

        let summary = Indexer::builder(IndexerConfig::default())
            .git(Arc::new(NoGit))
            .logger(Logger::quiet())
            .cancellation(cancel)
            .build()
            .run(repos)
            .await;

        assert!(summary.cancelled);
        assert!(!summary.success);
        assert_eq!(summary.outcomes.len(), 2);
        assert!(summary.outcomes.iter().all(|o| !o.is_indexed()));
    }

    #[tokio::test]
    async fn test_writes_documentation_when_output_configured() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(temp_dir.path(), "demo");
        let output = temp_dir.path().join("wiki");
        let config = IndexerConfig::default().with_output_dir(Some(output.clone()));

        let summary = indexer(config, Arc::new(InMemoryStore::new()))
            .run(vec![repo])
            .await;

        assert_eq!(summary.outcomes[0].output_dir.as_deref(), Some(output.as_path()));
        assert!(output.join("README.md").exists());
        assert!(output.join("index.md").exists());
    }
}
