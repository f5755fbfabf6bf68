//! Bounded-parallel analysis of one repository's eligible files

use super::dispatch;
use super::eligibility;
use super::facts::StructuralFacts;
use crate::config::AnalysisConfig;
use crate::constants;
use crate::error::IndexError;
use crate::logging::Logger;
use crate::scanner::FileRecord;
use futures::{StreamExt, future, stream};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

/// Facts per relative path for one repository
pub type AnalysisMap = BTreeMap<String, StructuralFacts>;

/// Fans eligible files out to a fixed-width worker pool and merges the results
#[derive(Debug, Clone)]
pub struct AnalysisScheduler {
    config: AnalysisConfig,
    logger: Logger,
    scope: String,
}

impl AnalysisScheduler {
    pub fn new(config: AnalysisConfig, logger: Logger) -> Self {
        Self {
            config,
            logger,
            scope: "analysis".to_string(),
        }
    }

    /// Label log lines with a repository name
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Analyze every eligible record and return facts keyed by relative path
    ///
    /// A failing file is logged and left out of the map. Once `cancel` fires
    /// no new file is started; files already running are allowed to finish.
    pub async fn analyze_repository(
        &self,
        records: &[FileRecord],
        cancel: &CancellationToken,
    ) -> AnalysisMap {
        let selection = eligibility::select(records, &self.config);
        let total = selection.files.len();

        if selection.capped() {
            self.logger.info(
                &self.scope,
                &format!(
                    "Large repository: analyzing the top {} of {} eligible files",
                    total, selection.eligible
                ),
            );
        }
        self.logger.info(
            &self.scope,
            &format!(
                "Analyzing {} files (filtered from {} scanned) with {} workers",
                total,
                records.len(),
                self.config.workers.max(1)
            ),
        );

        let mut results = stream::iter(selection.files.into_iter().cloned())
            .take_while(|_| future::ready(!cancel.is_cancelled()))
            .map(|record| async move {
                let path = record.relative_path.clone();
                let outcome = tokio::task::spawn_blocking(move || analyze_file(&record)).await;
                (path, outcome)
            })
            .buffer_unordered(self.config.workers.max(1));

        let mut analysis = AnalysisMap::new();
        let mut completed = 0;

        while let Some((path, outcome)) = results.next().await {
            completed += 1;

            let facts = match outcome {
                Ok(result) => result,
                Err(join_error) => Err(IndexError::analysis(&path, join_error.to_string())),
            };
            match facts {
                Ok(Some(facts)) => {
                    analysis.insert(path, facts);
                }
                Ok(None) => {}
                Err(error) => self.logger.warn(&self.scope, &error.to_string()),
            }

            if completed % constants::analysis::PROGRESS_INTERVAL == 0 {
                self.logger.info(
                    &self.scope,
                    &format!("Analysis progress: {}/{} files", completed, total),
                );
            }
        }

        if cancel.is_cancelled() && completed < total {
            self.logger.warn(
                &self.scope,
                &format!("Analysis cancelled after {}/{} files", completed, total),
            );
        }

        analysis
    }
}

/// Read and analyze one file; `Ok(None)` for binary content
fn analyze_file(record: &FileRecord) -> Result<Option<StructuralFacts>, IndexError> {
    let bytes = std::fs::read(&record.absolute_path)
        .map_err(|e| IndexError::analysis(&record.relative_path, e.to_string()))?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(dispatch::analyze(&record.relative_path, &content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn record(root: &std::path::Path, relative: &str, content: &str) -> FileRecord {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        FileRecord::new(path, relative, content.len() as u64)
    }

    fn scheduler() -> AnalysisScheduler {
        AnalysisScheduler::new(AnalysisConfig::default(), Logger::quiet())
    }

    #[tokio::test]
    async fn test_analyzes_eligible_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let records = vec![
            record(
                root,
                "src/app.py",
                "def main():\n    return run_the_application(with_arguments=True)\n",
            ),
            record(root, "src/tiny.py", "x = 1\n"),
            record(root, "README.md", "# Project\n\nSome words about it.\n"),
        ];

        let analysis = scheduler()
            .analyze_repository(&records, &CancellationToken::new())
            .await;

        assert_eq!(analysis.len(), 2);
        assert_eq!(analysis["src/app.py"].functions[0].name, "main");
        assert!(analysis.contains_key("README.md"));
        assert!(!analysis.contains_key("src/tiny.py"));
    }

    #[tokio::test]
    async fn test_unreadable_file_is_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let good = record(root, "src/good.py", &"def good():\n    pass\n".repeat(5));
        let mut gone = record(root, "src/gone.py", &"def gone():\n    pass\n".repeat(5));
        gone.absolute_path = root.join("src/missing.py");

        let analysis = scheduler()
            .analyze_repository(&[good, gone], &CancellationToken::new())
            .await;

        assert_eq!(analysis.keys().collect::<Vec<_>>(), vec!["src/good.py"]);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_analyzes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let records = vec![record(
            temp_dir.path(),
            "src/app.py",
            &"def main():\n    pass\n".repeat(5),
        )];
        let cancel = CancellationToken::new();
        cancel.cancel();

        let analysis = scheduler().analyze_repository(&records, &cancel).await;
        assert!(analysis.is_empty());
    }
}
