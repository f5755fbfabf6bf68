//! Repository scanning and file categorization
//!
//! The scanner walks a repository in file-name order, drops anything the
//! ignore engine or the static exclusion lists reject, and returns records
//! sorted so the files later stages care about most come first.

pub mod category;
pub mod record;
pub mod summary;

pub use category::FileCategory;
pub use record::FileRecord;
pub use summary::{RepositoryMetadata, RepositorySummary, detect_config_files};

use crate::config::ScannerConfig;
use crate::error::IndexError;
use crate::ignore::{IgnoreMatcher, Verdict, default_global_ignore_file};
use crate::logging::Logger;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Walks repositories and produces priority-sorted file records
#[derive(Debug, Clone, Default)]
pub struct RepositoryScanner {
    config: ScannerConfig,
    logger: Logger,
}

impl RepositoryScanner {
    pub fn new(config: ScannerConfig, logger: Logger) -> Self {
        Self { config, logger }
    }

    /// Load the ignore rules that apply to `root`
    pub fn load_ignore_rules(&self, root: &Path) -> IgnoreMatcher {
        if !self.config.respect_ignore_files {
            return IgnoreMatcher::from_rules(root, Vec::new());
        }
        let global = self
            .config
            .global_ignore_file
            .clone()
            .or_else(default_global_ignore_file);
        IgnoreMatcher::load_from(root, global.as_deref(), &self.logger)
    }

    /// Scan `root` and return records in priority order
    pub fn scan(&self, root: &Path) -> Result<Vec<FileRecord>, IndexError> {
        self.scan_with_summary(root).map(|(records, _)| records)
    }

    /// Summarize `root` without keeping the records
    pub fn summarize(&self, root: &Path) -> Result<RepositorySummary, IndexError> {
        self.scan_with_summary(root).map(|(_, summary)| summary)
    }

    /// Scan `root` once, returning priority-sorted records and their summary
    pub fn scan_with_summary(
        &self,
        root: &Path,
    ) -> Result<(Vec<FileRecord>, RepositorySummary), IndexError> {
        if !root.exists() {
            return Err(IndexError::scan(root, "path does not exist"));
        }
        if !root.is_dir() {
            return Err(IndexError::scan(root, "path is not a directory"));
        }

        let matcher = self.load_ignore_rules(root);
        let mut records = self.walk(root, &matcher)?;

        // Summary sees walk order so ties resolve to the first extension encountered
        let summary = RepositorySummary::from_records(&records);
        records.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        Ok((records, summary))
    }

    fn walk(&self, root: &Path, matcher: &IgnoreMatcher) -> Result<Vec<FileRecord>, IndexError> {
        let scope = repository_name(root);
        let mut records = Vec::new();

        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.should_descend(root, matcher, entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(IndexError::scan(root, e.to_string()));
                }
                Err(e) => {
                    self.logger.warn(&scope, &format!("Skipping unreadable entry: {}", e));
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(relative) = relative_path(root, entry.path()) else {
                continue;
            };

            let size = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(e) => {
                    self.logger.warn(&scope, &format!("Skipping {}: {}", relative, e));
                    continue;
                }
            };

            let record = FileRecord::new(entry.path().to_path_buf(), relative, size);
            if self.keeps_file(matcher, &record) {
                records.push(record);
            }
        }

        Ok(records)
    }

    fn should_descend(&self, root: &Path, matcher: &IgnoreMatcher, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return true;
        }
        let Some(relative) = relative_path(root, entry.path()) else {
            return false;
        };

        let name = entry.file_name().to_string_lossy();
        let excluded = self.config.excluded_dirs.iter().any(|dir| *dir == name)
            || matcher.is_ignored(&relative, true);

        !excluded || matcher.may_reinclude_within(&relative)
    }

    fn keeps_file(&self, matcher: &IgnoreMatcher, record: &FileRecord) -> bool {
        match matcher.verdict(&record.relative_path, false) {
            Verdict::Reincluded => true,
            Verdict::Ignored | Verdict::Builtin => false,
            Verdict::Unmatched => !self.statically_excluded(record),
        }
    }

    fn statically_excluded(&self, record: &FileRecord) -> bool {
        let in_excluded_dir = record
            .directories()
            .any(|dir| self.config.excluded_dirs.iter().any(|excluded| excluded == dir));

        in_excluded_dir
            || (!record.extension.is_empty()
                && self
                    .config
                    .excluded_extensions
                    .iter()
                    .any(|ext| *ext == record.extension))
    }
}

/// Repository display name: the final path component
pub fn repository_name(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root)
        .ok()
        .map(|relative| relative.to_string_lossy().replace('\\', "/"))
}
