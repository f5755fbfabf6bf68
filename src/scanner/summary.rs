//! Repository summaries and the per-repository metadata record

use super::category::FileCategory;
use super::record::FileRecord;
use crate::chunking::{MetadataMap, MetadataValue};
use crate::constants::scanner::{CONFIG_FILE_NAMES, HISTOGRAM_SIZE};
use crate::git::GitMetadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Recognized language extensions and their display names
const LANGUAGES: &[(&str, &str)] = &[
    (".py", "Python"),
    (".js", "JavaScript"),
    (".ts", "TypeScript"),
    (".java", "Java"),
    (".cpp", "C++"),
    (".c", "C"),
    (".cs", "C#"),
    (".php", "PHP"),
    (".rb", "Ruby"),
    (".go", "Go"),
    (".rs", "Rust"),
    (".kt", "Kotlin"),
    (".swift", "Swift"),
];

/// Display name for a recognized language extension
pub fn language_for_extension(extension: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, language)| *language)
}

/// Aggregate counts over a scanned repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub file_count: usize,
    pub total_size: u64,
    pub category_counts: BTreeMap<FileCategory, usize>,
    /// Most frequent extensions, most common first
    pub extension_histogram: Vec<(String, usize)>,
    pub primary_language: Option<String>,
}

impl RepositorySummary {
    /// Summarize records in the order they were encountered
    ///
    /// Order matters for the primary language: on a count tie the extension
    /// seen first keeps the title.
    pub fn from_records(records: &[FileRecord]) -> Self {
        let mut category_counts = BTreeMap::new();
        let mut extensions: Vec<(String, usize)> = Vec::new();
        let mut total_size = 0;

        for record in records {
            total_size += record.size;
            *category_counts.entry(record.category).or_insert(0) += 1;
            if record.extension.is_empty() {
                continue;
            }
            match extensions.iter_mut().find(|(ext, _)| *ext == record.extension) {
                Some((_, count)) => *count += 1,
                None => extensions.push((record.extension.clone(), 1)),
            }
        }

        let mut primary: Option<(&str, usize)> = None;
        for (extension, count) in &extensions {
            if let Some(language) = language_for_extension(extension)
                && primary.is_none_or(|(_, best)| *count > best)
            {
                primary = Some((language, *count));
            }
        }

        // Stable sort keeps first-seen order among equal counts
        let mut extension_histogram = extensions;
        extension_histogram.sort_by(|a, b| b.1.cmp(&a.1));
        extension_histogram.truncate(HISTOGRAM_SIZE);

        Self {
            file_count: records.len(),
            total_size,
            category_counts,
            extension_histogram,
            primary_language: primary.map(|(language, _)| language.to_string()),
        }
    }

    pub fn count(&self, category: FileCategory) -> usize {
        self.category_counts.get(&category).copied().unwrap_or(0)
    }
}

/// Everything the pipeline records about one repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    pub name: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub summary: RepositorySummary,
    /// Manifest and build files present, relative paths
    pub config_files: Vec<String>,
    pub code_files: Vec<String>,
    pub documentation_files: Vec<String>,
    pub test_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitMetadata>,
}

impl RepositoryMetadata {
    /// Build metadata from scanned records (priority order) and their summary
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        records: &[FileRecord],
        summary: RepositorySummary,
        git: Option<GitMetadata>,
    ) -> Self {
        let paths_in = |category: FileCategory| -> Vec<String> {
            records
                .iter()
                .filter(|r| r.category == category)
                .map(|r| r.relative_path.clone())
                .collect()
        };

        Self {
            name: name.into(),
            path: path.into(),
            summary,
            config_files: detect_config_files(records),
            code_files: paths_in(FileCategory::Code),
            documentation_files: paths_in(FileCategory::Documentation),
            test_files: paths_in(FileCategory::Test),
            git,
        }
    }

    pub fn primary_language(&self) -> &str {
        self.summary.primary_language.as_deref().unwrap_or("Unknown")
    }

    /// Flatten into scalar metadata for the content store
    ///
    /// Lists become comma-separated strings and nested maps become JSON text.
    pub fn to_flat_metadata(&self) -> MetadataMap {
        let mut flat = MetadataMap::new();
        flat.insert("repo_name".into(), MetadataValue::from(self.name.as_str()));
        flat.insert(
            "repo_path".into(),
            MetadataValue::from(self.path.display().to_string()),
        );
        flat.insert(
            "file_count".into(),
            MetadataValue::Int(self.summary.file_count as i64),
        );
        flat.insert(
            "total_size".into(),
            MetadataValue::Int(self.summary.total_size as i64),
        );
        flat.insert(
            "primary_language".into(),
            MetadataValue::from(self.primary_language()),
        );

        let categories: BTreeMap<String, usize> = self
            .summary
            .category_counts
            .iter()
            .map(|(category, count)| (category.to_string(), *count))
            .collect();
        flat.insert(
            "file_categories".into(),
            MetadataValue::Text(serde_json::to_string(&categories).unwrap_or_default()),
        );

        let extensions: BTreeMap<&str, usize> = self
            .summary
            .extension_histogram
            .iter()
            .map(|(ext, count)| (ext.as_str(), *count))
            .collect();
        flat.insert(
            "file_extensions".into(),
            MetadataValue::Text(serde_json::to_string(&extensions).unwrap_or_default()),
        );

        flat.insert(
            "config_files".into(),
            MetadataValue::Text(self.config_files.join(", ")),
        );

        if let Some(git) = &self.git {
            flat.insert("git_branch".into(), MetadataValue::from(git.branch.as_str()));
            flat.insert("git_commit".into(), MetadataValue::from(git.commit.as_str()));
            flat.insert("git_author".into(), MetadataValue::from(git.author.as_str()));
            flat.insert(
                "git_date".into(),
                MetadataValue::Text(git.committed_at.to_rfc3339()),
            );
        }

        flat
    }
}

/// Manifest and build files among the records, in record order
pub fn detect_config_files(records: &[FileRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|record| CONFIG_FILE_NAMES.contains(&record.name.as_str()))
        .map(|record| record.relative_path.clone())
        .collect()
}
