//! Which scanned files are worth analyzing, and in what order under the cap

use crate::config::AnalysisConfig;
use crate::constants::analysis::{
    ENTRY_POINTS, PRIORITY_DIRS, SKIP_PATTERNS, SOURCE_DIRS, SOURCE_EXTENSIONS,
};
use crate::constants::scanner::DOC_EXTENSIONS;
use crate::scanner::{FileCategory, FileRecord};
use std::cmp::Reverse;

/// Whether `record` should be handed to an analyzer
///
/// Documentation passes under the softer size ceiling. Source files must
/// avoid the skip patterns, reach the minimum size, and either sit under a
/// conventional source directory or already be categorized as code.
pub fn is_eligible(record: &FileRecord, config: &AnalysisConfig) -> bool {
    if record.size >= config.max_file_size {
        return false;
    }

    if record.category == FileCategory::Documentation
        || DOC_EXTENSIONS.contains(&record.extension.as_str())
    {
        return record.size <= config.max_doc_size;
    }

    if !SOURCE_EXTENSIONS.contains(&record.extension.as_str())
        || matches_skip_pattern(&record.relative_path)
        || record.size < config.min_code_size
    {
        return false;
    }

    record.category == FileCategory::Code
        || record.directories().any(|dir| SOURCE_DIRS.contains(&dir))
}

/// Whether a relative path names test, vendored, generated or lock content
///
/// Plain-word patterns match whole path tokens (split on `/ _ - .`),
/// optionally pluralized, so `tests/` and `mocks/` match but `builder.rs`
/// does not match `build`. Patterns with punctuation match as substrings.
pub fn matches_skip_pattern(relative_path: &str) -> bool {
    let path = relative_path.to_lowercase();
    let tokens: Vec<&str> = path
        .split(['/', '_', '-', '.'])
        .filter(|t| !t.is_empty())
        .collect();

    SKIP_PATTERNS.iter().any(|pattern| {
        if pattern.chars().all(|c| c.is_ascii_alphanumeric()) {
            tokens
                .iter()
                .any(|token| token == pattern || token.strip_suffix('s') == Some(*pattern))
        } else {
            path.contains(pattern)
        }
    })
}

/// Ranking used when the eligible set exceeds the cap; lower sorts first
///
/// Entry points, then priority source directories, then code, then config,
/// each tier ordered largest first.
pub fn analysis_priority(record: &FileRecord) -> (u8, Reverse<u64>) {
    let name = record.name.to_lowercase();
    let tier = if ENTRY_POINTS.contains(&name.as_str()) {
        0
    } else if record.directories().any(|dir| PRIORITY_DIRS.contains(&dir)) {
        1
    } else {
        match record.category {
            FileCategory::Code => 2,
            FileCategory::Config => 3,
            _ => 4,
        }
    };
    (tier, Reverse(record.size))
}

/// Eligible records, capped to `max_files`
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub files: Vec<&'a FileRecord>,
    /// Eligible count before the cap was applied
    pub eligible: usize,
}

impl Selection<'_> {
    pub fn capped(&self) -> bool {
        self.files.len() < self.eligible
    }
}

/// Filter `records` to the eligible set and apply the file cap
///
/// Under the cap the scan order is kept. Over it, only the top
/// `max_files` by [`analysis_priority`] survive: large repositories trade
/// completeness for bounded analysis time.
pub fn select<'a>(records: &'a [FileRecord], config: &AnalysisConfig) -> Selection<'a> {
    let mut files: Vec<&FileRecord> = records.iter().filter(|r| is_eligible(r, config)).collect();
    let eligible = files.len();

    if eligible > config.max_files {
        files.sort_by(|a, b| {
            analysis_priority(a)
                .cmp(&analysis_priority(b))
                .then_with(|| a.relative_path.cmp(&b.relative_path))
        });
        files.truncate(config.max_files);
    }

    Selection { files, eligible }
}
