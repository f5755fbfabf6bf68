//! What goes into the search corpus and how it is chunked

use crate::analysis::matches_skip_pattern;
use crate::chunking::{Chunk, Chunker, MetadataMap, MetadataValue};
use crate::config::StoreConfig;
use crate::constants::store::{
    INDEXABLE_EXTENSIONS, MEMO_CONTENT_TYPE, MIN_INDEXED_FILE_SIZE, SKIP_PATTERNS,
};
use crate::scanner::FileRecord;
use crate::utils::{thousands, title_case};

/// Whether a scanned file should be wrapped into the search corpus
pub fn should_index_file(record: &FileRecord, config: &StoreConfig) -> bool {
    if !INDEXABLE_EXTENSIONS.contains(&record.extension.as_str()) {
        return false;
    }
    if record.size < MIN_INDEXED_FILE_SIZE || record.size > config.max_indexed_file_size {
        return false;
    }

    !matches_skip_pattern(&record.relative_path)
        && !SKIP_PATTERNS
            .iter()
            .any(|pattern| record.relative_path.contains(pattern))
}

/// Markdown memo wrapping one source file for the corpus
pub fn file_memo(record: &FileRecord, content: &str, repo_name: &str) -> String {
    format!(
        "# File: {path}\n\n\
         **Type**: {category} File ({extension})\n\
         **Size**: {size} bytes\n\
         **Path**: {path}\n\n\
         ## Content\n\n\
         ```{fence}\n{content}\n```\n\n\
         ---\n\
         *This file is part of {repo_name} repository*\n",
        path = record.relative_path,
        category = title_case(record.category.as_str()),
        extension = record.extension,
        size = thousands(record.size),
        fence = record.extension.trim_start_matches('.'),
        content = content,
        repo_name = repo_name,
    )
}

/// Accumulates chunks for one repository
///
/// Every chunk carries the repository's flat metadata plus a
/// `document_type` and the memo content type.
#[derive(Debug, Clone)]
pub struct CorpusBuilder {
    chunker: Chunker,
    repo_name: String,
    base: MetadataMap,
    chunks: Vec<Chunk>,
}

impl CorpusBuilder {
    pub fn new(chunker: Chunker, repo_name: impl Into<String>, base: MetadataMap) -> Self {
        Self {
            chunker,
            repo_name: repo_name.into(),
            base,
            chunks: Vec::new(),
        }
    }

    /// Chunk one document; `path` is relative to the repository
    pub fn add_document(
        &mut self,
        path: &str,
        text: &str,
        document_type: &str,
        extra: MetadataMap,
    ) -> usize {
        let mut metadata = self.base.clone();
        metadata.extend(extra);
        metadata.insert("document_type".into(), MetadataValue::from(document_type));
        metadata.insert("content_type".into(), MetadataValue::from(MEMO_CONTENT_TYPE));

        let source = format!("{}/{}", self.repo_name, path);
        let chunks = self.chunker.chunk_document(&source, text, &metadata);
        let added = chunks.len();
        self.chunks.extend(chunks);
        added
    }

    /// Wrap a source file into a memo and chunk it
    pub fn add_file(&mut self, record: &FileRecord, content: &str) -> usize {
        let memo = file_memo(record, content, &self.repo_name);

        let mut extra = MetadataMap::new();
        extra.insert("file_path".into(), MetadataValue::from(record.relative_path.as_str()));
        extra.insert("file_name".into(), MetadataValue::from(record.name.as_str()));
        extra.insert("file_extension".into(), MetadataValue::from(record.extension.as_str()));
        extra.insert("file_category".into(), MetadataValue::from(record.category.as_str()));
        extra.insert("file_size".into(), MetadataValue::Int(record.size as i64));

        self.add_document(&record.relative_path, &memo, "source_file", extra)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn finish(self) -> Vec<Chunk> {
        self.chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(path: &str, size: u64) -> FileRecord {
        FileRecord::new(PathBuf::from("/repo").join(path), path, size)
    }

    #[test]
    fn test_should_index_file() {
        let config = StoreConfig::default();
        assert!(should_index_file(&record("src/app.py", 500), &config));
        assert!(should_index_file(&record("docs/guide.md", 500), &config));
        assert!(!should_index_file(&record("src/app.py", 5), &config));
        assert!(!should_index_file(&record("src/app.py", 2_000_000), &config));
        assert!(!should_index_file(&record("tests/test_app.py", 500), &config));
        assert!(!should_index_file(&record("web/app.min.js", 500), &config));
        assert!(!should_index_file(&record("assets/logo.svg", 500), &config));
    }

    #[test]
    fn test_file_memo_layout() {
        let memo = file_memo(&record("src/app.py", 1234), "print('hi')", "demo");
        assert!(memo.starts_with("# File: src/app.py\n"));
        assert!(memo.contains("**Type**: Code File (.py)"));
        assert!(memo.contains("**Size**: 1,234 bytes"));
        assert!(memo.contains("```py\nprint('hi')\n```"));
        assert!(memo.contains("*This file is part of demo repository*"));
    }

    #[test]
    fn test_builder_tags_chunks() {
        let mut base = MetadataMap::new();
        base.insert("repo_name".into(), MetadataValue::from("demo"));
        let mut builder = CorpusBuilder::new(Chunker::default(), "demo", base);

        builder.add_document("README.md", "# Demo", "README", MetadataMap::new());
        builder.add_file(&record("src/app.py", 11), "print('hi')");
        let chunks = builder.finish();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].source, "demo/README.md");
        assert_eq!(
            chunks[0].metadata["content_type"],
            MetadataValue::from(MEMO_CONTENT_TYPE)
        );
        assert_eq!(chunks[1].metadata["document_type"], MetadataValue::from("source_file"));
        assert_eq!(chunks[1].metadata["file_path"], MetadataValue::from("src/app.py"));
        assert_eq!(chunks[1].metadata["repo_name"], MetadataValue::from("demo"));
    }
}
