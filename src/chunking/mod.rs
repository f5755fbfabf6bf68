//! Boundary-aware text chunking for the similarity-search corpus
//!
//! Sizes and offsets are measured in characters, not bytes. Each chunk keeps
//! the character offset it starts at so consumers can strip the overlap and
//! rebuild the original text.

use crate::constants;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Scalar metadata value attached to a chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl MetadataValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataValue::Text(v) => write!(f, "{}", v),
            MetadataValue::Int(v) => write!(f, "{}", v),
            MetadataValue::Float(v) => write!(f, "{}", v),
            MetadataValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Int(value)
    }
}

impl From<usize> for MetadataValue {
    fn from(value: usize) -> Self {
        MetadataValue::Int(value as i64)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

/// Flat key to scalar map carried by every chunk
pub type MetadataMap = BTreeMap<String, MetadataValue>;

/// A bounded slice of text with provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// `{source}_{index}_{content hash prefix}`
    pub id: String,
    pub text: String,
    pub source: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
    /// Character offset of `text` within the source text
    pub start: usize,
    pub metadata: MetadataMap,
}

/// Splits text into overlapping chunks of roughly `target_size` characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    pub target_size: usize,
    pub overlap: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            target_size: constants::chunking::TARGET_SIZE,
            overlap: constants::chunking::OVERLAP,
        }
    }
}

impl Chunker {
    pub fn new(target_size: usize, overlap: usize) -> Self {
        Self {
            target_size: target_size.max(1),
            overlap,
        }
    }

    /// Character spans `(start, end)` of each chunk
    pub fn spans(&self, text: &str) -> Vec<(usize, usize)> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let target = self.target_size;

        if len <= target {
            return vec![(0, len)];
        }

        let mut spans = Vec::new();
        let mut start: usize = 0;
        while start < len {
            let mut end = (start + target).min(len);

            if end < len
                && let Some(pos) = chars[start..end]
                    .iter()
                    .rposition(|c| *c == '.' || *c == '\n')
                && pos > target / 2
            {
                end = start + pos + 1;
            }

            if chars[start..end].iter().any(|c| !c.is_whitespace()) {
                spans.push((start, end));
            }

            if end >= len {
                break;
            }
            start = end.saturating_sub(self.overlap).max(start + 1);
        }

        spans
    }

    /// Chunk `text` for `source`, copying `metadata` onto every chunk
    ///
    /// Each chunk's metadata also records its index, the total count and the source.
    pub fn chunk_document(&self, source: &str, text: &str, metadata: &MetadataMap) -> Vec<Chunk> {
        let spans = self.spans(text);
        let total_chunks = spans.len();
        let chars: Vec<char> = text.chars().collect();

        spans
            .into_iter()
            .enumerate()
            .map(|(chunk_index, (start, end))| {
                let chunk_text: String = chars[start..end].iter().collect();

                let mut chunk_metadata = metadata.clone();
                chunk_metadata.insert("source".into(), MetadataValue::from(source));
                chunk_metadata.insert("chunk_index".into(), MetadataValue::from(chunk_index));
                chunk_metadata.insert("total_chunks".into(), MetadataValue::from(total_chunks));

                Chunk {
                    id: chunk_id(source, chunk_index, &chunk_text),
                    text: chunk_text,
                    source: source.to_string(),
                    chunk_index,
                    total_chunks,
                    start,
                    metadata: chunk_metadata,
                }
            })
            .collect()
    }
}

/// Chunk text with no source or extra metadata
pub fn chunk(text: &str, target_size: usize, overlap: usize) -> Vec<Chunk> {
    Chunker::new(target_size, overlap).chunk_document("text", text, &MetadataMap::new())
}

/// Stable chunk identifier from source, index and content hash
pub fn chunk_id(source: &str, index: usize, text: &str) -> String {
    let digest = hex::encode(Sha256::digest(text.as_bytes()));
    format!(
        "{}_{}_{}",
        source,
        index,
        &digest[..constants::chunking::HASH_PREFIX_LEN]
    )
}

/// Rebuild source text from ordered chunks by dropping each chunk's overlap
pub fn reassemble(chunks: &[Chunk]) -> String {
    let mut result = String::new();
    let mut covered: usize = 0;

    for chunk in chunks {
        let skip = covered.saturating_sub(chunk.start);
        result.extend(chunk.text.chars().skip(skip));
        covered = covered.max(chunk.start + chunk.text.chars().count());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = chunk("hello world", 1000, 200);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "hello world");
        assert_eq!(chunks[0].total_chunks, 1);
    }

    #[test]
    fn test_text_exactly_target_size_is_single_chunk() {
        let text = "a".repeat(100);
        assert_eq!(chunk(&text, 100, 10).len(), 1);
    }

    #[test]
    fn test_cuts_at_sentence_boundary_past_midpoint() {
        let text = format!("{}. {}", "a".repeat(70), "b".repeat(80));
        let spans = Chunker::new(100, 10).spans(&text);
        assert_eq!(spans[0], (0, 71));
        assert_eq!(spans[1].0, 61);
    }

    #[test]
    fn test_boundary_before_midpoint_is_ignored() {
        let text = format!("{}. {}", "a".repeat(10), "b".repeat(150));
        let spans = Chunker::new(100, 10).spans(&text);
        assert_eq!(spans[0], (0, 100));
    }

    #[test]
    fn test_whitespace_only_windows_are_dropped() {
        let text = format!("{}{}", "x".repeat(60), " ".repeat(200));
        let chunks = chunk(&text, 50, 0);
        assert!(chunks.iter().all(|c| !c.text.trim().is_empty()));
    }

    #[test]
    fn test_indices_and_totals_are_consistent() {
        let text = "Sentence number one. ".repeat(200);
        let chunks = chunk(&text, 300, 50);
        assert!(chunks.len() > 1);
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.chunk_index, i);
            assert_eq!(c.total_chunks, chunks.len());
            assert!(c.chunk_index < c.total_chunks);
            assert!(c.text.chars().count() <= 300);
        }
    }

    #[test]
    fn test_reassemble_round_trip() {
        let text = "Line one of the file.\nAnother line here. And more text follows!\n".repeat(60);
        let chunks = chunk(&text, 250, 40);
        assert_eq!(reassemble(&chunks), text);
    }

    #[test]
    fn test_large_overlap_still_progresses() {
        let text = "abcdefghij".repeat(30);
        let chunks = chunk(&text, 20, 19);
        assert_eq!(reassemble(&chunks), text);
    }

    #[test]
    fn test_multibyte_text() {
        let text = "héllo wörld. ".repeat(100);
        let chunks = chunk(&text, 120, 20);
        assert_eq!(reassemble(&chunks), text);
    }

    #[test]
    fn test_chunk_ids_are_stable_and_distinct() {
        let a = chunk_id("src/main.rs", 0, "fn main() {}");
        let b = chunk_id("src/main.rs", 0, "fn main() {}");
        let c = chunk_id("src/main.rs", 1, "fn main() {}");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("src/main.rs_0_"));
        assert_eq!(a.len(), "src/main.rs_0_".len() + 16);
    }

    #[test]
    fn test_document_metadata_is_copied() {
        let mut metadata = MetadataMap::new();
        metadata.insert("repo_name".into(), MetadataValue::from("demo"));
        let chunks = Chunker::default().chunk_document("README.md", "# Demo", &metadata);
        assert_eq!(chunks[0].metadata["repo_name"], MetadataValue::from("demo"));
        assert_eq!(chunks[0].metadata["total_chunks"], MetadataValue::Int(1));
        assert_eq!(chunks[0].metadata["source"], MetadataValue::from("README.md"));
    }
}
