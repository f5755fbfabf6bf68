//! Scanned file records

use super::category::{self, FileCategory};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One file that survived scanning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub absolute_path: PathBuf,
    /// Forward-slash path relative to the repository root
    pub relative_path: String,
    pub name: String,
    /// Lowercase extension including the dot, empty when absent
    pub extension: String,
    pub size: u64,
    pub category: FileCategory,
}

impl FileRecord {
    /// Build a record, deriving name, extension and category from the relative path
    pub fn new(absolute_path: PathBuf, relative_path: impl Into<String>, size: u64) -> Self {
        let relative_path = relative_path.into().replace('\\', "/");
        let name = relative_path
            .rsplit('/')
            .next()
            .unwrap_or(relative_path.as_str())
            .to_string();
        let extension = category::extension_of(&name);
        let category = category::categorize(&name, &extension);

        Self {
            absolute_path,
            relative_path,
            name,
            extension,
            size,
            category,
        }
    }

    pub fn is_important(&self) -> bool {
        category::is_important(&self.name)
    }

    /// Directory components of the relative path, excluding the file name
    pub fn directories(&self) -> impl Iterator<Item = &str> {
        let mut parts: Vec<&str> = self.relative_path.split('/').collect();
        parts.pop();
        parts.into_iter()
    }

    /// Key used to order scan results: category, importance, then larger files first
    pub fn sort_key(&self) -> (u8, u8, std::cmp::Reverse<u64>, &str) {
        (
            self.category.priority(),
            u8::from(!self.is_important()),
            std::cmp::Reverse(self.size),
            self.relative_path.as_str(),
        )
    }
}
