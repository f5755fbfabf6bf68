//! Shape of a repository's generated documentation

use crate::constants::docs::FILE_DOCUMENTATION_SECTION;
use serde::{Deserialize, Serialize};

/// One documentation page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationSection {
    /// File stem, kebab-case
    pub name: String,
    pub title: String,
    pub description: String,
    /// Prose filled in after planning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_content: Option<String>,
}

impl DocumentationSection {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            description: description.into(),
            generated_content: None,
        }
    }
}

/// A directory of related sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationFolder {
    pub name: String,
    pub title: String,
    pub description: String,
    pub sections: Vec<DocumentationSection>,
}

impl DocumentationFolder {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        sections: Vec<DocumentationSection>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            description: description.into(),
            sections,
        }
    }
}

/// Which planning tier produced a structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanOrigin {
    /// Pattern-based inference over the repository
    Inferred,
    /// Outline requested from the text generator
    Generated,
    /// Fixed outline
    Default,
}

/// README text plus the ordered folders for one repository
///
/// Section prose is filled in place later; the folder and section shape is
/// fixed once planning returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationStructure {
    pub readme_text: String,
    pub folders: Vec<DocumentationFolder>,
    pub origin: PlanOrigin,
}

impl DocumentationStructure {
    pub fn section_count(&self) -> usize {
        self.folders.iter().map(|folder| folder.sections.len()).sum()
    }

    pub fn folder(&self, name: &str) -> Option<&DocumentationFolder> {
        self.folders.iter().find(|folder| folder.name == name)
    }

    /// Add the per-file page to the `components` folder, creating that
    /// folder after the first one when the plan has none
    pub fn add_file_documentation(&mut self) {
        let page = DocumentationSection::new(
            FILE_DOCUMENTATION_SECTION,
            "File Documentation",
            "Purpose, key components and dependencies of each file",
        );

        match self.folders.iter_mut().find(|folder| folder.name == "components") {
            Some(folder) => {
                if !folder.sections.iter().any(|s| s.name == FILE_DOCUMENTATION_SECTION) {
                    folder.sections.push(page);
                }
            }
            None => {
                let folder = DocumentationFolder::new(
                    "components",
                    "Components",
                    "What each part of the code base does",
                    vec![page],
                );
                let at = self.folders.len().min(1);
                self.folders.insert(at, folder);
            }
        }
    }

    /// Iterate `(folder, section)` pairs in order
    pub fn sections(&self) -> impl Iterator<Item = (&DocumentationFolder, &DocumentationSection)> {
        self.folders
            .iter()
            .flat_map(|folder| folder.sections.iter().map(move |section| (folder, section)))
    }
}
