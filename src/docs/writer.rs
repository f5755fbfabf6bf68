//! On-disk documentation tree
//!
//! ```text
//! <repo dir>/README.md
//! <repo dir>/index.md
//! <repo dir>/<folder>/README.md
//! <repo dir>/<folder>/<section>.md
//! ```

use super::generate::section_fallback;
use crate::Result;
use crate::constants::docs::{INDEX_FILE, README_FILE};
use crate::planner::{DocumentationFolder, DocumentationStructure};
use crate::utils::{ensure_directory_exists, sanitize_for_filename, write_text_file};
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Directory a repository's documentation is written to
///
/// A single-repository batch writes straight into `output_dir`; larger
/// batches get one subdirectory per repository.
pub fn repository_output_dir(output_dir: &Path, repo_name: &str, batch_size: usize) -> PathBuf {
    if batch_size <= 1 {
        output_dir.to_path_buf()
    } else {
        output_dir.join(sanitize_for_filename(repo_name))
    }
}

/// Write `structure` under `dir` and return the files written
pub fn write_documentation(
    dir: &Path,
    repo_name: &str,
    structure: &DocumentationStructure,
) -> Result<Vec<PathBuf>> {
    ensure_directory_exists(dir)?;
    let mut written = Vec::new();

    let readme = dir.join(README_FILE);
    write_text_file(&readme, &structure.readme_text)?;
    written.push(readme);

    for folder in &structure.folders {
        let folder_dir = dir.join(sanitize_for_filename(&folder.name));

        let index = folder_dir.join(README_FILE);
        write_text_file(&index, &folder_index(folder))?;
        written.push(index);

        for section in &folder.sections {
            let path = folder_dir.join(section_file_name(&section.name));
            let content = match &section.generated_content {
                Some(content) => content.clone(),
                None => section_fallback(section),
            };
            write_text_file(&path, &content)?;
            written.push(path);
        }
    }

    let index = dir.join(INDEX_FILE);
    write_text_file(&index, &navigation_index(repo_name, structure))?;
    written.push(index);

    Ok(written)
}

fn section_file_name(name: &str) -> String {
    format!("{}.md", sanitize_for_filename(name))
}

fn folder_index(folder: &DocumentationFolder) -> String {
    let mut text = format!("# {}\n\n{}\n\n## Sections\n\n", folder.title, folder.description);
    for section in &folder.sections {
        let _ = writeln!(
            text,
            "- [{}]({}): {}",
            section.title,
            section_file_name(&section.name),
            section.description
        );
    }
    text
}

fn navigation_index(repo_name: &str, structure: &DocumentationStructure) -> String {
    let mut text = format!(
        "# {} Documentation Index\n\n## Quick Navigation\n\n- [Main README]({})\n",
        repo_name, README_FILE
    );

    for folder in &structure.folders {
        let folder_dir = sanitize_for_filename(&folder.name);
        let _ = write!(
            text,
            "\n### [{}]({}/{})\n\n",
            folder.title, folder_dir, README_FILE
        );
        for section in &folder.sections {
            let _ = writeln!(
                text,
                "- [{}]({}/{})",
                section.title,
                folder_dir,
                section_file_name(&section.name)
            );
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{DocumentationSection, PlanOrigin};
    use std::fs;
    use tempfile::TempDir;

    fn structure() -> DocumentationStructure {
        let mut setup = DocumentationSection::new("setup", "Development Setup", "Start here");
        setup.generated_content = Some("## Setup\n\nRun it.".to_string());
        DocumentationStructure {
            readme_text: "# demo".to_string(),
            folders: vec![DocumentationFolder::new(
                "development",
                "Development Guide",
                "How to work on it",
                vec![
                    setup,
                    DocumentationSection::new("testing", "Testing Guide", "How to test"),
                ],
            )],
            origin: PlanOrigin::Default,
        }
    }

    #[test]
    fn test_output_dir_per_batch_size() {
        let out = Path::new("/out");
        assert_eq!(repository_output_dir(out, "demo", 1), PathBuf::from("/out"));
        assert_eq!(repository_output_dir(out, "demo", 3), PathBuf::from("/out/demo"));
        assert_eq!(
            repository_output_dir(out, "my repo", 2),
            PathBuf::from("/out/my_repo")
        );
    }

    #[test]
    fn test_writes_tree() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("wiki");

        let written = write_documentation(&dir, "demo", &structure()).unwrap();
        assert_eq!(written.len(), 5);

        assert_eq!(fs::read_to_string(dir.join("README.md")).unwrap(), "# demo");
        assert_eq!(
            fs::read_to_string(dir.join("development/setup.md")).unwrap(),
            "## Setup\n\nRun it."
        );
        let testing = fs::read_to_string(dir.join("development/testing.md")).unwrap();
        assert!(testing.starts_with("## Testing Guide\n\nHow to test"));

        let folder_index = fs::read_to_string(dir.join("development/README.md")).unwrap();
        assert!(folder_index.contains("- [Development Setup](setup.md): Start here"));

        let index = fs::read_to_string(dir.join("index.md")).unwrap();
        assert!(index.starts_with("# demo Documentation Index"));
        assert!(index.contains("- [Testing Guide](development/testing.md)"));
    }
}
