//! Generated and default outlines, the planner's second and third tiers

use super::PlanningError;
use super::inference::validate_folders;
use super::signals::ComponentSummary;
use super::structure::{DocumentationFolder, DocumentationSection};
use crate::scanner::RepositoryMetadata;
use crate::utils::slugify;
use serde::Deserialize;

#[derive(Deserialize)]
struct OutlineDocument {
    folders: Vec<OutlineFolder>,
}

#[derive(Deserialize)]
struct OutlineFolder {
    name: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    sections: Vec<OutlineSection>,
}

#[derive(Deserialize)]
struct OutlineSection {
    name: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

/// Prompt asking the generator for a JSON outline
pub fn outline_prompt(metadata: &RepositoryMetadata, components: &ComponentSummary) -> String {
    let mut kinds: Vec<&str> = components.kinds.keys().copied().collect();
    if kinds.is_empty() {
        kinds.push("none detected");
    }

    format!(
        r#"You are a technical documentation architect. Plan the documentation for this repository.

Repository: {name}
Primary language: {language}
Files: {files}
Configuration files: {configs}
Classes: {classes}, functions: {functions}, API endpoints: {apis}
Component kinds: {kinds}

Return ONLY JSON in this exact shape, with kebab-case names:

{{"folders": [{{"name": "architecture", "title": "Architecture Documentation", "description": "System design", "sections": [{{"name": "overview", "title": "System Overview", "description": "High-level architecture"}}]}}]}}

Include an architecture folder and a development folder. Add further folders only when the repository warrants them."#,
        name = metadata.name,
        language = metadata.primary_language(),
        files = metadata.summary.file_count,
        configs = if metadata.config_files.is_empty() {
            "none".to_string()
        } else {
            metadata.config_files.join(", ")
        },
        classes = components.total_classes,
        functions = components.total_functions,
        apis = components.api_endpoints.len(),
        kinds = kinds.join(", "),
    )
}

/// Parse a generated outline into folders
///
/// Tolerates a surrounding code fence or prose by reading from the first
/// `{` to the last `}`. Names are slugified; missing titles fall back to the
/// name. Sections or folders left without a usable name are dropped, and an
/// outline that ends up invalid is rejected.
pub fn parse_outline(text: &str) -> Result<Vec<DocumentationFolder>, PlanningError> {
    let start = text
        .find('{')
        .ok_or_else(|| PlanningError::Outline("response contains no JSON object".to_string()))?;
    let end = text
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| PlanningError::Outline("response contains no JSON object".to_string()))?;

    let document: OutlineDocument = serde_json::from_str(&text[start..=end])
        .map_err(|e| PlanningError::Outline(format!("unparseable outline: {}", e)))?;

    let folders: Vec<DocumentationFolder> = document
        .folders
        .into_iter()
        .filter_map(|folder| {
            let name = slugify(&folder.name);
            let sections: Vec<DocumentationSection> = folder
                .sections
                .into_iter()
                .filter_map(|section| {
                    let name = slugify(&section.name);
                    (!name.is_empty()).then(|| {
                        let title = non_empty_or(section.title, &section.name);
                        DocumentationSection::new(name, title, section.description.trim())
                    })
                })
                .collect();

            (!name.is_empty() && !sections.is_empty()).then(|| {
                let title = non_empty_or(folder.title, &folder.name);
                DocumentationFolder::new(name, title, folder.description.trim(), sections)
            })
        })
        .collect();

    validate_folders(&folders).map_err(|e| PlanningError::Outline(e.to_string()))?;
    Ok(folders)
}

fn non_empty_or(value: String, fallback: &str) -> String {
    match value.trim() {
        "" => fallback.trim().to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Fixed outline used when inference and generation both fail
pub fn default_outline(has_apis: bool) -> Vec<DocumentationFolder> {
    let architecture = vec![
        DocumentationSection::new(
            "overview",
            "System Overview",
            "High-level system architecture",
        ),
        DocumentationSection::new(
            "components",
            "Core Components",
            "Main architectural components",
        ),
        DocumentationSection::new(
            "data-flow",
            "Data Flow",
            "How data moves through the system",
        ),
        DocumentationSection::new(
            "patterns",
            "Design Patterns",
            "Architectural patterns used",
        ),
    ];

    let mut components = vec![
        DocumentationSection::new("core", "Core Components", "Essential system components"),
        DocumentationSection::new(
            "utilities",
            "Utility Components",
            "Helper and utility components",
        ),
    ];
    if has_apis {
        components.push(DocumentationSection::new(
            "api",
            "API Components",
            "API endpoints and handlers",
        ));
    }

    let development = vec![
        DocumentationSection::new(
            "setup",
            "Development Setup",
            "How to set up the development environment",
        ),
        DocumentationSection::new(
            "workflow",
            "Development Workflow",
            "Development process and conventions",
        ),
        DocumentationSection::new("testing", "Testing Guide", "How to test the application"),
        DocumentationSection::new(
            "contributing",
            "Contributing",
            "Guidelines for contributing to the project",
        ),
    ];

    vec![
        DocumentationFolder::new(
            "architecture",
            "Architecture Documentation",
            "System design and architectural decisions",
            architecture,
        ),
        DocumentationFolder::new(
            "components",
            "Component Documentation",
            "Detailed documentation for each system component",
            components,
        ),
        DocumentationFolder::new(
            "development",
            "Development Guide",
            "Development setup, workflows, and guidelines",
            development,
        ),
    ]
}
