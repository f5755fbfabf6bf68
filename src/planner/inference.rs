//! Pattern-based structure inference
//!
//! Architecture and development folders are always planned. Every other
//! folder needs evidence: classes of the right kind, route facts, CLI
//! framework imports, or container and CI files.

use super::PlanningError;
use super::signals::{ComponentSummary, RepositorySignals};
use super::structure::{DocumentationFolder, DocumentationSection};
use crate::constants::planner::{DATA_FLOW_CLASS_THRESHOLD, PATTERNS_CLASS_THRESHOLD};
use crate::utils::{slugify, title_case};
use std::collections::{BTreeMap, BTreeSet};

/// Build folders from repository signals, validated before returning
pub fn infer_folders(
    signals: &RepositorySignals,
    components: &ComponentSummary,
) -> Result<Vec<DocumentationFolder>, PlanningError> {
    let mut folders = vec![architecture_folder(signals, components)];

    folders.extend(component_folder(components));
    folders.extend(data_folder(components));

    if !components.api_endpoints.is_empty() {
        folders.push(api_folder(components));
    }
    if signals.has_cli {
        folders.push(cli_folder());
    }
    if signals.has_docker || signals.has_ci {
        folders.push(deployment_folder(signals));
    }

    folders.push(development_folder(signals));

    validate_folders(&folders)?;
    Ok(folders)
}

/// Reject outlines the writer could not lay out on disk
///
/// Folders must be non-empty, uniquely named, and each hold uniquely named
/// sections.
pub fn validate_folders(folders: &[DocumentationFolder]) -> Result<(), PlanningError> {
    if folders.is_empty() {
        return Err(PlanningError::Invalid("outline has no folders".to_string()));
    }

    let mut folder_names = BTreeSet::new();
    for folder in folders {
        if folder.name.is_empty() {
            return Err(PlanningError::Invalid("folder without a name".to_string()));
        }
        if !folder_names.insert(folder.name.as_str()) {
            return Err(PlanningError::Invalid(format!(
                "duplicate folder '{}'",
                folder.name
            )));
        }
        if folder.sections.is_empty() {
            return Err(PlanningError::Invalid(format!(
                "folder '{}' has no sections",
                folder.name
            )));
        }

        let mut section_names = BTreeSet::new();
        for section in &folder.sections {
            if section.name.is_empty() || !section_names.insert(section.name.as_str()) {
                return Err(PlanningError::Invalid(format!(
                    "folder '{}' has an unnamed or duplicate section",
                    folder.name
                )));
            }
        }
    }
    Ok(())
}

fn architecture_folder(
    signals: &RepositorySignals,
    components: &ComponentSummary,
) -> DocumentationFolder {
    let mut components_description =
        "Main architectural components and their responsibilities".to_string();
    if !signals.source_directories.is_empty() {
        components_description.push_str(&format!(
            ", organized under {}",
            signals.source_directories.join(", ")
        ));
    }

    let mut sections = vec![
        DocumentationSection::new(
            "overview",
            "System Overview",
            "High-level system architecture and design principles",
        ),
        DocumentationSection::new("components", "Core Components", components_description),
    ];

    if !components.api_endpoints.is_empty()
        || components.total_classes > DATA_FLOW_CLASS_THRESHOLD
    {
        sections.push(DocumentationSection::new(
            "data-flow",
            "Data Flow",
            "How data moves through the system",
        ));
    }
    if components.has_inheritance || components.total_classes > PATTERNS_CLASS_THRESHOLD {
        sections.push(DocumentationSection::new(
            "patterns",
            "Design Patterns",
            "Architectural patterns and design decisions",
        ));
    }

    DocumentationFolder::new(
        "architecture",
        "Architecture Documentation",
        "System design, components, and architectural decisions",
        sections,
    )
}

fn component_folder(components: &ComponentSummary) -> Option<DocumentationFolder> {
    let candidates = [
        (
            "agents",
            "Agent Components",
            "Autonomous agent components and their capabilities",
        ),
        (
            "managers",
            "Manager Components",
            "Management and coordination components",
        ),
        (
            "services",
            "Service Components",
            "Business logic and service layer components",
        ),
        ("ui", "UI Components", "Views, pages and widgets"),
    ];
    let sections = sections_for_kinds(components, &candidates);

    (!sections.is_empty()).then(|| {
        DocumentationFolder::new(
            "components",
            "Business Components",
            "Core business logic and processing components",
            sections,
        )
    })
}

fn data_folder(components: &ComponentSummary) -> Option<DocumentationFolder> {
    let candidates = [
        (
            "models",
            "Data Models",
            "Data structures and model definitions",
        ),
        (
            "databases",
            "Database Components",
            "Database access and storage components",
        ),
        (
            "clients",
            "Client Components",
            "External service clients and adapters",
        ),
    ];
    let sections = sections_for_kinds(components, &candidates);

    (!sections.is_empty()).then(|| {
        DocumentationFolder::new(
            "data",
            "Data & Infrastructure",
            "Data models, storage, and external integrations",
            sections,
        )
    })
}

fn sections_for_kinds(
    components: &ComponentSummary,
    candidates: &[(&str, &str, &str)],
) -> Vec<DocumentationSection> {
    candidates
        .iter()
        .filter(|(kind, _, _)| components.has_kind(kind))
        .map(|(kind, title, description)| DocumentationSection::new(*kind, *title, *description))
        .collect()
}

fn api_folder(components: &ComponentSummary) -> DocumentationFolder {
    let mut sections = vec![
        DocumentationSection::new(
            "overview",
            "API Overview",
            "REST API overview and authentication",
        ),
        DocumentationSection::new(
            "endpoints",
            "Endpoints",
            "Available API endpoints and their usage",
        ),
    ];

    for (group, count) in endpoint_groups(components) {
        if count > 1 {
            sections.push(DocumentationSection::new(
                format!("{}-endpoints", group),
                format!("{} Endpoints", title_case(&group)),
                format!("API endpoints for {} functionality", group),
            ));
        }
    }

    DocumentationFolder::new(
        "apis",
        "API Documentation",
        "REST API endpoints and usage",
        sections,
    )
}

/// Endpoint counts by the path segment after `/api/`
fn endpoint_groups(components: &ComponentSummary) -> BTreeMap<String, usize> {
    let mut groups = BTreeMap::new();
    for endpoint in &components.api_endpoints {
        if let Some(group) = endpoint_group(&endpoint.path) {
            *groups.entry(group).or_insert(0) += 1;
        }
    }
    groups
}

/// Group of a route under `/api/`: `/api/users/{id}` belongs to `users`
pub fn endpoint_group(path: &str) -> Option<String> {
    path.strip_prefix("/api/")
        .and_then(|rest| rest.split('/').next())
        .map(slugify)
        .filter(|group| !group.is_empty())
}

fn cli_folder() -> DocumentationFolder {
    DocumentationFolder::new(
        "cli",
        "Command Line Interface",
        "CLI commands and usage",
        vec![
            DocumentationSection::new(
                "overview",
                "CLI Overview",
                "Command line interface overview and installation",
            ),
            DocumentationSection::new(
                "commands",
                "Available Commands",
                "All available CLI commands and their usage",
            ),
            DocumentationSection::new(
                "examples",
                "Usage Examples",
                "Common CLI usage patterns and examples",
            ),
        ],
    )
}

fn deployment_folder(signals: &RepositorySignals) -> DocumentationFolder {
    let mut sections = Vec::new();
    if signals.has_docker {
        sections.push(DocumentationSection::new(
            "docker",
            "Docker Deployment",
            "Docker containerization and deployment",
        ));
    }
    if signals.has_ci {
        sections.push(DocumentationSection::new(
            "ci-cd",
            "CI/CD Pipeline",
            "Continuous integration and deployment pipeline",
        ));
    }
    sections.push(DocumentationSection::new(
        "production",
        "Production Deployment",
        "Production deployment guidelines",
    ));

    DocumentationFolder::new(
        "deployment",
        "Deployment & CI/CD",
        "Deployment processes and continuous integration",
        sections,
    )
}

fn development_folder(signals: &RepositorySignals) -> DocumentationFolder {
    let setup = if signals.stacks.is_empty() {
        "Setting up the development environment".to_string()
    } else {
        format!(
            "Setting up the development environment ({})",
            signals.stacks.join(", ")
        )
    };

    let mut sections = vec![
        DocumentationSection::new("setup", "Development Setup", setup),
        DocumentationSection::new(
            "workflow",
            "Development Workflow",
            "Development process and conventions",
        ),
    ];
    if signals.has_tests {
        sections.push(DocumentationSection::new(
            "testing",
            "Testing Guide",
            "Running tests and testing guidelines",
        ));
    }
    sections.push(DocumentationSection::new(
        "contributing",
        "Contributing",
        "Guidelines for contributing to the project",
    ));

    DocumentationFolder::new(
        "development",
        "Development Guide",
        "Development setup, workflows, and guidelines",
        sections,
    )
}
