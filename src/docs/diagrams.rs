//! Mermaid diagrams drawn from structural facts
//!
//! Every renderer returns `None` when the facts give it nothing to draw, so
//! callers can attach whatever comes back without checking for empty blocks.

use crate::analysis::{AnalysisMap, ApiFact, ClassFact};
use crate::constants::docs::{
    DIAGRAM_CLASS_LIMIT, DIAGRAM_EDGE_LIMIT, DIAGRAM_MEMBER_LIMIT, DIAGRAM_ROUTE_LIMIT,
    FILE_DOCUMENTATION_SECTION,
};
use crate::planner::inference::endpoint_group;
use crate::planner::signals::component_kind;
use crate::planner::{DocumentationFolder, DocumentationSection};
use crate::utils::title_case;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

/// Kind used for classes whose names match no component pattern
const UNGROUPED: &str = "components";

/// Handler-name words that send a request on to storage
const STORAGE_WORDS: &[&str] = &["db", "database", "query", "store", "save", "repository"];

/// Diagram block for one section, headed by a `###` title
pub fn for_section(
    folder: &DocumentationFolder,
    section: &DocumentationSection,
    repo_name: &str,
    analysis: &AnalysisMap,
) -> Option<String> {
    let (heading, diagram) = match (folder.name.as_str(), section.name.as_str()) {
        ("architecture", "overview" | "components") => {
            ("System Architecture", architecture(repo_name, analysis))
        }
        ("architecture", "data-flow") => ("Data Flow", request_flow(&routes(analysis, None))),
        ("architecture", "patterns") => {
            ("Class Relationships", class_diagram(&classes(analysis, None)))
        }
        ("components", name) if name != FILE_DOCUMENTATION_SECTION => {
            ("Component Overview", component_diagram(&classes(analysis, kind_filter(name))))
        }
        ("data", name) => ("Data Model", class_diagram(&classes(analysis, kind_filter(name)))),
        ("apis", name) => {
            let group = name.strip_suffix("-endpoints").filter(|g| !g.is_empty());
            ("API Request Flow", request_flow(&routes(analysis, group)))
        }
        _ => return None,
    };
    diagram.map(|diagram| format!("### {}\n\n{}", heading, diagram))
}

/// Layered graph of classes with import and inheritance arrows
pub fn architecture(repo_name: &str, analysis: &AnalysisMap) -> Option<String> {
    let classes = classes(analysis, None);
    let edges = relationships(analysis);
    if classes.is_empty() && edges.is_empty() {
        return None;
    }

    let mut layers: BTreeMap<&str, Vec<&ClassFact>> = BTreeMap::new();
    for &class in &classes {
        layers
            .entry(component_kind(&class.name).unwrap_or(UNGROUPED))
            .or_default()
            .push(class);
    }

    let mut body = format!(
        "graph TB\n    subgraph repository[\"{} Architecture\"]\n",
        label(repo_name)
    );
    for (kind, members) in &layers {
        if members.len() > 1 {
            let _ = writeln!(
                body,
                "        subgraph {}_layer[\"{} Layer\"]",
                node_id(kind),
                title_case(kind)
            );
            for class in members {
                let _ = writeln!(body, "            {}", node(&class.name));
            }
            body.push_str("        end\n");
        } else {
            for class in members {
                let _ = writeln!(body, "        {}", node(&class.name));
            }
        }
    }
    body.push_str("    end\n");

    for (from, to, relation) in edges {
        let _ = writeln!(body, "    {} -->|{}| {}", node_id(&from), relation, node_id(&to));
    }
    Some(fenced(&body))
}

/// Left-to-right boxes with method and property counts
pub fn component_diagram(classes: &[&ClassFact]) -> Option<String> {
    if classes.is_empty() {
        return None;
    }
    let mut body = String::from("graph LR\n    subgraph interactions[\"Component Interactions\"]\n");
    for class in classes {
        let _ = writeln!(
            body,
            "        {}[\"{}<br/>Methods: {}<br/>Properties: {}\"]",
            node_id(&class.name),
            label(&class.name),
            class.methods.len(),
            class.properties.len()
        );
    }
    body.push_str("    end\n");
    Some(fenced(&body))
}

/// Request sequence from user to handler, and on to storage when the
/// handler's name says it touches one
pub fn request_flow(routes: &[&ApiFact]) -> Option<String> {
    if routes.is_empty() {
        return None;
    }
    let uses_storage = routes.iter().any(|route| touches_storage(route));

    let mut body = String::from("sequenceDiagram\n");
    for participant in ["User", "API", "Service"] {
        let _ = writeln!(body, "    participant {}", participant);
    }
    if uses_storage {
        body.push_str("    participant Database\n");
    }
    for route in routes {
        let _ = writeln!(body, "    User->>API: {} {}", route.method, label(&route.path));
        let _ = writeln!(
            body,
            "    API->>Service: {}",
            route.function.as_deref().map_or("Process request".to_string(), label)
        );
        if touches_storage(route) {
            body.push_str("    Service->>Database: Query or update\n");
            body.push_str("    Database-->>Service: Result\n");
        }
        body.push_str("    Service-->>API: Response\n");
        body.push_str("    API-->>User: JSON response\n");
    }
    Some(fenced(&body))
}

/// Class members and inheritance
pub fn class_diagram(classes: &[&ClassFact]) -> Option<String> {
    if classes.is_empty() {
        return None;
    }
    let mut body = String::from("classDiagram\n");
    for class in classes {
        let id = node_id(&class.name);
        let _ = writeln!(body, "    class {} {{", id);
        for method in class.methods.iter().take(DIAGRAM_MEMBER_LIMIT) {
            let _ = writeln!(body, "        +{}()", node_id(method));
        }
        for property in class.properties.iter().take(DIAGRAM_MEMBER_LIMIT) {
            let _ = writeln!(body, "        -{}", node_id(property));
        }
        body.push_str("    }\n");
        for base in &class.bases {
            let _ = writeln!(body, "    {} <|-- {}", node_id(base), id);
        }
    }
    Some(fenced(&body))
}

/// Classes in path order, optionally only those of one component kind
pub fn classes<'a>(analysis: &'a AnalysisMap, kind: Option<&str>) -> Vec<&'a ClassFact> {
    analysis
        .values()
        .flat_map(|facts| facts.classes.iter())
        .filter(|class| kind.is_none() || component_kind(&class.name) == kind)
        .take(DIAGRAM_CLASS_LIMIT)
        .collect()
}

/// Routes in path order, optionally only those under `/api/{group}/`
pub fn routes<'a>(analysis: &'a AnalysisMap, group: Option<&str>) -> Vec<&'a ApiFact> {
    analysis
        .values()
        .flat_map(|facts| facts.apis.iter())
        .filter(|route| group.is_none() || endpoint_group(&route.path).as_deref() == group)
        .take(DIAGRAM_ROUTE_LIMIT)
        .collect()
}

/// `(from, to, relation)` arrows: module imports by file stem, then bases
fn relationships(analysis: &AnalysisMap) -> Vec<(String, String, &'static str)> {
    let mut edges = Vec::new();
    for (path, facts) in analysis {
        let stem = Path::new(path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());
        for module in facts.imports.from_imports.keys() {
            if module.is_empty() || module.starts_with('.') {
                continue;
            }
            let root = module.split(['.', '/', ':']).find(|part| !part.is_empty());
            if let Some(root) = root {
                edges.push((stem.clone(), root.to_string(), "imports"));
            }
        }
    }
    for facts in analysis.values() {
        for class in &facts.classes {
            for base in &class.bases {
                edges.push((class.name.clone(), base.clone(), "inherits"));
            }
        }
    }
    edges.dedup();
    edges.truncate(DIAGRAM_EDGE_LIMIT);
    edges
}

fn kind_filter(section_name: &str) -> Option<&str> {
    crate::constants::planner::COMPONENT_PATTERNS
        .iter()
        .map(|(kind, _)| *kind)
        .find(|kind| *kind == section_name)
}

fn touches_storage(route: &ApiFact) -> bool {
    route.function.as_deref().is_some_and(|name| {
        name.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| STORAGE_WORDS.contains(&word))
    })
}

fn node(name: &str) -> String {
    format!("{}[\"{}\"]", node_id(name), label(name))
}

/// Mermaid identifier: ASCII alphanumerics and underscores, never leading
/// with a digit
pub fn node_id(name: &str) -> String {
    let id: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if id.is_empty() || id.starts_with(|c: char| c.is_ascii_digit()) {
        format!("n_{}", id)
    } else {
        id
    }
}

/// Text safe inside a quoted Mermaid label or a sequence message
fn label(text: &str) -> String {
    text.replace('"', "#quot;").replace(';', "#59;")
}

fn fenced(body: &str) -> String {
    format!("```mermaid\n{}```", body)
}
