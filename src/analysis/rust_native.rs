//! Native Rust analyzer backed by the tree-sitter grammar
//!
//! This is the only analyzer that works from a real parse tree, so it is the
//! only one that reports cyclomatic complexity: 1 per function, plus one per
//! conditional, loop or `?` propagation, plus arms − 1 per `match`, plus one
//! per `&&`/`||` operator (operands − 1 per boolean chain).

use super::facts::{
    AnalyzerKind, ApiFact, ClassFact, ClassKind, ConfigFact, FunctionFact, ImportScope,
    StructuralFacts, split_params,
};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tree_sitter::{Node, Parser};

const ROUTE_ATTRIBUTES: &[&str] = &["get", "post", "put", "delete", "patch"];

static AXUM_ROUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\.route\(\s*"([^"]+)"\s*,\s*(get|post|put|delete|patch)\(\s*([\w:]+)"#)
        .expect("valid regex")
});

static STRING_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)""#).expect("valid regex"));

/// Analyze Rust source; `None` when the parse is unusable
pub fn analyze(content: &str) -> Option<StructuralFacts> {
    let mut parser = Parser::new();
    let language: tree_sitter::Language = tree_sitter_rust::LANGUAGE.into();
    parser.set_language(&language).ok()?;
    let tree = parser.parse(content, None)?;
    let root = tree.root_node();

    let mut collector = Collector {
        src: content.as_bytes(),
        facts: StructuralFacts::new("Rust", AnalyzerKind::Native),
        impls: BTreeMap::new(),
    };
    collector.visit_items(root);

    // A tree with errors that yielded nothing is garbage, not Rust
    if root.has_error() && collector.facts.is_empty() {
        return None;
    }

    let mut facts = collector.finish();
    for capture in AXUM_ROUTE.captures_iter(content) {
        let line = content[..capture.get(0).map_or(0, |m| m.start())]
            .matches('\n')
            .count()
            + 1;
        facts.apis.push(ApiFact {
            method: capture[2].to_uppercase(),
            path: capture[1].to_string(),
            function: Some(capture[3].to_string()),
            line,
            ..ApiFact::default()
        });
    }

    Some(facts.finish(content))
}

/// Methods and trait names gathered from `impl` blocks, keyed by self type
#[derive(Default)]
struct ImplInfo {
    methods: Vec<String>,
    traits: Vec<String>,
}

struct Collector<'a> {
    src: &'a [u8],
    facts: StructuralFacts,
    impls: BTreeMap<String, ImplInfo>,
}

impl<'a> Collector<'a> {
    fn text(&self, node: Node) -> String {
        node.utf8_text(self.src).unwrap_or_default().to_string()
    }

    fn field_text(&self, node: Node, field: &str) -> Option<String> {
        node.child_by_field_name(field).map(|child| self.text(child))
    }

    fn visit_items(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "function_item" => {
                    let function = self.function(child);
                    self.facts.functions.push(function);
                }
                "struct_item" => self.structure(child, ClassKind::Struct),
                "enum_item" => self.structure(child, ClassKind::Enum),
                "trait_item" => self.trait_item(child),
                "impl_item" => self.impl_item(child),
                "use_declaration" => self.use_declaration(child),
                "mod_item" => {
                    if let Some(body) = child.child_by_field_name("body") {
                        self.visit_items(body);
                    }
                }
                _ => {}
            }
        }
    }

    fn function(&mut self, node: Node) -> FunctionFact {
        let name = self.field_text(node, "name").unwrap_or_default();
        let (decorators, docstring) = self.leading_attributes(node);

        let params = node
            .child_by_field_name("parameters")
            .map(|p| {
                let text = self.text(p);
                split_params(text.trim_start_matches('(').trim_end_matches(')'))
            })
            .unwrap_or_default();

        let header_end = node
            .child_by_field_name("name")
            .map_or(node.start_byte(), |n| n.start_byte());
        let header = std::str::from_utf8(&self.src[node.start_byte()..header_end])
            .unwrap_or_default();
        let is_async = header.split_whitespace().any(|word| word == "async");

        let complexity = node
            .child_by_field_name("body")
            .map_or(0, |body| branch_points(body, self.src));

        self.route_from_attributes(&decorators, &name, &params, docstring.as_deref(), node);

        FunctionFact {
            name,
            line: node.start_position().row + 1,
            is_async,
            params,
            return_type: self.field_text(node, "return_type"),
            decorators,
            docstring,
            cyclomatic_complexity: Some(1 + complexity),
        }
    }

    fn route_from_attributes(
        &mut self,
        decorators: &[String],
        name: &str,
        params: &[String],
        docstring: Option<&str>,
        node: Node,
    ) {
        for decorator in decorators {
            let inner = decorator.trim_start_matches("#[").trim_end_matches(']');
            let attr = inner.split('(').next().unwrap_or_default().trim();
            let attr = attr.rsplit("::").next().unwrap_or(attr);
            if !ROUTE_ATTRIBUTES.contains(&attr) {
                continue;
            }
            if let Some(path) = STRING_LITERAL.captures(inner) {
                self.facts.apis.push(ApiFact {
                    method: attr.to_uppercase(),
                    path: path[1].to_string(),
                    function: Some(name.to_string()),
                    line: node.start_position().row + 1,
                    docstring: docstring.map(str::to_string),
                    params: params.to_vec(),
                });
            }
        }
    }

    /// Attributes and `///` doc lines directly above an item
    fn leading_attributes(&self, node: Node) -> (Vec<String>, Option<String>) {
        let mut attributes = Vec::new();
        let mut docs = Vec::new();

        let mut current = node.prev_sibling();
        while let Some(sibling) = current {
            match sibling.kind() {
                "attribute_item" => attributes.push(self.text(sibling)),
                "line_comment" => {
                    let text = self.text(sibling);
                    match text.strip_prefix("///") {
                        Some(doc) => docs.push(doc.trim().to_string()),
                        None => break,
                    }
                }
                _ => break,
            }
            current = sibling.prev_sibling();
        }

        attributes.reverse();
        docs.reverse();
        let docstring = (!docs.is_empty()).then(|| docs.join("\n"));
        (attributes, docstring)
    }

    fn structure(&mut self, node: Node, kind: ClassKind) {
        let name = self.field_text(node, "name").unwrap_or_default();
        let (_, docstring) = self.leading_attributes(node);

        let mut properties = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                if matches!(member.kind(), "field_declaration" | "enum_variant")
                    && let Some(field) = self.field_text(member, "name")
                {
                    properties.push(field);
                }
            }
        }

        if kind == ClassKind::Struct && name.to_lowercase().contains("config") {
            self.facts.configs.push(ConfigFact {
                kind: "struct".to_string(),
                name: Some(name.clone()),
                attributes: properties.clone(),
            });
        }

        self.facts.classes.push(ClassFact {
            name,
            line: node.start_position().row + 1,
            kind,
            bases: Vec::new(),
            methods: Vec::new(),
            properties,
            docstring,
        });
    }

    fn trait_item(&mut self, node: Node) {
        let name = self.field_text(node, "name").unwrap_or_default();
        let (_, docstring) = self.leading_attributes(node);

        let bases = self
            .field_text(node, "bounds")
            .map(|bounds| {
                bounds
                    .trim_start_matches(':')
                    .split('+')
                    .map(|b| b.trim().to_string())
                    .filter(|b| !b.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let mut methods = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                if matches!(member.kind(), "function_item" | "function_signature_item")
                    && let Some(method) = self.field_text(member, "name")
                {
                    methods.push(method);
                }
            }
        }

        self.facts.classes.push(ClassFact {
            name,
            line: node.start_position().row + 1,
            kind: ClassKind::Trait,
            bases,
            methods,
            properties: Vec::new(),
            docstring,
        });
    }

    fn impl_item(&mut self, node: Node) {
        let Some(self_type) = self.field_text(node, "type") else {
            return;
        };
        let self_type = self_type
            .split('<')
            .next()
            .unwrap_or(&self_type)
            .trim()
            .to_string();
        let trait_name = self.field_text(node, "trait");

        let mut methods = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                if member.kind() == "function_item" {
                    let function = self.function(member);
                    methods.push(function.name.clone());
                    self.facts.functions.push(function);
                }
            }
        }

        let info = self.impls.entry(self_type).or_default();
        info.methods.extend(methods);
        if let Some(trait_name) = trait_name {
            info.traits.push(trait_name);
        }
    }

    fn use_declaration(&mut self, node: Node) {
        let Some(argument) = self.field_text(node, "argument") else {
            return;
        };
        // `use a::b as c` records the path, not the alias
        let argument = match argument.split_once(" as ") {
            Some((path, _)) if !path.contains('{') => path.to_string(),
            _ => argument,
        };
        let argument = argument.split_whitespace().collect::<String>();

        let (module, names) = match argument.split_once("::{") {
            Some((module, rest)) => {
                let names = split_params(rest.trim_end_matches('}'));
                (module.to_string(), names)
            }
            None => (argument.clone(), Vec::new()),
        };

        let root = module.split("::").next().unwrap_or_default();
        let scope = match root {
            "std" | "core" | "alloc" => ImportScope::Standard,
            "crate" | "self" | "super" => ImportScope::Local,
            _ => ImportScope::ThirdParty,
        };

        self.facts.imports.add(&module, scope);
        if !names.is_empty() {
            self.facts.imports.add_from(&module, names);
        }
    }

    fn finish(mut self) -> StructuralFacts {
        for class in &mut self.facts.classes {
            if let Some(info) = self.impls.get(&class.name)
                && class.kind != ClassKind::Trait
            {
                class.methods.extend(info.methods.iter().cloned());
                class.bases.extend(info.traits.iter().cloned());
            }
        }
        self.facts
    }
}

fn branch_points(node: Node, src: &[u8]) -> u32 {
    let mut total = 0;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        total += match child.kind() {
            "if_expression" | "while_expression" | "loop_expression" | "for_expression"
            | "try_expression" => 1,
            "match_expression" => match_arms(child).saturating_sub(1),
            "binary_expression" => u32::from(is_boolean_operator(child, src)),
            _ => 0,
        };
        // Nested functions are scored on their own
        if child.kind() != "function_item" {
            total += branch_points(child, src);
        }
    }
    total
}

fn match_arms(node: Node) -> u32 {
    let Some(body) = node.child_by_field_name("body") else {
        return 0;
    };
    let mut cursor = body.walk();
    body.named_children(&mut cursor)
        .filter(|child| child.kind() == "match_arm")
        .count() as u32
}

fn is_boolean_operator(node: Node, src: &[u8]) -> bool {
    node.child_by_field_name("operator")
        .and_then(|op| op.utf8_text(src).ok())
        .is_some_and(|op| op == "&&" || op == "||")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::config::Settings;

/// Server settings
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

pub trait Handler: Send + Sync {
    fn handle(&self, input: &str) -> String;
}

impl Handler for ServerConfig {
    fn handle(&self, input: &str) -> String {
        input.to_string()
    }
}

/// Pick a label
pub async fn classify(value: i32, strict: bool) -> Result<&'static str, String> {
    if value < 0 && strict || value > 100 {
        return Err("out of range".into());
    }
    for _ in 0..2 {}
    let label = match value {
        0 => "zero",
        1..=9 => "small",
        _ => "large",
    };
    Ok(label)
}

#[get("/health")]
fn health() -> &'static str {
    "ok"
}
"#;

    #[test]
    fn test_extracts_items() {
        let facts = analyze(SOURCE).unwrap();
        assert_eq!(facts.analyzer, AnalyzerKind::Native);

        let names: Vec<&str> = facts.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["handle", "classify", "health"]);

        let classify = &facts.functions[1];
        assert!(classify.is_async);
        assert_eq!(classify.params, vec!["value: i32", "strict: bool"]);
        assert_eq!(
            classify.return_type.as_deref(),
            Some("Result<&'static str, String>")
        );
        assert_eq!(classify.docstring.as_deref(), Some("Pick a label"));
    }

    #[test]
    fn test_cyclomatic_complexity() {
        let facts = analyze(SOURCE).unwrap();
        let classify = facts.functions.iter().find(|f| f.name == "classify").unwrap();
        // if + && + || + for + (3 arms - 1)
        assert_eq!(classify.cyclomatic_complexity, Some(1 + 1 + 2 + 1 + 2));
        assert_eq!(
            facts.functions[0].cyclomatic_complexity,
            Some(1),
            "straight-line method"
        );
        assert!(facts.complexity.cyclomatic_total.is_some());
    }

    #[test]
    fn test_structs_traits_and_impls() {
        let facts = analyze(SOURCE).unwrap();
        let config = facts.classes.iter().find(|c| c.name == "ServerConfig").unwrap();
        assert_eq!(config.kind, ClassKind::Struct);
        assert_eq!(config.properties, vec!["host", "port"]);
        assert_eq!(config.methods, vec!["handle"]);
        assert_eq!(config.bases, vec!["Handler"]);
        assert_eq!(config.docstring.as_deref(), Some("Server settings"));

        let handler = facts.classes.iter().find(|c| c.name == "Handler").unwrap();
        assert_eq!(handler.kind, ClassKind::Trait);
        assert_eq!(handler.methods, vec!["handle"]);
        assert_eq!(handler.bases, vec!["Send", "Sync"]);

        assert_eq!(facts.configs.len(), 1);
        assert_eq!(facts.configs[0].attributes, vec!["host", "port"]);
    }

    #[test]
    fn test_imports_are_partitioned() {
        let facts = analyze(SOURCE).unwrap();
        assert_eq!(facts.imports.standard, vec!["std::collections::HashMap"]);
        assert_eq!(facts.imports.third_party, vec!["serde"]);
        assert_eq!(facts.imports.local, vec!["crate::config::Settings"]);
        assert_eq!(
            facts.imports.from_imports["serde"],
            vec!["Deserialize", "Serialize"]
        );
    }

    #[test]
    fn test_routes() {
        let facts = analyze(SOURCE).unwrap();
        assert_eq!(facts.apis.len(), 1);
        assert_eq!(facts.apis[0].method, "GET");
        assert_eq!(facts.apis[0].path, "/health");
        assert_eq!(facts.apis[0].function.as_deref(), Some("health"));

        let axum = r#"fn app() -> Router { Router::new().route("/users", post(create_user)) }"#;
        let facts = analyze(axum).unwrap();
        assert_eq!(facts.apis[0].method, "POST");
        assert_eq!(facts.apis[0].function.as_deref(), Some("create_user"));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(analyze("}}} ((( not rust at all ;;; {{{").is_none());
    }
}
