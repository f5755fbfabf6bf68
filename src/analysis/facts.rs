//! Structural facts extracted from one file

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionFact {
    pub name: String,
    pub line: usize,
    pub is_async: bool,
    pub params: Vec<String>,
    pub return_type: Option<String>,
    pub decorators: Vec<String>,
    pub docstring: Option<String>,
    /// Only computed by the native analyzer
    pub cyclomatic_complexity: Option<u32>,
}

/// Declaration flavor of a class-like fact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Class,
    Struct,
    Interface,
    Trait,
    Enum,
    Module,
    Table,
    Selector,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassFact {
    pub name: String,
    pub line: usize,
    pub kind: ClassKind,
    pub bases: Vec<String>,
    pub methods: Vec<String>,
    pub properties: Vec<String>,
    pub docstring: Option<String>,
}

/// Where an imported module comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportScope {
    Standard,
    ThirdParty,
    Local,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFacts {
    pub standard: Vec<String>,
    pub third_party: Vec<String>,
    pub local: Vec<String>,
    /// Module to the names imported from it
    pub from_imports: BTreeMap<String, Vec<String>>,
}

impl ImportFacts {
    /// Record a module once under its scope
    pub fn add(&mut self, module: &str, scope: ImportScope) {
        let module = module.trim();
        if module.is_empty() {
            return;
        }
        let bucket = match scope {
            ImportScope::Standard => &mut self.standard,
            ImportScope::ThirdParty => &mut self.third_party,
            ImportScope::Local => &mut self.local,
        };
        if !bucket.iter().any(|m| m == module) {
            bucket.push(module.to_string());
        }
    }

    pub fn add_from(&mut self, module: &str, names: impl IntoIterator<Item = String>) {
        let entry = self.from_imports.entry(module.trim().to_string()).or_default();
        for name in names {
            if !name.is_empty() && !entry.contains(&name) {
                entry.push(name);
            }
        }
    }

    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.standard
            .iter()
            .chain(&self.third_party)
            .chain(&self.local)
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.standard.is_empty() && self.third_party.is_empty() && self.local.is_empty()
    }
}

/// A route-like declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFact {
    pub method: String,
    pub path: String,
    pub function: Option<String>,
    pub line: usize,
    pub docstring: Option<String>,
    pub params: Vec<String>,
}

/// A block that looks like configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFact {
    pub kind: String,
    pub name: Option<String>,
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityFacts {
    pub line_count: usize,
    pub function_count: usize,
    pub class_count: usize,
    pub cyclomatic_total: Option<u32>,
    pub max_function_complexity: Option<u32>,
}

/// Which analyzer produced a fact set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    Native,
    Heuristic,
    #[default]
    Generic,
}

/// Everything extracted from one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralFacts {
    pub language: String,
    pub analyzer: AnalyzerKind,
    pub functions: Vec<FunctionFact>,
    pub classes: Vec<ClassFact>,
    pub imports: ImportFacts,
    pub apis: Vec<ApiFact>,
    pub configs: Vec<ConfigFact>,
    pub complexity: ComplexityFacts,
}

impl StructuralFacts {
    pub fn new(language: impl Into<String>, analyzer: AnalyzerKind) -> Self {
        Self {
            language: language.into(),
            analyzer,
            ..Self::default()
        }
    }

    /// Fill the complexity block from the extracted facts
    pub fn finish(mut self, content: &str) -> Self {
        self.complexity.line_count = content.lines().count();
        self.complexity.function_count = self.functions.len();
        self.complexity.class_count = self.classes.len();

        let scores: Vec<u32> = self
            .functions
            .iter()
            .filter_map(|f| f.cyclomatic_complexity)
            .collect();
        if !scores.is_empty() {
            self.complexity.cyclomatic_total = Some(scores.iter().sum());
            self.complexity.max_function_complexity = scores.iter().max().copied();
        }
        self
    }

    /// Whether any structure beyond line counts was found
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
            && self.classes.is_empty()
            && self.imports.is_empty()
            && self.apis.is_empty()
            && self.configs.is_empty()
    }
}

/// Maps byte offsets to 1-based line numbers
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(content.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    pub fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }
}

/// Split a parameter list on top-level commas
pub fn split_params(params: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();

    for c in params.chars() {
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth -= 1,
            ',' if depth <= 0 => {
                push_param(&mut out, &current);
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    push_param(&mut out, &current);
    out
}

fn push_param(out: &mut Vec<String>, raw: &str) {
    let param = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if !param.is_empty() {
        out.push(param);
    }
}

/// Split an inheritance list such as `Base, Mixin<T>`
pub fn split_bases(bases: &str) -> Vec<String> {
    const QUALIFIERS: &[&str] = &["public", "protected", "private", "virtual"];

    split_params(bases)
        .into_iter()
        .map(|b| {
            b.split_whitespace()
                .skip_while(|word| QUALIFIERS.contains(word))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|b| !b.is_empty())
        .collect()
}
