//! Python analyzer
//!
//! Python is indentation-delimited, so the brace-family tables do not fit.
//! Declarations are found with line regexes and class bodies are bounded by
//! indentation. Decorators, docstrings, Flask/FastAPI routes and
//! configuration classes or dicts are recognized.

use super::facts::{
    AnalyzerKind, ApiFact, ClassFact, ClassKind, ConfigFact, FunctionFact, ImportScope, LineIndex,
    StructuralFacts, split_bases, split_params,
};
use super::heuristic::delimited_block;
use regex::Regex;
use std::sync::LazyLock;

const STDLIB: &[&str] = &[
    "abc", "argparse", "array", "ast", "asyncio", "base64", "bisect", "collections", "concurrent",
    "configparser", "contextlib", "copy", "csv", "dataclasses", "datetime", "decimal", "email",
    "enum", "functools", "getpass", "glob", "gzip", "hashlib", "heapq", "http", "importlib",
    "inspect", "io", "itertools", "json", "logging", "math", "multiprocessing", "operator", "os",
    "pathlib", "pickle", "platform", "pprint", "queue", "random", "re", "secrets", "shutil",
    "signal", "socket", "sqlite3", "ssl", "statistics", "string", "struct", "subprocess", "sys",
    "tarfile", "tempfile", "textwrap", "threading", "time", "traceback", "types", "typing",
    "unittest", "urllib", "uuid", "warnings", "weakref", "xml", "zipfile",
];

static DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^([ \t]*)(async[ \t]+)?def[ \t]+(\w+)[ \t]*\(([^)]*)\)[ \t]*(?:->[ \t]*([^:\n]+?))?[ \t]*:",
    )
    .expect("valid regex")
});
static CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([ \t]*)class[ \t]+(\w+)[ \t]*(?:\(([^)]*)\))?[ \t]*:").expect("valid regex")
});
static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*import[ \t]+([\w.]+(?:[ \t]+as[ \t]+\w+)?(?:[ \t]*,[ \t]*[\w.]+(?:[ \t]+as[ \t]+\w+)?)*)")
        .expect("valid regex")
});
static FROM_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*from[ \t]+([\w.]+)[ \t]+import[ \t]+(?:\(([^)]*)\)|([^\n#]+))")
        .expect("valid regex")
});
static ROUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:[\w.]*\.)?(route|get|post|put|delete|patch|api_route)\(\s*['"]([^'"]*)['"](.*)$"#)
        .expect("valid regex")
});
static ROUTE_METHODS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"methods\s*=\s*\[\s*['"](\w+)['"]"#).expect("valid regex")
});
static SELF_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"self\.(\w+)[ \t]*(?::[^=\n]+)?=[^=]").expect("valid regex")
});
static CLASS_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)[ \t]*(?::[^=\n]+(?:=[^=].*)?|=[^=].*)$").expect("valid regex")
});
static CONFIG_DICT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^(\w*(?:config|settings)\w*)[ \t]*(?::[^=\n]+)?=[ \t]*(?:dict\(|\{)")
        .expect("valid regex")
});
static DICT_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"](\w+)['"]\s*:|(\w+)\s*="#).expect("valid regex"));

const CONFIG_BASES: &[&str] = &["BaseSettings", "BaseConfig", "Settings"];

struct Line<'a> {
    text: &'a str,
    start: usize,
}

impl Line<'_> {
    fn indent(&self) -> usize {
        self.text.len() - self.text.trim_start().len()
    }

    fn is_blank(&self) -> bool {
        let trimmed = self.text.trim();
        trimmed.is_empty() || trimmed.starts_with('#')
    }
}

struct Source<'a> {
    content: &'a str,
    lines: Vec<Line<'a>>,
    index: LineIndex,
}

impl<'a> Source<'a> {
    fn new(content: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut start = 0;
        for text in content.split('\n') {
            lines.push(Line { text, start });
            start += text.len() + 1;
        }
        Self {
            content,
            lines,
            index: LineIndex::new(content),
        }
    }

    /// 0-based line holding `offset`
    fn line_at(&self, offset: usize) -> usize {
        self.index.line_of(offset).saturating_sub(1)
    }

    /// Decorators stacked directly above line `at`, top first
    fn decorators_above(&self, at: usize) -> Vec<String> {
        let mut decorators = Vec::new();
        let mut line = at;
        while line > 0 {
            line -= 1;
            let text = self.lines[line].text.trim();
            match text.strip_prefix('@') {
                Some(decorator) => decorators.push(decorator.trim().to_string()),
                None => break,
            }
        }
        decorators.reverse();
        decorators
    }

    /// Docstring opening the block whose header ends at `offset`
    fn docstring_after(&self, offset: usize) -> Option<String> {
        let rest = &self.content[offset..];
        let rest = &rest[rest.find('\n')? + 1..];
        let body = rest.trim_start();
        let quote = ["\"\"\"", "'''"].into_iter().find(|q| body.starts_with(q))?;
        let inner = &body[quote.len()..];
        let end = inner.find(quote)?;
        let text = inner[..end]
            .lines()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();
        (!text.is_empty()).then_some(text)
    }

    /// Byte range and indentation of the block whose header is on line `header`
    fn block(&self, header: usize, header_indent: usize) -> (usize, usize, Option<usize>) {
        let mut body_indent = None;
        let mut end_line = self.lines.len();

        for (i, line) in self.lines.iter().enumerate().skip(header + 1) {
            if line.is_blank() {
                continue;
            }
            if line.indent() <= header_indent {
                end_line = i;
                break;
            }
            body_indent.get_or_insert(line.indent());
        }

        let start = self
            .lines
            .get(header + 1)
            .map_or(self.content.len(), |l| l.start);
        let end = self
            .lines
            .get(end_line)
            .map_or(self.content.len(), |l| l.start)
            .max(start);
        (start, end, body_indent)
    }
}

struct Def {
    fact: FunctionFact,
    offset: usize,
    indent: usize,
}

/// Analyze Python source
pub fn analyze(content: &str) -> StructuralFacts {
    let source = Source::new(content);
    let mut facts = StructuralFacts::new("Python", AnalyzerKind::Heuristic);

    let defs = functions(&source);
    classes(&source, &defs, &mut facts);
    routes(&defs, &mut facts);
    facts.functions = defs.into_iter().map(|d| d.fact).collect();
    imports(content, &mut facts);
    config_dicts(content, &mut facts);

    facts.finish(content)
}

fn functions(source: &Source) -> Vec<Def> {
    DEF.captures_iter(source.content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let line = source.line_at(whole.start());
            Some(Def {
                offset: whole.start(),
                indent: caps[1].len(),
                fact: FunctionFact {
                    name: caps[3].to_string(),
                    line: line + 1,
                    is_async: caps.get(2).is_some(),
                    params: split_params(&caps[4]),
                    return_type: caps.get(5).map(|m| m.as_str().trim().to_string()),
                    decorators: source.decorators_above(line),
                    docstring: source.docstring_after(whole.end()),
                    cyclomatic_complexity: None,
                },
            })
        })
        .collect()
}

fn classes(source: &Source, defs: &[Def], facts: &mut StructuralFacts) {
    for caps in CLASS.captures_iter(source.content) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let header = source.line_at(whole.start());
        let indent = caps[1].len();
        let (start, end, body_indent) = source.block(header, indent);

        let methods: Vec<String> = defs
            .iter()
            .filter(|d| d.offset >= start && d.offset < end && Some(d.indent) == body_indent)
            .map(|d| d.fact.name.clone())
            .collect();

        let mut properties: Vec<String> = Vec::new();
        let body = &source.content[start..end];
        for line in body.lines() {
            let line_indent = line.len() - line.trim_start().len();
            if Some(line_indent) == body_indent
                && let Some(attr) = CLASS_ATTRIBUTE.captures(line.trim())
                && !attr[1].starts_with("__")
            {
                push_unique(&mut properties, &attr[1]);
            }
        }
        for attr in SELF_ATTRIBUTE.captures_iter(body) {
            push_unique(&mut properties, &attr[1]);
        }

        let name = caps[2].to_string();
        let bases = caps.get(3).map(|b| split_bases(b.as_str())).unwrap_or_default();

        if name.to_lowercase().contains("config")
            || bases.iter().any(|b| CONFIG_BASES.contains(&b.as_str()))
        {
            facts.configs.push(ConfigFact {
                kind: "class".to_string(),
                name: Some(name.clone()),
                attributes: properties.clone(),
            });
        }

        facts.classes.push(ClassFact {
            name,
            line: header + 1,
            kind: ClassKind::Class,
            bases,
            methods,
            properties,
            docstring: source.docstring_after(whole.end()),
        });
    }
}

fn routes(defs: &[Def], facts: &mut StructuralFacts) {
    for def in defs {
        for decorator in &def.fact.decorators {
            let Some(caps) = ROUTE.captures(decorator) else {
                continue;
            };
            let method = match &caps[1] {
                "route" | "api_route" => ROUTE_METHODS
                    .captures(&caps[3])
                    .map_or_else(|| "GET".to_string(), |m| m[1].to_uppercase()),
                verb => verb.to_uppercase(),
            };
            facts.apis.push(ApiFact {
                method,
                path: caps[2].to_string(),
                function: Some(def.fact.name.clone()),
                line: def.fact.line,
                docstring: def.fact.docstring.clone(),
                params: def.fact.params.clone(),
            });
        }
    }
}

fn imports(content: &str, facts: &mut StructuralFacts) {
    for caps in IMPORT.captures_iter(content) {
        for module in caps[1].split(',') {
            let module = module.split(" as ").next().unwrap_or_default().trim();
            facts.imports.add(module, classify(module));
        }
    }

    for caps in FROM_IMPORT.captures_iter(content) {
        let module = &caps[1];
        facts.imports.add(module, classify(module));

        let names = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
        facts.imports.add_from(
            module,
            names.split(',').filter_map(|name| {
                let name = name.split(" as ").next().unwrap_or_default().trim();
                (!name.is_empty()).then(|| name.to_string())
            }),
        );
    }
}

fn classify(module: &str) -> ImportScope {
    let root = module.split('.').next().unwrap_or(module);
    if module.starts_with('.') {
        ImportScope::Local
    } else if STDLIB.contains(&root) {
        ImportScope::Standard
    } else {
        ImportScope::ThirdParty
    }
}

fn config_dicts(content: &str, facts: &mut StructuralFacts) {
    for caps in CONFIG_DICT.captures_iter(content) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let (open, close) = if whole.as_str().ends_with('(') {
            ('(', ')')
        } else {
            ('{', '}')
        };
        let attributes = delimited_block(content, whole.end(), open, close)
            .map(|(start, end)| {
                let mut keys = Vec::new();
                for key in DICT_KEY.captures_iter(&content[start..end]) {
                    if let Some(k) = key.get(1).or_else(|| key.get(2)) {
                        push_unique(&mut keys, k.as_str());
                    }
                }
                keys
            })
            .unwrap_or_default();

        facts.configs.push(ConfigFact {
            kind: "dict".to_string(),
            name: Some(caps[1].to_string()),
            attributes,
        });
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"import os, sys
import requests as http
from typing import Dict, List
from .models import (
    User,
    Order as O,
)

DATABASE_CONFIG = {
    "host": "localhost",
    "port": 5432,
}


class AppConfig(BaseSettings):
    """Application settings."""

    debug: bool = False
    name = "demo"

    def __init__(self, path):
        self.path = path


class UserService(Base, Mixin):
    def helper():
        def inner():
            pass

    @property
    def count(self) -> int:
        return 0

    async def fetch(self, user_id: int) -> Dict[str, int]:
        '''Fetch a user.'''
        return {}


@app.route("/users", methods=["POST"])
def create_user(payload):
    """Create one user."""
    return payload


@router.get("/health")
async def health():
    return "ok"
"#;

    #[test]
    fn test_functions_and_decorators() {
        let facts = analyze(SOURCE);
        let names: Vec<&str> = facts.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["__init__", "helper", "inner", "count", "fetch", "create_user", "health"]
        );

        let fetch = &facts.functions[4];
        assert!(fetch.is_async);
        assert_eq!(fetch.params, vec!["self", "user_id: int"]);
        assert_eq!(fetch.return_type.as_deref(), Some("Dict[str, int]"));
        assert_eq!(fetch.docstring.as_deref(), Some("Fetch a user."));

        assert_eq!(facts.functions[3].decorators, vec!["property"]);
    }

    #[test]
    fn test_classes_methods_and_properties() {
        let facts = analyze(SOURCE);
        let config = &facts.classes[0];
        assert_eq!(config.name, "AppConfig");
        assert_eq!(config.bases, vec!["BaseSettings"]);
        assert_eq!(config.methods, vec!["__init__"]);
        assert_eq!(config.properties, vec!["debug", "name", "path"]);
        assert_eq!(config.docstring.as_deref(), Some("Application settings."));

        let service = &facts.classes[1];
        assert_eq!(service.bases, vec!["Base", "Mixin"]);
        assert_eq!(service.methods, vec!["helper", "count", "fetch"]);
    }

    #[test]
    fn test_routes() {
        let facts = analyze(SOURCE);
        assert_eq!(facts.apis.len(), 2);
        assert_eq!(facts.apis[0].method, "POST");
        assert_eq!(facts.apis[0].path, "/users");
        assert_eq!(facts.apis[0].function.as_deref(), Some("create_user"));
        assert_eq!(facts.apis[0].docstring.as_deref(), Some("Create one user."));
        assert_eq!(facts.apis[1].method, "GET");
        assert_eq!(facts.apis[1].path, "/health");
    }

    #[test]
    fn test_imports() {
        let facts = analyze(SOURCE);
        assert_eq!(facts.imports.standard, vec!["os", "sys", "typing"]);
        assert_eq!(facts.imports.third_party, vec!["requests"]);
        assert_eq!(facts.imports.local, vec![".models"]);
        assert_eq!(facts.imports.from_imports[".models"], vec!["User", "Order"]);
    }

    #[test]
    fn test_configs() {
        let facts = analyze(SOURCE);
        let names: Vec<_> = facts.configs.iter().map(|c| c.name.as_deref()).collect();
        assert_eq!(names, vec![Some("AppConfig"), Some("DATABASE_CONFIG")]);
        assert_eq!(facts.configs[1].attributes, vec!["host", "port"]);
    }

    #[test]
    fn test_empty_source() {
        let facts = analyze("");
        assert!(facts.is_empty());
        assert_eq!(facts.analyzer, AnalyzerKind::Heuristic);
    }
}
