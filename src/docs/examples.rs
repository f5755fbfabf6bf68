//! Usage examples lifted from the analyzed code
//!
//! Request commands come from route facts, constructor calls from class and
//! method facts. Configuration excerpts, command lines, call sites and test
//! bodies are read from the files themselves.

use super::diagrams::{classes, routes};
use crate::analysis::{AnalysisMap, ApiFact, ClassFact, StructuralFacts};
use crate::constants::docs::{
    API_EXAMPLE_LIMIT, CONFIG_EXAMPLE_LEN, EXAMPLE_BASE_URL, EXAMPLE_LIMIT,
    FILE_DOCUMENTATION_SECTION, TEST_EXAMPLE_LINES,
};
use crate::planner::{DocumentationFolder, DocumentationSection};
use crate::scanner::{FileCategory, FileRecord, RepositoryMetadata};
use regex::Regex;
use std::fmt::Write;
use std::sync::LazyLock;

/// Method names that construct an instance of their class
const CONSTRUCTORS: &[&str] = &["__init__", "constructor", "new", "initialize"];

/// Receiver parameters left out of constructor calls
const RECEIVERS: &[&str] = &["self", "&self", "&mut self", "cls", "this"];

static COMMAND_DECORATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\w+\.command\(\s*(?:['"]([\w-]+)['"])?"#).expect("valid regex")
});

static ADD_ARGUMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"add_argument\(\s*['"]([^'"]+)['"]"#).expect("valid regex")
});

static TEST_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([ \t]*)(?:pub\s+)?(?:async\s+)?(?:def|fn|func)\s+(test_\w+|Test\w+)\s*\(")
        .expect("valid regex")
});

/// One fenced example under a `###` title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeExample {
    pub title: String,
    pub language: String,
    pub code: String,
}

impl CodeExample {
    fn new(title: impl Into<String>, language: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            language: language.into(),
            code: code.into(),
        }
    }

    pub fn render(&self) -> String {
        format!("### {}\n\n```{}\n{}\n```\n", self.title, self.language, self.code)
    }
}

/// Example block for one section, headed by a `##` title
pub fn for_section(
    folder: &DocumentationFolder,
    section: &DocumentationSection,
    metadata: &RepositoryMetadata,
    analysis: &AnalysisMap,
    records: &[FileRecord],
) -> Option<String> {
    let (heading, examples) = match (folder.name.as_str(), section.name.as_str()) {
        ("development", "setup") => (
            "Configuration Examples",
            config_examples(&metadata.config_files, records),
        ),
        ("development", "testing") => ("Test Examples", test_examples(records)),
        ("apis", name) => {
            let group = name.strip_suffix("-endpoints").filter(|g| !g.is_empty());
            let routes = routes(analysis, group);
            (
                "API Usage Examples",
                routes.into_iter().take(API_EXAMPLE_LIMIT).map(api_example).collect(),
            )
        }
        ("cli", _) => ("CLI Usage Examples", cli_examples(analysis, records)),
        ("components", name) if name != FILE_DOCUMENTATION_SECTION => {
            let kind = crate::constants::planner::COMPONENT_PATTERNS
                .iter()
                .map(|(kind, _)| *kind)
                .find(|kind| *kind == name);
            let mut examples = initialization_examples(analysis, kind);
            for class in classes(analysis, kind).into_iter().take(EXAMPLE_LIMIT) {
                examples.extend(class_usage(class, analysis, records));
            }
            ("Component Usage Examples", examples)
        }
        _ => return None,
    };

    if examples.is_empty() {
        return None;
    }
    let mut text = format!("## {}\n\n", heading);
    for example in examples {
        text.push_str(&example.render());
        text.push('\n');
    }
    Some(text.trim_end().to_string())
}

/// `curl` command for a route; bodies are sent for methods that take one
pub fn curl_command(route: &ApiFact) -> String {
    let method = route.method.to_uppercase();
    let url = format!("{}{}", EXAMPLE_BASE_URL, route.path);
    match method.as_str() {
        "POST" | "PUT" | "PATCH" => format!(
            "curl -X {} {} -H 'Content-Type: application/json' -d '{{}}'",
            method, url
        ),
        _ => format!("curl -X {} {}", method, url),
    }
}

fn api_example(route: &ApiFact) -> CodeExample {
    CodeExample::new(
        format!("{} {}", route.method.to_uppercase(), route.path),
        "bash",
        curl_command(route),
    )
}

/// Constructor calls for classes whose constructor was found, optionally
/// only classes of one component kind
pub fn initialization_examples(analysis: &AnalysisMap, kind: Option<&str>) -> Vec<CodeExample> {
    let mut examples = Vec::new();
    for (path, facts) in analysis {
        for class in &facts.classes {
            if kind.is_some() && crate::planner::signals::component_kind(&class.name) != kind {
                continue;
            }
            if let Some(code) = constructor_call(class, facts) {
                examples.push(CodeExample::new(
                    format!("{} initialization", class.name),
                    fence_language(path),
                    code,
                ));
            }
            if examples.len() == EXAMPLE_LIMIT {
                return examples;
            }
        }
    }
    examples
}

fn constructor_call(class: &ClassFact, facts: &StructuralFacts) -> Option<String> {
    let constructor = class
        .methods
        .iter()
        .find(|method| CONSTRUCTORS.contains(&method.as_str()))?;
    let function = facts
        .functions
        .iter()
        .find(|f| &f.name == constructor && f.line >= class.line)?;

    let python = facts.language == "Python";
    let args: Vec<String> = function
        .params
        .iter()
        .filter(|param| !RECEIVERS.contains(&param.trim()))
        .filter_map(|param| {
            let (name, annotation) = split_param(param)?;
            Some(if python {
                format!("{}={}", name, sample_value(annotation))
            } else {
                name
            })
        })
        .collect();

    Some(match constructor.as_str() {
        "new" => format!("{}::new({})", class.name, args.join(", ")),
        "__init__" => format!("{}({})", class.name, args.join(", ")),
        _ => format!("new {}({})", class.name, args.join(", ")),
    })
}

/// Name and type annotation of a parameter: `user_id: int = 0`, `int page`
/// and `...args` all reduce to a bare name
fn split_param(param: &str) -> Option<(String, &str)> {
    let param = param.split('=').next().unwrap_or_default().trim();
    let (name, annotation) = match param.split_once(':') {
        Some((name, annotation)) => (name.trim(), annotation.trim()),
        None => (param.rsplit(' ').next().unwrap_or(param), ""),
    };
    let name = name
        .trim_start_matches(['*', '&', '.'])
        .trim_start_matches("mut ")
        .trim();
    (!name.is_empty()).then(|| (name.to_string(), annotation))
}

fn sample_value(annotation: &str) -> &'static str {
    let annotation = annotation.to_lowercase();
    if annotation.contains("str") {
        "\"example\""
    } else if annotation.contains("int") || annotation.contains("float") {
        "1"
    } else if annotation.contains("bool") {
        "True"
    } else {
        "..."
    }
}

/// First call site of a class outside the file that defines it
pub fn class_usage(
    class: &ClassFact,
    analysis: &AnalysisMap,
    records: &[FileRecord],
) -> Option<CodeExample> {
    let defined_in = analysis
        .iter()
        .find(|(_, facts)| facts.classes.iter().any(|c| c.name == class.name))
        .map(|(path, _)| path.as_str());
    let call = Regex::new(&format!(r"\b{}\s*\(", regex::escape(&class.name))).ok()?;

    records
        .iter()
        .filter(|record| record.category == FileCategory::Code)
        .filter(|record| Some(record.relative_path.as_str()) != defined_in)
        .find_map(|record| {
            let content = std::fs::read_to_string(&record.absolute_path).ok()?;
            let lines: Vec<&str> = content.lines().collect();
            let hit = lines.iter().position(|line| call.is_match(line))?;
            let context = &lines[hit.saturating_sub(1)..(hit + 2).min(lines.len())];
            Some(CodeExample::new(
                format!("{} in {}", class.name, record.relative_path),
                fence_language(&record.relative_path),
                dedent(context),
            ))
        })
}

/// Subcommands from command decorators, then flags of argparse entry points
pub fn cli_examples(analysis: &AnalysisMap, records: &[FileRecord]) -> Vec<CodeExample> {
    let mut examples = Vec::new();

    for (path, facts) in analysis {
        for function in &facts.functions {
            let Some(caps) = function
                .decorators
                .iter()
                .find_map(|decorator| COMMAND_DECORATOR.captures(decorator))
            else {
                continue;
            };
            let command = caps
                .get(1)
                .map_or_else(|| function.name.replace('_', "-"), |m| m.as_str().to_string());
            examples.push(CodeExample::new(
                format!("{} command", command),
                "bash",
                format!("python {} {}", path, command),
            ));
        }
    }

    for record in records.iter().filter(|record| is_entry_point(record)) {
        let Ok(content) = std::fs::read_to_string(&record.absolute_path) else {
            continue;
        };
        let flags: Vec<&str> = ADD_ARGUMENT
            .captures_iter(&content)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect();
        if !flags.is_empty() {
            examples.push(CodeExample::new(
                format!("Command line usage of {}", record.name),
                "bash",
                format!("python {} {}", record.relative_path, flags.join(" ")),
            ));
        }
    }

    examples.truncate(EXAMPLE_LIMIT);
    examples
}

fn is_entry_point(record: &FileRecord) -> bool {
    let path = format!("/{}", record.relative_path);
    matches!(record.name.as_str(), "cli.py" | "main.py" | "__main__.py")
        || ["/bin/", "/script/", "/scripts/"]
            .iter()
            .any(|dir| path.contains(dir))
}

/// Excerpts of the first few readable, non-empty configuration files
pub fn config_examples(config_files: &[String], records: &[FileRecord]) -> Vec<CodeExample> {
    config_files
        .iter()
        .filter_map(|path| records.iter().find(|record| &record.relative_path == path))
        .filter_map(|record| {
            let content = std::fs::read_to_string(&record.absolute_path).ok()?;
            if content.trim().is_empty() {
                return None;
            }
            let mut excerpt: String = content.chars().take(CONFIG_EXAMPLE_LEN).collect();
            if excerpt.len() < content.len() {
                excerpt.push_str("\n...");
            }
            Some(CodeExample::new(
                format!("Configuration file: {}", record.name),
                fence_language(&record.relative_path),
                excerpt.trim_end().to_string(),
            ))
        })
        .take(EXAMPLE_LIMIT)
        .collect()
}

/// Bodies of the first test functions found in test files
pub fn test_examples(records: &[FileRecord]) -> Vec<CodeExample> {
    let mut examples = Vec::new();
    for record in records.iter().filter(|r| r.category == FileCategory::Test) {
        let Ok(content) = std::fs::read_to_string(&record.absolute_path) else {
            continue;
        };
        for caps in TEST_HEADER.captures_iter(&content) {
            let (Some(whole), Some(indent)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let header_start = content[..whole.start()].rfind('\n').map_or(0, |i| i + 1);
            let mut lines: Vec<&str> = content[header_start..].lines().collect();
            let body_len = lines
                .iter()
                .skip(1)
                .take_while(|line| {
                    line.trim().is_empty() || indent_of(line) > indent.as_str().len()
                })
                .count();
            // Keep the closing brace of brace-delimited languages
            let closing = lines
                .get(body_len + 1)
                .is_some_and(|line| line.trim_start().starts_with('}'));
            lines.truncate((body_len + 1 + usize::from(closing)).min(TEST_EXAMPLE_LINES));

            examples.push(CodeExample::new(
                format!("Test case: {}", &caps[2]),
                fence_language(&record.relative_path),
                dedent(&lines).trim_end().to_string(),
            ));
            if examples.len() == EXAMPLE_LIMIT {
                return examples;
            }
        }
    }
    examples
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn dedent(lines: &[&str]) -> String {
    let margin = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| indent_of(line))
        .min()
        .unwrap_or(0);
    let mut text = String::new();
    for line in lines {
        let _ = writeln!(text, "{}", line.get(margin..).unwrap_or("").trim_end());
    }
    text.trim_end().to_string()
}

/// Code fence language for a path, by extension
pub fn fence_language(path: &str) -> &'static str {
    let name = path.rsplit('/').next().unwrap_or(path);
    let extension = name.rsplit_once('.').map_or("", |(_, ext)| ext);
    match extension.to_lowercase().as_str() {
        "py" => "python",
        "rs" => "rust",
        "js" | "jsx" | "mjs" => "javascript",
        "ts" | "tsx" => "typescript",
        "go" => "go",
        "java" => "java",
        "kt" => "kotlin",
        "rb" => "ruby",
        "php" => "php",
        "cs" => "csharp",
        "json" => "json",
        "yml" | "yaml" => "yaml",
        "toml" => "toml",
        "ini" | "cfg" | "conf" => "ini",
        "env" | "sh" => "bash",
        "xml" => "xml",
        _ => "text",
    }
}
