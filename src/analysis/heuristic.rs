//! Regex-driven analyzers for brace and keyword languages
//!
//! Each language family is described by a static [`FamilySpec`]: regular
//! expressions with named groups for functions, classes, fields, imports,
//! routes and configuration objects. One extraction routine runs every
//! family, so adding a language means adding a table, not code.
//!
//! Recognized group names:
//! - functions: `name`, `params`, `ret`, `async`, `mods`, `owner`
//! - classes: `name`, `kind`, `bases`, `bases2`, `ctor`
//! - fields: `name`, `names`
//! - imports: `module`, `names`, `local`, `block`
//! - routes: `method`, `path`, `handler`
//! - configs: `name`

use super::facts::{
    AnalyzerKind, ApiFact, ClassFact, ClassKind, ConfigFact, FunctionFact, ImportScope, LineIndex,
    StructuralFacts, split_bases, split_params,
};
use regex::{Captures, Regex, RegexBuilder};
use std::sync::LazyLock;

/// How a class body is delimited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyStyle {
    Braces,
    Parens,
    /// Runs until the next class declaration (keyword-terminated languages)
    UntilNextClass,
}

/// Static description of one language family
pub struct FamilySpec {
    pub language: &'static str,
    pub functions: &'static [&'static str],
    pub classes: &'static [(&'static str, ClassKind)],
    pub fields: &'static [&'static str],
    pub imports: &'static [&'static str],
    pub routes: &'static [&'static str],
    pub configs: &'static [&'static str],
    pub body: BodyStyle,
    pub classify: fn(&str) -> ImportScope,
    pub case_insensitive: bool,
}

/// A family with its expressions compiled
pub struct Family {
    pub spec: &'static FamilySpec,
    functions: Vec<Regex>,
    classes: Vec<(Regex, ClassKind)>,
    fields: Vec<Regex>,
    imports: Vec<Regex>,
    routes: Vec<Regex>,
    configs: Vec<Regex>,
}

impl Family {
    fn compile(spec: &'static FamilySpec) -> Self {
        let build = |source: &str| {
            RegexBuilder::new(source)
                .multi_line(true)
                .case_insensitive(spec.case_insensitive)
                .build()
                .expect("family patterns are valid")
        };
        let many = |sources: &[&str]| sources.iter().map(|s| build(s)).collect();

        Self {
            spec,
            functions: many(spec.functions),
            classes: spec
                .classes
                .iter()
                .map(|(source, kind)| (build(source), *kind))
                .collect(),
            fields: many(spec.fields),
            imports: many(spec.imports),
            routes: many(spec.routes),
            configs: many(spec.configs),
        }
    }
}

/// Names that look like declarations to a regex but are control flow
const KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "function", "else", "do", "try", "new",
    "typeof", "sizeof", "elif", "with", "match", "case", "when", "await", "yield", "throw",
    "delete", "in", "of", "not", "and", "or", "foreach", "using", "lock", "fixed", "synchronized",
];

/// Column names that are really table constraints
const SQL_CONSTRAINTS: &[&str] = &[
    "primary",
    "foreign",
    "constraint",
    "unique",
    "check",
    "index",
    "key",
];

static DOC_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:///|//!|//|#(?:\s|$))\s?(.*)$").expect("valid regex"));
static CTOR_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:(?:val|var)\s+)?(\w+)\s*:").expect("valid regex"));
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid regex"));
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("valid regex"));
static OBJECT_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*['"]?([A-Za-z_]\w*)['"]?\s*[:=]"#).expect("valid regex")
});

struct FunctionSite {
    offset: usize,
    owner: Option<String>,
    index: usize,
}

struct ClassSite {
    offset: usize,
    body: Option<(usize, usize)>,
    ctor: Option<String>,
}

/// Run a family over `content`
pub fn extract(family: &Family, language: &str, content: &str) -> StructuralFacts {
    let lines = LineIndex::new(content);
    let mut facts = StructuralFacts::new(language, AnalyzerKind::Heuristic);

    let sites = collect_functions(family, content, &lines, &mut facts);
    let class_sites = collect_classes(family, content, &lines, &mut facts);
    attach_members(family, content, &sites, &class_sites, &mut facts);
    collect_imports(family, content, &mut facts);
    collect_routes(family, content, &lines, &mut facts);
    collect_configs(family, content, &mut facts);

    facts.finish(content)
}

fn collect_functions(
    family: &Family,
    content: &str,
    lines: &LineIndex,
    facts: &mut StructuralFacts,
) -> Vec<FunctionSite> {
    let mut found: Vec<(FunctionFact, usize, Option<String>)> = Vec::new();

    for regex in &family.functions {
        for caps in regex.captures_iter(content) {
            let Some(raw_name) = caps.name("name") else {
                continue;
            };
            let mut name = raw_name.as_str().trim_matches('"').to_string();
            let mut owner = group(&caps, "owner");
            if let Some((scope, short)) = name.clone().rsplit_once("::") {
                owner = scope.rsplit("::").next().map(str::to_string);
                name = short.to_string();
            }
            if name.is_empty() || KEYWORDS.contains(&name.to_lowercase().as_str()) {
                continue;
            }

            let offset = raw_name.start();
            let line = lines.line_of(offset);
            if found.iter().any(|(f, _, _)| f.line == line && f.name == name) {
                continue;
            }

            let is_async = caps.name("async").is_some()
                || caps.name("mods").is_some_and(|m| {
                    m.as_str()
                        .split_whitespace()
                        .any(|w| w == "async" || w == "suspend")
                });
            let start = line_start(content, caps.get(0).map_or(offset, |m| m.start()));

            let fact = FunctionFact {
                name,
                line,
                is_async,
                params: group(&caps, "params")
                    .map(|p| split_params(&p))
                    .unwrap_or_default(),
                return_type: group(&caps, "ret"),
                decorators: Vec::new(),
                docstring: doc_comment_before(content, start),
                cyclomatic_complexity: None,
            };
            found.push((fact, offset, owner));
        }
    }

    // Several patterns may hit one file; keep source order
    found.sort_by_key(|(_, offset, _)| *offset);

    found
        .into_iter()
        .enumerate()
        .map(|(index, (fact, offset, owner))| {
            facts.functions.push(fact);
            FunctionSite {
                offset,
                owner,
                index,
            }
        })
        .collect()
}

fn collect_classes(
    family: &Family,
    content: &str,
    lines: &LineIndex,
    facts: &mut StructuralFacts,
) -> Vec<ClassSite> {
    let mut sites = Vec::new();

    for (regex, default_kind) in &family.classes {
        for caps in regex.captures_iter(content) {
            let (Some(whole), Some(name_match)) = (caps.get(0), caps.name("name")) else {
                continue;
            };
            let name = name_match.as_str().trim_matches('"').to_string();

            let kind = caps
                .name("kind")
                .map(|k| kind_from_keyword(k.as_str(), *default_kind))
                .unwrap_or(*default_kind);

            let mut bases = Vec::new();
            for field in ["bases", "bases2"] {
                if let Some(list) = group(&caps, field) {
                    bases.extend(
                        split_bases(&list.replace(" with ", ","))
                            .into_iter()
                            .map(|b| b.split('(').next().unwrap_or_default().trim().to_string())
                            .filter(|b| !b.is_empty()),
                    );
                }
            }

            let body = match family.spec.body {
                BodyStyle::Braces => delimited_block(content, whole.end(), '{', '}'),
                BodyStyle::Parens => delimited_block(content, whole.end(), '(', ')'),
                BodyStyle::UntilNextClass => Some((whole.end(), content.len())),
            };

            sites.push(ClassSite {
                offset: whole.start(),
                body,
                ctor: group(&caps, "ctor"),
            });
            let declaration = line_start(content, name_match.start());
            facts.classes.push(ClassFact {
                name,
                line: lines.line_of(name_match.start()),
                kind,
                bases,
                methods: Vec::new(),
                properties: Vec::new(),
                docstring: doc_comment_before(content, declaration),
            });
        }
    }

    if family.spec.body == BodyStyle::UntilNextClass {
        let mut starts: Vec<usize> = sites.iter().map(|s| s.offset).collect();
        starts.sort_unstable();
        for site in &mut sites {
            if let Some((body_start, _)) = site.body {
                let end = starts
                    .iter()
                    .copied()
                    .find(|&s| s > site.offset)
                    .unwrap_or(content.len());
                site.body = Some((body_start, end.max(body_start)));
            }
        }
    }

    sites
}

fn attach_members(
    family: &Family,
    content: &str,
    functions: &[FunctionSite],
    classes: &[ClassSite],
    facts: &mut StructuralFacts,
) {
    for (class_index, site) in classes.iter().enumerate() {
        let class_name = facts.classes[class_index].name.clone();

        let mut methods: Vec<String> = functions
            .iter()
            .filter(|f| match (&f.owner, site.body) {
                (Some(owner), _) => *owner == class_name,
                (None, Some((start, end))) => f.offset > start && f.offset < end,
                (None, None) => false,
            })
            .map(|f| facts.functions[f.index].name.clone())
            .collect();
        methods.dedup();

        let mut properties = Vec::new();
        if let Some(ctor) = &site.ctor {
            properties.extend(CTOR_PARAM.captures_iter(ctor).map(|c| c[1].to_string()));
        }
        if let Some((start, end)) = site.body {
            let body = &content[start..end];
            let top_level = match family.spec.body {
                BodyStyle::Braces => top_level_text(body, '{', '}'),
                BodyStyle::Parens => top_level_text(body, '(', ')'),
                BodyStyle::UntilNextClass => body.to_string(),
            };
            for regex in &family.fields {
                for caps in regex.captures_iter(&top_level) {
                    if let Some(name) = group(&caps, "name") {
                        properties.push(name.trim_matches('"').to_string());
                    }
                    if let Some(names) = group(&caps, "names") {
                        properties.extend(WORD.find_iter(&names).map(|m| m.as_str().to_string()));
                    }
                }
            }
        }

        let mut seen = Vec::new();
        properties.retain(|p| {
            let keep = !SQL_CONSTRAINTS.contains(&p.to_lowercase().as_str())
                && !KEYWORDS.contains(&p.as_str())
                && !seen.contains(p);
            if keep {
                seen.push(p.clone());
            }
            keep
        });

        let class = &mut facts.classes[class_index];
        class.methods = methods;
        class.properties = properties;

        if class.name.to_lowercase().contains("config") {
            facts.configs.push(ConfigFact {
                kind: kind_name(class.kind).to_string(),
                name: Some(class.name.clone()),
                attributes: class.properties.clone(),
            });
        }
    }
}

fn collect_imports(family: &Family, content: &str, facts: &mut StructuralFacts) {
    for regex in &family.imports {
        for caps in regex.captures_iter(content) {
            if let Some(module) = group(&caps, "module") {
                facts.imports.add(&module, (family.spec.classify)(&module));
                if let Some(names) = group(&caps, "names") {
                    facts.imports.add_from(&module, import_names(&names));
                }
            }
            if let Some(local) = group(&caps, "local") {
                facts.imports.add(&local, ImportScope::Local);
            }
            if let Some(block) = group(&caps, "block") {
                for quoted in QUOTED.captures_iter(&block) {
                    facts.imports.add(&quoted[1], (family.spec.classify)(&quoted[1]));
                }
            }
        }
    }
}

fn collect_routes(family: &Family, content: &str, lines: &LineIndex, facts: &mut StructuralFacts) {
    for regex in &family.routes {
        for caps in regex.captures_iter(content) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let line = lines.line_of(whole.start());

            let method = match group(&caps, "method").map(|m| m.to_uppercase()) {
                Some(m) if m == "REQUEST" => "ANY".to_string(),
                Some(m) => m,
                None => "ANY".to_string(),
            };
            let path = group(&caps, "path").unwrap_or_else(|| "/".to_string());

            // Attribute-style routes decorate the next declared function
            let decorated = facts
                .functions
                .iter()
                .find(|f| f.line >= line && f.line <= line + 3);

            let (function, docstring, params) = match group(&caps, "handler") {
                Some(handler) => (Some(handler), None, Vec::new()),
                None => match decorated {
                    Some(f) => (Some(f.name.clone()), f.docstring.clone(), f.params.clone()),
                    None => (None, None, Vec::new()),
                },
            };

            facts.apis.push(ApiFact {
                method,
                path,
                function,
                line,
                docstring,
                params,
            });
        }
    }
}

fn collect_configs(family: &Family, content: &str, facts: &mut StructuralFacts) {
    for regex in &family.configs {
        for caps in regex.captures_iter(content) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let attributes = delimited_block(content, whole.end(), '{', '}')
                .map(|(start, end)| {
                    let top = top_level_text(&content[start..end], '{', '}');
                    OBJECT_KEY
                        .captures_iter(&top)
                        .map(|c| c[1].to_string())
                        .collect()
                })
                .unwrap_or_default();

            facts.configs.push(ConfigFact {
                kind: "object".to_string(),
                name: group(&caps, "name"),
                attributes,
            });
        }
    }
}

fn line_start(content: &str, offset: usize) -> usize {
    content[..offset].rfind('\n').map_or(0, |i| i + 1)
}

fn group(caps: &Captures, name: &str) -> Option<String> {
    caps.name(name)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn import_names(names: &str) -> Vec<String> {
    names
        .replace(['{', '}', '(', ')'], ",")
        .split(',')
        .filter_map(|part| {
            let part = part.trim();
            let name = part.split(" as ").next().unwrap_or(part).trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

fn kind_from_keyword(keyword: &str, default: ClassKind) -> ClassKind {
    match keyword.to_lowercase().as_str() {
        "class" | "record" | "object" | "actor" => ClassKind::Class,
        "struct" => ClassKind::Struct,
        "interface" | "protocol" => ClassKind::Interface,
        "trait" => ClassKind::Trait,
        "enum" => ClassKind::Enum,
        "module" => ClassKind::Module,
        _ => default,
    }
}

pub(crate) fn kind_name(kind: ClassKind) -> &'static str {
    match kind {
        ClassKind::Class => "class",
        ClassKind::Struct => "struct",
        ClassKind::Interface => "interface",
        ClassKind::Trait => "trait",
        ClassKind::Enum => "enum",
        ClassKind::Module => "module",
        ClassKind::Table => "table",
        ClassKind::Selector => "selector",
    }
}

/// Inner range of the block opened at or just after `from`
///
/// The opener must end the match or follow it on the same line. An unclosed
/// block runs to the end of the content.
pub(crate) fn delimited_block(
    content: &str,
    from: usize,
    open: char,
    close: char,
) -> Option<(usize, usize)> {
    let before = content[..from].chars().next_back();
    let open_at = if before == Some(open) {
        from - open.len_utf8()
    } else {
        let rest = &content[from..];
        let line_end = rest.find('\n').unwrap_or(rest.len());
        from + rest[..line_end].find(open)?
    };

    let mut depth = 0usize;
    for (i, c) in content[open_at..].char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some((open_at + open.len_utf8(), open_at + i));
            }
        }
    }
    Some((open_at + open.len_utf8(), content.len()))
}

/// Text of `body` outside any nested block
pub(crate) fn top_level_text(body: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(body.len());
    let mut depth = 0usize;
    for c in body.chars() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.saturating_sub(1);
        } else if depth == 0 || c == '\n' {
            out.push(c);
        }
    }
    out
}

/// Doc comment immediately above `offset`: a `/** */` block or `///`/`#` lines
pub(crate) fn doc_comment_before(content: &str, offset: usize) -> Option<String> {
    let before = content[..offset].trim_end();

    if before.ends_with("*/") {
        let start = before.rfind("/**")?;
        // `/**/` overlaps its own opener and closer
        let body = before.get(start + 3..before.len() - 2)?;
        let text = body
            .lines()
            .map(|l| l.trim().trim_start_matches('*').trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        return (!text.is_empty()).then_some(text);
    }

    let mut docs = Vec::new();
    for line in before.lines().rev() {
        match DOC_LINE.captures(line) {
            Some(caps) => docs.push(caps[1].trim().to_string()),
            _ => break,
        }
    }
    docs.reverse();
    let text = docs.join("\n").trim().to_string();
    (!text.is_empty()).then_some(text)
}

// Import classifiers

const NODE_BUILTINS: &[&str] = &[
    "fs", "path", "http", "https", "url", "os", "crypto", "events", "stream", "util", "child_process",
    "assert", "buffer", "net", "zlib", "readline", "cluster", "dns", "querystring", "worker_threads",
];

const RUBY_STDLIB: &[&str] = &[
    "json", "set", "time", "date", "fileutils", "yaml", "net/http", "uri", "open3", "securerandom",
    "digest", "logger", "optparse", "csv", "erb", "socket", "pathname", "tempfile",
];

fn classify_js(module: &str) -> ImportScope {
    let root = module.split('/').next().unwrap_or(module);
    if module.starts_with('.') || module.starts_with('/') || module.starts_with("@/") {
        ImportScope::Local
    } else if module.starts_with("node:") || NODE_BUILTINS.contains(&root) {
        ImportScope::Standard
    } else {
        ImportScope::ThirdParty
    }
}

fn classify_go(module: &str) -> ImportScope {
    let root = module.split('/').next().unwrap_or(module);
    if module.starts_with('.') {
        ImportScope::Local
    } else if root.contains('.') {
        ImportScope::ThirdParty
    } else {
        ImportScope::Standard
    }
}

fn classify_jvm(module: &str) -> ImportScope {
    const STANDARD: &[&str] = &["java.", "javax.", "jdk.", "kotlin.", "scala."];
    if STANDARD.iter().any(|p| module.starts_with(p)) {
        ImportScope::Standard
    } else {
        ImportScope::ThirdParty
    }
}

fn classify_dotnet(module: &str) -> ImportScope {
    if module == "System" || module.starts_with("System.") || module.starts_with("Microsoft.") {
        ImportScope::Standard
    } else {
        ImportScope::ThirdParty
    }
}

fn classify_php(module: &str) -> ImportScope {
    if module.starts_with("App\\") {
        ImportScope::Local
    } else {
        ImportScope::ThirdParty
    }
}

fn classify_ruby(module: &str) -> ImportScope {
    if RUBY_STDLIB.contains(&module) {
        ImportScope::Standard
    } else {
        ImportScope::ThirdParty
    }
}

fn classify_swift(module: &str) -> ImportScope {
    const STANDARD: &[&str] = &["Foundation", "UIKit", "SwiftUI", "Combine", "Dispatch", "os", "AppKit"];
    if STANDARD.contains(&module) {
        ImportScope::Standard
    } else {
        ImportScope::ThirdParty
    }
}

fn classify_standard(_: &str) -> ImportScope {
    ImportScope::Standard
}

fn classify_local(_: &str) -> ImportScope {
    ImportScope::Local
}

fn classify_third_party(_: &str) -> ImportScope {
    ImportScope::ThirdParty
}

// Family tables

pub static JAVASCRIPT_SPEC: FamilySpec = FamilySpec {
    language: "JavaScript",
    functions: &[
        r"(?P<async>async\s+)?function\s*\*?\s*(?P<name>\w+)\s*\((?P<params>[^)]*)\)(?:\s*:\s*(?P<ret>[^{;]+?))?\s*\{",
        r"(?:const|let|var)\s+(?P<name>\w+)\s*(?::[^=\n]+)?=\s*(?P<async>async\s+)?\((?P<params>[^)]*)\)(?:\s*:\s*(?P<ret>[^=\n]+?))?\s*=>",
        r"(?:const|let|var)\s+(?P<name>\w+)\s*=\s*(?P<async>async\s+)?(?P<params>\w+)\s*=>",
        r"^[ \t]+(?:(?:public|private|protected|static|override|readonly)\s+)*(?P<async>async\s+)?(?P<name>\w+)\s*(?:<[^>(]*>)?\((?P<params>[^)]*)\)(?:\s*:\s*(?P<ret>[^{;]+?))?\s*\{",
    ],
    classes: &[
        (
            r"class\s+(?P<name>\w+)(?:\s*<[^>{]*>)?(?:\s+extends\s+(?P<bases>[\w.]+)(?:<[^>{]*>)?)?(?:\s+implements\s+(?P<bases2>[\w.,\s]+?))?\s*\{",
            ClassKind::Class,
        ),
        (
            r"interface\s+(?P<name>\w+)(?:\s*<[^>{]*>)?(?:\s+extends\s+(?P<bases>[^{]+?))?\s*\{",
            ClassKind::Interface,
        ),
    ],
    fields: &[
        r"^\s*(?:(?:public|private|protected|readonly|static|declare)\s+)*#?(?P<name>\w+)\s*[?!]?\s*(?::\s*[^;(\n]+|=[^;\n]*)[;,]?\s*$",
    ],
    imports: &[
        r#"import\s+(?:type\s+)?(?:(?P<names>[\w*\s{},$]+?)\s+from\s+)?['"](?P<module>[^'"]+)['"]"#,
        r#"require\(\s*['"](?P<module>[^'"]+)['"]\s*\)"#,
        r#"import\(\s*['"](?P<module>[^'"]+)['"]\s*\)"#,
    ],
    routes: &[
        r#"\b(?:app|router|server|api)\.(?P<method>get|post|put|delete|patch)\s*\(\s*['"`](?P<path>[^'"`]+)['"`]"#,
        r#"@(?P<method>Get|Post|Put|Delete|Patch)\(\s*(?:['"](?P<path>[^'"]*)['"])?\s*\)"#,
    ],
    configs: &[
        r"(?:export\s+)?(?:const|let|var)\s+(?P<name>\w*[Cc]onfig\w*)\s*(?::[^=\n]+)?=\s*\{",
    ],
    body: BodyStyle::Braces,
    classify: classify_js,
    case_insensitive: false,
};

pub static GO_SPEC: FamilySpec = FamilySpec {
    language: "Go",
    functions: &[
        r"^func\s+(?:\(\s*(?:\w+\s+)?\*?(?P<owner>\w+)(?:\[[^\]]*\])?\s*\)\s*)?(?P<name>\w+)\s*(?:\[[^\]]*\])?\((?P<params>[^)]*)\)\s*(?P<ret>[^{\n]*?)\s*\{",
    ],
    classes: &[
        (
            r"^type\s+(?P<name>\w+)(?:\[[^\]]*\])?\s+struct\s*\{",
            ClassKind::Struct,
        ),
        (
            r"^type\s+(?P<name>\w+)(?:\[[^\]]*\])?\s+interface\s*\{",
            ClassKind::Interface,
        ),
    ],
    fields: &[r"^\s*(?P<name>[A-Za-z_]\w*)\s+[\*\[\]\w.]+"],
    imports: &[
        r#"^import\s+(?:\w+\s+)?"(?P<module>[^"]+)""#,
        r"^import\s*\((?P<block>[^)]*)\)",
    ],
    routes: &[
        r#"\.(?P<method>GET|POST|PUT|DELETE|PATCH)\(\s*"(?P<path>[^"]+)"\s*(?:,\s*(?P<handler>[\w.]+))?"#,
        r#"HandleFunc\(\s*"(?P<path>[^"]+)"\s*,\s*(?P<handler>[\w.]+)"#,
    ],
    configs: &[],
    body: BodyStyle::Braces,
    classify: classify_go,
    case_insensitive: false,
};

pub static JAVA_SPEC: FamilySpec = FamilySpec {
    language: "Java",
    functions: &[
        r"^[ \t]*(?:(?:public|private|protected|static|final|abstract|synchronized|native|default)\s+)*(?:<[^>]+>\s+)?(?P<ret>[\w.]+(?:<[^>{;]*>)?(?:\[\])*)\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*(?:throws\s+[\w.,\s]+)?\{",
    ],
    classes: &[(
        r"(?:(?:public|private|protected|abstract|final|static|sealed)\s+)*(?P<kind>class|interface|enum|record)\s+(?P<name>\w+)(?:<[^{]*?>)?(?:\s*\([^)]*\))?(?:\s+extends\s+(?P<bases>[\w.<>, ]+?))?(?:\s+implements\s+(?P<bases2>[\w.<>, ]+?))?\s*\{",
        ClassKind::Class,
    )],
    fields: &[
        r"^\s*(?:(?:public|private|protected|static|final|transient|volatile)\s+)*[\w.]+(?:<[^>;]*>)?(?:\[\])*\s+(?P<name>\w+)\s*(?:=[^;]*)?;",
    ],
    imports: &[r"^import\s+(?:static\s+)?(?P<module>[\w.*]+)\s*;"],
    routes: &[
        r#"@(?P<method>Get|Post|Put|Delete|Patch|Request)Mapping\s*\(\s*(?:(?:value|path)\s*=\s*)?"(?P<path>[^"]*)""#,
    ],
    configs: &[],
    body: BodyStyle::Braces,
    classify: classify_jvm,
    case_insensitive: false,
};

pub static KOTLIN_SPEC: FamilySpec = FamilySpec {
    language: "Kotlin",
    functions: &[
        r"(?P<mods>(?:(?:public|private|protected|internal|override|open|suspend|inline|operator|infix|tailrec)\s+)*)fun\s+(?:<[^>]+>\s+)?(?:[\w.]+\.)?(?P<name>\w+)\s*\((?P<params>[^)]*)\)(?:\s*:\s*(?P<ret>[\w<>?,. ]+?))?\s*(?:[={]|$)",
    ],
    classes: &[(
        r"(?:(?:data|sealed|open|abstract|enum|inner|private|internal|public|annotation)\s+)*(?P<kind>class|interface|object)\s+(?P<name>\w+)(?:<[^>]*>)?(?:\s*(?:private\s+)?(?:constructor\s*)?\((?P<ctor>[^)]*)\))?(?:\s*:\s*(?P<bases>[^{\n]+?))?\s*(?:\{|$)",
        ClassKind::Class,
    )],
    fields: &[
        r"^\s*(?:(?:private|public|protected|internal|override|lateinit|const|open)\s+)*(?:val|var)\s+(?P<name>\w+)",
    ],
    imports: &[r"^import\s+(?P<module>[\w.*]+)"],
    routes: &[
        r#"@(?P<method>Get|Post|Put|Delete|Patch|Request)Mapping\s*\(\s*(?:(?:value|path)\s*=\s*)?"(?P<path>[^"]*)""#,
        r#"^\s*(?P<method>get|post|put|delete|patch)\s*\(\s*"(?P<path>[^"]+)"\s*\)\s*\{"#,
    ],
    configs: &[],
    body: BodyStyle::Braces,
    classify: classify_jvm,
    case_insensitive: false,
};

pub static SCALA_SPEC: FamilySpec = FamilySpec {
    language: "Scala",
    functions: &[
        r"def\s+(?P<name>\w+)\s*(?:\[[^\]]*\])?\s*(?:\((?P<params>[^)]*)\))?(?:\s*:\s*(?P<ret>[^={\n]+?))?\s*=",
    ],
    classes: &[(
        r"(?:case\s+|abstract\s+|sealed\s+|final\s+)*(?P<kind>class|trait|object)\s+(?P<name>\w+)(?:\[[^\]]*\])?(?:\((?P<ctor>[^)]*)\))?(?:\s+extends\s+(?P<bases>[\w.\[\]]+(?:\s+with\s+[\w.\[\]]+)*))?",
        ClassKind::Class,
    )],
    fields: &[r"^\s*(?:(?:private|protected|override|lazy)\s+)*(?:val|var)\s+(?P<name>\w+)"],
    imports: &[r"^import\s+(?P<module>[\w.]+)"],
    routes: &[],
    configs: &[],
    body: BodyStyle::Braces,
    classify: classify_jvm,
    case_insensitive: false,
};

pub static CSHARP_SPEC: FamilySpec = FamilySpec {
    language: "C#",
    functions: &[
        r"^[ \t]*(?P<mods>(?:(?:public|private|protected|internal|static|virtual|override|abstract|sealed|async|extern|new|partial)\s+)+)(?P<ret>[\w.]+(?:<[^>(]*>)?(?:\[\])?\??)\s+(?P<name>\w+)\s*(?:<[^>(]*>)?\((?P<params>[^)]*)\)\s*(?:where[^{]+)?(?:\{|=>)",
    ],
    classes: &[(
        r"(?:(?:public|private|protected|internal|static|abstract|sealed|partial)\s+)*(?P<kind>class|interface|struct|record|enum)\s+(?P<name>\w+)(?:<[^>]*>)?(?:\s*:\s*(?P<bases>[^{\n]+?))?\s*(?:where[^{]+)?\{",
        ClassKind::Class,
    )],
    fields: &[
        r"^\s*(?:(?:public|private|protected|internal|static|readonly|const|required)\s+)+[\w.]+(?:<[^>]*>)?(?:\[\])?\??\s+(?P<name>\w+)\s*(?:\{\s*get|=|;)",
    ],
    imports: &[r"^using\s+(?:static\s+)?(?P<module>[\w.]+)\s*;"],
    routes: &[
        r#"\[Http(?P<method>Get|Post|Put|Delete|Patch)(?:\(\s*"(?P<path>[^"]*)"\s*\))?\]"#,
        r#"\.Map(?P<method>Get|Post|Put|Delete|Patch)\(\s*"(?P<path>[^"]+)""#,
    ],
    configs: &[],
    body: BodyStyle::Braces,
    classify: classify_dotnet,
    case_insensitive: false,
};

pub static PHP_SPEC: FamilySpec = FamilySpec {
    language: "PHP",
    functions: &[
        r"(?:(?:public|private|protected|static|abstract|final)\s+)*function\s+&?(?P<name>\w+)\s*\((?P<params>[^)]*)\)(?:\s*:\s*(?P<ret>\??[\w\\|]+))?",
    ],
    classes: &[(
        r"(?:(?:abstract|final|readonly)\s+)*(?P<kind>class|interface|trait|enum)\s+(?P<name>\w+)(?:\s+extends\s+(?P<bases>[\w\\, ]+?))?(?:\s+implements\s+(?P<bases2>[\w\\, ]+?))?\s*\{",
        ClassKind::Class,
    )],
    fields: &[
        r"^\s*(?:(?:public|private|protected|static|readonly|var)\s+)+(?:\??[\w\\|]+\s+)?\$(?P<name>\w+)",
    ],
    imports: &[
        r"^use\s+(?P<module>[\w\\]+)",
        r#"(?:require|include)(?:_once)?\s*\(?\s*['"](?P<local>[^'"]+)['"]"#,
    ],
    routes: &[r#"Route::(?P<method>get|post|put|delete|patch)\(\s*['"](?P<path>[^'"]+)['"]"#],
    configs: &[],
    body: BodyStyle::Braces,
    classify: classify_php,
    case_insensitive: false,
};

pub static RUBY_SPEC: FamilySpec = FamilySpec {
    language: "Ruby",
    functions: &[r"^\s*def\s+(?:self\.)?(?P<name>\w+[?!=]?)(?:\s*\((?P<params>[^)]*)\))?"],
    classes: &[(
        r"^\s*(?P<kind>class|module)\s+(?P<name>[\w:]+)(?:\s*<\s*(?P<bases>[\w:]+))?",
        ClassKind::Class,
    )],
    fields: &[r"attr_(?:accessor|reader|writer)\s+(?P<names>[^\n]+)"],
    imports: &[
        r#"^\s*require\s+['"](?P<module>[^'"]+)['"]"#,
        r#"^\s*require_relative\s+['"](?P<local>[^'"]+)['"]"#,
    ],
    routes: &[r#"^\s*(?P<method>get|post|put|patch|delete)\s+['"](?P<path>[^'"]+)['"]"#],
    configs: &[],
    body: BodyStyle::UntilNextClass,
    classify: classify_ruby,
    case_insensitive: false,
};

pub static SWIFT_SPEC: FamilySpec = FamilySpec {
    language: "Swift",
    functions: &[
        r"(?:(?:public|private|internal|fileprivate|open|static|class|override|mutating|@\w+)\s+)*func\s+(?P<name>\w+)\s*(?:<[^>]+>)?\s*\((?P<params>[^)]*)\)\s*(?P<async>async\s+)?(?:throws\s+|rethrows\s+)?(?:->\s*(?P<ret>[^{\n]+?))?\s*\{",
    ],
    classes: &[(
        r"(?:(?:public|private|internal|final|open)\s+)*(?P<kind>class|struct|protocol|enum|actor)\s+(?P<name>\w+)(?:<[^>]*>)?(?:\s*:\s*(?P<bases>[^{\n]+?))?\s*\{",
        ClassKind::Class,
    )],
    fields: &[
        r"^\s*(?:(?:public|private|internal|static|lazy|weak|@\w+(?:\([^)]*\))?)\s+)*(?:let|var)\s+(?P<name>\w+)",
    ],
    imports: &[r"^import\s+(?P<module>\w+)"],
    routes: &[],
    configs: &[],
    body: BodyStyle::Braces,
    classify: classify_swift,
    case_insensitive: false,
};

pub static C_FAMILY_SPEC: FamilySpec = FamilySpec {
    language: "C/C++",
    functions: &[
        r"^(?:(?:static|inline|extern|virtual|constexpr|explicit)\s+)*(?P<ret>[\w:<>,]+(?:[ \t]+[\w:<>,]+)*)[ \t\*&]+(?P<name>[\w:~]+)\s*\((?P<params>[^;{)]*)\)\s*(?:const\s*)?(?:noexcept\s*)?(?:override\s*)?\{",
    ],
    classes: &[(
        r"(?P<kind>class|struct)\s+(?P<name>\w+)(?:\s+final)?(?:\s*:\s*(?P<bases>[^{;]+?))?\s*\{",
        ClassKind::Class,
    )],
    fields: &[
        r"^\s*(?:(?:static|const|mutable|unsigned|signed)\s+)*[\w:<>,]+[\s\*&]+(?P<name>\w+)\s*(?:\[[^\]]*\])?\s*(?:=[^;]*)?;",
    ],
    imports: &[
        r"^\s*#\s*include\s*<(?P<module>[^>]+)>",
        r#"^\s*#\s*include\s*"(?P<local>[^"]+)""#,
    ],
    routes: &[r#"CROW_ROUTE\(\s*\w+\s*,\s*"(?P<path>[^"]+)"\s*\)"#],
    configs: &[],
    body: BodyStyle::Braces,
    classify: classify_standard,
    case_insensitive: false,
};

pub static SHELL_SPEC: FamilySpec = FamilySpec {
    language: "Shell",
    functions: &[
        r"^\s*(?:function\s+)?(?P<name>[\w-]+)\s*\(\s*\)\s*\{",
        r"^\s*function\s+(?P<name>[\w-]+)\s*(?:\([^)]*\)\s*)?\{",
    ],
    classes: &[],
    fields: &[],
    imports: &[r"^\s*(?:source|\.)\s+(?P<local>[^\s;]+)"],
    routes: &[],
    configs: &[],
    body: BodyStyle::Braces,
    classify: classify_local,
    case_insensitive: false,
};

pub static SQL_SPEC: FamilySpec = FamilySpec {
    language: "SQL",
    functions: &[
        r#"create\s+(?:or\s+replace\s+)?(?:function|procedure)\s+(?P<name>[\w."]+)\s*\((?P<params>[^)]*)\)"#,
    ],
    classes: &[(
        r#"create\s+(?:temp(?:orary)?\s+)?table\s+(?:if\s+not\s+exists\s+)?(?P<name>[\w."]+)\s*\("#,
        ClassKind::Table,
    )],
    fields: &[r#"^\s*(?P<name>"?[A-Za-z_]\w*"?)\s+\w+"#],
    imports: &[],
    routes: &[],
    configs: &[],
    body: BodyStyle::Parens,
    classify: classify_local,
    case_insensitive: true,
};

pub static STYLESHEET_SPEC: FamilySpec = FamilySpec {
    language: "CSS",
    functions: &[
        r"@mixin\s+(?P<name>[\w-]+)(?:\s*\((?P<params>[^)]*)\))?",
        r"@function\s+(?P<name>[\w-]+)\s*\((?P<params>[^)]*)\)",
    ],
    classes: &[(r"\.(?P<name>-?[A-Za-z_][\w-]*)\s*\{", ClassKind::Selector)],
    fields: &[],
    imports: &[r#"@(?:import|use|forward)\s+['"](?P<local>[^'"]+)['"]"#],
    routes: &[],
    configs: &[],
    body: BodyStyle::Braces,
    classify: classify_local,
    case_insensitive: false,
};

/// Catch-all patterns for unrecognized extensions
pub static GENERIC_SPEC: FamilySpec = FamilySpec {
    language: "Unknown",
    functions: &[
        r"\bdef\s+(?P<name>\w+)",
        r"\bfunction\s+(?P<name>\w+)",
        r"\bfunc\s+(?P<name>\w+)",
        r"\bfn\s+(?P<name>\w+)",
    ],
    classes: &[
        (r"\bclass\s+(?P<name>\w+)", ClassKind::Class),
        (r"\bstruct\s+(?P<name>\w+)", ClassKind::Struct),
        (r"\binterface\s+(?P<name>\w+)", ClassKind::Interface),
    ],
    fields: &[],
    imports: &[
        r#"^\s*import\s+['"]?(?P<module>[\w./-]+)"#,
        r#"^\s*#\s*include\s*[<"](?P<module>[^>"]+)[>"]"#,
        r"^\s*using\s+(?P<module>[\w.]+)",
    ],
    routes: &[],
    configs: &[],
    body: BodyStyle::Braces,
    classify: classify_third_party,
    case_insensitive: false,
};

macro_rules! family {
    ($name:ident, $spec:ident) => {
        pub static $name: LazyLock<Family> = LazyLock::new(|| Family::compile(&$spec));
    };
}

family!(JAVASCRIPT, JAVASCRIPT_SPEC);
family!(GO, GO_SPEC);
family!(JAVA, JAVA_SPEC);
family!(KOTLIN, KOTLIN_SPEC);
family!(SCALA, SCALA_SPEC);
family!(CSHARP, CSHARP_SPEC);
family!(PHP, PHP_SPEC);
family!(RUBY, RUBY_SPEC);
family!(SWIFT, SWIFT_SPEC);
family!(C_FAMILY, C_FAMILY_SPEC);
family!(SHELL, SHELL_SPEC);
family!(SQL, SQL_SPEC);
family!(STYLESHEET, STYLESHEET_SPEC);
family!(GENERIC, GENERIC_SPEC);
