//! Repository signals consulted by structure inference
//!
//! Framework keywords are matched against import lists and dependency
//! manifests rather than arbitrary file text, so a word like `click` in UI
//! code does not turn a web app into a CLI.

use crate::analysis::{AnalysisMap, ApiFact};
use crate::constants::planner::{
    CI_PATHS, CLI_FRAMEWORKS, COMPONENT_PATTERNS, CONTAINER_FILES, DATABASE_DRIVERS,
    MANIFEST_STACKS, SIGNAL_SAMPLE_BYTES, SIGNAL_SAMPLE_FILES, SOURCE_DIRECTORY_CODE_FILES,
    SOURCE_DIRECTORY_FILES, SOURCE_DIRECTORY_LIMIT, TEST_FRAMEWORKS, WEB_FRAMEWORKS,
};
use crate::scanner::{FileCategory, FileRecord};
use std::collections::BTreeMap;
use std::io::Read;

/// Presence signals for one repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositorySignals {
    pub has_web_framework: bool,
    pub has_cli: bool,
    pub has_tests: bool,
    pub has_database: bool,
    pub has_docker: bool,
    pub has_ci: bool,
    /// Web frameworks mentioned by imports or manifests
    pub frameworks: Vec<String>,
    /// Stacks implied by dependency manifests, e.g. `Python`
    pub stacks: Vec<String>,
    /// Busiest directories holding code, most important first
    pub source_directories: Vec<String>,
}

impl RepositorySignals {
    pub fn collect(records: &[FileRecord], analysis: &AnalysisMap) -> Self {
        let mut text = String::new();
        for facts in analysis.values() {
            for module in facts.imports.all() {
                text.push_str(module);
                text.push('\n');
            }
        }

        let mut stacks: Vec<String> = Vec::new();
        let manifests = records
            .iter()
            .filter(|record| MANIFEST_STACKS.iter().any(|(name, _)| *name == record.name))
            .take(SIGNAL_SAMPLE_FILES);
        for record in manifests {
            if let Some((_, stack)) = MANIFEST_STACKS.iter().find(|(name, _)| *name == record.name)
                && !stacks.iter().any(|s| s == stack)
            {
                stacks.push(stack.to_string());
            }
            if let Some(sample) = read_sample(record) {
                text.push_str(&sample);
                text.push('\n');
            }
        }
        let text = text.to_lowercase();

        let frameworks: Vec<String> = WEB_FRAMEWORKS
            .iter()
            .filter(|keyword| mentions(&text, keyword))
            .map(|keyword| keyword.to_string())
            .collect();

        Self {
            has_web_framework: !frameworks.is_empty(),
            has_cli: CLI_FRAMEWORKS.iter().any(|keyword| mentions(&text, keyword)),
            has_tests: records.iter().any(|r| r.category == FileCategory::Test)
                || TEST_FRAMEWORKS.iter().any(|keyword| mentions(&text, keyword)),
            has_database: DATABASE_DRIVERS.iter().any(|keyword| mentions(&text, keyword)),
            has_docker: records.iter().any(is_container_file),
            has_ci: records.iter().any(is_ci_file),
            frameworks,
            stacks,
            source_directories: source_directories(records),
        }
    }
}

/// Directories ranked by `2 * code files + files`, keeping only those with
/// more than a couple of code files or a handful of files of any kind
fn source_directories(records: &[FileRecord]) -> Vec<String> {
    let mut stats: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for record in records {
        let Some((dir, _)) = record.relative_path.rsplit_once('/') else {
            continue;
        };
        let entry = stats.entry(dir).or_default();
        entry.1 += 1;
        if record.category == FileCategory::Code {
            entry.0 += 1;
        }
    }

    let mut ranked: Vec<(usize, &str)> = stats
        .into_iter()
        .filter(|(_, (code, files))| {
            *code > SOURCE_DIRECTORY_CODE_FILES || *files > SOURCE_DIRECTORY_FILES
        })
        .map(|(dir, (code, files))| (code * 2 + files, dir))
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));

    ranked
        .into_iter()
        .take(SOURCE_DIRECTORY_LIMIT)
        .map(|(_, dir)| dir.to_string())
        .collect()
}

/// Classes grouped by component kind, plus route facts
#[derive(Debug, Clone, Default)]
pub struct ComponentSummary {
    /// Component kind to class names, e.g. `services` to `["UserService"]`
    pub kinds: BTreeMap<&'static str, Vec<String>>,
    pub api_endpoints: Vec<ApiFact>,
    pub total_classes: usize,
    pub total_functions: usize,
    /// Whether any class names a base type
    pub has_inheritance: bool,
}

impl ComponentSummary {
    pub fn collect(analysis: &AnalysisMap) -> Self {
        let mut summary = Self::default();

        for facts in analysis.values() {
            summary.total_classes += facts.classes.len();
            summary.total_functions += facts.functions.len();
            summary.api_endpoints.extend(facts.apis.iter().cloned());

            for class in &facts.classes {
                if !class.bases.is_empty() {
                    summary.has_inheritance = true;
                }
                if let Some(kind) = component_kind(&class.name) {
                    summary
                        .kinds
                        .entry(kind)
                        .or_default()
                        .push(class.name.clone());
                }
            }
        }
        summary
    }

    pub fn has_kind(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }
}

/// Component kind for a class name, by the first matching name fragment
pub fn component_kind(class_name: &str) -> Option<&'static str> {
    let name = class_name.to_lowercase();
    COMPONENT_PATTERNS
        .iter()
        .find(|(_, fragments)| fragments.iter().any(|fragment| name.contains(fragment)))
        .map(|(kind, _)| *kind)
}

/// Whether `keyword` appears in `text` delimited by non-identifier characters
pub fn mentions(text: &str, keyword: &str) -> bool {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    text.match_indices(keyword).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + keyword.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

fn is_container_file(record: &FileRecord) -> bool {
    CONTAINER_FILES.contains(&record.name.as_str())
        || record.name.to_lowercase().starts_with("dockerfile")
}

fn is_ci_file(record: &FileRecord) -> bool {
    CI_PATHS.iter().any(|path| {
        if path.ends_with('/') {
            record.relative_path.starts_with(path)
        } else {
            record.relative_path == *path
        }
    })
}

fn read_sample(record: &FileRecord) -> Option<String> {
    let file = std::fs::File::open(&record.absolute_path).ok()?;
    let mut bytes = Vec::new();
    file.take(SIGNAL_SAMPLE_BYTES as u64)
        .read_to_end(&mut bytes)
        .ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::facts::ImportScope;
    use crate::analysis::{ClassFact, StructuralFacts};
    use std::path::PathBuf;

    fn record(path: &str) -> FileRecord {
        FileRecord::new(PathBuf::from("/nonexistent").join(path), path, 100)
    }

    fn class(name: &str, bases: &[&str]) -> ClassFact {
        ClassFact {
            name: name.to_string(),
            bases: bases.iter().map(|b| b.to_string()).collect(),
            ..ClassFact::default()
        }
    }

    #[test]
    fn test_mentions_respects_word_boundaries() {
        assert!(mentions("import flask\n", "flask"));
        assert!(mentions("github.com/spf13/cobra", "cobra"));
        assert!(mentions("github.com/urfave/cli/v2", "urfave/cli"));
        assert!(!mentions("flasker", "flask"));
        assert!(!mentions("onclick", "click"));
    }

    #[test]
    fn test_component_kind() {
        assert_eq!(component_kind("UserService"), Some("services"));
        assert_eq!(component_kind("TaskManager"), Some("managers"));
        assert_eq!(component_kind("HttpClient"), Some("clients"));
        assert_eq!(component_kind("Plain"), None);
    }

    #[test]
    fn test_signals_from_imports_and_paths() {
        let mut facts = StructuralFacts::default();
        facts.imports.add("flask", ImportScope::ThirdParty);
        facts.imports.add("click", ImportScope::ThirdParty);
        facts.imports.add("sqlalchemy", ImportScope::ThirdParty);
        let mut analysis = AnalysisMap::new();
        analysis.insert("app.py".to_string(), facts);

        let records = vec![
            record("app.py"),
            record("Dockerfile"),
            record(".github/workflows/ci.yml"),
            record("requirements.txt"),
        ];
        let signals = RepositorySignals::collect(&records, &analysis);

        assert!(signals.has_web_framework);
        assert!(signals.has_cli);
        assert!(signals.has_database);
        assert!(signals.has_docker);
        assert!(signals.has_ci);
        assert!(!signals.has_tests);
        assert_eq!(signals.frameworks, vec!["flask"]);
        assert_eq!(signals.stacks, vec!["Python"]);
    }

    #[test]
    fn test_source_directories_ranked_by_code() {
        let mut records: Vec<FileRecord> = ["a.py", "b.py", "c.py", "d.py"]
            .iter()
            .map(|name| record(&format!("src/core/{}", name)))
            .collect();
        records.extend(["x.py", "y.py", "z.py"].iter().map(|n| record(&format!("lib/{}", n))));
        records.extend((0..6).map(|i| record(&format!("docs/page{}.md", i))));
        records.push(record("tools/one.py"));
        records.push(record("main.py"));

        let signals = RepositorySignals::collect(&records, &AnalysisMap::new());
        assert_eq!(signals.source_directories, vec!["src/core", "lib", "docs"]);
    }

    #[test]
    fn test_empty_repository_has_no_signals() {
        let signals = RepositorySignals::collect(&[], &AnalysisMap::new());
        assert_eq!(signals, RepositorySignals::default());
    }

    #[test]
    fn test_component_summary() {
        let facts = StructuralFacts {
            classes: vec![class("UserService", &["Base"]), class("Order", &[])],
            ..StructuralFacts::default()
        };
        let mut analysis = AnalysisMap::new();
        analysis.insert("svc.py".to_string(), facts);

        let summary = ComponentSummary::collect(&analysis);
        assert_eq!(summary.total_classes, 2);
        assert!(summary.has_inheritance);
        assert!(summary.has_kind("services"));
        assert!(!summary.has_kind("models"));
    }
}
