//! Fallback analyzers: keyword patterns for unknown languages and key
//! extraction for data files

use super::facts::{AnalyzerKind, ConfigFact, ImportScope, StructuralFacts};
use super::heuristic::{self, GENERIC};
use regex::Regex;
use std::sync::LazyLock;

const CONFIG_HINTS: &[&str] = &["config", "setting", "option", "parameter"];

static YAML_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^["']?([A-Za-z_][\w.-]*)["']?[ \t]*:"#).expect("valid regex")
});
static TOML_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\[+([^\]]+)\]+").expect("valid regex"));
static TOML_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([A-Za-z_][\w-]*)[ \t]*=").expect("valid regex"));
static XML_ROOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([A-Za-z_][\w:.-]*)[\s>/]").expect("valid regex"));

/// Keyword-pattern analysis for content no dedicated analyzer understands
///
/// Text mentioning configuration vocabulary is also reported as an
/// anonymous config block.
pub fn analyze(content: &str) -> StructuralFacts {
    let mut facts = heuristic::extract(&GENERIC, "Unknown", content);
    facts.analyzer = AnalyzerKind::Generic;

    let lowered = content.to_lowercase();
    if CONFIG_HINTS.iter().any(|hint| lowered.contains(hint)) {
        facts.configs.push(ConfigFact {
            kind: "generic".to_string(),
            name: None,
            attributes: Vec::new(),
        });
    }
    facts
}

/// Which data format a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Yaml,
    Toml,
    Xml,
}

impl DataFormat {
    fn as_str(&self) -> &'static str {
        match self {
            DataFormat::Json => "json",
            DataFormat::Yaml => "yaml",
            DataFormat::Toml => "toml",
            DataFormat::Xml => "xml",
        }
    }

    fn language(&self) -> &'static str {
        match self {
            DataFormat::Json => "JSON",
            DataFormat::Yaml => "YAML",
            DataFormat::Toml => "TOML",
            DataFormat::Xml => "XML",
        }
    }
}

/// Report the top-level keys of a data file as one config block
///
/// `None` when the file does not parse as its format, so the caller can
/// fall back to [`analyze`].
pub fn analyze_data(content: &str, format: DataFormat) -> Option<StructuralFacts> {
    let mut facts = StructuralFacts::new(format.language(), AnalyzerKind::Heuristic);

    let keys: Vec<String> = match format {
        DataFormat::Json => {
            let value: serde_json::Value = serde_json::from_str(content).ok()?;
            if let Some(object) = value.as_object() {
                for section in ["dependencies", "devDependencies", "peerDependencies"] {
                    if let Some(deps) = object.get(section).and_then(|d| d.as_object()) {
                        for name in deps.keys() {
                            facts.imports.add(name, ImportScope::ThirdParty);
                        }
                    }
                }
                object.keys().cloned().collect()
            } else {
                Vec::new()
            }
        }
        DataFormat::Yaml => {
            serde_yaml::from_str::<serde_yaml::Value>(content).ok()?;
            YAML_KEY
                .captures_iter(content)
                .map(|c| c[1].to_string())
                .collect()
        }
        DataFormat::Toml => {
            let tables = TOML_TABLE.captures_iter(content).map(|c| c[1].trim().to_string());
            let keys = TOML_KEY.captures_iter(content).map(|c| c[1].to_string());
            tables.chain(keys).collect()
        }
        DataFormat::Xml => XML_ROOT
            .captures_iter(content)
            .map(|c| c[1].to_string())
            .filter(|tag| !tag.starts_with("xml"))
            .take(1)
            .collect(),
    };

    let mut attributes: Vec<String> = Vec::new();
    for key in keys {
        if !attributes.contains(&key) {
            attributes.push(key);
        }
    }

    facts.configs.push(ConfigFact {
        kind: format.as_str().to_string(),
        name: None,
        attributes,
    });
    Some(facts.finish(content))
}
