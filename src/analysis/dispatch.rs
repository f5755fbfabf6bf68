//! Extension-based analyzer dispatch
//!
//! Every extension maps to one [`LanguageFamily`]. A family analyzer that
//! cannot make sense of its input degrades to the generic analyzer, so
//! [`analyze`] only returns `None` for content that is not text.

use super::facts::StructuralFacts;
use super::generic::{self, DataFormat};
use super::heuristic::{self, Family};
use super::{python, rust_native};
use crate::scanner::category::extension_of;
use crate::scanner::summary::language_for_extension;
use std::sync::LazyLock;

/// Closed set of analyzers selected by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageFamily {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Vue,
    Go,
    Java,
    Kotlin,
    Scala,
    CSharp,
    Php,
    Ruby,
    Swift,
    C,
    Cpp,
    Shell,
    PowerShell,
    Sql,
    Stylesheet,
    Data(DataFormat),
}

const EXTENSIONS: &[(&str, LanguageFamily)] = &[
    (".rs", LanguageFamily::Rust),
    (".py", LanguageFamily::Python),
    (".pyi", LanguageFamily::Python),
    (".js", LanguageFamily::JavaScript),
    (".jsx", LanguageFamily::JavaScript),
    (".mjs", LanguageFamily::JavaScript),
    (".cjs", LanguageFamily::JavaScript),
    (".ts", LanguageFamily::TypeScript),
    (".tsx", LanguageFamily::TypeScript),
    (".vue", LanguageFamily::Vue),
    (".svelte", LanguageFamily::Vue),
    (".go", LanguageFamily::Go),
    (".java", LanguageFamily::Java),
    (".kt", LanguageFamily::Kotlin),
    (".kts", LanguageFamily::Kotlin),
    (".scala", LanguageFamily::Scala),
    (".cs", LanguageFamily::CSharp),
    (".php", LanguageFamily::Php),
    (".rb", LanguageFamily::Ruby),
    (".swift", LanguageFamily::Swift),
    (".c", LanguageFamily::C),
    (".h", LanguageFamily::C),
    (".cpp", LanguageFamily::Cpp),
    (".cc", LanguageFamily::Cpp),
    (".cxx", LanguageFamily::Cpp),
    (".hpp", LanguageFamily::Cpp),
    (".sh", LanguageFamily::Shell),
    (".bash", LanguageFamily::Shell),
    (".zsh", LanguageFamily::Shell),
    (".ps1", LanguageFamily::PowerShell),
    (".sql", LanguageFamily::Sql),
    (".css", LanguageFamily::Stylesheet),
    (".scss", LanguageFamily::Stylesheet),
    (".sass", LanguageFamily::Stylesheet),
    (".less", LanguageFamily::Stylesheet),
    (".json", LanguageFamily::Data(DataFormat::Json)),
    (".yaml", LanguageFamily::Data(DataFormat::Yaml)),
    (".yml", LanguageFamily::Data(DataFormat::Yaml)),
    (".toml", LanguageFamily::Data(DataFormat::Toml)),
    (".xml", LanguageFamily::Data(DataFormat::Xml)),
];

impl LanguageFamily {
    /// Look up the family for an extension such as `.py`
    pub fn for_extension(extension: &str) -> Option<Self> {
        let extension = extension.to_lowercase();
        EXTENSIONS
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, family)| *family)
    }

    /// Display name recorded on the facts
    pub fn language(&self) -> &'static str {
        match self {
            LanguageFamily::Rust => "Rust",
            LanguageFamily::Python => "Python",
            LanguageFamily::JavaScript => "JavaScript",
            LanguageFamily::TypeScript => "TypeScript",
            LanguageFamily::Vue => "Vue",
            LanguageFamily::Go => "Go",
            LanguageFamily::Java => "Java",
            LanguageFamily::Kotlin => "Kotlin",
            LanguageFamily::Scala => "Scala",
            LanguageFamily::CSharp => "C#",
            LanguageFamily::Php => "PHP",
            LanguageFamily::Ruby => "Ruby",
            LanguageFamily::Swift => "Swift",
            LanguageFamily::C => "C",
            LanguageFamily::Cpp => "C++",
            LanguageFamily::Shell => "Shell",
            LanguageFamily::PowerShell => "PowerShell",
            LanguageFamily::Sql => "SQL",
            LanguageFamily::Stylesheet => "CSS",
            LanguageFamily::Data(DataFormat::Json) => "JSON",
            LanguageFamily::Data(DataFormat::Yaml) => "YAML",
            LanguageFamily::Data(DataFormat::Toml) => "TOML",
            LanguageFamily::Data(DataFormat::Xml) => "XML",
        }
    }

    fn table(&self) -> Option<&'static LazyLock<Family>> {
        match self {
            LanguageFamily::JavaScript | LanguageFamily::TypeScript | LanguageFamily::Vue => {
                Some(&heuristic::JAVASCRIPT)
            }
            LanguageFamily::Go => Some(&heuristic::GO),
            LanguageFamily::Java => Some(&heuristic::JAVA),
            LanguageFamily::Kotlin => Some(&heuristic::KOTLIN),
            LanguageFamily::Scala => Some(&heuristic::SCALA),
            LanguageFamily::CSharp => Some(&heuristic::CSHARP),
            LanguageFamily::Php => Some(&heuristic::PHP),
            LanguageFamily::Ruby => Some(&heuristic::RUBY),
            LanguageFamily::Swift => Some(&heuristic::SWIFT),
            LanguageFamily::C | LanguageFamily::Cpp => Some(&heuristic::C_FAMILY),
            LanguageFamily::Shell | LanguageFamily::PowerShell => Some(&heuristic::SHELL),
            LanguageFamily::Sql => Some(&heuristic::SQL),
            LanguageFamily::Stylesheet => Some(&heuristic::STYLESHEET),
            LanguageFamily::Rust | LanguageFamily::Python | LanguageFamily::Data(_) => None,
        }
    }

    /// Run this family's analyzer; `None` means fall back to generic
    pub fn analyze(&self, content: &str) -> Option<StructuralFacts> {
        match self {
            LanguageFamily::Rust => rust_native::analyze(content),
            LanguageFamily::Python => Some(python::analyze(content)),
            LanguageFamily::Data(format) => generic::analyze_data(content, *format),
            family => family
                .table()
                .map(|table| heuristic::extract(table, family.language(), content)),
        }
    }
}

/// Analyze one file by its extension
///
/// Returns `None` only for binary content. Parse failures degrade to the
/// generic analyzer instead of surfacing.
pub fn analyze(path: &str, content: &str) -> Option<StructuralFacts> {
    if content.contains('\0') {
        return None;
    }

    let name = path.rsplit('/').next().unwrap_or(path);
    let extension = extension_of(name);

    let facts = match LanguageFamily::for_extension(&extension) {
        Some(family) => family.analyze(content).unwrap_or_else(|| {
            let mut facts = generic::analyze(content);
            facts.language = family.language().to_string();
            facts
        }),
        None => {
            let mut facts = generic::analyze(content);
            if let Some(language) = language_for_extension(&extension) {
                facts.language = language.to_string();
            }
            facts
        }
    };
    Some(facts)
}
