//! File categorization by name and extension

use crate::constants::scanner::{
    CODE_EXTENSIONS, CONFIG_EXTENSIONS, CONFIG_NAMES, DOC_EXTENSIONS, IMPORTANT_NAMES,
    TEST_MARKERS,
};
use serde::{Deserialize, Serialize};

/// Coarse role of a file inside a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Code,
    Config,
    Documentation,
    Test,
    Other,
}

impl FileCategory {
    /// Sort rank; lower ranks are processed first under a cap
    pub fn priority(self) -> u8 {
        match self {
            FileCategory::Code => 0,
            FileCategory::Config => 1,
            FileCategory::Documentation => 2,
            FileCategory::Test => 3,
            FileCategory::Other => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileCategory::Code => "code",
            FileCategory::Config => "config",
            FileCategory::Documentation => "documentation",
            FileCategory::Test => "test",
            FileCategory::Other => "other",
        }
    }

    pub const ALL: [FileCategory; 5] = [
        FileCategory::Code,
        FileCategory::Config,
        FileCategory::Documentation,
        FileCategory::Test,
        FileCategory::Other,
    ];
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Categorize a file from its base name and lowercase extension (with dot)
///
/// Test markers in the name win over the extension.
pub fn categorize(name: &str, extension: &str) -> FileCategory {
    let lower_name = name.to_lowercase();

    if TEST_MARKERS.iter().any(|marker| lower_name.contains(marker)) {
        FileCategory::Test
    } else if CODE_EXTENSIONS.contains(&extension) {
        FileCategory::Code
    } else if CONFIG_EXTENSIONS.contains(&extension) || CONFIG_NAMES.contains(&lower_name.as_str())
    {
        FileCategory::Config
    } else if DOC_EXTENSIONS.contains(&extension) {
        FileCategory::Documentation
    } else {
        FileCategory::Other
    }
}

/// Whether a file name is a well-known entry point or manifest
pub fn is_important(name: &str) -> bool {
    IMPORTANT_NAMES.contains(&name)
}

/// Lowercase extension including the leading dot, or empty
pub fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(0) | None => String::new(),
        Some(index) => name[index..].to_lowercase(),
    }
}
