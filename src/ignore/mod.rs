//! Ignore-pattern engine
//!
//! Rules are loaded once per repository scan from the repository's
//! `.gitignore`, `.git/info/exclude` and the user's global ignore file, then
//! shared read-only by the scanner and the analysis workers.
//!
//! Matching first consults a fast built-in list of dependency, build and VCS
//! paths. When no negation rule is loaded that answer is final. When negations
//! exist the built-in answer becomes the starting state and the rules are
//! evaluated in file order with the last match winning, so a negation can
//! re-include a path the built-in list would drop.

pub mod builtin;
pub mod rule;

pub use builtin::is_common_ignored;
pub use rule::IgnoreRule;

use crate::constants;
use crate::logging::Logger;
use std::path::{Path, PathBuf};

/// Outcome of evaluating one path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Hit by the built-in list and not overridden by any rule
    Builtin,
    /// The last matching rule ignores the path
    Ignored,
    /// The last matching rule is a negation
    Reincluded,
    /// Neither the built-in list nor any rule applies
    Unmatched,
}

impl Verdict {
    pub fn is_ignored(self) -> bool {
        matches!(self, Verdict::Builtin | Verdict::Ignored)
    }
}

/// Ignore rules for one repository root
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    root: PathBuf,
    rules: Vec<IgnoreRule>,
    has_negations: bool,
}

impl IgnoreMatcher {
    /// Load rules for `root` from the default ignore sources
    pub fn load(root: &Path) -> Self {
        Self::load_from(root, default_global_ignore_file().as_deref(), &Logger::default())
    }

    /// Load rules for `root`, using `global` as the global ignore file
    ///
    /// Missing files are skipped silently; unreadable ones are logged and skipped.
    pub fn load_from(root: &Path, global: Option<&Path>, logger: &Logger) -> Self {
        let scope = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());

        let mut sources = vec![
            root.join(constants::ignore::IGNORE_FILE),
            root.join(constants::ignore::EXCLUDE_FILE),
        ];
        if let Some(global) = global {
            sources.push(global.to_path_buf());
        }

        let mut rules = Vec::new();
        for source in sources {
            if !source.is_file() {
                continue;
            }
            match std::fs::read_to_string(&source) {
                Ok(content) => rules.extend(content.lines().filter_map(IgnoreRule::parse)),
                Err(e) => logger.warn(
                    &scope,
                    &format!("Skipping unreadable ignore file {}: {}", source.display(), e),
                ),
            }
        }

        Self::from_rules(root, rules)
    }

    /// Build a matcher from already parsed rules
    pub fn from_rules(root: &Path, rules: Vec<IgnoreRule>) -> Self {
        let has_negations = rules.iter().any(|rule| rule.is_negation);
        Self {
            root: root.to_path_buf(),
            rules,
            has_negations,
        }
    }

    /// Parse rules from ignore-file text
    pub fn from_patterns(root: &Path, patterns: &str) -> Self {
        Self::from_rules(root, patterns.lines().filter_map(IgnoreRule::parse).collect())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    /// Evaluate a repository-relative path
    pub fn verdict(&self, relative: &str, is_dir: bool) -> Verdict {
        let normalized = normalize(relative);
        if normalized.is_empty() {
            return Verdict::Unmatched;
        }

        let builtin = is_common_ignored(&normalized);
        if builtin && !self.has_negations {
            return Verdict::Builtin;
        }

        let components: Vec<&str> = normalized.split('/').collect();
        // Last match in file order wins
        let last_match = self
            .rules
            .iter()
            .rev()
            .find(|rule| rule.matches(&components, is_dir));

        match last_match {
            Some(rule) if rule.is_negation => Verdict::Reincluded,
            Some(_) => Verdict::Ignored,
            None if builtin => Verdict::Builtin,
            None => Verdict::Unmatched,
        }
    }

    /// Whether a repository-relative path is ignored
    pub fn is_ignored(&self, relative: &str, is_dir: bool) -> bool {
        self.verdict(relative, is_dir).is_ignored()
    }

    /// Whether an absolute path is ignored; paths outside the root always are
    pub fn is_ignored_path(&self, path: &Path, is_dir: bool) -> bool {
        match path.strip_prefix(&self.root) {
            Ok(relative) => self.is_ignored(&relative.to_string_lossy(), is_dir),
            Err(_) => true,
        }
    }

    /// Whether some negation rule names a path beneath `dir`
    pub fn may_reinclude_within(&self, dir: &str) -> bool {
        let dir = normalize(dir);
        self.rules
            .iter()
            .any(|rule| rule.is_negation && rule.targets_within(&dir))
    }
}

/// The global ignore file under the user's home directory, if HOME is set
pub fn default_global_ignore_file() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(constants::ignore::GLOBAL_IGNORE_FILE))
}

fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let trimmed = unified.trim_start_matches("./").trim_matches('/');
    trimmed.to_string()
}
