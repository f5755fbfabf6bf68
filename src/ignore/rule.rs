//! A single parsed ignore rule

use glob::{MatchOptions, Pattern};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// One line of an ignore file after parsing
///
/// A leading `!` marks negation, a trailing `/` restricts the rule to
/// directories and a leading `/` anchors it to the repository root.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    /// The line as written, without surrounding whitespace
    pub raw: String,
    /// Pattern body with the negation, anchor and directory markers removed
    pub body: String,
    pub is_negation: bool,
    pub is_directory_only: bool,
    pub is_root_anchored: bool,
    matcher: Pattern,
}

impl IgnoreRule {
    /// Parse one ignore-file line; blank lines and comments yield `None`
    pub fn parse(line: &str) -> Option<Self> {
        let raw = line.trim();
        if raw.is_empty() || raw.starts_with('#') {
            return None;
        }

        let mut body = raw;
        let is_negation = body.starts_with('!');
        if is_negation {
            body = &body[1..];
        }

        let is_directory_only = body.ends_with('/');
        if is_directory_only {
            body = body.trim_end_matches('/');
        }

        let is_root_anchored = body.starts_with('/');
        if is_root_anchored {
            body = body.trim_start_matches('/');
        }

        if body.is_empty() {
            return None;
        }

        // An invalid glob still matches itself literally
        let matcher = Pattern::new(body)
            .or_else(|_| Pattern::new(&Pattern::escape(body)))
            .ok()?;

        Some(Self {
            raw: raw.to_string(),
            body: body.to_string(),
            is_negation,
            is_directory_only,
            is_root_anchored,
            matcher,
        })
    }

    /// Whether this rule matches a repository-relative path split into components
    ///
    /// A rule matching a directory also matches everything beneath it, so each
    /// ancestor prefix of the path is tested. Directory-only rules skip the final
    /// component unless the path itself is a directory.
    pub fn matches(&self, components: &[&str], is_dir: bool) -> bool {
        let deepest = if self.is_directory_only && !is_dir {
            components.len().saturating_sub(1)
        } else {
            components.len()
        };

        (1..=deepest).any(|depth| self.matches_prefix(&components[..depth]))
    }

    fn matches_prefix(&self, components: &[&str]) -> bool {
        if self.is_root_anchored {
            return self.glob_matches(&components.join("/"));
        }

        // Bare names match at any depth: try every suffix, then every component
        (0..components.len()).any(|start| self.glob_matches(&components[start..].join("/")))
            || components.iter().any(|component| self.glob_matches(component))
    }

    fn glob_matches(&self, candidate: &str) -> bool {
        self.matcher.matches_with(candidate, MATCH_OPTIONS)
    }

    /// Whether this rule could select something strictly beneath `dir`
    ///
    /// Used to keep descending into directories that are excluded by default
    /// but contain a path named by a negation rule.
    pub fn targets_within(&self, dir: &str) -> bool {
        if !self.body.contains('/') {
            return false;
        }
        if self.body.starts_with("**/") {
            return true;
        }

        let prefix = format!("{}/", dir);
        if self.body.starts_with(&prefix) {
            return true;
        }
        if self.is_root_anchored {
            return false;
        }

        let name = dir.rsplit('/').next().unwrap_or(dir);
        let name_prefix = format!("{}/", name);
        self.body.starts_with(&name_prefix) || self.body.contains(&format!("/{}", name_prefix))
    }
}
