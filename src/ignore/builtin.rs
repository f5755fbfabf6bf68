//! Fast built-in ignore check for common dependency, build and VCS paths

use crate::constants::ignore::{COMMON_DIRS, COMMON_FRAGMENTS, COMMON_SUFFIXES};

/// Whether a normalized relative path hits the built-in ignore list
pub fn is_common_ignored(path: &str) -> bool {
    if path.split('/').any(|component| COMMON_DIRS.contains(&component)) {
        return true;
    }

    let lower = path.to_lowercase();
    if COMMON_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix)) {
        return true;
    }

    COMMON_FRAGMENTS.iter().any(|fragment| path.contains(fragment))
}
