//! String sanitization for generated file and directory names

use crate::constants::docs::MAX_NAME_LEN;

/// Sanitize a repository or folder name for use as a directory name
///
/// Replaces filesystem-unsafe characters with underscores and limits the length.
/// Preserves alphanumeric characters, hyphens, underscores and dots.
pub fn sanitize_for_filename(input: &str) -> String {
    let sanitized: String = input
        .trim()
        .chars()
        .map(|c| match c {
            c if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' => c,
            _ => '_',
        })
        .take(MAX_NAME_LEN)
        .collect();

    match sanitized.trim_matches('.') {
        "" => "untitled".to_string(),
        _ => sanitized,
    }
}

/// Lowercase kebab-case identifier for folder and section names
///
/// Runs of anything that is not ASCII alphanumeric collapse into one hyphen.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    let slug: String = out.trim_end_matches('-').chars().take(MAX_NAME_LEN).collect();
    slug.trim_end_matches('-').to_string()
}
