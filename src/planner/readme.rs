//! README built from repository metadata alone

use crate::scanner::{FileCategory, RepositoryMetadata};
use crate::utils::{thousands, title_case};
use std::fmt::Write;

/// Configuration files listed in the fallback README
const LISTED_CONFIG_FILES: usize = 10;

/// Deterministic README used until, or instead of, a generated one
pub fn fallback_readme(metadata: &RepositoryMetadata) -> String {
    let summary = &metadata.summary;
    let language = metadata.primary_language();

    let mut readme = format!(
        "# {name}\n\n\
         ## Repository Information\n\n\
         - **Primary Language**: {language}\n\
         - **Total Files**: {files}\n\
         - **Repository Size**: {size} bytes\n\
         - **Path**: {path}\n\n\
         ## Overview\n\n\
         This repository contains {count} files primarily written in {language}.\n\n\
         ## File Categories\n\n",
        name = metadata.name,
        language = language,
        files = thousands(summary.file_count as u64),
        size = thousands(summary.total_size),
        path = metadata.path.display(),
        count = summary.file_count,
    );

    for category in FileCategory::ALL {
        let count = summary.count(category);
        if count > 0 {
            let _ = writeln!(
                readme,
                "- **{}**: {} files",
                title_case(category.as_str()),
                count
            );
        }
    }

    readme.push_str("\n## Configuration Files\n\n");
    if metadata.config_files.is_empty() {
        readme.push_str("No configuration files detected.\n");
    } else {
        for file in metadata.config_files.iter().take(LISTED_CONFIG_FILES) {
            let _ = writeln!(readme, "- `{}`", file);
        }
    }

    if let Some(git) = &metadata.git {
        let _ = write!(
            readme,
            "\n## Version\n\n- **Branch**: {}\n- **Commit**: {}\n- **Author**: {}\n- **Date**: {}\n",
            git.branch,
            git.commit,
            git.author,
            git.committed_at.to_rfc3339()
        );
    }

    readme.push_str("\n---\n\n*Generated from repository metadata.*\n");
    readme
}
