//! Prose for planned sections and the repository README

use super::{diagrams, examples};
use crate::analysis::{AnalysisMap, StructuralFacts};
use crate::config::{FeatureFlags, GenerationConfig};
use crate::constants::docs::{
    DIAGRAM_PLACEHOLDER, FILE_DOC_BATCH_SIZE, FILE_DOC_EXCERPT_LEN, FILE_DOC_LIMIT,
    FILE_DOC_MAX_OUTPUT, FILE_DOC_TEMPERATURE, FILE_DOCUMENTATION_SECTION, PROMPT_EXCERPT_LEN,
    PROMPT_FILE_LIMIT,
};
use crate::constants::fallback::{FILE_NOTICE, SECTION_NOTICE};
use crate::generation::TextGenerator;
use crate::logging::Logger;
use crate::planner::{DocumentationFolder, DocumentationSection, DocumentationStructure};
use crate::scanner::{FileCategory, FileRecord, RepositoryMetadata};
use crate::utils::{thousands, title_case};
use std::fmt::Write;
use std::sync::Arc;

/// How many pieces of prose were generated and how many fell back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub generated: usize,
    pub fallbacks: usize,
}

impl GenerationReport {
    fn record(&mut self, generated: bool) {
        if generated {
            self.generated += 1;
        } else {
            self.fallbacks += 1;
        }
    }
}

/// Placeholder written when a section's prose cannot be generated
pub fn section_fallback(section: &DocumentationSection) -> String {
    format!(
        "## {}\n\n{}\n\n{}",
        section.title, section.description, SECTION_NOTICE
    )
}

/// Whether a section is the per-file page rather than prose about a topic
pub fn is_file_documentation(folder: &DocumentationFolder, section: &DocumentationSection) -> bool {
    folder.name == "components" && section.name == FILE_DOCUMENTATION_SECTION
}

/// Fills a planned structure with generated prose
#[derive(Clone)]
pub struct ContentGenerator {
    generator: Arc<dyn TextGenerator>,
    config: GenerationConfig,
    features: FeatureFlags,
    logger: Logger,
}

impl ContentGenerator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        config: GenerationConfig,
        features: FeatureFlags,
        logger: Logger,
    ) -> Self {
        Self {
            generator,
            config,
            features,
            logger,
        }
    }

    /// Fill every section's `generated_content` and replace the README
    ///
    /// Each failure is logged and replaced by its fallback; the folder and
    /// section shape is left untouched. Diagrams and examples are attached
    /// to generated and fallback prose alike.
    pub async fn fill(
        &self,
        structure: &mut DocumentationStructure,
        metadata: &RepositoryMetadata,
        analysis: &AnalysisMap,
        records: &[FileRecord],
    ) -> GenerationReport {
        let mut report = GenerationReport::default();

        if self.features.generate_sections {
            let readme_prompt = readme_prompt(metadata, analysis, structure);
            match self.complete(&readme_prompt).await {
                Some(readme) => {
                    structure.readme_text = readme;
                    report.generated += 1;
                }
                None => {
                    self.logger
                        .warn(&metadata.name, "README generation failed, using fallback README");
                    report.fallbacks += 1;
                }
            }
        }

        for folder_index in 0..structure.folders.len() {
            for section_index in 0..structure.folders[folder_index].sections.len() {
                let (content, generated) = {
                    let folder = &structure.folders[folder_index];
                    let section = &folder.sections[section_index];
                    if is_file_documentation(folder, section) {
                        self.file_documentation(metadata, records).await
                    } else {
                        self.section_content(folder, section, metadata, analysis, records)
                            .await
                    }
                };
                report.record(generated);
                structure.folders[folder_index].sections[section_index].generated_content =
                    Some(content);
            }
        }

        report
    }

    /// Prose for one topic section plus its diagram and examples, and
    /// whether the prose came from the generator
    async fn section_content(
        &self,
        folder: &DocumentationFolder,
        section: &DocumentationSection,
        metadata: &RepositoryMetadata,
        analysis: &AnalysisMap,
        records: &[FileRecord],
    ) -> (String, bool) {
        let diagram = if self.features.include_diagrams {
            diagrams::for_section(folder, section, &metadata.name, analysis)
        } else {
            None
        };
        let examples = if self.features.include_examples {
            examples::for_section(folder, section, metadata, analysis, records)
        } else {
            None
        };

        let prose = if self.features.generate_sections {
            let mut prompt = section_prompt(section, folder, metadata, analysis, records);
            if diagram.is_some() {
                let _ = writeln!(
                    prompt,
                    "Leave a line containing only {} where a diagram of this topic belongs.",
                    DIAGRAM_PLACEHOLDER
                );
            }
            let prose = self.complete(&prompt).await;
            if prose.is_none() {
                self.logger.warn(
                    &metadata.name,
                    &format!("Content generation failed for section '{}'", section.name),
                );
            }
            prose
        } else {
            None
        };

        let generated = prose.is_some();
        let base = prose.unwrap_or_else(|| section_fallback(section));
        (attach(base, diagram, examples), generated)
    }

    /// The per-file page: files grouped by category and described a batch at
    /// a time, each failed batch replaced by fixed per-file text
    async fn file_documentation(
        &self,
        metadata: &RepositoryMetadata,
        records: &[FileRecord],
    ) -> (String, bool) {
        let files: Vec<&FileRecord> = records
            .iter()
            .filter(|record| record.category != FileCategory::Test)
            .take(FILE_DOC_LIMIT)
            .collect();

        let mut text = format!(
            "# File Documentation\n\n\
             Purpose, key components and dependencies of each file in the {name} repository.\n\n\
             ## Repository Overview\n\n\
             - **Primary Language**: {language}\n\
             - **Files Documented**: {count}\n\
             - **Repository Path**: {path}\n\n\
             ---\n",
            name = metadata.name,
            language = metadata.primary_language(),
            count = files.len(),
            path = metadata.path.display(),
        );

        let mut complete = true;
        for category in FileCategory::ALL {
            let group: Vec<&FileRecord> = files
                .iter()
                .copied()
                .filter(|record| record.category == category)
                .collect();
            if group.is_empty() {
                continue;
            }
            let _ = write!(
                text,
                "\n## {} Files ({} {})\n\n",
                title_case(category.as_str()),
                group.len(),
                if group.len() == 1 { "file" } else { "files" }
            );

            for batch in group.chunks(FILE_DOC_BATCH_SIZE) {
                let described = if self.features.generate_sections {
                    let prompt = file_batch_prompt(batch, category, &metadata.name);
                    self.complete_with(&prompt, FILE_DOC_TEMPERATURE, FILE_DOC_MAX_OUTPUT)
                        .await
                } else {
                    None
                };
                match described {
                    Some(docs) => text.push_str(&docs),
                    None => {
                        if self.features.generate_sections {
                            self.logger.warn(
                                &metadata.name,
                                &format!(
                                    "File documentation failed for {} {} files",
                                    batch.len(),
                                    category
                                ),
                            );
                        }
                        complete = false;
                        text.push_str(&file_batch_fallback(batch));
                    }
                }
                text.push_str("\n\n");
            }
        }

        (format!("{}\n", text.trim_end()), complete)
    }

    async fn complete(&self, prompt: &str) -> Option<String> {
        self.complete_with(prompt, self.config.temperature, self.config.max_output)
            .await
    }

    async fn complete_with(&self, prompt: &str, temperature: f32, max_output: u32) -> Option<String> {
        match self
            .generator
            .generate(prompt, temperature, max_output)
            .await
        {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => None,
            Err(error) => {
                self.logger.warn("generation", &error.to_string());
                None
            }
        }
    }
}

/// Place a diagram at the placeholder or under the first heading, then
/// append examples
pub fn attach(content: String, diagram: Option<String>, examples: Option<String>) -> String {
    let mut content = match diagram {
        Some(diagram) if content.contains(DIAGRAM_PLACEHOLDER) => {
            content.replacen(DIAGRAM_PLACEHOLDER, &diagram, 1)
        }
        Some(diagram) => {
            let lines: Vec<&str> = content.lines().collect();
            match lines.iter().position(|line| line.starts_with('#')) {
                Some(heading) => {
                    let head = lines[..=heading].join("\n");
                    let tail = lines[heading + 1..].join("\n");
                    let tail = tail.trim_start_matches('\n');
                    if tail.is_empty() {
                        format!("{}\n\n{}", head, diagram)
                    } else {
                        format!("{}\n\n{}\n\n{}", head, diagram, tail)
                    }
                }
                None => format!("{}\n\n{}", diagram, content),
            }
        }
        None => content,
    };
    // A placeholder with no diagram for it, or left over after the first
    content = content
        .lines()
        .filter(|line| line.trim() != DIAGRAM_PLACEHOLDER)
        .collect::<Vec<_>>()
        .join("\n");

    match examples {
        Some(examples) => format!("{}\n\n{}", content.trim_end(), examples),
        None => content,
    }
}

fn readme_prompt(
    metadata: &RepositoryMetadata,
    analysis: &AnalysisMap,
    structure: &DocumentationStructure,
) -> String {
    let mut prompt = format!(
        "You are a technical documentation expert. Write a concise, user-focused README.md \
         for the repository {name}.\n\n\
         Primary language: {language}\n\
         Total files: {files}\n\
         Configuration files: {configs}\n",
        name = metadata.name,
        language = metadata.primary_language(),
        files = metadata.summary.file_count,
        configs = metadata
            .config_files
            .iter()
            .take(3)
            .cloned()
            .collect::<Vec<_>>()
            .join(", "),
    );

    let endpoints: Vec<String> = analysis
        .values()
        .flat_map(|facts| facts.apis.iter())
        .take(10)
        .map(|api| format!("{} {}", api.method, api.path))
        .collect();
    if !endpoints.is_empty() {
        let _ = writeln!(prompt, "API endpoints: {}", endpoints.join(", "));
    }

    let folders: Vec<&str> = structure.folders.iter().map(|f| f.name.as_str()).collect();
    let _ = write!(
        prompt,
        "\nInclude: a one or two sentence description, key features, installation, a quick start \
         example and configuration. Link to the {} folders for details. Keep it under 100 lines \
         of markdown.\n",
        folders.join("/, ")
    );
    prompt
}

fn section_prompt(
    section: &DocumentationSection,
    folder: &DocumentationFolder,
    metadata: &RepositoryMetadata,
    analysis: &AnalysisMap,
    records: &[FileRecord],
) -> String {
    let mut prompt = format!(
        "You are a technical documentation expert. Write the documentation section below.\n\n\
         Repository: {repo}\n\
         Primary language: {language}\n\
         Folder: {folder}\n\
         Section: {title}\n\
         Description: {description}\n\n\
         Relevant files:\n",
        repo = metadata.name,
        language = metadata.primary_language(),
        folder = folder.title,
        title = section.title,
        description = section.description,
    );

    for (path, facts) in relevant_files(section, folder, analysis) {
        let _ = writeln!(prompt, "\n### {}\n{}", path, describe_facts(facts));
        if let Some(excerpt) = records
            .iter()
            .find(|record| record.relative_path == path)
            .and_then(|record| read_excerpt(record, PROMPT_EXCERPT_LEN))
        {
            let _ = writeln!(prompt, "```\n{}\n```", excerpt);
        }
    }

    prompt.push_str(
        "\nFocus only on this section's topic. Write markdown starting with a `##` heading, \
         under 800 words, with code examples where they help.\n",
    );
    prompt
}

/// Files whose path or class names mention the section or folder name,
/// falling back to the first analyzed files
fn relevant_files<'a>(
    section: &DocumentationSection,
    folder: &DocumentationFolder,
    analysis: &'a AnalysisMap,
) -> Vec<(&'a str, &'a StructuralFacts)> {
    let keywords: Vec<String> = [section.name.as_str(), folder.name.as_str()]
        .iter()
        .flat_map(|name| name.split('-'))
        .map(|word| word.trim_end_matches('s').to_lowercase())
        .filter(|word| word.len() > 2)
        .collect();

    let matches = |path: &str, facts: &StructuralFacts| {
        let path = path.to_lowercase();
        keywords.iter().any(|keyword| {
            path.contains(keyword.as_str())
                || facts
                    .classes
                    .iter()
                    .any(|class| class.name.to_lowercase().contains(keyword.as_str()))
        })
    };

    let mut files: Vec<(&str, &StructuralFacts)> = analysis
        .iter()
        .filter(|(path, facts)| matches(path, facts))
        .map(|(path, facts)| (path.as_str(), facts))
        .take(PROMPT_FILE_LIMIT)
        .collect();

    if files.is_empty() {
        files = analysis
            .iter()
            .take(PROMPT_FILE_LIMIT)
            .map(|(path, facts)| (path.as_str(), facts))
            .collect();
    }
    files
}

fn describe_facts(facts: &StructuralFacts) -> String {
    let mut lines = vec![format!("Language: {}", facts.language)];
    if !facts.classes.is_empty() {
        let names: Vec<&str> = facts.classes.iter().map(|c| c.name.as_str()).collect();
        lines.push(format!("Types: {}", names.join(", ")));
    }
    if !facts.functions.is_empty() {
        let names: Vec<&str> = facts.functions.iter().take(20).map(|f| f.name.as_str()).collect();
        lines.push(format!("Functions: {}", names.join(", ")));
    }
    if !facts.apis.is_empty() {
        let routes: Vec<String> = facts
            .apis
            .iter()
            .map(|api| format!("{} {}", api.method, api.path))
            .collect();
        lines.push(format!("Routes: {}", routes.join(", ")));
    }
    lines.join("\n")
}

/// At most `limit` characters of a file, with `...` when cut short
fn read_excerpt(record: &FileRecord, limit: usize) -> Option<String> {
    let bytes = std::fs::read(&record.absolute_path).ok()?;
    let text = String::from_utf8_lossy(&bytes);
    let mut excerpt: String = text.chars().take(limit).collect();
    if excerpt.len() < text.len() {
        excerpt.push_str("...");
    }
    Some(excerpt)
}

fn file_batch_prompt(batch: &[&FileRecord], category: FileCategory, repo_name: &str) -> String {
    let mut prompt = format!(
        "You are a technical documentation expert. Analyze these {category} files and document \
         each of them.\n\n\
         Repository: {repo_name}\n\
         File category: {category}\n\n\
         Files to analyze:\n\n"
    );

    for record in batch {
        let _ = write!(
            prompt,
            "### {}\n- **Size**: {} bytes\n- **Extension**: {}\n- **Category**: {}\n\n",
            record.relative_path,
            thousands(record.size),
            record.extension,
            record.category
        );
        if let Some(excerpt) = read_excerpt(record, FILE_DOC_EXCERPT_LEN) {
            let _ = write!(
                prompt,
                "**Content preview:**\n```{}\n{}\n```\n\n",
                record.extension.trim_start_matches('.'),
                excerpt
            );
        }
        prompt.push_str("---\n\n");
    }

    prompt.push_str(
        "For each file give its purpose and role, its key components, what it depends on, \
         how the rest of the system uses it, and notable implementation details. Write each \
         file as a `###` markdown subsection headed by its path. Be detailed but concise.\n",
    );
    prompt
}

/// Fixed per-file text used when a batch cannot be described
fn file_batch_fallback(batch: &[&FileRecord]) -> String {
    let mut text = String::new();
    for record in batch {
        let extension = if record.extension.is_empty() {
            "no extension"
        } else {
            record.extension.as_str()
        };
        let _ = write!(
            text,
            "### {}\n\n**Type**: {} file ({})\n**Size**: {} bytes\n\n{}\n\n---\n\n",
            record.relative_path,
            title_case(record.category.as_str()),
            extension,
            thousands(record.size),
            FILE_NOTICE
        );
    }
    text.trim_end().to_string()
}
