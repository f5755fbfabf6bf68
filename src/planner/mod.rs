//! Documentation structure planning
//!
//! [`StructurePlanner::plan`] tries three tiers in order: pattern-based
//! inference, an outline requested from the text generator, and a fixed
//! default outline. The last tier cannot fail, so a plan always has folders.

pub mod inference;
pub mod outline;
pub mod readme;
pub mod signals;
pub mod structure;

pub use readme::fallback_readme;
pub use signals::{ComponentSummary, RepositorySignals};
pub use structure::{DocumentationFolder, DocumentationSection, DocumentationStructure, PlanOrigin};

use crate::analysis::AnalysisMap;
use crate::config::FeatureFlags;
use crate::constants;
use crate::error::IndexError;
use crate::generation::TextGenerator;
use crate::logging::Logger;
use crate::scanner::{FileRecord, RepositoryMetadata};
use std::sync::Arc;
use thiserror::Error;

/// Why a planning tier produced nothing usable
#[derive(Debug, Clone, Error)]
pub enum PlanningError {
    #[error("structure inference is disabled")]
    Disabled,

    /// The planned outline could not be laid out
    #[error("invalid outline: {0}")]
    Invalid(String),

    /// The generated outline was unavailable or unusable
    #[error("generated outline rejected: {0}")]
    Outline(String),
}

impl From<PlanningError> for IndexError {
    fn from(error: PlanningError) -> Self {
        IndexError::Planning(error.to_string())
    }
}

/// Plans the folder and section shape of a repository's documentation
#[derive(Clone)]
pub struct StructurePlanner {
    generator: Arc<dyn TextGenerator>,
    features: FeatureFlags,
    logger: Logger,
}

impl StructurePlanner {
    pub fn new(generator: Arc<dyn TextGenerator>, features: FeatureFlags, logger: Logger) -> Self {
        Self {
            generator,
            features,
            logger,
        }
    }

    /// Plan documentation for one repository; never returns zero folders
    ///
    /// The README text is the metadata-derived fallback; prose generation
    /// may replace it later. Repositories with analyzed files also get the
    /// per-file page under `components`.
    pub async fn plan(
        &self,
        metadata: &RepositoryMetadata,
        analysis: &AnalysisMap,
        records: &[FileRecord],
    ) -> DocumentationStructure {
        let scope = metadata.name.as_str();
        let components = ComponentSummary::collect(analysis);
        let readme_text = fallback_readme(metadata);

        let inferred = if self.features.intelligent_structure {
            let signals = RepositorySignals::collect(records, analysis);
            inference::infer_folders(&signals, &components)
        } else {
            Err(PlanningError::Disabled)
        };

        let (folders, origin) = match inferred {
            Ok(folders) => (folders, PlanOrigin::Inferred),
            Err(error) => {
                self.logger.warn(
                    scope,
                    &format!("{}, requesting a generated outline", IndexError::from(error)),
                );
                match self.generated_outline(metadata, &components).await {
                    Ok(folders) => (folders, PlanOrigin::Generated),
                    Err(error) => {
                        self.logger.warn(
                            scope,
                            &format!("{}, using the default outline", IndexError::from(error)),
                        );
                        let has_api = !components.api_endpoints.is_empty();
                        (outline::default_outline(has_api), PlanOrigin::Default)
                    }
                }
            }
        };

        let mut structure = DocumentationStructure {
            readme_text,
            folders,
            origin,
        };
        if !analysis.is_empty() {
            structure.add_file_documentation();
        }
        structure
    }

    async fn generated_outline(
        &self,
        metadata: &RepositoryMetadata,
        components: &ComponentSummary,
    ) -> Result<Vec<DocumentationFolder>, PlanningError> {
        let prompt = outline::outline_prompt(metadata, components);
        let response = self
            .generator
            .generate(&prompt, 0.0, constants::generation::OUTLINE_MAX_OUTPUT)
            .await
            .map_err(|e| PlanningError::Outline(e.to_string()))?;
        outline::parse_outline(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{DisabledGenerator, GenerationError};
    use crate::scanner::RepositorySummary;
    use async_trait::async_trait;

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            temperature: f32,
            _max_output: u32,
        ) -> Result<String, GenerationError> {
            assert_eq!(temperature, 0.0);
            Ok(self.0.to_string())
        }
    }

    fn empty_metadata() -> RepositoryMetadata {
        RepositoryMetadata::new("empty", "/empty", &[], RepositorySummary::default(), None)
    }

    fn planner(generator: Arc<dyn TextGenerator>, intelligent: bool) -> StructurePlanner {
        let features = FeatureFlags {
            intelligent_structure: intelligent,
            ..FeatureFlags::default()
        };
        StructurePlanner::new(generator, features, Logger::quiet())
    }

    #[tokio::test]
    async fn test_inference_tier() {
        let structure = planner(Arc::new(DisabledGenerator), true)
            .plan(&empty_metadata(), &AnalysisMap::new(), &[])
            .await;

        assert_eq!(structure.origin, PlanOrigin::Inferred);
        assert!(structure.folder("architecture").is_some());
        assert!(structure.folder("development").is_some());
        assert!(structure.readme_text.starts_with("# empty"));
    }

    #[tokio::test]
    async fn test_generated_tier() {
        let outline = r#"{"folders":[{"name":"guide","title":"Guide","description":"d",
            "sections":[{"name":"intro","title":"Intro","description":"d"}]}]}"#;
        let structure = planner(Arc::new(FixedGenerator(outline)), false)
            .plan(&empty_metadata(), &AnalysisMap::new(), &[])
            .await;

        assert_eq!(structure.origin, PlanOrigin::Generated);
        assert_eq!(structure.folders[0].name, "guide");
    }

    #[tokio::test]
    async fn test_default_tier_on_unparseable_outline() {
        let structure = planner(Arc::new(FixedGenerator("I cannot help with that")), false)
            .plan(&empty_metadata(), &AnalysisMap::new(), &[])
            .await;

        assert_eq!(structure.origin, PlanOrigin::Default);
        assert_eq!(structure.folders.len(), 3);
    }

    #[tokio::test]
    async fn test_file_documentation_only_with_analysis() {
        let structure = planner(Arc::new(DisabledGenerator), true)
            .plan(&empty_metadata(), &AnalysisMap::new(), &[])
            .await;
        assert!(structure.folder("components").is_none());

        let mut analysis = AnalysisMap::new();
        analysis.insert("main.py".to_string(), Default::default());
        let structure = planner(Arc::new(DisabledGenerator), true)
            .plan(&empty_metadata(), &analysis, &[])
            .await;
        assert_eq!(structure.folders[1].name, "components");
        assert_eq!(structure.folders[1].sections[0].name, "file-documentation");
    }

    #[tokio::test]
    async fn test_default_tier_on_generator_failure() {
        let structure = planner(Arc::new(DisabledGenerator), false)
            .plan(&empty_metadata(), &AnalysisMap::new(), &[])
            .await;

        assert_eq!(structure.origin, PlanOrigin::Default);
        assert!(!structure.folders.is_empty());
    }
}
