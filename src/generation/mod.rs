//! Text-generation collaborator
//!
//! The pipeline only ever talks to a [`TextGenerator`]. Every call site owns
//! a deterministic fallback, so a generator that always fails still yields a
//! complete documentation tree.

pub mod openai;

pub use openai::OpenAiCompatibleGenerator;

use async_trait::async_trait;
use thiserror::Error;

/// Failures reported by a text generator
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// Generation is switched off or not configured
    #[error("text generation unavailable: {0}")]
    Unavailable(String),

    #[error("text generation timed out after {0}s")]
    Timeout(u64),

    /// Transport failure or non-success HTTP status
    #[error("text generation request failed: {0}")]
    Http(String),

    /// The service answered with something that carries no text
    #[error("malformed generation response: {0}")]
    MalformedResponse(String),
}

/// Turns a prompt into prose
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        max_output: u32,
    ) -> Result<String, GenerationError>;
}

/// Generator used when generation is switched off
///
/// Always reports [`GenerationError::Unavailable`], which routes every call
/// site to its fallback text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _temperature: f32,
        _max_output: u32,
    ) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable(
            "generation is disabled".to_string(),
        ))
    }
}
