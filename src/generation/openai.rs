//! Chat-completions client for OpenAI-compatible endpoints

use super::{GenerationError, TextGenerator};
use crate::config::GenerationConfig;
use crate::constants;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Generator that posts to `{base_url}/chat/completions`
///
/// The API key is read from the configured environment variable on every
/// request, so a missing key surfaces as [`GenerationError::Unavailable`]
/// instead of failing construction.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleGenerator {
    client: Client,
    base_url: String,
    model: String,
    api_key_env: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompatibleGenerator {
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(constants::generation::USER_AGENT)
            .build()
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key_env: config.api_key_env.clone(),
            api_key: None,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Use `key` instead of reading the environment
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn api_key(&self) -> Result<String, GenerationError> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::Unavailable(format!(
                    "environment variable {} is not set",
                    self.api_key_env
                ))
            })
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleGenerator {
    async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        max_output: u32,
    ) -> Result<String, GenerationError> {
        let api_key = self.api_key()?;

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
            max_tokens: max_output,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.request_error(e))?;

        if !status.is_success() {
            return Err(GenerationError::Http(format!("API error ({}): {}", status, text)));
        }

        parse_reply(&text)
    }
}

impl OpenAiCompatibleGenerator {
    fn request_error(&self, error: reqwest::Error) -> GenerationError {
        if error.is_timeout() {
            GenerationError::Timeout(self.timeout_secs)
        } else {
            GenerationError::Http(error.to_string())
        }
    }
}

/// Pull the first non-empty choice out of a chat-completions body
fn parse_reply(body: &str) -> Result<String, GenerationError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .filter_map(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .find(|content| !content.is_empty())
        .ok_or_else(|| GenerationError::MalformedResponse("response has no content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> GenerationConfig {
        GenerationConfig {
            base_url: base_url.to_string(),
            api_key_env: "REPOWIKI_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            timeout_secs: 2,
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn test_parse_reply() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  Hello  "}}]}"#;
        assert_eq!(parse_reply(body).unwrap(), "Hello");
    }

    #[test]
    fn test_parse_reply_rejects_empty_and_garbage() {
        assert!(matches!(
            parse_reply(r#"{"choices":[]}"#),
            Err(GenerationError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_reply(r#"{"choices":[{"message":{"content":"   "}}]}"#),
            Err(GenerationError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_reply("<html>"),
            Err(GenerationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let generator = OpenAiCompatibleGenerator::from_config(&config("http://host/v1/")).unwrap();
        assert_eq!(generator.endpoint(), "http://host/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_missing_key_is_unavailable() {
        let generator = OpenAiCompatibleGenerator::from_config(&config("http://127.0.0.1:9")).unwrap();
        let result = generator.generate("prompt", 0.0, 10).await;
        assert!(matches!(result, Err(GenerationError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        let generator = OpenAiCompatibleGenerator::from_config(&config("http://127.0.0.1:9"))
            .unwrap()
            .with_api_key("test-key");
        let result = generator.generate("prompt", 0.0, 10).await;
        assert!(matches!(
            result,
            Err(GenerationError::Http(_)) | Err(GenerationError::Timeout(_))
        ));
    }
}
