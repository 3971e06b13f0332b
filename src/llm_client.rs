use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Anything that can go wrong while asking the model for a pitch.
///
/// Never leaves the pitch path: callers fall back instead of surfacing it.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("pitch generation is not configured")]
    Unavailable,
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
    #[error("request to LLM provider failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("LLM provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("LLM provider returned no content")]
    EmptyResponse,
    #[error("invalid pitch JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid pitch structure: {0}")]
    InvalidStructure(String),
}

/// Minimal client for an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// Creates a client whose requests are bounded by `timeout`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root, e.g. `https://api.openai.com/v1`.
    /// * `api_key` - Bearer credential.
    /// * `model` - Chat model name, e.g. `gpt-4o-mini`.
    /// * `timeout` - Whole-request timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GenerationError::Unavailable);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one system+user exchange and returns the first choice's text.
    ///
    /// No retries: a failed attempt is reported to the caller immediately.
    pub async fn chat_completion(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature,
            max_tokens,
        };

        tracing::debug!("Sending chat completion request (model: {})", self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerationError::Status { status, body });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_is_rejected() {
        let result = OpenAiClient::new(
            "https://api.openai.com/v1",
            "  ",
            "gpt-4o-mini",
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(GenerationError::Unavailable)));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = OpenAiClient::new(
            "http://localhost:9999/v1/",
            "sk-test",
            "gpt-4o-mini",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:9999/v1");
        assert_eq!(client.model(), "gpt-4o-mini");
    }
}
