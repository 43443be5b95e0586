//! OpenAI chat-completion client (https://api.openai.com/v1 by default).
//! Non-streaming only: one POST, first choice's message content.

use crate::prompt::PromptRequest;
use async_trait::async_trait;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("chat completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("chat completion api error: {0}")]
    Api(String),
    #[error("chat completion returned no choices")]
    EmptyResponse,
    #[error("no API key configured; set OPENAI_API_KEY or openai.apiKey")]
    MissingApiKey,
}

/// Sends a prompt request and returns the reply text.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn complete(&self, request: &PromptRequest) -> Result<String, LlmError>;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint with bearer auth.
#[derive(Clone)]
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// `api_key` is required; `base_url` defaults to [`DEFAULT_BASE_URL`].
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Result<Self, LlmError> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(LlmError::MissingApiKey)?;
        let base_url = base_url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            base_url,
            api_key,
            client: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST /chat/completions — non-streaming.
    pub async fn chat(&self, request: &PromptRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        log::info!("openai: POST {} (model {})", url, request.model);
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("{} {}", status, body)));
        }
        let data: ChatCompletionResponse = res.json().await?;
        first_choice_content(data)
    }
}

#[async_trait]
impl ChatTransport for OpenAiClient {
    async fn complete(&self, request: &PromptRequest) -> Result<String, LlmError> {
        self.chat(request).await
    }
}

/// Turn reply text into editor-ready HTML: every newline becomes `<br>`.
pub fn format_for_editor(content: &str) -> String {
    content.replace('\n', "<br>")
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<ChatChoice>>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

fn first_choice_content(data: ChatCompletionResponse) -> Result<String, LlmError> {
    let choice = data
        .choices
        .and_then(|c| c.into_iter().next())
        .ok_or(LlmError::EmptyResponse)?;
    Ok(choice.message.and_then(|m| m.content).unwrap_or_default())
}
