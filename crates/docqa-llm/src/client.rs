use async_trait::async_trait;
use docqa_core::config::LlmSettings;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{LlmError, Result};

const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);
const HEALTH_BODY_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }
}

/// A chat/completion model. Returned text is trimmed; it may be empty.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Model identifier reported with grounded answers.
    fn model(&self) -> &str;

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String>;

    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub ok: bool,
    pub status: u16,
    pub body: String,
}

/// Ollama-compatible HTTP client.
pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize, Default)]
struct ChatReply {
    #[serde(default)]
    message: ReplyMessage,
}

#[derive(Deserialize, Default)]
struct ReplyMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct GenerateReply {
    #[serde(default)]
    response: String,
}

impl OllamaClient {
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(settings.timeout_secs)).build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
        })
    }

    /// Probe `GET /api/tags`.
    pub async fn health(&self) -> Result<HealthReport> {
        let response = self
            .http
            .get(format!("{}/api/tags", self.base_url))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await?;
        let status = response.status();
        let body: String = response.text().await?.chars().take(HEALTH_BODY_CHARS).collect();
        Ok(HealthReport { ok: status.is_success(), status: status.as_u16(), body })
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response> {
        let response = self.http.post(format!("{}{}", self.base_url, path)).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status { status: status.as_u16(), body });
        }
        Ok(response)
    }
}

#[async_trait]
impl CompletionService for OllamaClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatRequest { model: &self.model, messages, stream: false };
        let reply: ChatReply = self
            .post("/api/chat", &request)
            .await?
            .json()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))?;
        debug!(chars = reply.message.content.len(), "chat completion received");
        Ok(reply.message.content.trim().to_string())
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest { model: &self.model, prompt, stream: false };
        let reply: GenerateReply = self
            .post("/api/generate", &request)
            .await?
            .json()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))?;
        Ok(reply.response.trim().to_string())
    }
}
