//! OpenAI-compatible HTTP client for chat completions and embeddings

use super::chat::{ChatMessage, ChatModel, CompletionParams, ProviderError};
use crate::config::Config;
use crate::core::Word;
use crate::solver::similarity::{Embedder, EmbeddingError};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;
use ureq::http::StatusCode;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Blocking client shared by every worker
#[derive(Clone)]
pub struct OpenAiClient {
    agent: ureq::Agent,
    config: Config,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiClient {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let agent = ureq::config::Config::builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent, config }
    }

    fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, ProviderError> {
        let url = format!("{}/{path}", self.config.base_url);
        let response = self
            .agent
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .send_json(body)
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        let mut body = response.into_body();
        match status {
            StatusCode::TOO_MANY_REQUESTS => Err(ProviderError::RateLimited {
                message: body.read_to_string().unwrap_or_default(),
            }),
            status if status.is_success() => body
                .read_json::<T>()
                .map_err(|e| ProviderError::InvalidResponse(e.to_string())),
            status => Err(ProviderError::Status {
                status: status.as_u16(),
                body: body.read_to_string().unwrap_or_default(),
            }),
        }
    }

    /// Request embeddings for `inputs`, returned in input order
    ///
    /// # Errors
    /// Returns `ProviderError` on HTTP failures or a malformed response.
    pub fn embeddings(&self, model: &str, inputs: &[&str]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let body = json!({ "model": model, "input": inputs });
        let mut response: EmbeddingResponse = self.post("embeddings", &body)?;

        if response.data.len() != inputs.len() {
            return Err(ProviderError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                inputs.len(),
                response.data.len()
            )));
        }
        response.data.sort_by_key(|item| item.index);

        Ok(response.data.into_iter().map(|item| item.embedding).collect())
    }
}

impl ChatModel for OpenAiClient {
    fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> Result<String, ProviderError> {
        let mut body = json!({
            "model": params.model,
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
            "messages": messages,
        });
        if let Some(seed) = params.seed {
            body["seed"] = json!(seed);
        }

        debug!(model = %params.model, messages = messages.len(), "requesting completion");
        let response: ChatResponse = self.post("chat/completions", &body)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("no completion choices".to_string()))
    }
}

/// Embedding provider backed by the `/embeddings` endpoint
#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: OpenAiClient,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(client: OpenAiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

impl Embedder for OpenAiEmbedder {
    fn embed(&self, words: &[Word]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let inputs: Vec<&str> = words.iter().map(Word::text).collect();
        Ok(self.client.embeddings(&self.model, &inputs)?)
    }
}
