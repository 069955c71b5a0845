// file: src/composer/client.rs
// description: chat completions client returning the structured search query
// reference: https://platform.openai.com/docs/api-reference/chat/create

use crate::composer::prompt::RenderedPrompt;
use crate::config::ModelConfig;
use crate::error::{QueryError, Result};
use crate::models::SearchQuery;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Remote language model seam. Implementations return the decoded schema, never raw text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &RenderedPrompt) -> Result<SearchQuery>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: &'static str,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiClient {
    /// Builds the client once at startup. A missing key fails here, not on the first request.
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| QueryError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            api_key,
            model: config.name.clone(),
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request<'a>(&'a self, prompt: &'a RenderedPrompt) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: "search_query",
                    strict: true,
                    schema: SearchQuery::json_schema(),
                },
            },
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &RenderedPrompt) -> Result<SearchQuery> {
        let request = self.build_request(prompt);

        debug!(
            "Requesting completion from {} ({} chars of input)",
            self.endpoint,
            prompt.user.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => QueryError::Authentication(
                    format!("API rejected the credential ({}): {}", status, error_text),
                ),
                _ => QueryError::Network(format!(
                    "Completion request failed with status {}: {}",
                    status, error_text
                )),
            });
        }

        let body = response.text().await?;
        let chat: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            QueryError::Parse(format!("Failed to parse completion response: {}", e))
        })?;

        let message = chat
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| QueryError::Parse("No choices returned by the model".to_string()))?;

        if let Some(refusal) = message.refusal {
            return Err(QueryError::Parse(format!("Model refused: {}", refusal)));
        }

        let content = message
            .content
            .ok_or_else(|| QueryError::Parse("Completion has no content".to_string()))?;

        debug!("Received completion of {} chars", content.len());

        SearchQuery::from_content(&content)
    }
}
