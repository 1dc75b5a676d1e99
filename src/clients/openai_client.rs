//! OpenAI chat-completions client
//!
//! Requests JSON-object mode, so the reply content is parsed as-is.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GatewayError;
use crate::services::model_gateway::{parse_object, ApiKey, GenerationBackend, JsonObject};

const PROVIDER: &str = "OpenAI";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
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

/// OpenAI client
pub struct OpenAiClient {
    client: Client,
    api_base_url: String,
    model_name: String,
    api_key: ApiKey,
}

impl OpenAiClient {
    pub fn new(
        api_base_url: &str,
        model_name: &str,
        api_key: ApiKey,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| GatewayError::Request {
                provider: PROVIDER,
                source,
            })?;
        Ok(Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            model_name: model_name.to_string(),
            api_key,
        })
    }

    fn request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model_name,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        debug!("calling OpenAI, model: {}", self.model_name);
        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base_url))
            .bearer_auth(self.api_key.expose())
            .json(&self.request(prompt))
            .send()
            .await
            .map_err(|source| GatewayError::Request {
                provider: PROVIDER,
                source: source.without_url(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::BadStatus {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|source| GatewayError::Decode {
                provider: PROVIDER,
                source: source.without_url(),
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(GatewayError::EmptyPayload { provider: PROVIDER })
    }
}

#[async_trait]
impl GenerationBackend for OpenAiClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(&self, prompt: &str) -> Result<JsonObject, GatewayError> {
        let content = self.complete(prompt).await?;
        parse_object(content.trim())
    }
}
