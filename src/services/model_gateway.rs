//! Model gateway - capability layer
//!
//! One call interface over the interchangeable generation back-ends. The
//! back-end is picked once per run; the rest of the pipeline never looks at the
//! model name again.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};

use crate::clients::{GeminiClient, OpenAiClient};
use crate::config::{AiModel, Config};
use crate::error::GatewayError;
use crate::infrastructure::RunLog;

pub type JsonObject = Map<String, JsonValue>;

/// Opaque provider credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// A generation back-end: prompt in, JSON object out.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Human readable provider name, used in log lines
    fn provider(&self) -> &'static str;

    /// One request, no retry.
    async fn generate(&self, prompt: &str) -> Result<JsonObject, GatewayError>;
}

/// Model gateway
pub struct ModelGateway {
    backend: Arc<dyn GenerationBackend>,
}

impl ModelGateway {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Build the gateway for the back-end a run asked for.
    pub fn for_run(model: AiModel, api_key: ApiKey, config: &Config) -> Result<Self, GatewayError> {
        let timeout = config.timings.generation_timeout;
        let backend: Arc<dyn GenerationBackend> = match model {
            AiModel::Gemini => Arc::new(GeminiClient::new(
                &config.gemini_api_base_url,
                &config.gemini_model_name,
                api_key,
                timeout,
            )?),
            AiModel::OpenAi => Arc::new(OpenAiClient::new(
                &config.openai_api_base_url,
                &config.openai_model_name,
                api_key,
                timeout,
            )?),
        };
        Ok(Self::new(backend))
    }

    /// Generate for one pipeline step.
    ///
    /// Every failure is logged with the step label and returned as `None`; the
    /// caller skips the slot.
    pub async fn generate(
        &self,
        prompt: &str,
        step_label: &str,
        log: &RunLog,
    ) -> Option<JsonObject> {
        let provider = self.backend.provider();
        log.info(format!("🧠 Contacting {} for {}...", provider, step_label));
        match self.backend.generate(prompt).await {
            Ok(obj) => {
                log.info(format!("✅ {} response received for {}.", provider, step_label));
                Some(obj)
            }
            Err(e) => {
                log.error(format!("🔥 {} API Error during {}: {}", provider, step_label, e));
                None
            }
        }
    }
}

/// The span from the first `{` to the last `}` of `text`.
pub fn extract_json_span(text: &str) -> Result<&str, GatewayError> {
    let start = text.find('{').ok_or(GatewayError::NoJsonSpan)?;
    let end = text.rfind('}').ok_or(GatewayError::NoJsonSpan)?;
    if end <= start {
        return Err(GatewayError::NoJsonSpan);
    }
    Ok(&text[start..=end])
}

/// Parse `text` as a JSON object.
pub fn parse_object(text: &str) -> Result<JsonObject, GatewayError> {
    match serde_json::from_str::<JsonValue>(text)? {
        JsonValue::Object(obj) => Ok(obj),
        _ => Err(GatewayError::NotAnObject),
    }
}

/// Recover the JSON object embedded in free-form model output.
pub fn parse_embedded_object(text: &str) -> Result<JsonObject, GatewayError> {
    parse_object(extract_json_span(text)?)
}
