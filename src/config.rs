use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum number of source slots per run.
pub const MAX_SLOTS: usize = 3;

/// Fixed waits and timeouts used by a run.
#[derive(Clone, Debug)]
pub struct Timings {
    /// Implicit element wait applied to every element lookup.
    pub implicit_wait: Duration,
    pub fetch_timeout: Duration,
    pub generation_timeout: Duration,
    pub after_login: Duration,
    pub after_navigate: Duration,
    /// Pause after each collapsed-group toggle click.
    pub expand_settle: Duration,
    pub after_save: Duration,
    /// Throttle between two article submissions.
    pub between_articles: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            implicit_wait: Duration::from_secs(15),
            fetch_timeout: Duration::from_secs(15),
            generation_timeout: Duration::from_secs(120),
            after_login: Duration::from_secs(4),
            after_navigate: Duration::from_secs(3),
            expand_settle: Duration::from_millis(100),
            after_save: Duration::from_secs(5),
            between_articles: Duration::from_secs(10),
        }
    }
}

impl Timings {
    /// No pauses at all, network timeouts kept. Used for dry runs against fakes.
    pub fn without_pauses() -> Self {
        Self {
            implicit_wait: Duration::ZERO,
            after_login: Duration::ZERO,
            after_navigate: Duration::ZERO,
            expand_settle: Duration::ZERO,
            after_save: Duration::ZERO,
            between_articles: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Process-wide configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Run Chrome without a window (production); visible otherwise
    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
    /// Catalog TOML overriding the embedded one
    pub catalog_path: Option<PathBuf>,
    /// File the log consumer appends run lines to
    pub output_log_file: String,
    /// Run description read by the binary
    pub run_file: String,
    pub log_channel_capacity: usize,
    // --- generation providers ---
    pub gemini_api_base_url: String,
    pub gemini_model_name: String,
    pub openai_api_base_url: String,
    pub openai_model_name: String,
    pub timings: Timings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            headless: false,
            chrome_executable: None,
            catalog_path: None,
            output_log_file: "bot_log.txt".to_string(),
            run_file: "run.toml".to_string(),
            log_channel_capacity: 1024,
            gemini_api_base_url: "https://generativelanguage.googleapis.com".to_string(),
            gemini_model_name: "gemini-1.5-flash-latest".to_string(),
            openai_api_base_url: "https://api.openai.com/v1".to_string(),
            openai_model_name: "gpt-4o".to_string(),
            timings: Timings::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        let headless = match std::env::var("HEADLESS") {
            Ok(v) => parse_flag(&v).unwrap_or(default.headless),
            Err(_) => std::env::var_os("RENDER").is_some(),
        };
        let timings = Timings {
            implicit_wait: env_secs("IMPLICIT_WAIT_SECS").unwrap_or(default.timings.implicit_wait),
            between_articles: env_secs("BETWEEN_ARTICLES_SECS")
                .unwrap_or(default.timings.between_articles),
            ..default.timings
        };
        Self {
            headless,
            chrome_executable: std::env::var_os("CHROME_EXECUTABLE").map(PathBuf::from),
            catalog_path: std::env::var_os("CATALOG_PATH").map(PathBuf::from),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            run_file: std::env::var("RUN_FILE").unwrap_or(default.run_file),
            log_channel_capacity: std::env::var("LOG_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.log_channel_capacity),
            gemini_api_base_url: std::env::var("GEMINI_API_BASE_URL")
                .unwrap_or(default.gemini_api_base_url),
            gemini_model_name: std::env::var("GEMINI_MODEL_NAME")
                .unwrap_or(default.gemini_model_name),
            openai_api_base_url: std::env::var("OPENAI_API_BASE_URL")
                .unwrap_or(default.openai_api_base_url),
            openai_model_name: std::env::var("OPENAI_MODEL_NAME")
                .unwrap_or(default.openai_model_name),
            timings,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_secs(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Generation backend chosen for a run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiModel {
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
}

impl AiModel {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(AiModel::Gemini),
            "openai" => Ok(AiModel::OpenAi),
            other => Err(ConfigError::UnknownModel(other.to_string())),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AiModel::Gemini => "Gemini",
            AiModel::OpenAi => "OpenAI",
        }
    }
}

/// One (source URL, instruction) pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSlot {
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default, alias = "prompt")]
    pub instruction_prompt: Option<String>,
}

impl SourceSlot {
    pub fn new(source_url: impl Into<String>, instruction_prompt: impl Into<String>) -> Self {
        Self {
            source_url: Some(source_url.into()),
            instruction_prompt: Some(instruction_prompt.into()),
        }
    }

    /// Returns the URL and instruction when both are present and non-blank.
    pub fn parts(&self) -> Option<(&str, &str)> {
        let url = self.source_url.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let prompt = self
            .instruction_prompt
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())?;
        Some((url, prompt))
    }
}

/// Configuration of a single run. Moved into the worker and dropped with it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunConfig {
    pub ai_model: AiModel,
    pub api_key: String,
    pub login_url: String,
    pub username: String,
    pub password: String,
    pub add_article_url: String,
    #[serde(default)]
    pub save_button_id: Option<String>,
    #[serde(default)]
    pub slots: Vec<SourceSlot>,
}

impl RunConfig {
    /// Precondition check performed by the trigger before any worker starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential {
                model: self.ai_model.label().to_string(),
            });
        }
        if self.slots.len() > MAX_SLOTS {
            return Err(ConfigError::TooManySlots {
                max: MAX_SLOTS,
                got: self.slots.len(),
            });
        }
        Ok(())
    }

    /// Save button id, if one is configured and non-blank.
    pub fn save_button(&self) -> Option<&str> {
        self.save_button_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn from_toml_str(content: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::RunFileParse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

/// Flat payload posted by the control panel form.
///
/// Credentials for both providers may be present; the one matching
/// `ai_model` is kept.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub ai_model: Option<String>,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub login_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub add_article_url: String,
    #[serde(default)]
    pub save_button_id: Option<String>,
    #[serde(default)]
    pub source_url_1: Option<String>,
    #[serde(default)]
    pub prompt_1: Option<String>,
    #[serde(default)]
    pub source_url_2: Option<String>,
    #[serde(default)]
    pub prompt_2: Option<String>,
    #[serde(default)]
    pub source_url_3: Option<String>,
    #[serde(default)]
    pub prompt_3: Option<String>,
}

impl TryFrom<RunRequest> for RunConfig {
    type Error = ConfigError;

    fn try_from(req: RunRequest) -> Result<Self, Self::Error> {
        let ai_model = match req.ai_model.as_deref() {
            Some(m) if !m.trim().is_empty() => AiModel::parse(m)?,
            _ => AiModel::Gemini,
        };
        let api_key = match ai_model {
            AiModel::Gemini => req.gemini_api_key,
            AiModel::OpenAi => req.openai_api_key,
        }
        .unwrap_or_default();

        let slots = vec![
            SourceSlot {
                source_url: req.source_url_1,
                instruction_prompt: req.prompt_1,
            },
            SourceSlot {
                source_url: req.source_url_2,
                instruction_prompt: req.prompt_2,
            },
            SourceSlot {
                source_url: req.source_url_3,
                instruction_prompt: req.prompt_3,
            },
        ];

        let config = RunConfig {
            ai_model,
            api_key,
            login_url: req.login_url,
            username: req.username,
            password: req.password,
            add_article_url: req.add_article_url,
            save_button_id: req.save_button_id,
            slots,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_request_picks_matching_key() {
        let req: RunRequest = serde_json::from_value(json!({
            "ai_model": "openai",
            "gemini_api_key": "g-key",
            "openai_api_key": "o-key",
            "source_url_1": "https://example.com/a",
            "prompt_1": "write a short piece",
            "save_button_id": "edit-submit"
        }))
        .unwrap();

        let config = RunConfig::try_from(req).unwrap();
        assert_eq!(config.ai_model, AiModel::OpenAi);
        assert_eq!(config.api_key, "o-key");
        assert_eq!(config.slots.len(), 3);
        assert!(config.slots[0].parts().is_some());
        assert!(config.slots[1].parts().is_none());
        assert_eq!(config.save_button(), Some("edit-submit"));
    }

    #[test]
    fn test_flat_request_rejects_missing_credential() {
        let req: RunRequest = serde_json::from_value(json!({
            "ai_model": "gemini",
            "openai_api_key": "o-key"
        }))
        .unwrap();

        let err = RunConfig::try_from(req).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential { .. }));
    }

    #[test]
    fn test_flat_request_defaults_to_gemini() {
        let req: RunRequest = serde_json::from_value(json!({ "gemini_api_key": "g" })).unwrap();
        let config = RunConfig::try_from(req).unwrap();
        assert_eq!(config.ai_model, AiModel::Gemini);
    }

    #[test]
    fn test_unknown_model_rejected() {
        assert!(matches!(
            AiModel::parse("claude"),
            Err(ConfigError::UnknownModel(_))
        ));
    }

    #[test]
    fn test_slot_parts_requires_both_values() {
        let slot = SourceSlot {
            source_url: Some("https://example.com".into()),
            instruction_prompt: Some("   ".into()),
        };
        assert!(slot.parts().is_none());
        assert!(SourceSlot::default().parts().is_none());
    }

    #[test]
    fn test_run_file_parses() {
        let content = r#"
            ai_model = "gemini"
            api_key = "key"
            login_url = "https://cms.example.com/user"
            username = "editor"
            password = "secret"
            add_article_url = "https://cms.example.com/node/add/article"

            [[slots]]
            source_url = "https://example.com/story"
            prompt = "summarise for a business audience"
        "#;
        let config = RunConfig::from_toml_str(content, "run.toml").unwrap();
        assert_eq!(config.slots.len(), 1);
        assert_eq!(config.save_button(), None);
        config.validate().unwrap();
    }

    #[test]
    fn test_too_many_slots_rejected() {
        let config = RunConfig {
            ai_model: AiModel::Gemini,
            api_key: "k".into(),
            login_url: String::new(),
            username: String::new(),
            password: String::new(),
            add_article_url: String::new(),
            save_button_id: None,
            slots: vec![SourceSlot::default(); 4],
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooManySlots { got: 4, .. })
        ));
    }
}
