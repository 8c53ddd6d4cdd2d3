use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EditCheckError, Result};

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const MODEL_VAR: &str = "EDIT_CHECKS_MODEL";
pub const TIMEOUT_VAR: &str = "EDIT_CHECKS_AI_TIMEOUT_SECS";
pub const MAX_RETRIES_VAR: &str = "EDIT_CHECKS_AI_MAX_RETRIES";

/// Configuration for the text-generation service.
///
/// Resolved once at startup and passed into the generator; nothing reads the
/// environment while handling a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    /// OpenAI-compatible API root, without the trailing `/chat/completions`
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    /// Extra attempts after the first failure before falling back
    pub max_retries: u32,
    /// Token budget for child-scenario generation
    pub max_tokens: u32,
    /// Token budget for the smaller analysis calls
    pub analysis_max_tokens: u32,
    pub temperature: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 0,
            max_tokens: 2000,
            analysis_max_tokens: 500,
            temperature: 0.7,
        }
    }
}

impl AiConfig {
    /// Resolve from process environment variables. The binary loads `.env`
    /// into the environment before this runs.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary variable lookup.
    ///
    /// A missing or blank API key is fatal, as is an unparseable number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get(API_KEY_VAR).ok_or(EditCheckError::MissingApiKey)?;
        let mut config = Self {
            api_key,
            ..Self::default()
        };

        if let Some(base_url) = get(BASE_URL_VAR) {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(model) = get(MODEL_VAR) {
            config.model = model;
        }
        if let Some(secs) = get(TIMEOUT_VAR) {
            config.timeout = Duration::from_secs(parse_number(TIMEOUT_VAR, &secs)?);
        }
        if let Some(retries) = get(MAX_RETRIES_VAR) {
            config.max_retries = parse_number(MAX_RETRIES_VAR, &retries)?;
        }

        Ok(config)
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| EditCheckError::InvalidConfig(format!("{} must be a number, got '{}'", key, value)))
}
