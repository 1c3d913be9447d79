//! Environment-based configuration.

use crate::error::{AppError, AppResult};
use crate::lifecycle::PipelineConfig;
use std::str::FromStr;
use std::time::Duration;
use tripcut_ai::client::DEFAULT_BASE_URL;
use tripcut_ai::GeminiConfig;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "TRIPCUT_MODEL";
pub const API_BASE_VAR: &str = "TRIPCUT_API_BASE";
pub const TARGET_FRAMES_VAR: &str = "TRIPCUT_TARGET_FRAMES";
pub const MAX_WIDTH_VAR: &str = "TRIPCUT_MAX_WIDTH";
pub const TIMEOUT_VAR: &str = "TRIPCUT_TIMEOUT_SECS";
pub const THINKING_BUDGET_VAR: &str = "TRIPCUT_THINKING_BUDGET";

/// Application settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Gemini API key; empty when unset.
    pub api_key: String,
    pub api_base: String,
    pub pipeline: PipelineConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: DEFAULT_BASE_URL.to_string(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read settings from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults for unset
    /// or blank variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(key) = get(API_KEY_VAR) {
            config.api_key = key;
        }
        if let Some(base) = get(API_BASE_VAR) {
            config.api_base = base;
        }
        if let Some(model) = get(MODEL_VAR) {
            config.pipeline.generation.model = model;
        }
        if let Some(value) = get(TARGET_FRAMES_VAR) {
            config.pipeline.sampler.target_count = parse(TARGET_FRAMES_VAR, &value)?;
        }
        if let Some(value) = get(MAX_WIDTH_VAR) {
            config.pipeline.sampler.max_width = parse(MAX_WIDTH_VAR, &value)?;
        }
        if let Some(value) = get(TIMEOUT_VAR) {
            config.pipeline.analysis_timeout = Duration::from_secs(parse(TIMEOUT_VAR, &value)?);
        }
        if let Some(value) = get(THINKING_BUDGET_VAR) {
            config.pipeline.generation.thinking_budget = parse(THINKING_BUDGET_VAR, &value)?;
        }

        Ok(config)
    }

    /// Client settings for the Gemini API.
    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key.clone(),
            base_url: self.api_base.clone(),
            ..Default::default()
        }
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> AppResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| AppError::Config(format!("{key}={value:?}: {e}")))
}
