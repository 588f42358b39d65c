/*!
 * Application configuration module.
 *
 * This module handles the application configuration including loading
 * and validating configuration settings from a YAML file. Only the
 * API key is required; everything else carries a sensible default.
 */

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// OpenAI service credentials and model selection
    pub openai: OpenAIConfig,

    /// Translation tuning settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// OpenAI service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenAIConfig {
    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Model name (e.g., "gpt-4-1106-preview")
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Service endpoint URL (optional, for Azure OpenAI or self-hosted)
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_openai_model(),
            endpoint: default_openai_endpoint(),
        }
    }
}

/// Common translation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// System prompt template for translation
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Maximum characters per chunk submitted for translation
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,

    /// Temperature parameter for text generation (0.0 to 2.0)
    /// Lower values make output more deterministic, higher values more creative
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            max_chunk_size: default_max_chunk_size(),
            temperature: default_temperature(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_openai_model() -> String {
    "gpt-4-1106-preview".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_system_prompt() -> String {
    "You are an {source_language}-to-{target_language} translator. Keep all special characters and HTML tags as in the source text. Return only {target_language} translation.".to_string()
}

fn default_max_chunk_size() -> usize {
    2000
}

fn default_temperature() -> f32 {
    0.2
}

fn default_retry_count() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.openai.api_key.is_empty() {
            return Err(anyhow!("API key is required (openai.api_key in the config file)"));
        }

        if self.translation.max_chunk_size == 0 {
            return Err(anyhow!("max_chunk_size must be greater than zero"));
        }

        if !(0.0..=2.0).contains(&self.translation.temperature) {
            return Err(anyhow!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.translation.temperature
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            openai: OpenAIConfig::default(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
