/*!
 * Core translation service.
 *
 * Wraps a provider with system prompt construction and turns provider
 * failures into contextual errors for the application layer.
 */

use anyhow::{Context, Result, anyhow};

use crate::app_config::Config;
use crate::providers::Provider;
use crate::providers::openai::OpenAI;

/// Placeholder replaced by the source language name in the prompt template
const SOURCE_LANGUAGE_PLACEHOLDER: &str = "{source_language}";

/// Placeholder replaced by the target language name in the prompt template
const TARGET_LANGUAGE_PLACEHOLDER: &str = "{target_language}";

/// Translation service driving a single provider
#[derive(Debug)]
pub struct TranslationService<P: Provider> {
    /// Provider performing the completions
    provider: P,
    /// Prompt template with language placeholders
    system_prompt_template: String,
}

impl TranslationService<OpenAI> {
    /// Create a service backed by the OpenAI client described in the configuration
    pub fn new(config: &Config) -> Self {
        let provider = OpenAI::new_with_config(
            config.openai.api_key.as_str(),
            config.openai.endpoint.as_str(),
            config.openai.model.as_str(),
            config.translation.temperature,
            config.translation.retry_count,
            config.translation.retry_backoff_ms,
        );

        Self::with_provider(provider, config.translation.system_prompt.clone())
    }
}

impl<P: Provider> TranslationService<P> {
    /// Create a service from an existing provider and prompt template
    ///
    /// Used by tests to substitute a stub provider for the real client.
    pub fn with_provider(provider: P, system_prompt_template: String) -> Self {
        Self {
            provider,
            system_prompt_template,
        }
    }

    /// Render the system prompt for a language pair
    ///
    /// # Arguments
    /// * `source_language` - Human-readable source language name
    /// * `target_language` - Human-readable target language name
    pub fn format_system_prompt(&self, source_language: &str, target_language: &str) -> String {
        self.system_prompt_template
            .replace(SOURCE_LANGUAGE_PLACEHOLDER, source_language)
            .replace(TARGET_LANGUAGE_PLACEHOLDER, target_language)
    }

    /// Translate a single chunk of chapter text
    ///
    /// # Arguments
    /// * `system_prompt` - Rendered system prompt for the language pair
    /// * `text` - Chunk of chapter markup to translate
    ///
    /// # Returns
    /// * `Result<String>` - The translated chunk
    pub async fn translate_chunk(&self, system_prompt: &str, text: &str) -> Result<String> {
        let request = self.provider.build_request(system_prompt, text);
        let response = self
            .provider
            .complete(request)
            .await
            .context("Translation request failed")?;

        let translated = P::extract_text(&response);
        if translated.is_empty() {
            return Err(anyhow!("Provider returned an empty translation"));
        }

        Ok(translated)
    }

    /// Verify the provider is reachable before starting a long run
    pub async fn test_connection(&self) -> Result<()> {
        self.provider
            .test_connection()
            .await
            .context("Failed to connect to the translation provider")
    }
}
