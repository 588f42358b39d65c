/*!
 * OpenAI API client implementation.
 *
 * Speaks the chat completions protocol against api.openai.com or any
 * compatible endpoint. Transient failures (rate limits, 5xx, network
 * errors) are retried with exponential backoff; authentication and
 * other client errors fail immediately.
 */

use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Default model used when none is configured
pub const DEFAULT_MODEL: &str = "gpt-4-1106-preview";

/// Default API endpoint, including the version prefix
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Client for the OpenAI chat completions API
#[derive(Debug, Clone)]
pub struct OpenAI {
    /// HTTP client for making requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Base URL of the API, e.g. "https://api.openai.com/v1"
    endpoint: String,
    /// Model identifier sent with every request
    model: String,
    /// Sampling temperature sent with every request
    temperature: f32,
    /// Maximum number of retries on transient failures
    max_retries: u32,
    /// Base delay for exponential backoff in milliseconds
    backoff_base_ms: u64,
}

/// Request structure for the chat completions endpoint
#[derive(Debug, Clone, Default, Serialize)]
pub struct OpenAIRequest {
    /// Model to use for the completion
    pub model: String,
    /// Conversation messages in order
    pub messages: Vec<OpenAIMessage>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    /// Role of the message author ("system", "user" or "assistant")
    pub role: String,
    /// Message content
    pub content: String,
}

/// Response structure from the chat completions endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIResponse {
    /// Generated completions, usually exactly one
    pub choices: Vec<OpenAIChoice>,
    /// Token accounting reported by the API
    pub usage: Option<TokenUsage>,
}

/// A single completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIChoice {
    /// The generated message
    pub message: OpenAIMessage,
}

/// Token usage reported by the API
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u64,
    /// Tokens generated in the completion
    pub completion_tokens: u64,
    /// Total tokens for the call
    pub total_tokens: u64,
}

impl OpenAIRequest {
    /// Create a new request for the given model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
        }
    }

    /// Append a message to the conversation
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(OpenAIMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl OpenAI {
    /// Create a new client with default model, temperature and retry settings
    ///
    /// # Arguments
    /// * `api_key` - API key for authentication
    /// * `endpoint` - Base URL of the API, or empty to use the default
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::new_with_config(api_key, endpoint, DEFAULT_MODEL, 0.2, 3, 1000)
    }

    /// Create a new client with explicit configuration
    ///
    /// # Arguments
    /// * `api_key` - API key for authentication
    /// * `endpoint` - Base URL of the API, or empty to use the default
    /// * `model` - Model identifier sent with every request
    /// * `temperature` - Sampling temperature sent with every request
    /// * `max_retries` - Maximum number of retries on transient failures
    /// * `backoff_base_ms` - Base delay for exponential backoff in milliseconds
    pub fn new_with_config(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Self {
        let endpoint = endpoint.into();
        let endpoint = if endpoint.is_empty() {
            DEFAULT_ENDPOINT.to_string()
        } else {
            endpoint
        };

        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint,
            model: model.into(),
            temperature,
            max_retries,
            backoff_base_ms,
        }
    }

    /// Model identifier this client sends with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Join a path onto the endpoint, tolerating a trailing slash
    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl Provider for OpenAI {
    type Request = OpenAIRequest;
    type Response = OpenAIResponse;

    fn build_request(&self, system_prompt: &str, user_text: &str) -> OpenAIRequest {
        OpenAIRequest::new(self.model.as_str())
            .add_message("system", system_prompt)
            .add_message("user", user_text)
            .temperature(self.temperature)
    }

    async fn complete(&self, request: OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let url = self.api_url("chat/completions");
        let mut attempt: u32 = 0;
        let mut last_error: Option<ProviderError> = None;

        while attempt <= self.max_retries {
            let response_result = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await;

            match response_result {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let parsed = response
                            .json::<OpenAIResponse>()
                            .await
                            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
                        if let Some(usage) = &parsed.usage {
                            debug!(
                                "OpenAI tokens: {} prompt + {} completion = {} total",
                                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
                            );
                        }
                        return Ok(parsed);
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error response".to_string());

                    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                        return Err(ProviderError::AuthenticationError(error_text));
                    } else if status == StatusCode::TOO_MANY_REQUESTS {
                        warn!(
                            "OpenAI rate limit hit (attempt {}/{})",
                            attempt + 1,
                            self.max_retries + 1
                        );
                        last_error = Some(ProviderError::RateLimitExceeded(error_text));
                    } else if status.is_server_error() {
                        error!(
                            "OpenAI server error {} (attempt {}/{}): {}",
                            status.as_u16(),
                            attempt + 1,
                            self.max_retries + 1,
                            error_text
                        );
                        last_error = Some(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    } else {
                        // Other client errors will not improve on retry
                        return Err(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    }
                }
                Err(e) => {
                    error!(
                        "OpenAI request failed (attempt {}/{}): {}",
                        attempt + 1,
                        self.max_retries + 1,
                        e
                    );
                    last_error = Some(ProviderError::ConnectionError(e.to_string()));
                }
            }

            attempt += 1;
            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!(
                "request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = self.api_url("models");
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(ProviderError::AuthenticationError(error_text))
        } else {
            Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            })
        }
    }

    fn extract_text(response: &OpenAIResponse) -> String {
        response
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }
}
