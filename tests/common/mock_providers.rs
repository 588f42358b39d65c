/*!
 * Mock provider implementation for testing
 *
 * Implements the Provider trait without external API calls. The mock
 * "translates" by uppercasing the user text, records every request in
 * arrival order, and can be told to fail its next call with a chosen
 * error, so tests can cover both the happy path and error propagation.
 */

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use lexibook::errors::ProviderError;
use lexibook::providers::Provider;

/// Tracks API calls to ensure no actual external requests are made
#[derive(Debug, Default)]
pub struct ApiCallTracker {
    /// Count of mock API calls made
    pub call_count: usize,
    /// User texts received, in arrival order
    pub requests: Vec<String>,
    /// Should the next call fail
    pub should_fail: bool,
    /// Error to return if failing
    pub error_type: MockErrorType,
}

/// Type of error to simulate
#[derive(Debug, Clone, Copy, Default)]
pub enum MockErrorType {
    /// Authentication error (invalid API key)
    #[default]
    Auth,
    /// Connection error
    Connection,
    /// Rate limit error
    RateLimit,
    /// API error
    Api,
}

/// A request captured by the mock provider
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// System instruction the service attached
    pub system_prompt: String,
    /// Chunk text submitted for translation
    pub user_text: String,
}

/// Mock provider that translates by uppercasing the user text
#[derive(Debug)]
pub struct MockProvider {
    tracker: Arc<Mutex<ApiCallTracker>>,
}

impl MockProvider {
    /// Create a new mock provider
    pub fn new() -> Self {
        MockProvider {
            tracker: Arc::new(Mutex::new(ApiCallTracker::default())),
        }
    }

    /// Get the API call tracker
    pub fn tracker(&self) -> Arc<Mutex<ApiCallTracker>> {
        self.tracker.clone()
    }

    /// Configure the mock to fail on the next call
    pub fn fail_next_call(&self, error_type: MockErrorType) {
        let mut tracker = self.tracker.lock().unwrap();
        tracker.should_fail = true;
        tracker.error_type = error_type;
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = String;

    fn build_request(&self, system_prompt: &str, user_text: &str) -> MockRequest {
        MockRequest {
            system_prompt: system_prompt.to_string(),
            user_text: user_text.to_string(),
        }
    }

    async fn complete(&self, request: MockRequest) -> Result<String, ProviderError> {
        let mut tracker = self.tracker.lock().unwrap();
        tracker.call_count += 1;
        tracker.requests.push(request.user_text.clone());

        if tracker.should_fail {
            tracker.should_fail = false; // Reset for next call
            return match tracker.error_type {
                MockErrorType::Auth => {
                    Err(ProviderError::AuthenticationError("Invalid API key".into()))
                }
                MockErrorType::Connection => {
                    Err(ProviderError::ConnectionError("Connection failed".into()))
                }
                MockErrorType::RateLimit => {
                    Err(ProviderError::RateLimitExceeded("Rate limit exceeded".into()))
                }
                MockErrorType::Api => Err(ProviderError::ApiError {
                    status_code: 400,
                    message: "Bad request".into(),
                }),
            };
        }

        Ok(request.user_text.to_uppercase())
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn extract_text(response: &String) -> String {
        response.clone()
    }
}
