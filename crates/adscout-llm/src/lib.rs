//! AdScout LLM Provider Layer
//!
//! Pluggable text-generation providers behind the `LlmProvider` trait from
//! `adscout-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Ollama-compatible `/api/generate` endpoint
//!
//! # Examples
//!
//! ```
//! use adscout_llm::MockProvider;
//! use adscout_domain::traits::LlmProvider;
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = rt.block_on(provider.generate("test prompt")).unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod ollama;

use adscout_domain::traits::LlmProvider as LlmProviderTrait;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Scripted reply for the mock's queue
#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail,
}

/// Mock LLM provider for deterministic testing
///
/// Replies are chosen in this order: a response registered for the exact
/// prompt, the next queued reply, then the default response.
///
/// # Examples
///
/// ```
/// use adscout_llm::MockProvider;
/// use adscout_domain::traits::LlmProvider;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
///
/// // Queued replies are consumed one call at a time
/// let provider = MockProvider::new("fallback");
/// provider.push_response("first");
/// provider.push_error();
/// assert_eq!(rt.block_on(provider.generate("a")).unwrap(), "first");
/// assert!(rt.block_on(provider.generate("b")).is_err());
/// assert_eq!(rt.block_on(provider.generate("c")).unwrap(), "fallback");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    queue: Arc<Mutex<VecDeque<Scripted>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), response.into());
    }

    /// Queue a reply for the next call
    pub fn push_response(&self, response: impl Into<String>) {
        self.queue
            .lock()
            .unwrap()
            .push_back(Scripted::Reply(response.into()));
    }

    /// Queue a failure for the next call
    pub fn push_error(&self) {
        self.queue.lock().unwrap().push_back(Scripted::Fail);
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(response) = self.responses.lock().unwrap().get(prompt) {
            return Ok(response.clone());
        }

        match self.queue.lock().unwrap().pop_front() {
            Some(Scripted::Reply(response)) => Ok(response),
            Some(Scripted::Fail) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt").await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("hello").await.unwrap(), "world");
        assert_eq!(provider.generate("foo").await.unwrap(), "bar");
        assert_eq!(
            provider.generate("unknown").await.unwrap(),
            "Default mock response"
        );
    }

    #[tokio::test]
    async fn test_mock_provider_queue_order() {
        let provider = MockProvider::new("default");
        provider.push_error();
        provider.push_response("second");

        assert!(matches!(
            provider.generate("p1").await,
            Err(LlmError::Other(_))
        ));
        assert_eq!(provider.generate("p2").await.unwrap(), "second");
        assert_eq!(provider.generate("p3").await.unwrap(), "default");
    }

    #[tokio::test]
    async fn test_mock_provider_records_prompts() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1").await.unwrap();
        provider.generate("prompt2").await.unwrap();

        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.prompts(), vec!["prompt1", "prompt2"]);
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test").await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
