//! Rate-limited calls to the generative service

use crate::error::ExtractorError;
use adscout_domain::traits::LlmProvider;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::time::{sleep, timeout};
use tracing::debug;

/// Sends prompts one at a time, pausing between consecutive calls
pub struct ExtractionClient<L: LlmProvider> {
    llm: L,
    cooldown: Duration,
    timeout: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl<L: LlmProvider> ExtractionClient<L> {
    /// Create a client with the given cool-down and per-call timeout
    pub fn new(llm: L, cooldown: Duration, timeout: Duration) -> Self {
        Self {
            llm,
            cooldown,
            timeout,
            last_call: Mutex::new(None),
        }
    }

    /// Name of the model behind the provider
    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Send one prompt and return the raw response text
    ///
    /// Waits out the remaining cool-down first. A failed or timed-out call
    /// still starts a new cool-down.
    pub async fn complete(&self, prompt: &str) -> Result<String, ExtractorError> {
        let wait = self.remaining_cooldown();
        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "Cooling down before next call");
            sleep(wait).await;
        }

        let result = timeout(self.timeout, self.llm.generate(prompt)).await;
        self.mark_call();

        match result {
            Err(_) => Err(ExtractorError::Timeout(self.timeout)),
            Ok(Err(e)) => Err(ExtractorError::Llm(e.to_string())),
            Ok(Ok(response)) => Ok(response),
        }
    }

    fn remaining_cooldown(&self) -> Duration {
        let last_call = match self.last_call.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        };
        last_call
            .map(|at| self.cooldown.saturating_sub(at.elapsed()))
            .unwrap_or(Duration::ZERO)
    }

    fn mark_call(&self) {
        let mut guard = match self.last_call.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(Instant::now());
    }
}
