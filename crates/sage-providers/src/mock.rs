//! Mock provider for testing agent runs.
//!
//! Allows defining canned responses for specific prompts, enabling
//! end-to-end testing of planning and execution without real API calls.

use async_trait::async_trait;
use sage_core::{Completion, Error, IgnoreLock as _, ModelProvider, Result, TokenUsage};
use std::sync::{Arc, Mutex};

/// What the mock returns when a pattern matches.
#[derive(Debug, Clone)]
enum MockReply {
    /// Completion text
    Text(String),
    /// Provider error message
    Fail(String),
}

/// Response storage type, checked in insertion order
type ReplyList = Arc<Mutex<Vec<(String, MockReply)>>>;

/// Mock provider that returns pre-defined responses based on prompt patterns.
///
/// Patterns are matched exactly first, then as substrings of the prompt, in
/// the order they were added.
#[derive(Clone)]
pub struct MockProvider {
    /// Name recorded in every completion
    name: String,
    /// Predefined replies keyed by prompt pattern
    replies: ReplyList,
    /// Default response if no match found
    default_response: Arc<Mutex<Option<String>>>,
    /// Call history for verification
    call_history: Arc<Mutex<Vec<String>>>,
    /// Reported by `is_available`
    available: bool,
}

impl MockProvider {
    /// Create a new mock provider with a given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replies: Arc::new(Mutex::new(Vec::new())),
            default_response: Arc::new(Mutex::new(None)),
            call_history: Arc::new(Mutex::new(Vec::new())),
            available: true,
        }
    }

    /// Add a pattern-based response to the mock provider.
    #[must_use]
    pub fn with_response(self, pattern: impl Into<String>, response: impl Into<String>) -> Self {
        self.replies
            .lock_ignore_poison()
            .push((pattern.into(), MockReply::Text(response.into())));
        self
    }

    /// Make prompts matching `pattern` fail with a provider error.
    #[must_use]
    pub fn with_failure(self, pattern: impl Into<String>, message: impl Into<String>) -> Self {
        self.replies
            .lock_ignore_poison()
            .push((pattern.into(), MockReply::Fail(message.into())));
        self
    }

    /// Set a default response for prompts that don't match any pattern.
    #[must_use]
    pub fn with_default_response(self, response: impl Into<String>) -> Self {
        *self.default_response.lock_ignore_poison() = Some(response.into());
        self
    }

    /// Set what `is_available` reports; defaults to `true`.
    #[must_use]
    pub const fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Clear the call history.
    pub fn clear_history(&self) {
        self.call_history.lock_ignore_poison().clear();
    }

    /// Get the call history (every prompt received, in order).
    #[must_use]
    pub fn get_call_history(&self) -> Vec<String> {
        self.call_history.lock_ignore_poison().clone()
    }

    /// Get the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_history.lock_ignore_poison().len()
    }

    /// Find a matching reply for the given prompt.
    fn find_reply(&self, prompt: &str) -> Option<MockReply> {
        let replies = self.replies.lock_ignore_poison();

        replies
            .iter()
            .find(|(pattern, _)| pattern == prompt)
            .or_else(|| replies.iter().find(|(pattern, _)| prompt.contains(pattern.as_str())))
            .map(|(_, reply)| reply.clone())
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn complete(&self, prompt: &str, _temperature: f32) -> Result<Completion> {
        self.call_history.lock_ignore_poison().push(prompt.to_owned());

        let text = match self.find_reply(prompt) {
            Some(MockReply::Text(text)) => text,
            Some(MockReply::Fail(message)) => return Err(Error::Provider(message)),
            None => self
                .default_response
                .lock_ignore_poison()
                .clone()
                .unwrap_or_else(|| format!("Mock response for prompt: {prompt}")),
        };

        Ok(Completion {
            tokens_used: TokenUsage {
                input: prompt.len() as u64,
                output: text.len() as u64,
            },
            text,
            provider: self.name.clone(),
            latency_ms: 0,
        })
    }
}
