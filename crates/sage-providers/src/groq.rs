use async_trait::async_trait;
use reqwest::Client;
use sage_core::config::{ENV_GROQ_API_KEY, ProviderConfig};
use sage_core::{Completion, Error, ModelProvider, Result, TokenUsage};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Instant;

/// Groq API endpoint URL.
const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// Default model for Groq.
const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
/// Default completion length cap.
const DEFAULT_MAX_TOKENS: usize = 2048;

/// Groq chat-completions provider.
pub struct GroqProvider {
    /// HTTP client for API requests.
    client: Client,
    /// Groq API key.
    api_key: String,
    /// Model name to use.
    model: String,
    /// Maximum number of tokens per completion.
    max_tokens: usize,
}

impl GroqProvider {
    /// Creates a new `GroqProvider` from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the `GROQ_API_KEY` environment variable is not set.
    pub fn new() -> Result<Self> {
        let api_key = env::var(ENV_GROQ_API_KEY)
            .map_err(|_| Error::MissingApiKey(ENV_GROQ_API_KEY.to_owned()))?;
        Self::with_api_key_direct(api_key)
    }

    /// Creates a new `GroqProvider` with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the provided API key is empty.
    pub fn with_api_key_direct(api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey(ENV_GROQ_API_KEY.to_owned()));
        }

        Ok(Self {
            client: Client::default(),
            api_key,
            model: DEFAULT_MODEL.to_owned(),
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    /// Creates a provider from configuration plus an already-resolved key.
    ///
    /// # Errors
    ///
    /// Returns an error if the provided API key is empty.
    pub fn from_config(config: &ProviderConfig, api_key: String) -> Result<Self> {
        Ok(Self::with_api_key_direct(api_key)?
            .with_model(config.model.clone())
            .with_max_tokens(config.max_tokens))
    }

    /// Sets the model to use for generation.
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Sets the completion length cap.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Returns the configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Request payload sent to the Groq chat completion API.
#[derive(Debug, Serialize)]
struct GroqRequest {
    /// Model identifier provided by the Groq service.
    model: String,
    /// Messages that form the conversation for the request.
    messages: Vec<GroqMessage>,
    /// Sampling temperature controlling response randomness.
    temperature: f32,
    /// Maximum number of tokens allowed in the completion.
    max_tokens: usize,
}

/// Message delivered to the Groq API.
#[derive(Debug, Serialize)]
struct GroqMessage {
    /// Role of the message author.
    role: String,
    /// Textual content of the message.
    content: String,
}

/// Response payload returned by Groq.
#[derive(Debug, Deserialize)]
struct GroqResponse {
    /// List of candidate completions.
    choices: Vec<GroqChoice>,
    /// Token accounting information for the request.
    #[serde(default)]
    usage: Option<GroqUsage>,
}

/// A single completion choice returned by Groq.
#[derive(Debug, Deserialize)]
struct GroqChoice {
    /// Message generated for the choice.
    message: GroqResponseMessage,
}

/// Response message containing the generated text.
#[derive(Debug, Deserialize)]
struct GroqResponseMessage {
    /// Generated text content; absent for refusals.
    #[serde(default)]
    content: Option<String>,
}

/// Token usage metrics for a Groq response.
#[derive(Debug, Deserialize)]
struct GroqUsage {
    /// Number of tokens in the prompt portion of the request.
    prompt_tokens: u64,
    /// Number of tokens produced in the completion.
    completion_tokens: u64,
}

impl GroqProvider {
    fn build_request(&self, prompt: &str, temperature: f32) -> GroqRequest {
        GroqRequest {
            model: self.model.clone(),
            messages: vec![GroqMessage {
                role: "user".to_owned(),
                content: prompt.to_owned(),
            }],
            temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Extracts the first choice's text and token usage from a parsed response.
fn completion_from_response(
    response: GroqResponse,
    model: &str,
    latency_ms: u64,
) -> Result<Completion> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| Error::InvalidResponse("No completion content from Groq".to_owned()))?;

    let tokens_used = response
        .usage
        .map(|usage| TokenUsage {
            input: usage.prompt_tokens,
            output: usage.completion_tokens,
        })
        .unwrap_or_default();

    Ok(Completion {
        text,
        tokens_used,
        provider: format!("Groq/{model}"),
        latency_ms,
    })
}

#[async_trait]
impl ModelProvider for GroqProvider {
    fn name(&self) -> &'static str {
        "Groq"
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn complete(&self, prompt: &str, temperature: f32) -> Result<Completion> {
        let start = Instant::now();
        let request = self.build_request(prompt, temperature);

        let response = self
            .client
            .post(GROQ_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|err| Error::Provider(format!("Groq API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_owned());
            return Err(Error::Provider(format!(
                "Groq API error {status}: {error_text}"
            )));
        }

        let groq_response: GroqResponse = response
            .json()
            .await
            .map_err(|err| Error::InvalidResponse(format!("Failed to parse Groq response: {err}")))?;

        let latency_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(model = %self.model, latency_ms, "Groq completion received");

        completion_from_response(groq_response, &self.model, latency_ms)
    }
}
