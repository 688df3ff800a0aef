//! Chunked document summarization through the completion service.

use sage_core::config::SummarizationConfig;
use sage_core::prompts::render_prompt;
use sage_core::{ModelProvider, Result, Summary};
use std::sync::Arc;

/// Summarizes the first few documents of a dataset.
///
/// Each document is cut into fixed-size character chunks; every chunk is
/// summarized on its own and multi-chunk documents get one extra merge call.
pub struct Summarizer {
    provider: Arc<dyn ModelProvider>,
    config: SummarizationConfig,
    temperature: f32,
}

impl Summarizer {
    /// Creates a summarizer chunking documents per `config`.
    pub fn new(provider: Arc<dyn ModelProvider>, config: SummarizationConfig) -> Self {
        Self {
            provider,
            config,
            temperature: 0.0,
        }
    }

    /// Overrides the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Summarizes up to `max_documents` of `texts`.
    ///
    /// `doc_id` is the document's index in `texts`. Documents with no text are
    /// passed over.
    ///
    /// # Errors
    /// Returns the first completion error; no partial result is kept.
    pub async fn summarize_texts(&self, texts: &[String]) -> Result<Vec<Summary>> {
        let mut summaries = Vec::new();

        for (doc_id, text) in texts.iter().enumerate().take(self.config.max_documents) {
            let chunks = chunk_text(text, self.config.chunk_chars, self.config.max_chunks);
            if chunks.is_empty() {
                tracing::debug!(doc_id, "Skipping empty document");
                continue;
            }

            let mut partials = Vec::with_capacity(chunks.len());
            for chunk in &chunks {
                partials.push(self.ask("summarize_chunk", chunk).await?);
            }

            let summary = if partials.len() == 1 {
                partials.remove(0)
            } else {
                self.ask("merge_summaries", &partials.join("\n")).await?
            };

            tracing::debug!(doc_id, chunks = chunks.len(), "Summarized document");
            summaries.push(Summary { doc_id, summary });
        }

        Ok(summaries)
    }

    async fn ask(&self, prompt_name: &str, text: &str) -> Result<String> {
        let prompt = render_prompt(prompt_name, &[("text", text)])?;
        let completion = self.provider.complete(&prompt, self.temperature).await?;
        Ok(completion.text.trim().to_owned())
    }
}

/// Splits `text` into at most `max_chunks` pieces of `chunk_chars` characters.
///
/// Pieces are trimmed and blank ones dropped before the limit applies.
pub fn chunk_text(text: &str, chunk_chars: usize, max_chunks: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(chunk_chars.max(1))
        .map(|piece| piece.iter().collect::<String>().trim().to_owned())
        .filter(|piece| !piece.is_empty())
        .take(max_chunks)
        .collect()
}
