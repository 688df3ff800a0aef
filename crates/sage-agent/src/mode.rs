use sage_core::prompts::render_prompt;
use sage_core::{ModelProvider, ResearchMode, Result};
use std::sync::Arc;

/// Maps a goal to the research mode that gates handler applicability.
pub struct ModeInferencer {
    provider: Arc<dyn ModelProvider>,
    temperature: f32,
}

impl ModeInferencer {
    /// Creates an inferencer that samples deterministically.
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            temperature: 0.0,
        }
    }

    /// Overrides the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Asks the model which research mode `goal` belongs to.
    ///
    /// Labels outside the closed set come back as [`ResearchMode::Unknown`],
    /// under which no mode-gated handler applies.
    ///
    /// # Errors
    /// Returns an error if the completion request fails.
    pub async fn infer_research_mode(&self, goal: &str) -> Result<ResearchMode> {
        let prompt = render_prompt("research_mode", &[("goal", goal)])?;
        let completion = self.provider.complete(&prompt, self.temperature).await?;
        let mode = ResearchMode::from_label(&completion.text);

        if mode.is_known() {
            tracing::info!(mode = %mode, "Inferred research mode");
        } else {
            tracing::warn!(label = %mode, "Model returned an unknown research mode");
        }
        Ok(mode)
    }
}
