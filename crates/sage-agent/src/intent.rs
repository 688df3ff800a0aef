use sage_core::prompts::render_prompt;
use sage_core::{Intent, ModelProvider, Result};
use std::sync::Arc;

/// Labels a single subtask description with the operation it asks for.
pub struct IntentClassifier {
    provider: Arc<dyn ModelProvider>,
    temperature: f32,
}

impl IntentClassifier {
    /// Creates a classifier that samples deterministically.
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

    /// Classifies `task` into one of the closed intent labels.
    ///
    /// # Errors
    /// Returns an error if the completion request fails. An unrecognized label
    /// is not an error and comes back as [`Intent::Unsupported`].
    pub async fn classify_task_intent(&self, task: &str) -> Result<Intent> {
        let prompt = render_prompt("intent", &[("task", task)])?;
        let completion = self.provider.complete(&prompt, self.temperature).await?;
        let intent = Intent::from_label(&completion.text);

        if let Intent::Unsupported(label) = &intent {
            tracing::warn!(task, label = %label, "Model returned an unrecognized intent");
        } else {
            tracing::debug!(task, intent = %intent, "Classified task intent");
        }
        Ok(intent)
    }
}
