//! Per-subtask execution: classify the intent, then dispatch to its handler.

mod handlers;

use crate::intent::IntentClassifier;
use crate::memory::Memory;
use crate::summarize::Summarizer;
use crate::toolkit::Toolkit;
use sage_core::config::SummarizationConfig;
use sage_core::{Intent, ModelProvider, Result, StepResult, StepStatus, Subtask};
use std::sync::Arc;

/// Routes subtasks to intent handlers over shared memory.
pub struct SubtaskExecutor {
    intents: IntentClassifier,
    summarizer: Summarizer,
    toolkit: Toolkit,
}

impl SubtaskExecutor {
    /// Builds an executor that classifies with `provider` and runs handlers over `toolkit`.
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        toolkit: Toolkit,
        summarization: SummarizationConfig,
    ) -> Self {
        Self {
            intents: IntentClassifier::new(Arc::clone(&provider)),
            summarizer: Summarizer::new(provider, summarization),
            toolkit,
        }
    }

    /// Sets the sampling temperature for classification and summarization.
    #[must_use]
    pub fn with_temperature(self, temperature: f32) -> Self {
        Self {
            intents: self.intents.with_temperature(temperature),
            summarizer: self.summarizer.with_temperature(temperature),
            toolkit: self.toolkit,
        }
    }

    /// Classifies `subtask` and runs the matching handler against `memory`.
    ///
    /// Handler outcomes, including failures of the data collaborators, are
    /// reported through the returned [`StepResult`].
    ///
    /// # Errors
    /// Returns an error only when intent classification itself fails.
    pub async fn execute_subtask(&self, subtask: &Subtask, memory: &mut Memory) -> Result<StepResult> {
        let intent = self.intents.classify_task_intent(&subtask.task).await?;
        tracing::info!(task_id = subtask.id, task = %subtask.task, intent = %intent, "Executing subtask");

        let result = self.execute_intent(subtask.id, &intent, memory).await;
        match result.status {
            StepStatus::Failed => {
                tracing::warn!(task_id = result.task_id, output = %result.output, "Subtask failed");
            }
            status => {
                tracing::info!(task_id = result.task_id, %status, output = %result.output, "Subtask finished");
            }
        }
        Ok(result)
    }

    /// Runs the handler for an already-classified intent.
    pub async fn execute_intent(&self, task_id: i64, intent: &Intent, memory: &mut Memory) -> StepResult {
        match intent {
            Intent::LoadDataset => handlers::load_dataset(&self.toolkit, task_id, memory),
            Intent::PreprocessData => handlers::preprocess_data(&self.toolkit, task_id, memory),
            Intent::TrainModel => handlers::train_model(&self.toolkit, task_id, memory),
            Intent::EvaluateModel => handlers::evaluate_model(&self.toolkit, task_id, memory),
            Intent::SummarizeText => {
                handlers::summarize_text(&self.toolkit, &self.summarizer, task_id, memory).await
            }
            Intent::Other | Intent::Unsupported(_) => {
                StepResult::unsupported(task_id, format!("Intent classified as {intent}"))
            }
        }
    }
}
