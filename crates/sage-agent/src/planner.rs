//! Goal decomposition into an ordered, schema-checked plan.

use sage_core::prompts::render_prompt;
use sage_core::{Error, ModelProvider, Plan, Result};
use serde_json::Value;
use std::sync::Arc;

/// Asks the model to break a goal into subtasks and validates the answer.
pub struct PlanGenerator {
    provider: Arc<dyn ModelProvider>,
    temperature: f32,
}

impl PlanGenerator {
    /// Creates a planner with the default planning temperature.
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

    /// Generates a plan for `goal`.
    ///
    /// # Errors
    /// - [`Error::InvalidInput`] if `goal` is blank
    /// - [`Error::Parse`] if the completion is not a JSON document
    /// - [`Error::Schema`] if the document does not have the plan shape
    /// - any provider error from the completion request
    pub async fn generate_plan(&self, goal: &str) -> Result<Plan> {
        if goal.trim().is_empty() {
            return Err(Error::InvalidInput("Goal must not be empty".to_owned()));
        }

        let prompt = render_prompt("planner", &[("goal", goal)])?;
        let completion = self.provider.complete(&prompt, self.temperature).await?;
        let plan = parse_plan(&completion.text)?;

        tracing::info!(
            goal = %plan.goal,
            subtasks = plan.subtasks.len(),
            "Generated plan"
        );
        Ok(plan)
    }
}

/// Parses raw planner output into a validated plan.
///
/// Only surrounding whitespace is tolerated; prose or markdown fences around
/// the JSON are rejected.
///
/// # Errors
/// Returns [`Error::Parse`] carrying the raw text when the output is not JSON,
/// or [`Error::Schema`] when it is JSON of the wrong shape.
pub fn parse_plan(raw: &str) -> Result<Plan> {
    let value: Value = serde_json::from_str(raw.trim()).map_err(|err| {
        tracing::error!(error = %err, "Planner returned invalid JSON");
        tracing::error!(raw, "Raw planner output");
        Error::Parse {
            message: format!("Invalid planner output: {err}"),
            raw: raw.to_owned(),
        }
    })?;
    Plan::from_value(value)
}
