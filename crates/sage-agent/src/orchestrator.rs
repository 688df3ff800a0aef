//! End-to-end run: goal to mode, plan and step results.

use crate::executor::SubtaskExecutor;
use crate::memory::Memory;
use crate::mode::ModeInferencer;
use crate::plan_executor::PlanExecutor;
use crate::planner::PlanGenerator;
use crate::toolkit::Toolkit;
use sage_core::{Error, ModelProvider, Plan, ResearchMode, Result, SageConfig, StepResult};
use std::sync::Arc;

/// Everything one run produced.
#[derive(Debug)]
pub struct RunReport {
    /// Mode inferred for the goal.
    pub research_mode: ResearchMode,
    /// Plan that was executed.
    pub plan: Plan,
    /// One result per subtask, in plan order.
    pub results: Vec<StepResult>,
    /// Memory as it stood after the last subtask.
    pub memory: Memory,
}

/// Wires mode inference, planning and plan execution around one provider.
pub struct Orchestrator {
    provider: Arc<dyn ModelProvider>,
    modes: ModeInferencer,
    planner: PlanGenerator,
    plans: PlanExecutor,
}

impl Orchestrator {
    /// Wires every stage to `provider`, using the temperatures from `config`.
    pub fn new(provider: Arc<dyn ModelProvider>, toolkit: Toolkit, config: &SageConfig) -> Self {
        let temperature = config.provider.temperature;
        let executor =
            SubtaskExecutor::new(Arc::clone(&provider), toolkit, config.summarization.clone())
                .with_temperature(temperature);

        Self {
            modes: ModeInferencer::new(Arc::clone(&provider)).with_temperature(temperature),
            planner: PlanGenerator::new(Arc::clone(&provider)).with_temperature(temperature),
            plans: PlanExecutor::new(executor),
            provider,
        }
    }

    /// Fails fast when the provider reports it cannot serve requests.
    async fn ensure_available(&self) -> Result<()> {
        if self.provider.is_available().await {
            Ok(())
        } else {
            Err(Error::Provider(format!(
                "Provider {} is not available",
                self.provider.name()
            )))
        }
    }

    /// Checks the provider, infers the research mode for `goal` and generates
    /// its plan. Nothing is executed yet.
    ///
    /// # Errors
    /// Returns an error if the provider is unavailable, or mode inference or
    /// planning fails.
    pub async fn prepare(&self, goal: &str) -> Result<(ResearchMode, Plan)> {
        tracing::info!(goal, "Starting run");

        self.ensure_available().await?;
        let research_mode = self.modes.infer_research_mode(goal).await?;
        let plan = self.planner.generate_plan(goal).await?;
        Ok((research_mode, plan))
    }

    /// Executes `plan` from fresh memory seeded with `research_mode`.
    ///
    /// # Errors
    /// Returns an error if any intent classification fails.
    pub async fn execute(&self, research_mode: ResearchMode, plan: Plan) -> Result<RunReport> {
        let memory = Memory::with_research_mode(research_mode.clone());
        let (results, memory) = self.plans.execute_plan(&plan, memory).await?;

        Ok(RunReport {
            research_mode,
            plan,
            results,
            memory,
        })
    }
}
