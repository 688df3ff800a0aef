use crate::executor::SubtaskExecutor;
use crate::memory::Memory;
use sage_core::{Plan, Result, StepResult};

/// Runs every subtask of a plan in order over one shared memory.
pub struct PlanExecutor {
    executor: SubtaskExecutor,
}

impl PlanExecutor {
    /// Runs plans one subtask at a time through `executor`.
    pub fn new(executor: SubtaskExecutor) -> Self {
        Self { executor }
    }

    /// Executes `plan` sequentially, starting from `memory`.
    ///
    /// Returns one result per subtask in plan order along with the final
    /// memory. A failed or skipped step does not stop the steps after it.
    ///
    /// # Errors
    /// Returns an error if classifying any subtask's intent fails; results
    /// gathered up to that point are discarded.
    pub async fn execute_plan(&self, plan: &Plan, mut memory: Memory) -> Result<(Vec<StepResult>, Memory)> {
        let mut results = Vec::with_capacity(plan.subtasks.len());

        for subtask in &plan.subtasks {
            let result = self.executor.execute_subtask(subtask, &mut memory).await?;
            results.push(result);
        }

        tracing::info!(
            steps = results.len(),
            memory = ?memory.keys(),
            "Plan execution finished"
        );
        Ok((results, memory))
    }
}
