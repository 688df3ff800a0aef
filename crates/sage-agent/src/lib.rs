//! Agent runtime: research mode inference, planning, and intent-dispatched
//! execution of subtasks over shared memory.

/// Per-subtask intent dispatch.
pub mod executor;
/// Subtask intent classification.
pub mod intent;
/// Shared execution memory.
pub mod memory;
/// Research mode inference.
pub mod mode;
/// Whole-run wiring.
pub mod orchestrator;
/// Sequential plan execution.
pub mod plan_executor;
/// Plan generation and parsing.
pub mod planner;
/// Chunked summarization.
pub mod summarize;
/// Data collaborators used by the handlers.
pub mod toolkit;

pub use executor::SubtaskExecutor;
pub use intent::IntentClassifier;
pub use memory::{Memory, Observations};
pub use mode::ModeInferencer;
pub use orchestrator::{Orchestrator, RunReport};
pub use plan_executor::PlanExecutor;
pub use planner::{PlanGenerator, parse_plan};
pub use summarize::Summarizer;
pub use toolkit::{ClassifierFactory, Toolkit};
