//! Plan data model and shape validation.
//!
//! A plan is produced once per goal and is read-only afterwards. Execution
//! produces exactly one [`StepResult`] per [`Subtask`], in plan order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

use crate::{Error, Result};

/// One atomic unit of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    /// Identifier, unique within the plan
    pub id: i64,
    /// Natural-language description of the work
    pub task: String,
    /// Why the planner included this step (informational only)
    pub reason: String,
}

impl Subtask {
    /// Creates a subtask.
    pub fn new<T: Into<String>, R: Into<String>>(id: i64, task: T, reason: R) -> Self {
        Self {
            id,
            task: task.into(),
            reason: reason.into(),
        }
    }
}

/// Ordered decomposition of a goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Goal the plan was generated for.
    pub goal: String,
    /// Ordered subtasks, executed front to back.
    pub subtasks: Vec<Subtask>,
}

impl Plan {
    /// Validates a parsed JSON value and converts it into a plan.
    ///
    /// # Errors
    /// Returns [`Error::Schema`] if the value does not have the plan shape.
    pub fn from_value(value: Value) -> Result<Self> {
        validate_plan_schema(&value)?;
        serde_json::from_value(value).map_err(|err| Error::Schema(err.to_string()))
    }
}

/// Checks that `plan` has the shape `{goal, subtasks: [{id, task, reason}]}`.
///
/// Beyond key presence this rejects an empty goal, a non-integer `id`,
/// non-string `task`/`reason`, and `id`s repeated within the plan.
///
/// # Errors
/// Returns [`Error::Schema`] describing the first violation found.
pub fn validate_plan_schema(plan: &Value) -> Result<()> {
    let Value::Object(fields) = plan else {
        return Err(Error::Schema("Plan must be a JSON object".to_owned()));
    };

    let (Some(goal), Some(subtasks)) = (fields.get("goal"), fields.get("subtasks")) else {
        return Err(Error::Schema(
            "Missing required fields: goal and subtasks".to_owned(),
        ));
    };

    match goal.as_str() {
        Some(text) if !text.trim().is_empty() => {}
        Some(_) => return Err(Error::Schema("Goal must not be empty".to_owned())),
        None => return Err(Error::Schema("Goal must be a string".to_owned())),
    }

    let Value::Array(subtasks) = subtasks else {
        return Err(Error::Schema("Subtasks must be a list".to_owned()));
    };

    let mut seen_ids = HashSet::new();
    for (position, subtask) in subtasks.iter().enumerate() {
        let Value::Object(subtask) = subtask else {
            return Err(Error::Schema(format!(
                "Subtask at position {position} must be a JSON object"
            )));
        };
        let id = validate_subtask_fields(subtask, position)?;
        if !seen_ids.insert(id) {
            return Err(Error::Schema(format!("Duplicate subtask id {id}")));
        }
    }

    Ok(())
}

fn validate_subtask_fields(subtask: &Map<String, Value>, position: usize) -> Result<i64> {
    if !["id", "task", "reason"]
        .iter()
        .all(|key| subtask.contains_key(*key))
    {
        return Err(Error::Schema(format!(
            "Each subtask must contain id, task, and reason (position {position})"
        )));
    }

    let id = subtask["id"].as_i64().ok_or_else(|| {
        Error::Schema(format!(
            "Subtask id must be an integer (position {position})"
        ))
    })?;

    for key in ["task", "reason"] {
        if !subtask[key].is_string() {
            return Err(Error::Schema(format!(
                "Subtask {key} must be a string (id {id})"
            )));
        }
    }

    Ok(id)
}

/// Outcome category of one executed subtask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// The handler did its work.
    Success,
    /// Nothing to do: already computed or not applicable in this mode.
    Skipped,
    /// A precondition or collaborator failed; the plan continues.
    Failed,
    /// The intent has no handler.
    Unsupported,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Skipped => write!(f, "skipped"),
            Self::Failed => write!(f, "failed"),
            Self::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Result of executing one subtask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// Id of the subtask this result belongs to.
    pub task_id: i64,
    /// How the subtask ended.
    pub status: StepStatus,
    /// Human-readable summary or error detail
    pub output: String,
}

impl StepResult {
    /// Creates a result with an explicit status.
    pub fn new<T: Into<String>>(task_id: i64, status: StepStatus, output: T) -> Self {
        Self {
            task_id,
            status,
            output: output.into(),
        }
    }

    /// A handler ran and produced `output`.
    pub fn success<T: Into<String>>(task_id: i64, output: T) -> Self {
        Self::new(task_id, StepStatus::Success, output)
    }

    /// The handler did not apply or had already run.
    pub fn skipped<T: Into<String>>(task_id: i64, output: T) -> Self {
        Self::new(task_id, StepStatus::Skipped, output)
    }

    /// A handler's precondition or collaborator failed.
    pub fn failed<T: Into<String>>(task_id: i64, output: T) -> Self {
        Self::new(task_id, StepStatus::Failed, output)
    }

    /// No handler exists for the subtask's intent.
    pub fn unsupported<T: Into<String>>(task_id: i64, output: T) -> Self {
        Self::new(task_id, StepStatus::Unsupported, output)
    }
}
