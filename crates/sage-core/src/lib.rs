//! Core types and traits for the sage research agent.
//!
//! This crate provides the error taxonomy, the plan and label data model,
//! configuration, embedded prompts, and the traits behind which the completion
//! service and the data collaborators sit.

/// Configuration loading and defaults.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// Research mode and intent label sets.
pub mod labels;
/// Plan, subtask and step result types.
pub mod plan;
/// Embedded prompt templates.
pub mod prompts;
/// Lock helpers.
pub mod sync;
/// Trait definitions for the completion service and data collaborators.
pub mod traits;
/// Core data types for completions, datasets and features.
pub mod types;

pub use config::SageConfig;
pub use error::{Error, Result};
pub use labels::{Intent, ResearchMode};
pub use plan::{Plan, StepResult, StepStatus, Subtask, validate_plan_schema};
pub use sync::IgnoreLock;
pub use traits::{Classifier, DatasetSource, DocumentSource, ModelProvider, Vectorizer};
pub use types::{Completion, Dataset, FeatureMatrix, Features, Summary, TokenUsage};
