//! Closed label sets produced by the classifiers.
//!
//! Model output is free text, so parsing never fails: labels outside the
//! known set are kept verbatim in an explicit catch-all variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalizes a raw label: trims whitespace and stray punctuation, upper-cases,
/// and turns spaces and hyphens into underscores.
fn normalize_label(raw: &str) -> String {
    raw.trim()
        .trim_matches(|ch: char| matches!(ch, '`' | '"' | '\'' | '.' | '*'))
        .trim()
        .to_uppercase()
        .replace([' ', '-'], "_")
}

/// High-level research category that gates which handlers apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResearchMode {
    /// Train and evaluate a text classifier.
    TextClassification,
    /// Summarize a collection of documents.
    TextSummarization,
    /// Inspect a dataset without modelling it.
    DataExploration,
    /// Label returned by the model that is not in the closed set.
    Unknown(String),
}

impl ResearchMode {
    /// Labels offered to the model, in prompt order.
    pub const LABELS: [&'static str; 3] =
        ["TEXT_CLASSIFICATION", "TEXT_SUMMARIZATION", "DATA_EXPLORATION"];

    /// Parses a model completion into a mode.
    pub fn from_label(raw: &str) -> Self {
        match normalize_label(raw).as_str() {
            "TEXT_CLASSIFICATION" => Self::TextClassification,
            "TEXT_SUMMARIZATION" => Self::TextSummarization,
            "DATA_EXPLORATION" => Self::DataExploration,
            _ => Self::Unknown(raw.trim().to_owned()),
        }
    }

    /// Returns the canonical label.
    #[must_use]
    pub fn as_label(&self) -> &str {
        match self {
            Self::TextClassification => "TEXT_CLASSIFICATION",
            Self::TextSummarization => "TEXT_SUMMARIZATION",
            Self::DataExploration => "DATA_EXPLORATION",
            Self::Unknown(raw) => raw,
        }
    }

    /// False for labels outside the closed set.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for ResearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// What kind of operation a subtask represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Fetch the classification corpus.
    LoadDataset,
    /// Vectorize the loaded texts.
    PreprocessData,
    /// Fit a classifier on the features.
    TrainModel,
    /// Score the classifier on a held-out split.
    EvaluateModel,
    /// Summarize the documents folder.
    SummarizeText,
    /// The model judged the task outside every handler.
    Other,
    /// Label returned by the model that is not in the closed set.
    Unsupported(String),
}

impl Intent {
    /// Labels offered to the model, in prompt order.
    pub const LABELS: [&'static str; 6] = [
        "LOAD_DATASET",
        "PREPROCESS_DATA",
        "TRAIN_MODEL",
        "EVALUATE_MODEL",
        "SUMMARIZE_TEXT",
        "OTHER",
    ];

    /// Parses a model completion into an intent.
    pub fn from_label(raw: &str) -> Self {
        match normalize_label(raw).as_str() {
            "LOAD_DATASET" => Self::LoadDataset,
            "PREPROCESS_DATA" => Self::PreprocessData,
            "TRAIN_MODEL" => Self::TrainModel,
            "EVALUATE_MODEL" => Self::EvaluateModel,
            "SUMMARIZE_TEXT" => Self::SummarizeText,
            "OTHER" => Self::Other,
            _ => Self::Unsupported(raw.trim().to_owned()),
        }
    }

    /// Returns the canonical label.
    #[must_use]
    pub fn as_label(&self) -> &str {
        match self {
            Self::LoadDataset => "LOAD_DATASET",
            Self::PreprocessData => "PREPROCESS_DATA",
            Self::TrainModel => "TRAIN_MODEL",
            Self::EvaluateModel => "EVALUATE_MODEL",
            Self::SummarizeText => "SUMMARIZE_TEXT",
            Self::Other => "OTHER",
            Self::Unsupported(raw) => raw,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
