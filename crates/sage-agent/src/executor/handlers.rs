//! One function per intent.
//!
//! Every handler checks, in order: whether it applies to the research mode,
//! whether its output already exists, and whether its inputs are present.
//! The first check that fires decides the result and memory is left as is.
//! Memory is written only after the underlying operation succeeded.

use crate::memory::Memory;
use crate::summarize::Summarizer;
use crate::toolkit::Toolkit;
use sage_core::{Error, ResearchMode, StepResult};
use sage_tools::evaluate_classifier;
use serde_json::json;

/// Output text for a collaborator error.
fn failure_text(err: &Error) -> String {
    match err {
        Error::Precondition(message) => message.clone(),
        other => other.to_string(),
    }
}

/// Loads the labelled classification corpus into memory.
pub fn load_dataset(toolkit: &Toolkit, task_id: i64, memory: &mut Memory) -> StepResult {
    if memory.dataset.is_some() {
        return StepResult::skipped(task_id, "Dataset already loaded");
    }

    let summarization = memory.is_mode(&ResearchMode::TextSummarization);
    let loaded = if summarization {
        toolkit.load_documents()
    } else {
        toolkit.load_classification_dataset()
    };
    let dataset = match loaded {
        Ok(dataset) => dataset,
        Err(err) => return StepResult::failed(task_id, failure_text(&err)),
    };

    let output = if summarization {
        let count = dataset.num_documents.unwrap_or_else(|| dataset.len());
        format!("Loaded {count} documents for summarization")
    } else {
        format!("Loaded dataset with {} samples", dataset.len())
    };
    memory.dataset = Some(dataset);
    StepResult::success(task_id, output)
}

/// Vectorizes the loaded dataset into TF-IDF features.
pub fn preprocess_data(toolkit: &Toolkit, task_id: i64, memory: &mut Memory) -> StepResult {
    if memory.is_mode(&ResearchMode::TextSummarization) {
        return StepResult::skipped(task_id, "Preprocessing not applicable for summarization");
    }
    if memory.features.is_some() {
        return StepResult::skipped(task_id, "Data already preprocessed");
    }
    let Some(dataset) = memory.dataset.as_ref() else {
        return StepResult::failed(task_id, "Dataset not available for preprocessing");
    };

    let features = match toolkit.vectorizer().vectorize(&dataset.texts) {
        Ok(features) => features,
        Err(err) => return StepResult::failed(task_id, failure_text(&err)),
    };

    let vocab_size = features.vocab_size;
    memory.features = Some(features);
    StepResult::success(
        task_id,
        format!("Text data preprocessed into features ({vocab_size} terms)"),
    )
}

/// Fits a fresh classifier on the vectorized features.
pub fn train_model(toolkit: &Toolkit, task_id: i64, memory: &mut Memory) -> StepResult {
    if !memory.is_mode(&ResearchMode::TextClassification) {
        return StepResult::skipped(task_id, "Training not applicable for this research mode");
    }
    if memory.model.is_some() {
        return StepResult::skipped(task_id, "Model already trained");
    }
    let Some(features) = memory.features.as_ref() else {
        return StepResult::failed(task_id, "Features not available for training");
    };
    let Some(labels) = memory.dataset.as_ref().and_then(|dataset| dataset.labels.as_deref())
    else {
        return StepResult::failed(task_id, "Dataset labels not available for training");
    };

    let mut model = toolkit.new_classifier();
    if let Err(err) = model.fit_matrix(&features.features, labels) {
        return StepResult::failed(task_id, failure_text(&err));
    }

    let output = format!("{} model trained successfully", model.name());
    memory.model = Some(model);
    StepResult::success(task_id, output)
}

/// Scores the trained model on a held-out split.
///
/// Reports `success` when the evaluation ran and `failed` when an input is
/// missing, rather than a fixed `skipped`.
pub fn evaluate_model(toolkit: &Toolkit, task_id: i64, memory: &mut Memory) -> StepResult {
    if !memory.is_mode(&ResearchMode::TextClassification) {
        return StepResult::skipped(task_id, "Evaluation not applicable for this research mode");
    }
    if memory.observation("accuracy").is_some() {
        return StepResult::skipped(task_id, "Model already evaluated");
    }

    let report = match evaluate_classifier(
        memory.dataset.as_ref(),
        memory.features.as_ref(),
        memory.model.as_deref(),
        || toolkit.new_classifier(),
    ) {
        Ok(report) => report,
        Err(err) => return StepResult::failed(task_id, failure_text(&err)),
    };

    let observations = memory.observations_mut();
    observations.insert("accuracy".to_owned(), json!(report.accuracy));
    observations.insert("train_size".to_owned(), json!(report.train_size));
    observations.insert("test_size".to_owned(), json!(report.test_size));
    observations.insert("num_classes".to_owned(), json!(report.num_classes));

    StepResult::success(
        task_id,
        format!(
            "{} accuracy {:.3} on {} held-out samples",
            report.model, report.accuracy, report.test_size
        ),
    )
}

/// Summarizes every document in the configured folder, loading it first if needed.
pub async fn summarize_text(
    toolkit: &Toolkit,
    summarizer: &Summarizer,
    task_id: i64,
    memory: &mut Memory,
) -> StepResult {
    if memory.summaries.is_some() {
        return StepResult::skipped(task_id, "Summaries already generated");
    }

    if memory.dataset.is_none() {
        if !memory.is_mode(&ResearchMode::TextSummarization) {
            return StepResult::failed(task_id, "No dataset available for summarization");
        }
        let dataset = match toolkit.load_documents() {
            Ok(dataset) => dataset,
            Err(err) => return StepResult::failed(task_id, failure_text(&err)),
        };
        tracing::info!(documents = dataset.len(), "Loaded documents on demand");
        memory.dataset = Some(dataset);
    }
    let Some(dataset) = memory.dataset.as_ref() else {
        return StepResult::failed(task_id, "No dataset available for summarization");
    };

    let summaries = match summarizer.summarize_texts(&dataset.texts).await {
        Ok(summaries) => summaries,
        Err(err) => return StepResult::failed(task_id, failure_text(&err)),
    };

    let count = summaries.len();
    memory.summaries = Some(summaries);
    memory
        .observations_mut()
        .insert("num_summaries".to_owned(), json!(count));
    StepResult::success(task_id, format!("Generated summaries for {count} documents"))
}
