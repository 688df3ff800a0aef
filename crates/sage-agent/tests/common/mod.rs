//! Shared fixtures for agent integration tests.

#![allow(dead_code, reason = "Each test binary uses a different subset")]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc, reason = "Test fixtures")]

use sage_agent::{SubtaskExecutor, Toolkit};
use sage_core::config::SummarizationConfig;
use sage_core::{Classifier, Dataset, DatasetSource, Error, ModelProvider, Result, Subtask};
use sage_providers::MockProvider;
use sage_tools::{DocumentFolder, MultinomialNaiveBayes, TfidfVectorizer};
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub const SPACE_POSTS: &[&str] = &[
    "The shuttle launch reached orbit and the astronauts docked with the station.",
    "NASA plans a lunar orbit mission with a new rocket booster.",
    "Telescope images of the galaxy show the orbit of distant planets.",
    "The rocket engine test fired before the satellite launch window.",
    "Astronauts aboard the station repaired the satellite antenna in orbit.",
];

pub const AUTO_POSTS: &[&str] = &[
    "My car engine stalls when the transmission shifts into third gear.",
    "The dealer replaced the brakes and tires on my sedan.",
    "Which motor oil keeps a used car engine running smoothly?",
    "The sedan transmission needs new fluid and a clutch adjustment.",
    "Tires and brakes wear quickly when you drive the car hard.",
];

/// Task descriptions paired with the intent label the mock answers with.
pub const LOAD: &str = "fetch corpus";
pub const PREPROCESS: &str = "vectorize corpus";
pub const TRAIN: &str = "fit classifier";
pub const EVALUATE: &str = "score classifier";
pub const SUMMARIZE: &str = "condense documents";
pub const CHART: &str = "draw a chart";
pub const DEPLOY: &str = "deploy service";

/// Prompt fragment unique to the chunk summarization template.
pub const CHUNK_PROMPT: &str = "document excerpt";

/// Mock that classifies every task constant above.
pub fn intent_provider() -> MockProvider {
    MockProvider::new("test")
        .with_response(LOAD, "LOAD_DATASET")
        .with_response(PREPROCESS, "PREPROCESS_DATA")
        .with_response(TRAIN, "TRAIN_MODEL")
        .with_response(EVALUATE, "EVALUATE_MODEL")
        .with_response(SUMMARIZE, "SUMMARIZE_TEXT")
        .with_response(CHART, "OTHER")
        .with_response(DEPLOY, "DEPLOY_MODEL")
}

/// Intent mock that also answers summarization prompts.
pub fn provider() -> MockProvider {
    intent_provider().with_response(CHUNK_PROMPT, "A short summary.")
}

/// Ten posts over two interleaved classes.
pub fn labelled_dataset() -> Dataset {
    let mut texts = Vec::new();
    let mut labels = Vec::new();
    for (space, auto) in SPACE_POSTS.iter().zip(AUTO_POSTS) {
        texts.push((*space).to_owned());
        labels.push(0);
        texts.push((*auto).to_owned());
        labels.push(1);
    }
    Dataset::labelled(
        texts,
        labels,
        vec!["sci.space".to_owned(), "rec.autos".to_owned()],
    )
}

/// Dataset source returning a fixed dataset.
pub struct FixedDatasets(pub Dataset);

impl DatasetSource for FixedDatasets {
    fn load_classification_dataset(&self) -> Result<Dataset> {
        Ok(self.0.clone())
    }
}

/// Dataset source whose corpus is never there.
pub struct MissingDatasets;

impl DatasetSource for MissingDatasets {
    fn load_classification_dataset(&self) -> Result<Dataset> {
        Err(Error::NotFound("Corpus directory missing".to_owned()))
    }
}

pub fn write_documents(dir: &Path, documents: &[(&str, &str)]) {
    for (name, text) in documents {
        fs::write(dir.join(name), text).unwrap();
    }
}

pub fn toolkit_with(datasets: Arc<dyn DatasetSource>, documents_dir: &Path) -> Toolkit {
    Toolkit::new(
        datasets,
        Arc::new(DocumentFolder),
        documents_dir,
        Arc::new(TfidfVectorizer::default()),
        Arc::new(|| Box::new(MultinomialNaiveBayes::new()) as Box<dyn Classifier>),
    )
}

pub fn toolkit(documents_dir: &Path) -> Toolkit {
    toolkit_with(Arc::new(FixedDatasets(labelled_dataset())), documents_dir)
}

pub fn executor(provider: &Arc<MockProvider>, toolkit: Toolkit) -> SubtaskExecutor {
    SubtaskExecutor::new(
        Arc::clone(provider) as Arc<dyn ModelProvider>,
        toolkit,
        SummarizationConfig::default(),
    )
}

pub fn subtask(id: i64, task: &str) -> Subtask {
    Subtask::new(id, task, "needed for the goal")
}
