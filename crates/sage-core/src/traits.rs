use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;

use crate::{Completion, Dataset, FeatureMatrix, Features, Result};

/// Text-completion service used for planning, classification and summarization.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Returns the unique identifier for this provider.
    fn name(&self) -> &'static str;

    /// Checks whether this provider is currently available and ready to process requests.
    async fn is_available(&self) -> bool;

    /// Completes `prompt` at the given sampling temperature.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unavailable, the request fails,
    /// or the response cannot be parsed.
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<Completion>;
}

/// Provides the labelled corpus used in classification mode.
pub trait DatasetSource: Send + Sync {
    /// # Errors
    /// Returns an error if the corpus cannot be located or read.
    fn load_classification_dataset(&self) -> Result<Dataset>;
}

/// Reads a folder of documents into one text per document.
pub trait DocumentSource: Send + Sync {
    /// # Errors
    /// Returns [`crate::Error::NotFound`] if `folder` does not exist.
    fn load_documents(&self, folder: &Path) -> Result<Dataset>;
}

/// Turns raw texts into a feature matrix.
pub trait Vectorizer: Send + Sync {
    /// # Errors
    /// Returns an error if the texts yield no usable vocabulary.
    fn vectorize(&self, texts: &[String]) -> Result<Features>;
}

/// A model with a fit/predict contract over dense feature rows.
pub trait Classifier: Debug + Send + Sync {
    /// Short human-readable algorithm name.
    fn name(&self) -> &'static str;

    /// Fits the model on `rows` against `labels`.
    ///
    /// # Errors
    /// Returns an error if `rows` and `labels` disagree in length or are empty.
    fn fit(&mut self, rows: &[Vec<f64>], labels: &[usize]) -> Result<()>;

    /// Predicts one label per row.
    ///
    /// # Errors
    /// Returns an error if the model has not been fitted or row widths mismatch.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<usize>>;

    /// Fits on a sparse matrix by densifying it first.
    ///
    /// # Errors
    /// See [`Classifier::fit`].
    fn fit_matrix(&mut self, matrix: &FeatureMatrix, labels: &[usize]) -> Result<()> {
        self.fit(&matrix.to_dense(), labels)
    }

    /// Predicts on a sparse matrix by densifying it first.
    ///
    /// # Errors
    /// See [`Classifier::predict`].
    fn predict_matrix(&self, matrix: &FeatureMatrix) -> Result<Vec<usize>> {
        self.predict(&matrix.to_dense())
    }
}
