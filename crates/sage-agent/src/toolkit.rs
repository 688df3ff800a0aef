//! Data collaborators the handlers call into.

use sage_core::{Classifier, Dataset, DatasetSource, DocumentSource, Result, SageConfig, Vectorizer};
use sage_tools::{DocumentFolder, MultinomialNaiveBayes, NewsgroupCorpus, TfidfVectorizer};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Builds an unfitted classifier.
pub type ClassifierFactory = Arc<dyn Fn() -> Box<dyn Classifier> + Send + Sync>;

/// Bundle of the dataset, document, vectorizer and classifier collaborators.
#[derive(Clone)]
pub struct Toolkit {
    datasets: Arc<dyn DatasetSource>,
    documents: Arc<dyn DocumentSource>,
    documents_dir: PathBuf,
    vectorizer: Arc<dyn Vectorizer>,
    classifier_factory: ClassifierFactory,
}

impl Toolkit {
    /// Bundles the collaborators handlers call into.
    pub fn new(
        datasets: Arc<dyn DatasetSource>,
        documents: Arc<dyn DocumentSource>,
        documents_dir: impl Into<PathBuf>,
        vectorizer: Arc<dyn Vectorizer>,
        classifier_factory: ClassifierFactory,
    ) -> Self {
        Self {
            datasets,
            documents,
            documents_dir: documents_dir.into(),
            vectorizer,
            classifier_factory,
        }
    }

    /// Standard collaborators: newsgroup corpus, document folder, TF-IDF and
    /// multinomial Naive Bayes.
    pub fn from_config(config: &SageConfig) -> Self {
        let corpus =
            NewsgroupCorpus::new(&config.data.corpus_dir).with_max_samples(config.data.max_samples);
        let vectorizer =
            TfidfVectorizer::new(config.features.max_features, config.features.stop_words);

        Self::new(
            Arc::new(corpus),
            Arc::new(DocumentFolder),
            &config.data.documents_dir,
            Arc::new(vectorizer),
            Arc::new(|| Box::new(MultinomialNaiveBayes::new()) as Box<dyn Classifier>),
        )
    }

    /// # Errors
    /// Propagates the dataset source's error.
    pub fn load_classification_dataset(&self) -> Result<Dataset> {
        self.datasets.load_classification_dataset()
    }

    /// Reads the configured documents folder.
    ///
    /// # Errors
    /// Propagates the document source's error.
    pub fn load_documents(&self) -> Result<Dataset> {
        self.documents.load_documents(&self.documents_dir)
    }

    /// Vectorizer used by `PREPROCESS_DATA`.
    pub fn vectorizer(&self) -> &dyn Vectorizer {
        self.vectorizer.as_ref()
    }

    /// Untrained classifier for one `TRAIN_MODEL` run.
    pub fn new_classifier(&self) -> Box<dyn Classifier> {
        (self.classifier_factory)()
    }
}

impl fmt::Debug for Toolkit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolkit")
            .field("documents_dir", &self.documents_dir)
            .finish_non_exhaustive()
    }
}
