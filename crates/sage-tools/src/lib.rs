//! Data collaborators used by the agent's handlers.
//!
//! Each type here implements one of the `sage-core` collaborator traits:
//! corpus and document loading, TF-IDF vectorization, a multinomial Naive
//! Bayes classifier, and held-out evaluation.

/// Category-per-folder classification corpus.
pub mod corpus;
/// PDF and plain-text document folders.
pub mod documents;
/// Held-out accuracy evaluation.
pub mod evaluation;
/// Multinomial Naive Bayes classifier.
pub mod naive_bayes;
/// TF-IDF vectorizer.
pub mod tfidf;

pub use corpus::NewsgroupCorpus;
pub use documents::DocumentFolder;
pub use evaluation::{EvaluationReport, evaluate_classifier, holdout_split};
pub use naive_bayes::MultinomialNaiveBayes;
pub use tfidf::TfidfVectorizer;
