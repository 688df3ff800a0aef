use sage_core::{Classifier, Dataset, Error, Features, Result};

/// Every `HOLDOUT_EVERY`-th sample is held out for testing.
const HOLDOUT_EVERY: usize = 5;

/// Held-out evaluation outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    /// Algorithm that was evaluated
    pub model: String,
    /// Fraction of held-out samples predicted correctly
    pub accuracy: f64,
    /// Rows used for fitting.
    pub train_size: usize,
    /// Rows held out for scoring.
    pub test_size: usize,
    /// Distinct labels in the dataset
    pub num_classes: usize,
}

/// Splits `n` row indices into `(train, test)`, holding out every fifth row.
pub fn holdout_split(n: usize) -> (Vec<usize>, Vec<usize>) {
    (0..n).partition(|idx| idx % HOLDOUT_EVERY != HOLDOUT_EVERY - 1)
}

/// Measures held-out accuracy for the kind of model stored in memory.
///
/// A fresh classifier from `fresh_model` is fitted on the training split and
/// scored on the held-out split, so the stored model (fitted on every row) is
/// never scored on its own training data.
///
/// # Errors
/// Returns [`Error::Precondition`] if the dataset, its labels, the features or
/// the trained model are missing, and [`Error::InvalidInput`] if the data is
/// too small to split or rows and labels disagree.
pub fn evaluate_classifier(
    dataset: Option<&Dataset>,
    features: Option<&Features>,
    model: Option<&dyn Classifier>,
    fresh_model: impl FnOnce() -> Box<dyn Classifier>,
) -> Result<EvaluationReport> {
    let dataset =
        dataset.ok_or_else(|| Error::Precondition("Dataset not available for evaluation".to_owned()))?;
    let features = features
        .ok_or_else(|| Error::Precondition("Features not available for evaluation".to_owned()))?;
    let model =
        model.ok_or_else(|| Error::Precondition("Model not trained before evaluation".to_owned()))?;
    let labels = dataset
        .labels
        .as_deref()
        .ok_or_else(|| Error::Precondition("Dataset has no labels to evaluate against".to_owned()))?;

    let matrix = &features.features;
    if matrix.n_rows() != labels.len() {
        return Err(Error::InvalidInput(format!(
            "{} feature rows but {} labels",
            matrix.n_rows(),
            labels.len()
        )));
    }

    let (train_idx, test_idx) = holdout_split(labels.len());
    if train_idx.is_empty() || test_idx.is_empty() {
        return Err(Error::InvalidInput(format!(
            "Need at least {HOLDOUT_EVERY} samples for a held-out split, got {}",
            labels.len()
        )));
    }

    let pick = |indices: &[usize]| indices.iter().map(|&idx| labels[idx]).collect::<Vec<_>>();
    let train_labels = pick(&train_idx);
    let test_labels = pick(&test_idx);

    let mut candidate = fresh_model();
    candidate.fit_matrix(&matrix.select_rows(&train_idx)?, &train_labels)?;
    let predictions = candidate.predict_matrix(&matrix.select_rows(&test_idx)?)?;

    let correct = predictions
        .iter()
        .zip(&test_labels)
        .filter(|(predicted, actual)| predicted == actual)
        .count();

    let mut distinct = labels.to_vec();
    distinct.sort_unstable();
    distinct.dedup();

    let report = EvaluationReport {
        model: model.name().to_owned(),
        accuracy: correct as f64 / test_labels.len() as f64,
        train_size: train_idx.len(),
        test_size: test_idx.len(),
        num_classes: distinct.len(),
    };
    tracing::info!(
        accuracy = report.accuracy,
        train_size = report.train_size,
        test_size = report.test_size,
        "Evaluated classifier"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MultinomialNaiveBayes;
    use sage_core::FeatureMatrix;

    fn fresh() -> Box<dyn Classifier> {
        Box::new(MultinomialNaiveBayes::new())
    }

    fn separable(n: usize) -> (Dataset, Features) {
        let labels: Vec<usize> = (0..n).map(|idx| idx % 2).collect();
        let rows = labels
            .iter()
            .map(|&label| vec![(label, 1.0)])
            .collect::<Vec<_>>();
        let dataset = Dataset::labelled(
            vec![String::new(); n],
            labels,
            vec!["even".to_owned(), "odd".to_owned()],
        );
        let features = Features {
            features: FeatureMatrix { n_cols: 2, rows },
            vocab_size: 2,
        };
        (dataset, features)
    }

    #[test]
    fn test_holdout_split() {
        let (train, test) = holdout_split(11);
        assert_eq!(test, vec![4, 9]);
        assert_eq!(train.len(), 9);
    }

    #[test]
    fn test_perfect_accuracy_on_separable_data() {
        let (dataset, features) = separable(20);
        let model = MultinomialNaiveBayes::new();
        let report =
            evaluate_classifier(Some(&dataset), Some(&features), Some(&model), fresh).unwrap();

        assert!((report.accuracy - 1.0).abs() < f64::EPSILON);
        assert_eq!(report.train_size, 16);
        assert_eq!(report.test_size, 4);
        assert_eq!(report.num_classes, 2);
        assert_eq!(report.model, "Multinomial Naive Bayes");
    }

    #[test]
    fn test_missing_model_is_precondition_error() {
        let (dataset, features) = separable(10);
        let err = evaluate_classifier(Some(&dataset), Some(&features), None, fresh).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn test_missing_features_is_precondition_error() {
        let (dataset, _) = separable(10);
        let model = MultinomialNaiveBayes::new();
        let err = evaluate_classifier(Some(&dataset), None, Some(&model), fresh).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn test_too_few_samples() {
        let (dataset, features) = separable(3);
        let model = MultinomialNaiveBayes::new();
        let err =
            evaluate_classifier(Some(&dataset), Some(&features), Some(&model), fresh).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
