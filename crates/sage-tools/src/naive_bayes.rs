use sage_core::{Classifier, Error, Result};

/// Multinomial Naive Bayes with Laplace (+1) smoothing.
///
/// Labels are arbitrary `usize` values; the distinct labels seen during
/// `fit` become the model's classes, in ascending order.
#[derive(Debug, Clone, Default)]
pub struct MultinomialNaiveBayes {
    classes: Vec<usize>,
    class_log_prior: Vec<f64>,
    /// One row per class, one column per feature.
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNaiveBayes {
    /// Creates an unfitted model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Class labels seen during fitting, sorted.
    #[must_use]
    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    /// True once `fit` has succeeded.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.classes.is_empty()
    }

    fn n_features(&self) -> usize {
        self.feature_log_prob.first().map_or(0, Vec::len)
    }
}

impl Classifier for MultinomialNaiveBayes {
    fn name(&self) -> &'static str {
        "Multinomial Naive Bayes"
    }

    fn fit(&mut self, rows: &[Vec<f64>], labels: &[usize]) -> Result<()> {
        if rows.is_empty() {
            return Err(Error::InvalidInput("Cannot fit on zero samples".to_owned()));
        }
        if rows.len() != labels.len() {
            return Err(Error::InvalidInput(format!(
                "{} samples but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        let n_features = rows[0].len();
        if rows.iter().any(|row| row.len() != n_features) {
            return Err(Error::InvalidInput("Rows differ in width".to_owned()));
        }

        let mut classes = labels.to_vec();
        classes.sort_unstable();
        classes.dedup();

        let mut class_count = vec![0.0_f64; classes.len()];
        let mut feature_count = vec![vec![0.0_f64; n_features]; classes.len()];
        for (row, label) in rows.iter().zip(labels) {
            // `classes` holds every label, so the search always succeeds
            let Ok(class_idx) = classes.binary_search(label) else {
                continue;
            };
            class_count[class_idx] += 1.0;
            for (total, value) in feature_count[class_idx].iter_mut().zip(row) {
                *total += value;
            }
        }

        let n_samples: f64 = class_count.iter().sum();
        self.class_log_prior = class_count
            .iter()
            .map(|count| (count / n_samples).ln())
            .collect();
        self.feature_log_prob = feature_count
            .into_iter()
            .map(|counts| {
                let smoothed: Vec<f64> = counts.into_iter().map(|count| count + 1.0).collect();
                let total: f64 = smoothed.iter().sum();
                smoothed.into_iter().map(|count| (count / total).ln()).collect()
            })
            .collect();
        self.classes = classes;

        tracing::debug!(
            samples = rows.len(),
            classes = self.classes.len(),
            features = n_features,
            "Fitted Naive Bayes"
        );
        Ok(())
    }

    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<usize>> {
        if !self.is_fitted() {
            return Err(Error::Precondition("Model has not been fitted".to_owned()));
        }
        let n_features = self.n_features();

        rows.iter()
            .map(|row| {
                if row.len() != n_features {
                    return Err(Error::InvalidInput(format!(
                        "Expected {n_features} features, got {}",
                        row.len()
                    )));
                }

                let best = self
                    .feature_log_prob
                    .iter()
                    .zip(&self.class_log_prior)
                    .map(|(log_prob, prior)| {
                        row.iter().zip(log_prob).map(|(x, lp)| x * lp).sum::<f64>() + prior
                    })
                    .enumerate()
                    .fold((0, f64::NEG_INFINITY), |best, (idx, score)| {
                        if score > best.1 { (idx, score) } else { best }
                    });

                Ok(self.classes[best.0])
            })
            .collect()
    }
}
