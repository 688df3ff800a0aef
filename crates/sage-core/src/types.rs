use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A completion returned by a model provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    /// Generated text.
    pub text: String,
    /// Token counts reported by the provider.
    pub tokens_used: TokenUsage,
    /// Name of the provider that served the request.
    pub provider: String,
    /// Wall-clock request time.
    pub latency_ms: u64,
}

/// Prompt and completion token counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens.
    pub input: u64,
    /// Completion tokens.
    pub output: u64,
}

impl TokenUsage {
    /// Prompt plus completion tokens.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.input + self.output
    }
}

/// A text corpus held in memory.
///
/// Classification corpora carry `labels` and `label_names`; document folders
/// carry `source` and `num_documents`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// One entry per document or sample.
    pub texts: Vec<String>,
    /// Class index per text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<usize>>,
    /// Class names indexed by label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_names: Option<Vec<String>>,
    /// Folder the documents were read from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Number of documents read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_documents: Option<usize>,
}

impl Dataset {
    /// Builds a labelled classification dataset.
    pub fn labelled(texts: Vec<String>, labels: Vec<usize>, label_names: Vec<String>) -> Self {
        Self {
            texts,
            labels: Some(labels),
            label_names: Some(label_names),
            source: None,
            num_documents: None,
        }
    }

    /// Builds an unlabelled document collection read from `source`.
    pub fn documents<T: Into<String>>(texts: Vec<String>, source: T) -> Self {
        let num_documents = texts.len();
        Self {
            texts,
            labels: None,
            label_names: None,
            source: Some(source.into()),
            num_documents: Some(num_documents),
        }
    }

    /// Number of texts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// True when there are no texts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Row-major sparse matrix of non-negative feature weights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    /// Number of columns.
    pub n_cols: usize,
    /// One entry per row: `(column, value)` pairs sorted by column.
    pub rows: Vec<Vec<(usize, f64)>>,
}

impl FeatureMatrix {
    /// Number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Expands every row into a dense vector of length `n_cols`.
    #[must_use]
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| {
                let mut dense = vec![0.0; self.n_cols];
                for &(col, value) in row {
                    dense[col] = value;
                }
                dense
            })
            .collect()
    }

    /// Returns a new matrix holding only the rows at `indices`, in that order.
    ///
    /// # Errors
    /// Returns an error if any index is out of range.
    pub fn select_rows(&self, indices: &[usize]) -> Result<Self> {
        let rows = indices
            .iter()
            .map(|&idx| {
                self.rows.get(idx).cloned().ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "row {idx} out of range for {} rows",
                        self.rows.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            n_cols: self.n_cols,
            rows,
        })
    }
}

/// Output of the vectorization collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Features {
    /// TF-IDF weights, one row per text.
    pub features: FeatureMatrix,
    /// Number of vocabulary terms kept.
    pub vocab_size: usize,
}

/// Summary generated for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Index of the document in the dataset.
    pub doc_id: usize,
    /// Generated summary text.
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage {
            input: 12,
            output: 30,
        };
        assert_eq!(usage.total(), 42);
    }

    #[test]
    fn test_documents_dataset_counts() {
        let dataset = Dataset::documents(vec!["a".to_owned(), "b".to_owned()], "papers");
        assert_eq!(dataset.num_documents, Some(2));
        assert_eq!(dataset.source.as_deref(), Some("papers"));
        assert!(dataset.labels.is_none());
    }

    #[test]
    fn test_feature_matrix_to_dense() {
        let matrix = FeatureMatrix {
            n_cols: 3,
            rows: vec![vec![(0, 1.0), (2, 0.5)], vec![]],
        };
        assert_eq!(
            matrix.to_dense(),
            vec![vec![1.0, 0.0, 0.5], vec![0.0, 0.0, 0.0]]
        );
    }

    #[test]
    fn test_feature_matrix_select_rows() {
        let matrix = FeatureMatrix {
            n_cols: 2,
            rows: vec![vec![(0, 1.0)], vec![(1, 2.0)], vec![]],
        };
        let picked = matrix.select_rows(&[2, 0]).unwrap();
        assert_eq!(picked.rows, vec![vec![], vec![(0, 1.0)]]);
        assert!(matrix.select_rows(&[5]).is_err());
    }

    #[test]
    fn test_dataset_serialization_skips_absent_fields() {
        let dataset = Dataset::labelled(vec!["x".to_owned()], vec![0], vec!["a".to_owned()]);
        let json = serde_json::to_value(&dataset).unwrap();
        assert!(json.get("source").is_none());
        assert_eq!(json["labels"], serde_json::json!([0]));
    }
}
