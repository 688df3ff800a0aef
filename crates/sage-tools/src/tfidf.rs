use regex::Regex;
use sage_core::{Error, FeatureMatrix, Features, Result, Vectorizer};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Tokens are runs of two or more word characters.
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Default vocabulary cap.
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Common English words carrying no topical signal.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "cannot", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "if", "in", "into", "is", "it", "its", "itself",
    "just", "me", "more", "most", "must", "my", "myself", "no", "nor", "not", "now", "of", "off",
    "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same",
    "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "upon", "us", "very", "was", "we", "were", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "would", "yet", "you", "your",
    "yours", "yourself", "yourselves",
];

/// TF-IDF vectorizer with smooth idf and L2-normalised rows.
///
/// Each call fits a fresh vocabulary: the `max_features` most frequent terms
/// across the corpus (ties broken alphabetically), indexed alphabetically.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
    stop_words: bool,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            stop_words: true,
        }
    }
}

impl TfidfVectorizer {
    /// Keeps at most `max_features` terms, optionally dropping English stop words.
    pub fn new(max_features: usize, stop_words: bool) -> Self {
        Self {
            max_features,
            stop_words,
        }
    }

    fn tokenize(&self, text: &str, token_re: &Regex, stop_words: &HashSet<&str>) -> Vec<String> {
        token_re
            .find_iter(&text.to_lowercase())
            .map(|token| token.as_str().to_owned())
            .filter(|token| !self.stop_words || !stop_words.contains(token.as_str()))
            .collect()
    }

    /// Selects the vocabulary and maps each term to its column.
    fn build_vocabulary(&self, documents: &[Vec<String>]) -> BTreeMap<String, usize> {
        let mut corpus_counts: HashMap<&str, usize> = HashMap::new();
        for tokens in documents {
            for token in tokens {
                *corpus_counts.entry(token.as_str()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = corpus_counts.into_iter().collect();
        ranked.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(right.0)));
        ranked.truncate(self.max_features);

        let mut terms: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort_unstable();
        terms
            .into_iter()
            .enumerate()
            .map(|(col, term)| (term.to_owned(), col))
            .collect()
    }
}

impl Vectorizer for TfidfVectorizer {
    fn vectorize(&self, texts: &[String]) -> Result<Features> {
        let token_re = Regex::new(TOKEN_PATTERN)
            .map_err(|err| Error::Other(format!("Invalid token pattern: {err}")))?;
        let stop_words: HashSet<&str> = ENGLISH_STOP_WORDS.iter().copied().collect();

        let documents: Vec<Vec<String>> = texts
            .iter()
            .map(|text| self.tokenize(text, &token_re, &stop_words))
            .collect();

        let vocabulary = self.build_vocabulary(&documents);
        if vocabulary.is_empty() {
            return Err(Error::InvalidInput(
                "Empty vocabulary; the documents contain only stop words or no tokens".to_owned(),
            ));
        }

        let counts: Vec<BTreeMap<usize, f64>> = documents
            .iter()
            .map(|tokens| {
                let mut row = BTreeMap::new();
                for col in tokens.iter().filter_map(|token| vocabulary.get(token)) {
                    *row.entry(*col).or_insert(0.0) += 1.0;
                }
                row
            })
            .collect();

        let n_docs = texts.len() as f64;
        let mut doc_freq = vec![0_usize; vocabulary.len()];
        for row in &counts {
            for col in row.keys() {
                doc_freq[*col] += 1;
            }
        }
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let rows = counts
            .into_iter()
            .map(|row| {
                let weighted: Vec<(usize, f64)> = row
                    .into_iter()
                    .map(|(col, count)| (col, count * idf[col]))
                    .collect();
                let norm = weighted
                    .iter()
                    .map(|(_, value)| value * value)
                    .sum::<f64>()
                    .sqrt();
                if norm > 0.0 {
                    weighted
                        .into_iter()
                        .map(|(col, value)| (col, value / norm))
                        .collect()
                } else {
                    weighted
                }
            })
            .collect();

        tracing::debug!(
            documents = texts.len(),
            vocab_size = vocabulary.len(),
            "Vectorized texts"
        );

        Ok(Features {
            features: FeatureMatrix {
                n_cols: vocabulary.len(),
                rows,
            },
            vocab_size: vocabulary.len(),
        })
    }
}
