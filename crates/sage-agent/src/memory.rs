//! Shared execution state threaded through one plan run.
//!
//! Each artifact field is `Some` once its producing handler has run; handlers
//! treat presence as "already computed" and never overwrite it.

use sage_core::{Classifier, Dataset, Features, ResearchMode, Summary};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form metrics and notes recorded by handlers.
pub type Observations = BTreeMap<String, Value>;

/// Mutable state accumulated while executing a plan.
#[derive(Debug, Default)]
pub struct Memory {
    /// Set by the caller before execution starts
    pub research_mode: Option<ResearchMode>,
    /// Set by `LOAD_DATASET`, or lazily by `SUMMARIZE_TEXT`
    pub dataset: Option<Dataset>,
    /// Set by `PREPROCESS_DATA`
    pub features: Option<Features>,
    /// Set by `TRAIN_MODEL`
    pub model: Option<Box<dyn Classifier>>,
    /// Set by `SUMMARIZE_TEXT`
    pub summaries: Option<Vec<Summary>>,
    /// Written by `EVALUATE_MODEL` and `SUMMARIZE_TEXT`
    pub observations: Option<Observations>,
}

impl Memory {
    /// Empty memory with no research mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty memory seeded with the run's research mode.
    pub fn with_research_mode(mode: ResearchMode) -> Self {
        Self {
            research_mode: Some(mode),
            ..Self::default()
        }
    }

    /// True when the research mode is set and equal to `mode`.
    #[must_use]
    pub fn is_mode(&self, mode: &ResearchMode) -> bool {
        self.research_mode.as_ref() == Some(mode)
    }

    /// Names of the entries currently present, in a fixed order.
    #[must_use]
    pub fn keys(&self) -> Vec<&'static str> {
        [
            ("research_mode", self.research_mode.is_some()),
            ("dataset", self.dataset.is_some()),
            ("features", self.features.is_some()),
            ("model", self.model.is_some()),
            ("summaries", self.summaries.is_some()),
            ("observations", self.observations.is_some()),
        ]
        .into_iter()
        .filter_map(|(key, present)| present.then_some(key))
        .collect()
    }

    /// Returns the observations map, creating it if absent.
    pub fn observations_mut(&mut self) -> &mut Observations {
        self.observations.get_or_insert_with(Observations::new)
    }

    /// Looks up one observation.
    #[must_use]
    pub fn observation(&self, key: &str) -> Option<&Value> {
        self.observations.as_ref()?.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_memory_has_no_keys() {
        assert!(Memory::new().keys().is_empty());
    }

    #[test]
    fn test_keys_follow_fixed_order() {
        let mut memory = Memory::with_research_mode(ResearchMode::TextSummarization);
        memory.summaries = Some(Vec::new());
        memory.dataset = Some(Dataset::default());
        assert_eq!(memory.keys(), vec!["research_mode", "dataset", "summaries"]);
    }

    #[test]
    fn test_is_mode_requires_presence() {
        let memory = Memory::new();
        assert!(!memory.is_mode(&ResearchMode::TextClassification));
        let seeded = Memory::with_research_mode(ResearchMode::TextClassification);
        assert!(seeded.is_mode(&ResearchMode::TextClassification));
        assert!(!seeded.is_mode(&ResearchMode::DataExploration));
    }

    #[test]
    fn test_observations_created_on_demand() {
        let mut memory = Memory::new();
        memory
            .observations_mut()
            .insert("num_summaries".to_owned(), json!(2));
        assert_eq!(memory.observation("num_summaries"), Some(&json!(2)));
        assert_eq!(memory.keys(), vec!["observations"]);
    }
}
