//! Intent dispatch and plan execution over shared memory.

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::missing_panics_doc,
        clippy::tests_outside_test_module,
        reason = "Test file allows"
    )
)]

mod common;

use common::*;
use sage_agent::{Memory, PlanExecutor};
use sage_core::{Plan, ResearchMode, StepStatus};
use std::sync::Arc;
use tempfile::TempDir;

fn plan(tasks: &[(i64, &str)]) -> Plan {
    Plan {
        goal: "test goal".to_owned(),
        subtasks: tasks.iter().map(|&(id, task)| subtask(id, task)).collect(),
    }
}

fn statuses(results: &[sage_core::StepResult]) -> Vec<StepStatus> {
    results.iter().map(|result| result.status).collect()
}

#[tokio::test]
async fn test_classification_pipeline_runs_end_to_end() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(provider());
    let plans = PlanExecutor::new(executor(&provider, toolkit(dir.path())));

    let (results, memory) = plans
        .execute_plan(
            &plan(&[(1, LOAD), (2, PREPROCESS), (3, TRAIN), (4, EVALUATE)]),
            Memory::with_research_mode(ResearchMode::TextClassification),
        )
        .await
        .unwrap();

    assert_eq!(statuses(&results), vec![StepStatus::Success; 4]);
    assert_eq!(results[0].output, "Loaded dataset with 10 samples");
    assert_eq!(
        memory.keys(),
        vec!["research_mode", "dataset", "features", "model", "observations"]
    );
    let accuracy = memory.observation("accuracy").unwrap().as_f64().unwrap();
    assert!((0.0..=1.0).contains(&accuracy));
    assert_eq!(memory.observation("test_size").unwrap(), 2);
    assert_eq!(memory.observation("train_size").unwrap(), 8);
}

#[tokio::test]
async fn test_summarization_pipeline_skips_preprocessing() {
    let dir = TempDir::new().unwrap();
    write_documents(
        dir.path(),
        &[
            ("a.txt", "Solar panels convert sunlight into electricity."),
            ("b.txt", "Wind turbines spin to generate power for the grid."),
        ],
    );
    let provider = Arc::new(provider());
    let plans = PlanExecutor::new(executor(&provider, toolkit(dir.path())));

    let (results, memory) = plans
        .execute_plan(
            &plan(&[(1, LOAD), (2, PREPROCESS), (3, SUMMARIZE)]),
            Memory::with_research_mode(ResearchMode::TextSummarization),
        )
        .await
        .unwrap();

    assert_eq!(
        statuses(&results),
        vec![StepStatus::Success, StepStatus::Skipped, StepStatus::Success]
    );
    assert_eq!(results[0].output, "Loaded 2 documents for summarization");
    assert_eq!(results[1].output, "Preprocessing not applicable for summarization");
    assert_eq!(results[2].output, "Generated summaries for 2 documents");

    let summaries = memory.summaries.as_ref().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].doc_id, 0);
    assert_eq!(summaries[1].doc_id, 1);
    assert_eq!(summaries[0].summary, "A short summary.");
    assert!(memory.features.is_none());
    assert_eq!(memory.observation("num_summaries").unwrap(), 2);
}

#[tokio::test]
async fn test_loaded_dataset_is_not_reloaded() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(provider());
    let executor = executor(&provider, toolkit_with(Arc::new(MissingDatasets), dir.path()));
    let mut memory = Memory::new();
    memory.dataset = Some(labelled_dataset());

    let result = executor.execute_subtask(&subtask(1, LOAD), &mut memory).await.unwrap();

    assert_eq!(result.status, StepStatus::Skipped);
    assert_eq!(result.output, "Dataset already loaded");
    assert_eq!(memory.dataset, Some(labelled_dataset()));
    assert_eq!(memory.keys(), vec!["dataset"]);
}

#[tokio::test]
async fn test_preprocessing_skipped_in_summarization_mode() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(provider());
    let executor = executor(&provider, toolkit(dir.path()));
    let mut memory = Memory::with_research_mode(ResearchMode::TextSummarization);

    let result = executor.execute_subtask(&subtask(1, PREPROCESS), &mut memory).await.unwrap();

    assert_eq!(result.status, StepStatus::Skipped);
    assert_eq!(result.output, "Preprocessing not applicable for summarization");
    assert_eq!(memory.keys(), vec!["research_mode"]);
}

#[tokio::test]
async fn test_training_without_features_fails_and_leaves_memory() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(provider());
    let executor = executor(&provider, toolkit(dir.path()));
    let mut memory = Memory::with_research_mode(ResearchMode::TextClassification);

    let result = executor
        .execute_subtask(&subtask(1, TRAIN), &mut memory)
        .await
        .unwrap();

    assert_eq!(result.status, StepStatus::Failed);
    assert_eq!(result.output, "Features not available for training");
    assert_eq!(memory.keys(), vec!["research_mode"]);
}

#[tokio::test]
async fn test_unrecognized_and_other_intents_are_unsupported() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(provider());
    let executor = executor(&provider, toolkit(dir.path()));
    let mut memory = Memory::with_research_mode(ResearchMode::TextClassification);

    let deploy = executor
        .execute_subtask(&subtask(1, DEPLOY), &mut memory)
        .await
        .unwrap();
    assert_eq!(deploy.status, StepStatus::Unsupported);
    assert_eq!(deploy.output, "Intent classified as DEPLOY_MODEL");

    let chart = executor
        .execute_subtask(&subtask(2, CHART), &mut memory)
        .await
        .unwrap();
    assert_eq!(chart.status, StepStatus::Unsupported);
    assert_eq!(chart.output, "Intent classified as OTHER");
    assert_eq!(memory.keys(), vec!["research_mode"]);
}

#[tokio::test]
async fn test_repeated_steps_are_skipped_without_changes() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(provider());
    let executor = executor(&provider, toolkit(dir.path()));
    let mut memory = Memory::with_research_mode(ResearchMode::TextClassification);

    for (id, task) in [(1, LOAD), (2, PREPROCESS), (3, TRAIN), (4, EVALUATE)] {
        let result = executor.execute_subtask(&subtask(id, task), &mut memory).await.unwrap();
        assert_eq!(result.status, StepStatus::Success, "{task}: {}", result.output);
    }
    let dataset = memory.dataset.clone();
    let features = memory.features.clone();
    let observations = memory.observations.clone();

    let expected = [
        (LOAD, "Dataset already loaded"),
        (PREPROCESS, "Data already preprocessed"),
        (TRAIN, "Model already trained"),
        (EVALUATE, "Model already evaluated"),
    ];
    for (id, (task, output)) in (10..).zip(expected) {
        let result = executor.execute_subtask(&subtask(id, task), &mut memory).await.unwrap();
        assert_eq!(result.status, StepStatus::Skipped);
        assert_eq!(result.output, output);
    }

    assert_eq!(memory.dataset, dataset);
    assert_eq!(memory.features, features);
    assert_eq!(memory.observations, observations);
}

#[tokio::test]
async fn test_summaries_are_not_regenerated() {
    let dir = TempDir::new().unwrap();
    write_documents(dir.path(), &[("a.txt", "Rivers carry sediment to the sea.")]);
    let provider = Arc::new(provider());
    let executor = executor(&provider, toolkit(dir.path()));
    let mut memory = Memory::with_research_mode(ResearchMode::TextSummarization);

    let first = executor.execute_subtask(&subtask(1, SUMMARIZE), &mut memory).await.unwrap();
    assert_eq!(first.status, StepStatus::Success);
    let calls = provider.call_count();

    let second = executor.execute_subtask(&subtask(2, SUMMARIZE), &mut memory).await.unwrap();
    assert_eq!(second.status, StepStatus::Skipped);
    assert_eq!(second.output, "Summaries already generated");
    // only the intent classification call was made
    assert_eq!(provider.call_count(), calls + 1);
}

#[tokio::test]
async fn test_mode_gated_handlers_skip_outside_classification() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(provider());
    let executor = executor(&provider, toolkit(dir.path()));

    for mut memory in [
        Memory::with_research_mode(ResearchMode::TextSummarization),
        Memory::with_research_mode(ResearchMode::Unknown("POETRY".to_owned())),
        Memory::new(),
    ] {
        let keys = memory.keys();

        let train = executor.execute_subtask(&subtask(1, TRAIN), &mut memory).await.unwrap();
        assert_eq!(train.status, StepStatus::Skipped);
        assert_eq!(train.output, "Training not applicable for this research mode");

        let evaluate = executor.execute_subtask(&subtask(2, EVALUATE), &mut memory).await.unwrap();
        assert_eq!(evaluate.status, StepStatus::Skipped);
        assert_eq!(evaluate.output, "Evaluation not applicable for this research mode");

        assert_eq!(memory.keys(), keys);
    }
}

#[tokio::test]
async fn test_evaluation_before_training_fails() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(provider());
    let plans = PlanExecutor::new(executor(&provider, toolkit(dir.path())));

    let (results, memory) = plans
        .execute_plan(
            &plan(&[(1, LOAD), (2, PREPROCESS), (3, EVALUATE)]),
            Memory::with_research_mode(ResearchMode::TextClassification),
        )
        .await
        .unwrap();

    assert_eq!(results[2].status, StepStatus::Failed);
    assert_eq!(results[2].output, "Model not trained before evaluation");
    assert!(memory.observations.is_none());
}

#[tokio::test]
async fn test_failures_do_not_stop_later_steps() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(provider());
    let plans = PlanExecutor::new(executor(&provider, toolkit(dir.path())));

    let (results, _) = plans
        .execute_plan(
            &plan(&[(1, TRAIN), (2, DEPLOY), (3, LOAD), (4, PREPROCESS), (5, TRAIN)]),
            Memory::with_research_mode(ResearchMode::TextClassification),
        )
        .await
        .unwrap();

    assert_eq!(
        statuses(&results),
        vec![
            StepStatus::Failed,
            StepStatus::Unsupported,
            StepStatus::Success,
            StepStatus::Success,
            StepStatus::Success,
        ]
    );
}

#[tokio::test]
async fn test_results_follow_plan_order() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(provider());
    let plans = PlanExecutor::new(executor(&provider, toolkit(dir.path())));

    let (results, _) = plans
        .execute_plan(
            &plan(&[(7, CHART), (3, LOAD), (5, DEPLOY)]),
            Memory::with_research_mode(ResearchMode::TextClassification),
        )
        .await
        .unwrap();

    let ids: Vec<i64> = results.iter().map(|result| result.task_id).collect();
    assert_eq!(ids, vec![7, 3, 5]);
}

#[tokio::test]
async fn test_empty_plan_returns_memory_untouched() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(provider());
    let plans = PlanExecutor::new(executor(&provider, toolkit(dir.path())));

    let (results, memory) = plans
        .execute_plan(&plan(&[]), Memory::with_research_mode(ResearchMode::DataExploration))
        .await
        .unwrap();

    assert!(results.is_empty());
    assert_eq!(memory.keys(), vec!["research_mode"]);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_classifier_failure_aborts_the_plan() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(provider().with_failure("explode", "service unavailable"));
    let plans = PlanExecutor::new(executor(&provider, toolkit(dir.path())));

    let outcome = plans
        .execute_plan(
            &plan(&[(1, LOAD), (2, "explode"), (3, PREPROCESS)]),
            Memory::with_research_mode(ResearchMode::TextClassification),
        )
        .await;

    assert!(outcome.is_err());
    // the step after the failure was never classified
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn test_summarization_failure_is_reported_as_failed_step() {
    let dir = TempDir::new().unwrap();
    write_documents(dir.path(), &[("a.txt", "Glaciers retreat as temperatures rise.")]);
    let provider = Arc::new(intent_provider().with_failure(CHUNK_PROMPT, "timeout"));
    let executor = executor(&provider, toolkit(dir.path()));
    let mut memory = Memory::with_research_mode(ResearchMode::TextSummarization);

    let result = executor.execute_subtask(&subtask(1, SUMMARIZE), &mut memory).await.unwrap();

    assert_eq!(result.status, StepStatus::Failed);
    assert!(result.output.contains("timeout"));
    assert!(memory.summaries.is_none());
    assert!(memory.observations.is_none());
}

#[tokio::test]
async fn test_missing_documents_folder_is_a_failed_step() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(provider());
    let executor = executor(&provider, toolkit(&dir.path().join("absent")));
    let mut memory = Memory::with_research_mode(ResearchMode::TextSummarization);

    let result = executor.execute_subtask(&subtask(1, LOAD), &mut memory).await.unwrap();

    assert_eq!(result.status, StepStatus::Failed);
    assert!(memory.dataset.is_none());
}

#[tokio::test]
async fn test_missing_corpus_is_a_failed_step() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(provider());
    let executor = executor(&provider, toolkit_with(Arc::new(MissingDatasets), dir.path()));
    let mut memory = Memory::with_research_mode(ResearchMode::TextClassification);

    let result = executor.execute_subtask(&subtask(1, LOAD), &mut memory).await.unwrap();

    assert_eq!(result.status, StepStatus::Failed);
    assert!(result.output.contains("Corpus directory missing"));
    assert!(memory.dataset.is_none());
}

#[tokio::test]
async fn test_summarize_loads_documents_on_demand() {
    let dir = TempDir::new().unwrap();
    write_documents(dir.path(), &[("a.md", "Coral reefs host a quarter of marine species.")]);
    let provider = Arc::new(provider());
    let executor = executor(&provider, toolkit(dir.path()));
    let mut memory = Memory::with_research_mode(ResearchMode::TextSummarization);

    let result = executor.execute_subtask(&subtask(1, SUMMARIZE), &mut memory).await.unwrap();

    assert_eq!(result.status, StepStatus::Success);
    assert_eq!(result.output, "Generated summaries for 1 documents");
    assert_eq!(memory.dataset.as_ref().unwrap().len(), 1);
}

#[tokio::test]
async fn test_summarize_without_dataset_outside_summarization_fails() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(provider());
    let executor = executor(&provider, toolkit(dir.path()));
    let mut memory = Memory::with_research_mode(ResearchMode::TextClassification);

    let result = executor.execute_subtask(&subtask(1, SUMMARIZE), &mut memory).await.unwrap();

    assert_eq!(result.status, StepStatus::Failed);
    assert_eq!(result.output, "No dataset available for summarization");
    assert_eq!(memory.keys(), vec!["research_mode"]);
}

#[tokio::test]
async fn test_preprocess_without_dataset_fails() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(provider());
    let executor = executor(&provider, toolkit(dir.path()));
    let mut memory = Memory::with_research_mode(ResearchMode::DataExploration);

    let result = executor.execute_subtask(&subtask(1, PREPROCESS), &mut memory).await.unwrap();

    assert_eq!(result.status, StepStatus::Failed);
    assert_eq!(result.output, "Dataset not available for preprocessing");
}
