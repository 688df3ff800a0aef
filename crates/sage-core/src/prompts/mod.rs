//! Prompt loading utilities
//!
//! Prompts live in the workspace `prompts/` directory as markdown documents with
//! Usage and Prompt sections, and are embedded at compile time using `include_str!`.

use crate::{Error, Result};

const PLANNER_MD: &str = include_str!("../../../../prompts/planner.md");
const RESEARCH_MODE_MD: &str = include_str!("../../../../prompts/research_mode.md");
const INTENT_MD: &str = include_str!("../../../../prompts/intent.md");
const SUMMARIZE_CHUNK_MD: &str = include_str!("../../../../prompts/summarize_chunk.md");
const MERGE_SUMMARIES_MD: &str = include_str!("../../../../prompts/merge_summaries.md");

/// Loads a prompt by name
///
/// # Errors
/// Returns an error if the prompt name is unknown or the prompt section cannot be extracted
pub fn load_prompt(name: &str) -> Result<String> {
    let content = match name {
        "planner" => PLANNER_MD,
        "research_mode" => RESEARCH_MODE_MD,
        "intent" => INTENT_MD,
        "summarize_chunk" => SUMMARIZE_CHUNK_MD,
        "merge_summaries" => MERGE_SUMMARIES_MD,
        _ => return Err(Error::Other(format!("Unknown prompt: {name}"))),
    };

    extract_prompt_section(content)
}

/// Loads a prompt and substitutes `{placeholder}` markers.
///
/// # Errors
/// Returns an error if the prompt cannot be loaded
pub fn render_prompt(name: &str, substitutions: &[(&str, &str)]) -> Result<String> {
    let mut prompt = load_prompt(name)?;
    for (placeholder, value) in substitutions {
        prompt = prompt.replace(&format!("{{{placeholder}}}"), value);
    }
    Ok(prompt)
}

/// Extracts the Prompt section from a markdown file
///
/// # Errors
/// Returns an error if the Prompt section cannot be found
fn extract_prompt_section(content: &str) -> Result<String> {
    let prompt_start = content
        .find("## Prompt")
        .ok_or_else(|| Error::Other("Prompt section not found".to_owned()))?;

    let prompt_content_start = content[prompt_start..]
        .find('\n')
        .ok_or_else(|| Error::Other("Invalid prompt format".to_owned()))?
        + prompt_start
        + 1;

    // ## Prompt is always the last top-level section
    Ok(content[prompt_content_start..].trim().to_owned())
}
