use anyhow::Result;
use sage_agent::RunReport;
use sage_core::{Plan, ResearchMode};
use std::io::Write;

/// Writes the inferred mode and the plan, before anything is executed.
///
/// # Errors
/// Returns an error if writing fails or the plan cannot be serialized.
pub fn render_header<W: Write>(research_mode: &ResearchMode, plan: &Plan, out: &mut W) -> Result<()> {
    writeln!(out, "Research mode: {research_mode}")?;
    writeln!(out)?;
    writeln!(out, "Plan:")?;
    writeln!(out, "{}", serde_json::to_string_pretty(plan)?)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Writes step results, the final memory keys and any summaries.
///
/// # Errors
/// Returns an error if writing fails.
pub fn render_results<W: Write>(report: &RunReport, out: &mut W) -> Result<()> {
    writeln!(out, "Results:")?;
    for result in &report.results {
        writeln!(
            out,
            "[{}] {}: {}",
            result.task_id,
            result.status.to_string().to_uppercase(),
            result.output
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Memory: {}", report.memory.keys().join(", "))?;

    if let Some(summaries) = &report.memory.summaries {
        writeln!(out)?;
        writeln!(out, "Summaries:")?;
        for summary in summaries {
            writeln!(out, "[doc {}] {}", summary.doc_id, summary.summary)?;
        }
    }
    Ok(())
}
