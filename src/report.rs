use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::error::AnalysisError;
use crate::models::{AnalysisReport, Batch, DifficultyReport, RiskEntry, Summary};

/// Share of students not flagged, as a one-decimal percentage string.
pub fn completion_rate(
    total_students: usize,
    at_risk_count: usize,
) -> Result<String, AnalysisError> {
    if total_students == 0 {
        return Err(AnalysisError::EmptyBatch);
    }
    let completing = total_students.saturating_sub(at_risk_count);
    let rate = completing as f64 / total_students as f64 * 100.0;
    Ok(format!("{rate:.1}%"))
}

pub fn assemble(
    batch: &Batch,
    risk_entries: Vec<RiskEntry>,
    difficulty: DifficultyReport,
) -> Result<AnalysisReport, AnalysisError> {
    let total_students = batch.len();
    let at_risk_count = risk_entries.len();
    debug_assert!(at_risk_count <= total_students);

    Ok(AnalysisReport {
        summary: Summary {
            total_students,
            at_risk_count,
            predicted_completion_rate: completion_rate(total_students, at_risk_count)?,
        },
        course_insights: difficulty,
        high_risk_students: risk_entries,
    })
}

pub fn render_markdown(
    report: &AnalysisReport,
    source: Option<&str>,
    generated_at: Option<DateTime<Utc>>,
) -> String {
    let mut output = String::new();
    let summary = &report.summary;
    let insights = &report.course_insights;

    let _ = writeln!(output, "# Learning Risk Report");
    let _ = writeln!(
        output,
        "Generated for {}",
        source.unwrap_or("uploaded batch")
    );
    if let Some(generated_at) = generated_at {
        let _ = writeln!(output, "Generated at {}", generated_at.to_rfc3339());
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(output, "- Total students: {}", summary.total_students);
    let _ = writeln!(output, "- At risk: {}", summary.at_risk_count);
    let _ = writeln!(
        output,
        "- Predicted completion rate: {}",
        summary.predicted_completion_rate
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Course Difficulty");
    let _ = writeln!(output, "- Overall: {}", insights.overall_difficulty);
    let _ = writeln!(
        output,
        "- Average student score: {:.1}",
        insights.avg_student_score
    );
    let _ = writeln!(
        output,
        "- Average retries per chapter: {:.1}",
        insights.avg_retries_per_chapter
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## High Risk Students");

    if report.high_risk_students.is_empty() {
        let _ = writeln!(output, "No high-risk students detected.");
    } else {
        let _ = writeln!(output, "| Student | Outcome | Risk | Score |");
        let _ = writeln!(output, "|---|---|---|---|");
        for entry in &report.high_risk_students {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} |",
                entry.student_id,
                entry.predicted_outcome,
                entry.risk_probability,
                serde_json::Value::from(entry.current_score)
            );
        }
    }

    output
}
