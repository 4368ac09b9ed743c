//! Plain-text summaries printed after a run
//!
//! This module contains the formatting logic for the console output of the
//! command line tool.

use crate::projection::ProjectedSpan;
use crate::statistics::StatisticsRecord;
use std::path::{Path, PathBuf};

/// Outcome of one project's run
#[derive(Debug, Clone)]
pub struct ProjectSummary {
    pub name: String,
    pub rows: usize,
    pub spans: Vec<ProjectedSpan>,
    pub statistics: StatisticsRecord,
    pub artifacts: Vec<PathBuf>,
}

/// Format projected spans as an aligned list
///
/// # Arguments
/// * `spans` - Spans in display order
///
/// # Returns
/// One line per span, or a placeholder line when there are none
pub fn format_spans(spans: &[ProjectedSpan]) -> String {
    if spans.is_empty() {
        return "  No projected modules\n".to_string();
    }

    let width = spans.iter().map(|s| s.module.chars().count()).max().unwrap_or(0);
    let mut result = String::new();
    for span in spans {
        result.push_str(&format!(
            "  {:<width$}  {} -> {}  ({} pts, {} working + {} rest days)\n",
            span.module, span.start, span.end, span.points_sum, span.working_days, span.rest_days,
        ));
    }
    result
}

/// Format the statistics of one project on a single line
pub fn format_statistics(statistics: &StatisticsRecord) -> String {
    format!(
        "  high {} | moderate {} | low {} | on hold {} | in progress {} | done {} | total {} | completion {}\n",
        statistics.high_priority,
        statistics.moderate_priority,
        statistics.low_priority,
        statistics.counts.on_hold,
        statistics.counts.in_progress,
        statistics.counts.done,
        statistics.total,
        statistics.completion,
    )
}

/// Format the whole run summary
///
/// # Arguments
/// * `projects` - Per-project outcomes
/// * `report` - Path of the assembled report
pub fn format_summary(projects: &[ProjectSummary], report: &Path) -> String {
    let mut result = format!("Processed {} project(s):\n", projects.len());
    for project in projects {
        result.push_str(&format!("\n{} ({} tasks)\n", project.name, project.rows));
        result.push_str(&format_statistics(&project.statistics));
        result.push_str(&format_spans(&project.spans));
        for artifact in &project.artifacts {
            result.push_str(&format!("  wrote {}\n", artifact.display()));
        }
    }
    result.push_str(&format!("\nReport: {}\n", report.display()));
    result
}
