//! Narrative report assembly
//!
//! This module gathers everything the accomplishment report shows into
//! serializable context structs and renders them through Handlebars:
//! - `cutoff`: semi-monthly cutoff period helpers
//! - `template`: the Handlebars renderer and built-in template

pub mod cutoff;
mod template;

pub use template::{DEFAULT_TEMPLATE, ReportRenderer};

use crate::projection::ProjectedSpan;
use crate::statistics::StatisticsRecord;
use crate::tracker::{TaskRow, TaskStatus, in_flight_on};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extensions picked up as screenshots
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Statuses listed in a project's task section
const REPORTED_STATUSES: [TaskStatus; 3] =
    [TaskStatus::OnHold, TaskStatus::InProgress, TaskStatus::Done];

/// Task as shown in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTask {
    pub title: String,
    pub module_label: String,
    pub status: String,
    pub date_started: Option<String>,
    pub date_completed: Option<String>,
    pub story_points: u32,
}

impl From<&TaskRow> for ReportTask {
    fn from(row: &TaskRow) -> Self {
        Self {
            title: row.title.clone(),
            module_label: row.module_label.clone(),
            status: row.status.to_string(),
            date_started: row.date_started.map(|d| d.format("%Y-%m-%d").to_string()),
            date_completed: row.date_completed.map(|d| d.format("%Y-%m-%d").to_string()),
            story_points: row.story_points,
        }
    }
}

/// Tasks in flight on one render date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDay {
    pub date: String,
    pub tasks: Vec<ReportTask>,
}

/// One project's section of the report
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSection {
    pub name: String,
    pub details: String,
    pub modules: Vec<String>,
    pub tasks: Vec<ReportTask>,
    pub rendered_tasks: Vec<RenderedDay>,
    pub images: Vec<ReportImage>,
    pub statistics: StatisticsRecord,
    pub projected_spans: Vec<ProjectedSpan>,
    pub actual_timeline: String,
    pub projected_timeline: String,
}

/// Screenshot copied next to the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportImage {
    /// File name of the original screenshot
    pub caption: String,
    /// Link relative to the report, `/`-separated
    pub link: String,
}

/// Task lists of a project section, split by render date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSections {
    /// Distinct module labels of reported tasks, in first-seen order
    pub modules: Vec<String>,
    /// Reported tasks not shown under any render date
    pub tasks: Vec<ReportTask>,
    /// Tasks in flight per render date, in render date order
    pub rendered_tasks: Vec<RenderedDay>,
}

impl TaskSections {
    /// Split a snapshot into the report's task lists
    ///
    /// # Arguments
    /// * `rows` - Unfiltered snapshot
    /// * `render_dates` - Days whose in-flight tasks get their own list
    ///
    /// # Returns
    /// Sections where `tasks` holds On Hold / In Progress / Done rows minus
    /// every row already listed under a render date. Render-date lists draw
    /// from all rows regardless of status.
    pub fn build(rows: &[TaskRow], render_dates: &[NaiveDate]) -> Self {
        let mut reported: Vec<&TaskRow> = rows
            .iter()
            .filter(|row| REPORTED_STATUSES.contains(&row.status))
            .collect();

        let mut modules: Vec<String> = Vec::new();
        for row in &reported {
            if !modules.contains(&row.module_label) {
                modules.push(row.module_label.clone());
            }
        }

        let mut rendered_tasks = Vec::with_capacity(render_dates.len());
        for date in render_dates {
            let in_flight = in_flight_on(rows, *date);
            reported.retain(|row| !in_flight.contains(*row));
            debug!(%date, tasks = in_flight.len(), "render date");
            rendered_tasks.push(RenderedDay {
                date: date.format("%Y-%m-%d").to_string(),
                tasks: in_flight.iter().map(ReportTask::from).collect(),
            });
        }

        Self {
            modules,
            tasks: reported.into_iter().map(ReportTask::from).collect(),
            rendered_tasks,
        }
    }
}

/// Screenshot files in `dir`, sorted by file name
///
/// # Returns
/// Paths of files with an image extension (case-insensitive). A missing or
/// unreadable directory is an error.
pub fn collect_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read images directory {}", dir.display()))?;

    let mut images = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read images directory {}", dir.display()))?
            .path();
        let is_image = path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
        if is_image {
            images.push(path);
        }
    }

    images.sort();
    Ok(images)
}

/// Data handed to the report template
#[derive(Debug, Clone, Serialize)]
pub struct ReportContext {
    pub developer_name: String,
    pub developer_position: String,
    pub reviewer_name: String,
    pub reviewer_position: String,
    pub cutoff_dates: String,
    pub tc: i64,
    pub generated_on: String,
    pub projects: Vec<ProjectSection>,
}
