//! Completion statistics
//!
//! Counts rows per board column and derives the completion percentage shown
//! in the statistics table and the report.

use crate::tracker::{StatusBuckets, TaskRow, TaskStatus, TodoPriority};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Text shown in place of a completion percentage that cannot be computed
pub const NOT_AVAILABLE: &str = "N/A";

/// Header of the statistics table
pub const CSV_HEADER: [&str; 8] = [
    "High priority tasks",
    "Moderate priority tasks",
    "Low priority tasks",
    "Tasks on hold",
    "Tasks in progress",
    "Tasks done",
    "Total tasks",
    "Completion %",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatisticsError {
    #[error("cannot compute completion: total task count is zero")]
    DivisionByZero,
}

/// Options that change how the total is formed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsSettings {
    /// Count In Progress rows in the total (and so in the denominator)
    pub include_in_progress_in_total: bool,
}

/// Row counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub todo_p1: usize,
    pub todo_p2: usize,
    pub todo_p3: usize,
    pub todo_p4: usize,
    pub on_hold: usize,
    pub in_progress: usize,
    pub done: usize,
    pub archived_old: usize,
    pub archived_new: usize,
}

impl StatusCounts {
    /// Count every row of an unfiltered snapshot
    pub fn from_rows(rows: &[TaskRow]) -> Self {
        Self::from_buckets(&StatusBuckets::partition(rows))
    }

    /// Count the rows of an already partitioned snapshot
    ///
    /// The archive bucket holds both archive columns, so its rows are
    /// counted by their own status.
    pub fn from_buckets(buckets: &StatusBuckets) -> Self {
        let mut counts = StatusCounts {
            todo_p1: buckets.todo(TodoPriority::P1).len(),
            todo_p2: buckets.todo(TodoPriority::P2).len(),
            todo_p3: buckets.todo(TodoPriority::P3).len(),
            todo_p4: buckets.todo(TodoPriority::P4).len(),
            on_hold: buckets.on_hold.len(),
            in_progress: buckets.in_progress.len(),
            done: buckets.done.len(),
            ..StatusCounts::default()
        };
        for row in &buckets.archived {
            *counts.slot(row.status) += 1;
        }
        counts
    }

    fn slot(&mut self, status: TaskStatus) -> &mut usize {
        match status {
            TaskStatus::Todo(TodoPriority::P1) => &mut self.todo_p1,
            TaskStatus::Todo(TodoPriority::P2) => &mut self.todo_p2,
            TaskStatus::Todo(TodoPriority::P3) => &mut self.todo_p3,
            TaskStatus::Todo(TodoPriority::P4) => &mut self.todo_p4,
            TaskStatus::OnHold => &mut self.on_hold,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Done => &mut self.done,
            TaskStatus::ArchivedOld => &mut self.archived_old,
            TaskStatus::ArchivedNew => &mut self.archived_new,
        }
    }

    /// Count for one status
    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Todo(TodoPriority::P1) => self.todo_p1,
            TaskStatus::Todo(TodoPriority::P2) => self.todo_p2,
            TaskStatus::Todo(TodoPriority::P3) => self.todo_p3,
            TaskStatus::Todo(TodoPriority::P4) => self.todo_p4,
            TaskStatus::OnHold => self.on_hold,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
            TaskStatus::ArchivedOld => self.archived_old,
            TaskStatus::ArchivedNew => self.archived_new,
        }
    }

    /// Statuses that make up the total under `settings`
    pub fn total_statuses(settings: &StatisticsSettings) -> Vec<TaskStatus> {
        TaskStatus::ALL
            .into_iter()
            .filter(|status| {
                *status != TaskStatus::InProgress || settings.include_in_progress_in_total
            })
            .collect()
    }

    /// Sum of the counts that make up the total
    pub fn total(&self, settings: &StatisticsSettings) -> usize {
        Self::total_statuses(settings)
            .into_iter()
            .map(|status| self.get(status))
            .sum()
    }

    /// Finished rows (done plus both archive columns)
    pub fn finished(&self) -> usize {
        TaskStatus::ALL
            .into_iter()
            .filter(TaskStatus::is_finished)
            .map(|status| self.get(status))
            .sum()
    }

    /// Ratio of finished rows to the total
    pub fn completion_ratio(&self, settings: &StatisticsSettings) -> Result<f64, StatisticsError> {
        let total = self.total(settings);
        if total == 0 {
            return Err(StatisticsError::DivisionByZero);
        }
        Ok(self.finished() as f64 / total as f64)
    }
}

/// One run's statistics, ready to be written or embedded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticsRecord {
    pub counts: StatusCounts,
    pub high_priority: usize,
    pub moderate_priority: usize,
    pub low_priority: usize,
    pub total: usize,
    pub completion: String,
}

impl StatisticsRecord {
    /// Aggregate an unfiltered snapshot
    ///
    /// A zero total is not an error here: the completion falls back to
    /// [`NOT_AVAILABLE`] and a warning is logged.
    pub fn from_rows(rows: &[TaskRow], settings: &StatisticsSettings) -> Self {
        let counts = StatusCounts::from_rows(rows);
        let completion = match counts.completion_ratio(settings) {
            Ok(ratio) => format_percentage(ratio),
            Err(e) => {
                warn!("{}", e);
                NOT_AVAILABLE.to_string()
            }
        };

        Self {
            high_priority: counts.todo_p1,
            moderate_priority: counts.todo_p2,
            low_priority: counts.todo_p3 + counts.todo_p4,
            total: counts.total(settings),
            counts,
            completion,
        }
    }

    /// Render the statistics table (header plus one data line)
    pub fn to_csv(&self) -> String {
        let mut out = CSV_HEADER.join(",");
        out.push('\n');
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            self.high_priority,
            self.moderate_priority,
            self.low_priority,
            self.counts.on_hold,
            self.counts.in_progress,
            self.counts.done,
            self.total,
            self.completion
        ));
        out
    }
}

/// Format a ratio as a whole percentage, e.g. `0.666` -> `"67%"`
pub fn format_percentage(ratio: f64) -> String {
    format!("{:.0}%", (ratio * 100.0).round())
}
