//! Status filters and buckets over a snapshot of task rows
//!
//! Everything here is a pure function over `&[TaskRow]`; the input slice is
//! never reordered or modified.

use super::task_row::{TaskRow, TaskStatus, TodoPriority};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Keep rows whose status is not excluded, ordered by start date
///
/// # Arguments
/// * `rows` - Snapshot of task rows
/// * `excluded` - Statuses to drop
///
/// # Returns
/// A new vector sorted by `date_started` ascending. Rows without a start
/// date are kept and placed after every dated row; equal keys keep their
/// source order, so filtering an already filtered set is a no-op.
pub fn filter_excluding(rows: &[TaskRow], excluded: &[TaskStatus]) -> Vec<TaskRow> {
    let mut kept: Vec<TaskRow> = rows
        .iter()
        .filter(|row| !excluded.contains(&row.status))
        .cloned()
        .collect();

    // None sorts last
    kept.sort_by_key(|row| (row.date_started.is_none(), row.date_started));
    kept
}

/// Rows that were being worked on during `date`
///
/// # Arguments
/// * `rows` - Snapshot of task rows
/// * `date` - Day to check
///
/// # Returns
/// Rows in source order for which [`TaskRow::is_in_flight_on`] holds
pub fn in_flight_on(rows: &[TaskRow], date: NaiveDate) -> Vec<TaskRow> {
    rows.iter()
        .filter(|row| row.is_in_flight_on(date))
        .cloned()
        .collect()
}

/// Disjoint status buckets of one snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBuckets {
    pub done: Vec<TaskRow>,
    pub in_progress: Vec<TaskRow>,
    pub on_hold: Vec<TaskRow>,
    pub todo: BTreeMap<TodoPriority, Vec<TaskRow>>,
    pub archived: Vec<TaskRow>,
}

impl StatusBuckets {
    /// Split rows into buckets by status, keeping source order within each
    pub fn partition(rows: &[TaskRow]) -> Self {
        let mut buckets = StatusBuckets::default();
        for row in rows {
            let bucket = match row.status {
                TaskStatus::Done => &mut buckets.done,
                TaskStatus::InProgress => &mut buckets.in_progress,
                TaskStatus::OnHold => &mut buckets.on_hold,
                TaskStatus::Todo(priority) => buckets.todo.entry(priority).or_default(),
                TaskStatus::ArchivedOld | TaskStatus::ArchivedNew => &mut buckets.archived,
            };
            bucket.push(row.clone());
        }
        buckets
    }

    /// Rows waiting in the Todo column of the given priority
    pub fn todo(&self, priority: TodoPriority) -> &[TaskRow] {
        self.todo.get(&priority).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of rows across all buckets
    pub fn len(&self) -> usize {
        self.done.len()
            + self.in_progress.len()
            + self.on_hold.len()
            + self.todo.values().map(Vec::len).sum::<usize>()
            + self.archived.len()
    }

    /// Check if every bucket is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
