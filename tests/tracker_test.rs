//! Tests for status filters and buckets

mod common;

use accomplishment_report::tracker::in_flight_on;
use accomplishment_report::{StatusBuckets, TaskStatus, TodoPriority, filter_excluding};
use common::{row, ymd};
use pretty_assertions::assert_eq;

fn sample() -> Vec<accomplishment_report::TaskRow> {
    vec![
        row("Reports", "reports", TaskStatus::InProgress, 5, Some(ymd(2023, 10, 3))),
        row("Login", "mvp", TaskStatus::Done, 3, Some(ymd(2023, 9, 1))),
        row("Backlog item", "mvp", TaskStatus::Todo(TodoPriority::P1), 8, None),
        row("Parked", "misc", TaskStatus::OnHold, 2, Some(ymd(2023, 8, 1))),
        row("Undated done", "misc", TaskStatus::Done, 1, None),
        row("Old", "mvp", TaskStatus::ArchivedOld, 1, Some(ymd(2023, 9, 1))),
    ]
}

fn actual_exclusions() -> Vec<TaskStatus> {
    let mut excluded = vec![TaskStatus::OnHold];
    excluded.extend(TodoPriority::ALL.map(TaskStatus::Todo));
    excluded
}

#[test]
fn test_filter_excludes_and_orders() {
    let kept = filter_excluding(&sample(), &actual_exclusions());
    let titles: Vec<&str> = kept.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Login", "Old", "Reports", "Undated done"]);
}

#[test]
fn test_filter_is_idempotent() {
    let excluded = actual_exclusions();
    let once = filter_excluding(&sample(), &excluded);
    let twice = filter_excluding(&once, &excluded);
    assert_eq!(once, twice);
}

#[test]
fn test_filter_with_no_exclusions_keeps_everything() {
    let rows = sample();
    assert_eq!(filter_excluding(&rows, &[]).len(), rows.len());
}

#[test]
fn test_buckets_cover_snapshot() {
    let rows = sample();
    let buckets = StatusBuckets::partition(&rows);
    assert_eq!(buckets.len(), rows.len());
    assert_eq!(buckets.done.len(), 2);
    assert_eq!(buckets.in_progress.len(), 1);
    assert_eq!(buckets.on_hold.len(), 1);
    assert_eq!(buckets.todo(TodoPriority::P1).len(), 1);
    assert_eq!(buckets.archived.len(), 1);
    assert!(StatusBuckets::partition(&[]).is_empty());
}

#[test]
fn test_in_flight_on_render_date() {
    let mut rows = sample();
    rows[1].date_completed = Some(ymd(2023, 10, 5));
    let titles: Vec<String> = in_flight_on(&rows, ymd(2023, 10, 3))
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(titles, vec!["Reports", "Login"]);
}
