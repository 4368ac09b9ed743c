//! Common test utilities for integration tests

#![allow(dead_code)]

use accomplishment_report::{TaskRow, TaskStatus};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Header line of a tracker export
pub const HEADER: &str =
    "Title\tURL\tStatus\tModule Label\tLabels\tPriority Level\tStory Points\tDate Started\tDate Completed";

/// Shorthand for a calendar date
pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Create a test row with module, points and an optional start date
pub fn row(
    title: &str,
    module: &str,
    status: TaskStatus,
    points: u32,
    start: Option<NaiveDate>,
) -> TaskRow {
    let mut row = TaskRow::new(title, module, status).points(points);
    row.date_started = start;
    row
}

/// Build one export line in `HEADER` column order
pub fn tsv_line(
    title: &str,
    status: &str,
    module: &str,
    points: &str,
    started: &str,
    completed: &str,
) -> String {
    format!(
        "{title}\thttps://github.com/org/repo/issues/1\t{status}\t{module}\tenhancement\tHigh\t{points}\t{started}\t{completed}"
    )
}

/// Write an export with the given data lines and return its path
pub fn write_tsv(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let mut content = String::from(HEADER);
    for line in lines {
        content.push('\n');
        content.push_str(line);
    }
    content.push('\n');
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
