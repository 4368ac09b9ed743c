//! Tests for reading tracker exports

mod common;

use accomplishment_report::loader::{LoadError, TsvLoader, parse_table};
use accomplishment_report::{TaskStatus, TodoPriority};
use common::{tsv_line, write_tsv, ymd};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_load_typed_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_tsv(
        dir.path(),
        "board.tsv",
        &[
            tsv_line("Login page", "Done", "mvp", "5", "2023-10-02", "Oct 6, 2023"),
            tsv_line("Budget form", "Todo P3", "forms", "", "", ""),
            tsv_line(
                "\"Fix \"\"quoted\"\" title\"",
                "In Progress",
                "misc",
                "3.0",
                "10/30/2023",
                "",
            ),
        ],
    );

    let rows = TsvLoader::new(&path).load().unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].title, "Login page");
    assert_eq!(rows[0].line, 2);
    assert_eq!(rows[0].status, TaskStatus::Done);
    assert_eq!(rows[0].date_started, Some(ymd(2023, 10, 2)));
    assert_eq!(rows[0].date_completed, Some(ymd(2023, 10, 6)));
    assert_eq!(rows[0].story_points, 5);

    assert_eq!(rows[1].status, TaskStatus::Todo(TodoPriority::P3));
    assert_eq!(rows[1].story_points, 0);
    assert_eq!(rows[1].date_started, None);

    assert_eq!(rows[2].title, "Fix \"quoted\" title");
    assert_eq!(rows[2].story_points, 3);
    assert_eq!(rows[2].date_started, Some(ymd(2023, 10, 30)));
}

#[test]
fn test_missing_column_is_reported() {
    let content = "Title\tStatus\tModule Label\tStory Points\tDate Started\tDate Completed\tURL\tLabels\n";
    let err = parse_table(content, Path::new("board.tsv")).unwrap_err();
    match err {
        LoadError::MissingColumn { column, .. } => assert_eq!(column, "Priority Level"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_date_names_line_and_column() {
    let content = format!(
        "{}\n{}\n{}\n",
        common::HEADER,
        tsv_line("ok", "Done", "mvp", "1", "2023-01-01", "2023-01-02"),
        tsv_line("bad", "Done", "mvp", "1", "2023-01-01", "someday"),
    );

    let err = parse_table(&content, Path::new("board.tsv")).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("board.tsv:3"), "{message}");
    assert!(message.contains("Date Completed"), "{message}");
    assert!(matches!(err, LoadError::InvalidCell { line: 3, .. }));
}

#[test]
fn test_unknown_status_is_an_input_error() {
    let content = format!(
        "{}\n{}\n",
        common::HEADER,
        tsv_line("odd", "done", "mvp", "1", "", "")
    );
    let err = parse_table(&content, Path::new("board.tsv")).unwrap_err();
    assert!(matches!(err, LoadError::InvalidCell { column: "Status", .. }));
}

#[test]
fn test_completion_before_start_is_rejected() {
    let content = format!(
        "{}\n{}\n",
        common::HEADER,
        tsv_line("backwards", "Done", "mvp", "1", "2023-02-10", "2023-02-01")
    );
    let err = parse_table(&content, Path::new("board.tsv")).unwrap_err();
    assert!(matches!(err, LoadError::InvalidRow { line: 2, .. }));
}

#[test]
fn test_negative_points_rejected() {
    let content = format!(
        "{}\n{}\n",
        common::HEADER,
        tsv_line("neg", "Done", "mvp", "-3", "", "")
    );
    let err = parse_table(&content, Path::new("board.tsv")).unwrap_err();
    assert!(matches!(err, LoadError::InvalidCell { column: "Story Points", .. }));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = TsvLoader::new(dir.path().join("nope.tsv")).load().unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn test_empty_file_has_no_header() {
    let err = parse_table("\n\n", Path::new("empty.tsv")).unwrap_err();
    assert!(matches!(err, LoadError::MissingHeader { .. }));
}

#[test]
fn test_extra_columns_are_ignored() {
    let content = format!(
        "Assignees\t{}\tMilestone\nana, ben\t{}\tQ4\n",
        common::HEADER,
        tsv_line("Login page", "Done", "mvp", "5", "2023-10-02", "2023-10-06")
    );

    let rows = parse_table(&content, Path::new("board.tsv")).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Login page");
    assert_eq!(rows[0].module_label, "mvp");
    assert_eq!(rows[0].status, TaskStatus::Done);
    assert_eq!(rows[0].story_points, 5);
}

#[test]
fn test_byte_order_mark_is_stripped() {
    let content = format!(
        "{}{}\n{}\n",
        '\u{feff}',
        common::HEADER,
        tsv_line("Login page", "Done", "mvp", "5", "", "")
    );

    let rows = parse_table(&content, Path::new("board.tsv")).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Login page");
}

#[test]
fn test_quoted_cell_keeps_embedded_tab() {
    let content = format!(
        "{}\n{}\n",
        common::HEADER,
        tsv_line("\"Export\tImport\"", "In Progress", "mvp", "2", "2023-10-02", "")
    );

    let rows = parse_table(&content, Path::new("board.tsv")).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Export\tImport");
    assert_eq!(rows[0].status, TaskStatus::InProgress);
    assert_eq!(rows[0].module_label, "mvp");
    assert_eq!(rows[0].story_points, 2);
}

#[test]
fn test_quoted_cell_spans_lines() {
    let content = format!(
        "{}\n{}\n{}\n",
        common::HEADER,
        tsv_line("\"First line\nsecond line\"", "Done", "mvp", "1", "", ""),
        tsv_line("bad", "Done", "mvp", "1", "2023-01-01", "someday"),
    );

    let err = parse_table(&content, Path::new("board.tsv")).unwrap_err();
    assert!(matches!(err, LoadError::InvalidCell { line: 4, .. }), "{err}");

    let content = format!(
        "{}\n{}\n",
        common::HEADER,
        tsv_line("\"First line\nsecond line\"", "Done", "mvp", "1", "", ""),
    );
    let rows = parse_table(&content, Path::new("board.tsv")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "First line\nsecond line");
    assert_eq!(rows[0].line, 2);
}
