//! Cell-level parsing and validation for tracker exports
//!
//! This module turns raw text cells into typed values. Each parser returns a
//! plain message on failure; the loader attaches the line and column.

use crate::tracker::{TaskRow, TaskStatus};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-only layouts accepted in date columns, tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%b %d, %Y", "%B %d, %Y", "%m/%d/%Y"];

/// Date-time layouts accepted in date columns; the time part is dropped
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse an optional date cell
///
/// # Arguments
/// * `cell` - Raw cell text
///
/// # Returns
/// `Ok(None)` for an empty cell, the parsed date otherwise
///
/// # Examples
/// ```
/// # use accomplishment_report::validation::parse_date_cell;
/// let date = parse_date_cell("Oct 30, 2023").unwrap().unwrap();
/// assert_eq!(date.to_string(), "2023-10-30");
/// assert_eq!(parse_date_cell("  ").unwrap(), None);
/// ```
pub fn parse_date_cell(cell: &str) -> Result<Option<NaiveDate>, String> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cell, format) {
            return Ok(Some(date));
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(cell, format) {
            return Ok(Some(datetime.date()));
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(cell) {
        return Ok(Some(datetime.date_naive()));
    }

    Err(format!(
        "Invalid date '{}'. Use YYYY-MM-DD (e.g., '2023-10-30')",
        cell
    ))
}

/// Parse a story points cell
///
/// Empty cells count as zero points. Integral decimals such as `3.0` are
/// accepted because spreadsheet round-trips tend to produce them.
pub fn parse_points_cell(cell: &str) -> Result<u32, String> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(0);
    }
    if let Ok(points) = cell.parse::<u32>() {
        return Ok(points);
    }

    match cell.parse::<f64>() {
        Ok(value) if value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) => {
            Ok(value as u32)
        }
        _ => Err(format!(
            "Invalid story points '{}'. Use a non-negative whole number",
            cell
        )),
    }
}

/// Parse a status cell (exact, case-sensitive column name)
pub fn parse_status_cell(cell: &str) -> Result<TaskStatus, String> {
    cell.trim().parse::<TaskStatus>()
}

/// Check the row-level date invariant
///
/// # Returns
/// An error message when the completion date precedes the start date
pub fn validate_date_order(row: &TaskRow) -> Result<(), String> {
    if let (Some(start), Some(end)) = (row.date_started, row.date_completed)
        && end < start
    {
        return Err(format!(
            "Task '{}' completed on {} before it started on {}",
            row.title, end, start
        ));
    }
    Ok(())
}
