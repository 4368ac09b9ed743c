//! Tracker export loader
//!
//! Reads a tab-separated export (one issue per record, header first) into
//! typed [`TaskRow`]s. Columns the report does not use are checked for
//! presence and then dropped.

use crate::tracker::TaskRow;
use crate::validation;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Columns every export must carry
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "Title",
    "Module Label",
    "Status",
    "Date Started",
    "Date Completed",
    "Story Points",
    "URL",
    "Labels",
    "Priority Level",
];

/// Failure while reading an export
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is empty, expected a header line")]
    MissingHeader { path: PathBuf },
    #[error("{path}: missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("{path}:{line}: column '{column}': {message}")]
    InvalidCell {
        path: PathBuf,
        line: usize,
        column: &'static str,
        message: String,
    },
    #[error("{path}:{line}: {message}")]
    InvalidRow {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

/// Positions of the used columns within a header line
struct ColumnIndex {
    title: usize,
    module_label: usize,
    status: usize,
    date_started: usize,
    date_completed: usize,
    story_points: usize,
}

impl ColumnIndex {
    fn from_header(header: &[String], path: &Path) -> Result<Self, LoadError> {
        let find = |column: &'static str| {
            header
                .iter()
                .position(|name| name.trim() == column)
                .ok_or_else(|| LoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column,
                })
        };

        for column in REQUIRED_COLUMNS {
            find(column)?;
        }

        Ok(Self {
            title: find("Title")?,
            module_label: find("Module Label")?,
            status: find("Status")?,
            date_started: find("Date Started")?,
            date_completed: find("Date Completed")?,
            story_points: find("Story Points")?,
        })
    }
}

/// Reader for one tracker export file
pub struct TsvLoader {
    file_path: PathBuf,
}

impl TsvLoader {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    /// Read and parse the whole file
    ///
    /// # Returns
    /// Rows in file order, or the first input error encountered
    pub fn load(&self) -> Result<Vec<TaskRow>, LoadError> {
        let content = fs::read_to_string(&self.file_path).map_err(|source| LoadError::Io {
            path: self.file_path.clone(),
            source,
        })?;
        let rows = parse_table(&content, &self.file_path)?;
        info!(path = %self.file_path.display(), rows = rows.len(), "loaded tracker export");
        Ok(rows)
    }
}

/// Parse export text into rows
///
/// # Arguments
/// * `content` - Whole file content, header line first
/// * `path` - Source path, used only in error messages
pub fn parse_table(content: &str, path: &Path) -> Result<Vec<TaskRow>, LoadError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut records = split_records(content).into_iter();

    let Some((_, header)) = records.next() else {
        return Err(LoadError::MissingHeader {
            path: path.to_path_buf(),
        });
    };
    let columns = ColumnIndex::from_header(&header, path)?;

    let mut rows = Vec::new();
    for (line_no, cells) in records {
        let cell = |at: usize| cells.get(at).map(String::as_str).unwrap_or("");
        let invalid = |column: &'static str, message: String| LoadError::InvalidCell {
            path: path.to_path_buf(),
            line: line_no,
            column,
            message,
        };

        let status = validation::parse_status_cell(cell(columns.status))
            .map_err(|message| invalid("Status", message))?;
        let date_started = validation::parse_date_cell(cell(columns.date_started))
            .map_err(|message| invalid("Date Started", message))?;
        let date_completed = validation::parse_date_cell(cell(columns.date_completed))
            .map_err(|message| invalid("Date Completed", message))?;
        let story_points = validation::parse_points_cell(cell(columns.story_points))
            .map_err(|message| invalid("Story Points", message))?;

        let row = TaskRow {
            line: line_no,
            title: cell(columns.title).trim().to_string(),
            module_label: cell(columns.module_label).trim().to_string(),
            status,
            date_started,
            date_completed,
            story_points,
        };
        validation::validate_date_order(&row).map_err(|message| LoadError::InvalidRow {
            path: path.to_path_buf(),
            line: line_no,
            message,
        })?;

        debug!(line = line_no, title = %row.title, status = %row.status, "parsed row");
        rows.push(row);
    }

    Ok(rows)
}

/// Split export text into records of cells
///
/// A cell that starts with `"` is quoted: tabs and line breaks inside it are
/// literal and `""` stands for one quote. Each record carries the line it
/// starts on (1-based). Records with only blank cells are dropped.
fn split_records(content: &str) -> Vec<(usize, Vec<String>)> {
    let mut records = Vec::new();
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\t' if !in_quotes => cells.push(std::mem::take(&mut current)),
            '\n' => {
                line += 1;
                if in_quotes {
                    current.push('\n');
                } else {
                    cells.push(std::mem::take(&mut current));
                    push_record(&mut records, record_line, std::mem::take(&mut cells));
                    record_line = line;
                }
            }
            _ => current.push(c),
        }
    }
    cells.push(current);
    push_record(&mut records, record_line, cells);

    records
}

fn push_record(records: &mut Vec<(usize, Vec<String>)>, line: usize, cells: Vec<String>) {
    if cells.iter().any(|cell| !cell.trim().is_empty()) {
        records.push((line, cells));
    }
}
