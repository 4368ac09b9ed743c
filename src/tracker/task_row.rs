use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Priority of a task still sitting in one of the Todo columns
///
/// `P1` is the most urgent column on the board, `P4` the least.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TodoPriority {
    P1,
    P2,
    P3,
    P4,
}

impl TodoPriority {
    /// All priorities from most to least urgent
    pub const ALL: [TodoPriority; 4] = [
        TodoPriority::P1,
        TodoPriority::P2,
        TodoPriority::P3,
        TodoPriority::P4,
    ];
}

/// Board column a task sits in
///
/// The text form is the exact, case-sensitive column name used by the
/// tracker export (e.g. `"Todo P1"`, `"On Hold"`, `"Archived-Old"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TaskStatus {
    /// Not started yet, waiting in a prioritized Todo column
    Todo(TodoPriority),
    /// Parked, not expected to move this period
    OnHold,
    /// Currently being worked on
    InProgress,
    /// Finished during the current board's lifetime
    Done,
    /// Finished and archived from an earlier board
    ArchivedOld,
    /// Finished and archived from the current board
    ArchivedNew,
}

impl TaskStatus {
    /// Every status, in board order
    pub const ALL: [TaskStatus; 9] = [
        TaskStatus::Todo(TodoPriority::P1),
        TaskStatus::Todo(TodoPriority::P2),
        TaskStatus::Todo(TodoPriority::P3),
        TaskStatus::Todo(TodoPriority::P4),
        TaskStatus::OnHold,
        TaskStatus::InProgress,
        TaskStatus::Done,
        TaskStatus::ArchivedOld,
        TaskStatus::ArchivedNew,
    ];

    /// Column name as it appears in the export
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo(TodoPriority::P1) => "Todo P1",
            TaskStatus::Todo(TodoPriority::P2) => "Todo P2",
            TaskStatus::Todo(TodoPriority::P3) => "Todo P3",
            TaskStatus::Todo(TodoPriority::P4) => "Todo P4",
            TaskStatus::OnHold => "On Hold",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
            TaskStatus::ArchivedOld => "Archived-Old",
            TaskStatus::ArchivedNew => "Archived-New",
        }
    }

    /// Check if the task counts as finished work
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            TaskStatus::Done | TaskStatus::ArchivedOld | TaskStatus::ArchivedNew
        )
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = TaskStatus::ALL.iter().map(|s| s.as_str()).collect();
                format!(
                    "Invalid status '{}'. Valid options are: {}",
                    s,
                    valid.join(", ")
                )
            })
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

/// One task from the tracker export
///
/// Rows have no identity of their own; `line` only records where the row
/// came from so that later errors and logs can point back at the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRow {
    /// 1-based line number in the source table (0 when built in memory)
    #[serde(skip)]
    pub line: usize,
    /// Issue title
    pub title: String,
    /// Module label used to group tasks into one timeline band
    pub module_label: String,
    /// Board column
    pub status: TaskStatus,
    /// Date work started, if recorded
    pub date_started: Option<NaiveDate>,
    /// Date work completed, if recorded
    pub date_completed: Option<NaiveDate>,
    /// Effort estimate
    pub story_points: u32,
}

impl TaskRow {
    /// Create a row with no dates and no points
    pub fn new(
        title: impl Into<String>,
        module_label: impl Into<String>,
        status: TaskStatus,
    ) -> Self {
        Self {
            line: 0,
            title: title.into(),
            module_label: module_label.into(),
            status,
            date_started: None,
            date_completed: None,
            story_points: 0,
        }
    }

    /// Set the start date
    pub fn started(mut self, date: NaiveDate) -> Self {
        self.date_started = Some(date);
        self
    }

    /// Set the completion date
    pub fn completed(mut self, date: NaiveDate) -> Self {
        self.date_completed = Some(date);
        self
    }

    /// Set the story points
    pub fn points(mut self, story_points: u32) -> Self {
        self.story_points = story_points;
        self
    }

    /// Check whether the task was being worked on during `date`
    ///
    /// True when the task started on `date`, or when `date` falls inside the
    /// recorded start..=completion window.
    pub fn is_in_flight_on(&self, date: NaiveDate) -> bool {
        match (self.date_started, self.date_completed) {
            (Some(start), Some(end)) => start <= date && date <= end,
            (Some(start), None) => start == date,
            _ => false,
        }
    }
}
