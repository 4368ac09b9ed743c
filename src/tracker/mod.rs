//! Task tracker domain models and the status filters built on them
//!
//! This module contains the typed rows read from a tracker export and the
//! pure functions that slice them up. It is split into submodules:
//! - `task_row`: the `TaskRow` record and its `TaskStatus` column
//! - `partition`: status exclusion filters and status buckets

mod partition;
mod task_row;

// Re-export all public types
pub use partition::{StatusBuckets, filter_excluding, in_flight_on};
pub use task_row::{TaskRow, TaskStatus, TodoPriority};
