//! Projected module timelines
//!
//! Converts the story points of each module into an estimated span. Work is
//! burned at a fixed number of points per working day, and every full or
//! partial cycle of working days adds a fixed block of calendar rest days
//! (weekends and holidays at a flat ratio).

use crate::tracker::TaskRow;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Capacity constants for the projection heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionSettings {
    /// Story points one developer burns per working day
    pub points_per_day: u32,
    /// Working days in one cycle
    pub working_days_per_cycle: u32,
    /// Calendar days of non-working time added per started cycle
    pub rest_days_per_cycle: u32,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            points_per_day: 8,
            working_days_per_cycle: 22,
            rest_days_per_cycle: 8,
        }
    }
}

impl ProjectionSettings {
    /// Working days needed for `points`, rounded up
    ///
    /// A zero capacity is rejected when the configuration is loaded; here it
    /// degrades to zero days instead of dividing by zero.
    pub fn working_days(&self, points: u64) -> u64 {
        if self.points_per_day == 0 {
            return 0;
        }
        points.div_ceil(u64::from(self.points_per_day))
    }

    /// Rest days incurred by `working_days`
    pub fn rest_days(&self, working_days: u64) -> u64 {
        if self.working_days_per_cycle == 0 {
            return 0;
        }
        working_days
            .div_ceil(u64::from(self.working_days_per_cycle))
            .saturating_mul(u64::from(self.rest_days_per_cycle))
    }
}

/// Ordering rule for module bands
///
/// Labels in `pin_first` come before every other label, in list order.
/// Labels in `pin_last` come after every other label, in list order. All
/// remaining labels sort lexically. Matching ignores case and surrounding
/// whitespace; a label listed in both lists is treated as pinned first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleOrdering {
    pub pin_first: Vec<String>,
    pub pin_last: Vec<String>,
}

impl Default for ModuleOrdering {
    fn default() -> Self {
        Self {
            pin_first: vec!["mvp".to_string()],
            pin_last: vec!["miscellaneous tasks".to_string(), "misc".to_string()],
        }
    }
}

/// Sort rank of a module: pinned-first group, lexical group, pinned-last group
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    First(usize),
    Middle,
    Last(usize),
}

impl ModuleOrdering {
    fn rank(&self, module: &str) -> Rank {
        let key = module.trim().to_lowercase();
        let position = |names: &[String]| {
            names
                .iter()
                .position(|name| name.trim().to_lowercase() == key)
        };

        if let Some(at) = position(&self.pin_first) {
            Rank::First(at)
        } else if let Some(at) = position(&self.pin_last) {
            Rank::Last(at)
        } else {
            Rank::Middle
        }
    }

    /// Compare two module labels under this rule
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.rank(a).cmp(&self.rank(b)).then_with(|| a.cmp(b))
    }
}

/// Estimated span of one module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedSpan {
    pub module: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub points_sum: u64,
    pub working_days: u64,
    pub rest_days: u64,
}

impl ProjectedSpan {
    /// Calendar days covered by the span
    pub fn duration_days(&self) -> u64 {
        self.working_days.saturating_add(self.rest_days)
    }
}

/// Project one span per module label
///
/// # Arguments
/// * `rows` - Rows to project, typically already filtered
/// * `settings` - Capacity constants
/// * `ordering` - Band ordering rule
///
/// # Returns
/// One span per module with at least one dated row, ordered by `ordering`.
/// Modules whose rows all lack a start date are skipped.
pub fn project_modules(
    rows: &[TaskRow],
    settings: &ProjectionSettings,
    ordering: &ModuleOrdering,
) -> Vec<ProjectedSpan> {
    let mut groups: BTreeMap<&str, (u64, Option<NaiveDate>)> = BTreeMap::new();
    for row in rows {
        let (points, earliest) = groups.entry(row.module_label.as_str()).or_default();
        *points += u64::from(row.story_points);
        if let Some(started) = row.date_started {
            *earliest = Some(earliest.map_or(started, |current| current.min(started)));
        }
    }

    let mut spans: Vec<ProjectedSpan> = groups
        .into_iter()
        .filter_map(|(module, (points_sum, earliest))| {
            let Some(start) = earliest else {
                warn!(module, "skipping module without any start date");
                return None;
            };
            let working_days = settings.working_days(points_sum);
            let rest_days = settings.rest_days(working_days);
            let end = i64::try_from(working_days.saturating_add(rest_days))
                .ok()
                .and_then(Duration::try_days)
                .and_then(|days| start.checked_add_signed(days))
                .unwrap_or(NaiveDate::MAX);
            debug!(module, points_sum, working_days, rest_days, %start, %end, "projected module");
            Some(ProjectedSpan {
                module: module.to_string(),
                start,
                end,
                points_sum,
                working_days,
                rest_days,
            })
        })
        .collect();

    spans.sort_by(|a, b| ordering.compare(&a.module, &b.module));
    spans
}
