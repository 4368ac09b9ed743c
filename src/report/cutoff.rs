//! Semi-monthly cutoff periods
//!
//! Reports are filed twice a month: once for the 1st to the 15th and once
//! for the 16th to the end of the month.

use chrono::{Datelike, NaiveDate};

/// Last day of the month containing `date`
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(date)
}

/// Cutoff window containing `date`
///
/// # Returns
/// `(first day, last day)` of the half-month window
pub fn cutoff_window(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    if date.day() <= 15 {
        (
            date.with_day(1).unwrap_or(date),
            date.with_day(15).unwrap_or(date),
        )
    } else {
        (date.with_day(16).unwrap_or(date), last_day_of_month(date))
    }
}

/// Human-readable cutoff period, e.g. `"2023-11-01 to 2023-11-15"`
pub fn cutoff_period(date: NaiveDate) -> String {
    let (start, end) = cutoff_window(date);
    format!("{} to {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
}

/// Number of cutoffs since `start`
///
/// Two per complete calendar month between the two dates, plus one when
/// `current` already sits in the second half of its month.
pub fn cutoff_count(start: NaiveDate, current: NaiveDate) -> i64 {
    let complete_months = i64::from(current.year() - start.year()) * 12
        + i64::from(current.month())
        - i64::from(start.month());

    let mut cutoffs = complete_months * 2;
    if current.day() > 15 {
        cutoffs += 1;
    }
    cutoffs
}
