//! Date-window math shared by every scoring component.
//!
//! RULE: overlap, clipping and week bucketing are computed here and
//! nowhere else. A `None` start is unbounded backward, a `None` end is
//! unbounded forward.

use crate::{
    error::{StaffError, StaffResult},
    types::DATE_FORMAT,
};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// An inclusive `[start, end]` calendar window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end:   NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> StaffResult<Self> {
        if start > end {
            return Err(StaffError::invalid(format!(
                "window start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Both bounds or neither. A single bound is rejected.
    pub fn from_bounds(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> StaffResult<Option<Self>> {
        match (start, end) {
            (Some(s), Some(e)) => Self::new(s, e).map(Some),
            (None, None) => Ok(None),
            _ => Err(StaffError::invalid(
                "start_date and end_date must be given together",
            )),
        }
    }

    /// `[from, from + days]`.
    pub fn lookahead(from: NaiveDate, days: u64) -> Self {
        Self {
            start: from,
            end:   add_days(from, days),
        }
    }

    pub fn days(&self) -> i64 {
        days_between(self.start, self.end)
    }

    pub fn weeks(&self) -> i64 {
        weeks_for_days(self.days())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// `YYYY-MM-DD to YYYY-MM-DD`.
    pub fn label(&self) -> String {
        format!(
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Whole weeks needed to cover `days`, rounded up. Zero or negative is zero.
pub fn weeks_for_days(days: i64) -> i64 {
    if days <= 0 {
        0
    } else {
        (days + 6) / 7
    }
}

/// True when `[start, end]` shares at least one day with `window`.
pub fn overlaps_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    window: &DateWindow,
) -> bool {
    let starts_in_time = start.map_or(true, |s| s <= window.end);
    let ends_in_time = end.map_or(true, |e| e >= window.start);
    starts_in_time && ends_in_time
}

/// The part of `[start, end]` that lies inside `window`, or `None` when
/// they do not overlap. An open end is clipped to the window end.
pub fn clip_to_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    window: &DateWindow,
) -> Option<DateWindow> {
    if !overlaps_window(start, end, window) {
        return None;
    }
    let effective_start = start.map_or(window.start, |s| s.max(window.start));
    let effective_end = end.map_or(window.end, |e| e.min(window.end));
    Some(DateWindow {
        start: effective_start,
        end:   effective_end,
    })
}

/// Weeks of `[start, end]` that fall inside `window`, rounded up.
pub fn clipped_weeks(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    window: &DateWindow,
) -> i64 {
    clip_to_window(start, end, window).map_or(0, |w| w.weeks())
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

pub fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

pub fn sub_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

pub fn next_day(date: NaiveDate) -> NaiveDate {
    add_days(date, 1)
}
