//! Monday-first activity grid for the last few days.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::days::{CommitDays, MAX_WINDOW_DAYS};
use crate::stats::days_before;

/// Default calendar span: two weeks.
pub const DEFAULT_CALENDAR_DAYS: u32 = 14;

/// Recent days grouped into Monday-first weeks.
///
/// Each cell is `Some(true)` for a commit day, `Some(false)` for a day
/// without commits and `None` for slots outside the span.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use codedaily_pulse::calendar::CalendarGrid;
/// use codedaily_pulse::days::CommitDays;
///
/// let today = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(); // a Tuesday
/// let grid = CalendarGrid::build(&CommitDays::from_dates([today]), 7, today);
/// assert_eq!(grid.weeks.len(), 2);
/// assert_eq!(grid.weeks[1][1], Some(true));
/// assert_eq!(grid.weeks[1][2], None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarGrid {
    /// Oldest week first; index 0 is Monday.
    pub weeks: Vec<[Option<bool>; 7]>,
    /// First day shown.
    pub start: NaiveDate,
    /// Last day shown (the reference day).
    pub end: NaiveDate,
}

impl CalendarGrid {
    /// Lay out the `span` days ending at `today`, at most [`MAX_WINDOW_DAYS`].
    /// A zero span has no weeks.
    pub fn build(days: &CommitDays, span: u32, today: NaiveDate) -> Self {
        let span = span.min(MAX_WINDOW_DAYS);
        if span == 0 {
            return Self {
                weeks: Vec::new(),
                start: today,
                end: today,
            };
        }

        let start = days_before(today, u64::from(span - 1));
        let first_monday = days_before(start, u64::from(start.weekday().num_days_from_monday()));

        let mut weeks: Vec<[Option<bool>; 7]> = Vec::new();
        for date in start.iter_days().take_while(|date| *date <= today) {
            let week = usize::try_from((date - first_monday).num_days() / 7).unwrap_or(0);
            if week >= weeks.len() {
                weeks.resize(week + 1, [None; 7]);
            }
            let weekday = date.weekday().num_days_from_monday() as usize;
            weeks[week][weekday] = Some(days.contains(date));
        }

        Self {
            weeks,
            start,
            end: today,
        }
    }

    /// Number of commit days shown.
    pub fn active_days(&self) -> usize {
        self.weeks
            .iter()
            .flatten()
            .filter(|cell| **cell == Some(true))
            .count()
    }
}

impl fmt::Display for CalendarGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Recent Activity:")?;
        writeln!(f, "  Mon Tue Wed Thu Fri Sat Sun")?;
        for week in &self.weeks {
            let mut row = String::from("  ");
            for cell in week {
                row.push_str(match cell {
                    Some(true) => "[*] ",
                    Some(false) => "[ ] ",
                    None => "    ",
                });
            }
            writeln!(f, "{}", row.trim_end())?;
        }
        Ok(())
    }
}
