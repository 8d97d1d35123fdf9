//! Commit-day counts over calendar and rolling windows.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::days::{saturating_u32, CommitDays};

/// Unique commit days per window, relative to a reference day.
///
/// # Examples
///
/// ```
/// use codedaily_pulse::stats::CommitStats;
///
/// let stats = CommitStats::default();
/// assert_eq!(stats.total_commits, 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStats {
    /// 1 when the reference day has a commit, else 0.
    pub commits_today: u32,
    /// Days in the ISO week (Monday–Sunday) containing the reference day.
    pub commits_this_week: u32,
    /// Days in the calendar month containing the reference day.
    pub commits_this_month: u32,
    /// Days in `[today - 6, today]`.
    pub commits_last_7_days: u32,
    /// Days in `[today - 29, today]`.
    pub commits_last_30_days: u32,
    /// All unique commit days.
    pub total_commits: u32,
}

/// A closed range of calendar days.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use codedaily_pulse::stats::DateWindow;
///
/// let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(); // a Thursday
/// let week = DateWindow::iso_week(today);
/// assert_eq!(week.start, NaiveDate::from_ymd_opt(2025, 12, 29).unwrap());
/// assert_eq!(week.end, NaiveDate::from_ymd_opt(2026, 1, 4).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// First day, inclusive.
    pub start: NaiveDate,
    /// Last day, inclusive.
    pub end: NaiveDate,
}

impl DateWindow {
    /// Just `day`.
    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Monday through Sunday of the week containing `day`.
    pub fn iso_week(day: NaiveDate) -> Self {
        let start = days_before(day, u64::from(day.weekday().num_days_from_monday()));
        Self {
            start,
            end: days_after(start, 6),
        }
    }

    /// The 1st through the last day of the month containing `day`.
    pub fn calendar_month(day: NaiveDate) -> Self {
        let start = day.with_day(1).unwrap_or(day);
        let (year, month) = if day.month() == 12 {
            (day.year() + 1, 1)
        } else {
            (day.year(), day.month() + 1)
        };
        let end = NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    /// The `len` days ending at `day`, inclusive. A zero length is empty.
    pub fn trailing(day: NaiveDate, len: u32) -> Self {
        match len {
            0 => Self {
                start: days_after(day, 1),
                end: day,
            },
            n => Self {
                start: days_before(day, u64::from(n - 1)),
                end: day,
            },
        }
    }

    /// Whether `day` falls inside the window.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Number of commit days inside the window.
    pub fn count(&self, days: &CommitDays) -> u32 {
        days.count_between(self.start, self.end)
    }
}

pub(crate) fn days_before(day: NaiveDate, n: u64) -> NaiveDate {
    day.checked_sub_days(Days::new(n)).unwrap_or(NaiveDate::MIN)
}

pub(crate) fn days_after(day: NaiveDate, n: u64) -> NaiveDate {
    day.checked_add_days(Days::new(n)).unwrap_or(NaiveDate::MAX)
}

/// Count commit days in each window around `today`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use codedaily_pulse::days::CommitDays;
/// use codedaily_pulse::stats::compute_stats;
///
/// let days = CommitDays::parse_lenient(["2026-01-20", "2026-01-15", "2025-12-31"]);
/// let stats = compute_stats(&days, NaiveDate::from_ymd_opt(2026, 1, 20).unwrap());
/// assert_eq!(stats.commits_today, 1);
/// assert_eq!(stats.commits_this_month, 2);
/// assert_eq!(stats.commits_last_30_days, 3);
/// assert_eq!(stats.total_commits, 3);
/// ```
pub fn compute_stats(days: &CommitDays, today: NaiveDate) -> CommitStats {
    CommitStats {
        commits_today: DateWindow::single(today).count(days),
        commits_this_week: DateWindow::iso_week(today).count(days),
        commits_this_month: DateWindow::calendar_month(today).count(days),
        commits_last_7_days: DateWindow::trailing(today, 7).count(days),
        commits_last_30_days: DateWindow::trailing(today, 30).count(days),
        total_commits: saturating_u32(days.len()),
    }
}

fn plural_days(n: u32) -> &'static str {
    if n == 1 {
        "day"
    } else {
        "days"
    }
}

impl CommitStats {
    fn rows(&self) -> [(&'static str, u32); 6] {
        [
            ("Today", self.commits_today),
            ("This week", self.commits_this_week),
            ("This month", self.commits_this_month),
            ("Last 7 days", self.commits_last_7_days),
            ("Last 30 days", self.commits_last_30_days),
            ("All time", self.total_commits),
        ]
    }

    /// Render the stats as a markdown table.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("## Commit Stats\n\n");
        out.push_str("| Window | Days with commits |\n");
        out.push_str("|--------|-------------------|\n");
        for (label, count) in self.rows() {
            out.push_str(&format!("| {label} | {count} |\n"));
        }
        out
    }
}

impl fmt::Display for CommitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\u{1f4ca} Commit Stats (days with commits):")?;
        for (label, count) in self.rows() {
            let label = format!("{label}:");
            writeln!(f, "   {label:<14}{count} {}", plural_days(count))?;
        }
        Ok(())
    }
}
