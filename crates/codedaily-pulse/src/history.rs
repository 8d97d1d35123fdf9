//! Per-day commit volume over a trailing window, for heatmaps.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::days::{CommitActivity, MAX_WINDOW_DAYS};
use crate::stats::days_before;

/// Default heatmap length: twelve weeks.
pub const DEFAULT_HISTORY_DAYS: u32 = 84;

/// One heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryDay {
    pub date: NaiveDate,
    pub count: u32,
    /// Intensity bucket 0–4, see [`intensity_level`].
    pub level: u8,
}

/// Bounds of the covered window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_days: u32,
}

/// Commit volume for each day of a window ending at the reference day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct History {
    /// Oldest first.
    pub days: Vec<HistoryDay>,
    pub period: HistoryPeriod,
    /// Highest single-day count in the window.
    pub max_count: u32,
}

/// Bucket a daily commit count into a heatmap level.
///
/// # Examples
///
/// ```
/// use codedaily_pulse::history::intensity_level;
///
/// assert_eq!(intensity_level(0), 0);
/// assert_eq!(intensity_level(1), 1);
/// assert_eq!(intensity_level(3), 2);
/// assert_eq!(intensity_level(5), 3);
/// assert_eq!(intensity_level(42), 4);
/// ```
pub fn intensity_level(count: u32) -> u8 {
    match count {
        0 => 0,
        1 => 1,
        2..=3 => 2,
        4..=5 => 3,
        _ => 4,
    }
}

/// Build the heatmap for the `days` days ending at `today`.
///
/// A zero-length window yields an empty list whose period is the single
/// reference day with `total_days = 0`. Longer windows are capped at
/// [`MAX_WINDOW_DAYS`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use codedaily_pulse::days::CommitActivity;
/// use codedaily_pulse::history::compute_history;
///
/// let today = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
/// let history = compute_history(&CommitActivity::default(), 7, today);
/// assert_eq!(history.days.len(), 7);
/// assert_eq!(history.days.last().map(|d| d.date), Some(today));
/// ```
pub fn compute_history(activity: &CommitActivity, days: u32, today: NaiveDate) -> History {
    let days = days.min(MAX_WINDOW_DAYS);
    let start = match days {
        0 => today,
        n => days_before(today, u64::from(n - 1)),
    };

    let cells: Vec<HistoryDay> = if days == 0 {
        Vec::new()
    } else {
        start
            .iter_days()
            .take_while(|date| *date <= today)
            .map(|date| {
                let count = activity.count_on(date);
                HistoryDay {
                    date,
                    count,
                    level: intensity_level(count),
                }
            })
            .collect()
    };

    let max_count = cells.iter().map(|c| c.count).max().unwrap_or(0);
    let total_days = u32::try_from(cells.len()).unwrap_or(u32::MAX);

    History {
        days: cells,
        period: HistoryPeriod {
            start,
            end: today,
            total_days,
        },
        max_count,
    }
}

const GLYPHS: [char; 5] = ['\u{b7}', '\u{2591}', '\u{2592}', '\u{2593}', '\u{2588}'];
const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

impl History {
    /// Total commit volume in the window.
    pub fn total_commits(&self) -> u32 {
        self.days
            .iter()
            .fold(0u32, |acc, d| acc.saturating_add(d.count))
    }

    /// Days in the window with at least one commit.
    pub fn active_days(&self) -> usize {
        self.days.iter().filter(|d| d.count > 0).count()
    }

    /// Render as a markdown table, one row per active day.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "## Commit History ({} to {})\n\n",
            self.period.start, self.period.end
        ));
        out.push_str(&format!(
            "{} commits on {} of {} days (busiest day: {})\n\n",
            self.total_commits(),
            self.active_days(),
            self.period.total_days,
            self.max_count
        ));
        if self.active_days() == 0 {
            return out;
        }
        out.push_str("| Date | Commits | Level |\n");
        out.push_str("|------|---------|-------|\n");
        for day in self.days.iter().filter(|d| d.count > 0) {
            out.push_str(&format!("| {} | {} | {} |\n", day.date, day.count, day.level));
        }
        out
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Commit history {} to {} ({} commits, busiest day {}):",
            self.period.start,
            self.period.end,
            self.total_commits(),
            self.max_count
        )?;
        if self.days.is_empty() {
            return Ok(());
        }

        // Columns are weeks, rows are weekdays; the first column may start mid-week.
        let lead = self.period.start.weekday().num_days_from_monday() as usize;
        let mut rows: [String; 7] = Default::default();
        for row in rows.iter_mut().take(lead) {
            row.push(' ');
        }
        for (offset, day) in self.days.iter().enumerate() {
            rows[(lead + offset) % 7].push(GLYPHS[usize::from(day.level.min(4))]);
        }
        for (name, row) in WEEKDAYS.iter().zip(rows.iter()) {
            writeln!(f, "  {name} {}", row.trim_end())?;
        }
        writeln!(f, "  less {} more", GLYPHS.iter().collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codedaily_core::CommitEvent;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn activity(entries: &[(&str, u32)]) -> CommitActivity {
        let events: Vec<CommitEvent> = entries
            .iter()
            .map(|(date, count)| CommitEvent {
                date: Some(d(date)),
                repo: "user/repo".into(),
                commits: vec![],
                commit_count: *count,
            })
            .collect();
        CommitActivity::from_events(&events)
    }

    #[test]
    fn levels_match_buckets() {
        let levels: Vec<u8> = (0..=7).map(intensity_level).collect();
        assert_eq!(levels, vec![0, 1, 2, 2, 3, 3, 4, 4]);
    }

    #[test]
    fn window_ends_at_today_oldest_first() {
        let history = compute_history(&activity(&[]), 84, d("2026-01-20"));
        assert_eq!(history.days.len(), 84);
        assert_eq!(history.period.total_days, 84);
        assert_eq!(history.period.start, d("2025-10-29"));
        assert_eq!(history.days[0].date, d("2025-10-29"));
        assert_eq!(history.days[83].date, d("2026-01-20"));
        assert!(history.days.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn counts_and_levels_come_from_activity() {
        let history = compute_history(
            &activity(&[("2026-01-20", 2), ("2026-01-20", 4), ("2026-01-18", 1), ("2025-01-01", 9)]),
            7,
            d("2026-01-20"),
        );
        let today = history.days.last().unwrap();
        assert_eq!(today.count, 6);
        assert_eq!(today.level, 4);
        let two_days_ago = &history.days[4];
        assert_eq!(two_days_ago.date, d("2026-01-18"));
        assert_eq!(two_days_ago.level, 1);
        assert_eq!(history.max_count, 6);
        assert_eq!(history.total_commits(), 7);
        assert_eq!(history.active_days(), 2);
    }

    #[test]
    fn zero_days_is_empty() {
        let history = compute_history(&activity(&[("2026-01-20", 3)]), 0, d("2026-01-20"));
        assert!(history.days.is_empty());
        assert_eq!(history.period.total_days, 0);
        assert_eq!(history.max_count, 0);
    }

    #[test]
    fn display_lays_out_weekday_rows() {
        // 2026-01-19 is a Monday.
        let history = compute_history(&activity(&[("2026-01-21", 1)]), 7, d("2026-01-25"));
        let text = history.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[1], "  Mon \u{b7}");
        assert_eq!(lines[3], "  Wed \u{2591}");
    }

    #[test]
    fn display_pads_a_mid_week_start() {
        // Starts on Wednesday 2026-01-21.
        let history = compute_history(&activity(&[]), 7, d("2026-01-27"));
        let text = history.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "  Mon  \u{b7}");
        assert_eq!(lines[3], "  Wed \u{b7}");
    }

    #[test]
    fn markdown_lists_active_days_only() {
        let history = compute_history(&activity(&[("2026-01-19", 3)]), 3, d("2026-01-20"));
        let md = history.to_markdown();
        assert!(md.contains("| 2026-01-19 | 3 | 2 |"));
        assert!(!md.contains("| 2026-01-20 |"));
    }

    #[test]
    fn long_windows_are_capped() {
        let history = compute_history(&activity(&[("2026-01-20", 2)]), 5_000_000, d("2026-01-21"));
        assert_eq!(history.days.len(), MAX_WINDOW_DAYS as usize);
        assert_eq!(history.period.total_days, MAX_WINDOW_DAYS);
        assert_eq!(history.period.start, d("2025-01-21"));
        assert_eq!(history.max_count, 2);
    }
}
