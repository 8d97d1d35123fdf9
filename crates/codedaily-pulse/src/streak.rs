//! Day-level commit streaks.
//!
//! A streak is a run of consecutive calendar days with at least one commit.
//! The current streak survives a one-day grace period: until a full day has
//! passed without a commit, yesterday's run is still reported as current,
//! just not as active.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::days::CommitDays;

/// Streak figures relative to a reference day.
///
/// `longest_streak >= current_streak` always holds.
///
/// # Examples
///
/// ```
/// use codedaily_pulse::streak::StreakSummary;
///
/// let empty = StreakSummary::default();
/// assert_eq!(empty.current_streak, 0);
/// assert!(!empty.streak_active);
/// assert!(empty.last_commit_date.is_none());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Consecutive days ending today, or yesterday during the grace period.
    pub current_streak: u32,
    /// Longest run anywhere in the history.
    pub longest_streak: u32,
    /// Whether the reference day itself has a commit.
    pub streak_active: bool,
    /// Most recent commit day.
    pub last_commit_date: Option<NaiveDate>,
}

/// Compute streak figures for `days` as seen on `today`.
///
/// Days after `today` (clock skew between the source and the caller) are
/// counted for `longest_streak` and `last_commit_date` but never anchor the
/// current streak.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use codedaily_pulse::days::CommitDays;
/// use codedaily_pulse::streak::compute_streak;
///
/// let days = CommitDays::parse_lenient(["2026-01-19", "2026-01-20", "2026-01-21"]);
/// let today = NaiveDate::from_ymd_opt(2026, 1, 21).unwrap();
/// let streak = compute_streak(&days, today);
/// assert_eq!(streak.current_streak, 3);
/// assert_eq!(streak.longest_streak, 3);
/// assert!(streak.streak_active);
/// ```
pub fn compute_streak(days: &CommitDays, today: NaiveDate) -> StreakSummary {
    let Some(last_commit_date) = days.latest() else {
        return StreakSummary::default();
    };

    let streak_active = days.contains(today);
    let anchor = if streak_active {
        Some(today)
    } else {
        today.pred_opt().filter(|yesterday| days.contains(*yesterday))
    };

    let current_streak = anchor.map_or(0, |day| run_ending_at(days, day));
    let longest_streak = longest_run(days).max(current_streak);

    StreakSummary {
        current_streak,
        longest_streak,
        streak_active,
        last_commit_date: Some(last_commit_date),
    }
}

fn run_ending_at(days: &CommitDays, day: NaiveDate) -> u32 {
    let mut length = 0u32;
    let mut cursor = Some(day);
    while let Some(d) = cursor.filter(|d| days.contains(*d)) {
        length = length.saturating_add(1);
        cursor = d.pred_opt();
    }
    length
}

fn longest_run(days: &CommitDays) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for day in days.iter() {
        run = match previous.and_then(|p| p.succ_opt()) {
            Some(expected) if expected == day => run.saturating_add(1),
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }

    longest
}

/// Celebration message for milestone streak lengths.
///
/// # Examples
///
/// ```
/// use codedaily_pulse::streak::milestone_message;
///
/// assert_eq!(milestone_message(7), Some("One week strong!"));
/// assert_eq!(milestone_message(8), None);
/// ```
pub fn milestone_message(streak_days: u32) -> Option<&'static str> {
    match streak_days {
        7 => Some("One week strong!"),
        14 => Some("Two weeks of consistency!"),
        30 => Some("One month champion!"),
        60 => Some("Two months unstoppable!"),
        100 => Some("100 days - legendary!"),
        _ => None,
    }
}

fn plural_days(n: u32) -> &'static str {
    if n == 1 {
        "day"
    } else {
        "days"
    }
}

impl StreakSummary {
    /// One-line status, e.g. `Current Streak: 7 days - One week strong!`.
    ///
    /// # Examples
    ///
    /// ```
    /// use codedaily_pulse::streak::StreakSummary;
    ///
    /// let grace = StreakSummary { current_streak: 2, longest_streak: 4, streak_active: false, last_commit_date: None };
    /// assert_eq!(grace.status_line(), "Current Streak: 2 days (commit today to continue!)");
    /// ```
    pub fn status_line(&self) -> String {
        if self.current_streak == 0 {
            return "No active streak".to_string();
        }

        let status = format!(
            "Current Streak: {} {}",
            self.current_streak,
            plural_days(self.current_streak)
        );
        if let Some(milestone) = milestone_message(self.current_streak) {
            format!("{status} - {milestone}")
        } else if !self.streak_active {
            format!("{status} (commit today to continue!)")
        } else {
            status
        }
    }

    /// Render the streak as markdown.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("## Streak\n\n");
        out.push_str(&format!("**{}**\n\n", self.status_line()));
        out.push_str(&format!(
            "- **Longest streak:** {} {}\n",
            self.longest_streak,
            plural_days(self.longest_streak)
        ));
        out.push_str(&format!(
            "- **Active today:** {}\n",
            if self.streak_active { "yes" } else { "no" }
        ));
        if let Some(last) = self.last_commit_date {
            out.push_str(&format!("- **Last commit:** {last}\n"));
        }
        out
    }
}

impl fmt::Display for StreakSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\u{1f525} {}", self.status_line())?;
        if let Some(last) = self.last_commit_date {
            writeln!(f, "   Last commit: {last}")?;
        }
        writeln!(
            f,
            "   Longest streak: {} {}",
            self.longest_streak,
            plural_days(self.longest_streak)
        )
    }
}
