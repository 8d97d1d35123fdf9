//! Progress toward the daily commit goal.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::days::CommitActivity;

/// How today's commit volume compares with the goal.
///
/// # Examples
///
/// ```
/// use codedaily_pulse::goal::GoalProgress;
///
/// let progress = GoalProgress::new(5, 2);
/// assert!(!progress.met);
/// assert_eq!(progress.remaining(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    /// Commits to aim for each day.
    pub daily: u32,
    /// Commits made on the reference day.
    pub today_progress: u32,
    pub met: bool,
}

impl GoalProgress {
    pub fn new(daily: u32, today_progress: u32) -> Self {
        Self {
            daily,
            today_progress,
            met: today_progress >= daily,
        }
    }

    /// Progress from the commit volume on `today`.
    pub fn for_day(activity: &CommitActivity, daily: u32, today: NaiveDate) -> Self {
        Self::new(daily, activity.count_on(today))
    }

    /// Commits still needed today.
    pub fn remaining(&self) -> u32 {
        self.daily.saturating_sub(self.today_progress)
    }

    pub fn to_markdown(&self) -> String {
        format!("## Daily Goal\n\n{}\n", self.summary())
    }

    fn summary(&self) -> String {
        let noun = if self.daily == 1 { "commit" } else { "commits" };
        if self.met {
            format!("{} / {} {noun} - Goal met!", self.today_progress, self.daily)
        } else {
            format!(
                "{} / {} {noun} ({} more to reach your goal)",
                self.today_progress,
                self.daily,
                self.remaining()
            )
        }
    }
}

impl fmt::Display for GoalProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\u{1f3af} Daily Goal: {}", self.summary())
    }
}
