//! Everything the CLI and dashboard show, computed from one event list.

use std::fmt;

use chrono::NaiveDate;
use codedaily_core::{CommitEvent, DEFAULT_DAILY_GOAL};
use serde::Serialize;

use crate::achievements::{evaluate, AchievementBoard};
use crate::days::{CommitActivity, CommitDays};
use crate::goal::GoalProgress;
use crate::stats::{compute_stats, CommitStats};
use crate::streak::{compute_streak, StreakSummary};

/// Streak, stats, goal and achievements for one user on one day.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use codedaily_core::CommitEvent;
/// use codedaily_pulse::report::DailyReport;
///
/// let today = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
/// let push = CommitEvent { date: Some(today), repo: "octo/app".into(), commits: vec![], commit_count: 2 };
/// let report = DailyReport::build("octo", &[push], today);
/// assert_eq!(report.streak.current_streak, 1);
/// assert_eq!(report.stats.commits_today, 1);
/// assert_eq!(report.total_commit_volume, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyReport {
    pub username: String,
    pub today: NaiveDate,
    pub streak: StreakSummary,
    pub stats: CommitStats,
    /// Unique commit days, most recent first.
    pub commit_dates: Vec<NaiveDate>,
    /// Sum of commits across all events; drives the commit badges.
    pub total_commit_volume: u32,
    pub achievements: AchievementBoard,
    /// Uses [`DEFAULT_DAILY_GOAL`] until [`DailyReport::with_daily_goal`].
    pub goal: GoalProgress,
    /// The normalized days every engine ran over.
    #[serde(skip)]
    pub days: CommitDays,
    #[serde(skip)]
    pub activity: CommitActivity,
}

impl DailyReport {
    /// Normalize `events` once and run every engine over the result.
    pub fn build(username: impl Into<String>, events: &[CommitEvent], today: NaiveDate) -> Self {
        let activity = CommitActivity::from_events(events);
        let days = activity.days();
        let streak = compute_streak(&days, today);
        let stats = compute_stats(&days, today);
        let total_commit_volume = activity.total_commits();
        let achievements = evaluate(streak.longest_streak, total_commit_volume);
        let goal = GoalProgress::for_day(&activity, DEFAULT_DAILY_GOAL, today);

        let dropped = events.iter().filter(|e| e.date.is_none()).count();
        if dropped > 0 {
            tracing::warn!(dropped, "ignoring events without a usable date");
        }

        Self {
            username: username.into(),
            today,
            streak,
            stats,
            commit_dates: days.iter_desc().collect(),
            total_commit_volume,
            achievements,
            goal,
            days,
            activity,
        }
    }

    /// Measure today's volume against `daily` instead of the default goal.
    pub fn with_daily_goal(mut self, daily: u32) -> Self {
        self.goal = GoalProgress::for_day(&self.activity, daily, self.today);
        self
    }

    /// Render the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# code-daily: {} ({})\n\n", self.username, self.today));
        out.push_str(&self.streak.to_markdown());
        out.push('\n');
        out.push_str(&self.stats.to_markdown());
        out.push('\n');
        out.push_str(&self.goal.to_markdown());
        out.push('\n');
        out.push_str(&self.achievements.to_markdown());
        out
    }
}

impl fmt::Display for DailyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} on {}", self.username, self.today)?;
        writeln!(f)?;
        write!(f, "{}", self.streak)?;
        writeln!(f)?;
        write!(f, "{}", self.stats)?;
        writeln!(f)?;
        write!(f, "{}", self.goal)
    }
}
