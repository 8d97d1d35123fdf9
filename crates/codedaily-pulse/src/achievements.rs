//! Badge catalog unlocked by streak length and commit volume.
//!
//! Unlocks are derived from the figures on every call; nothing is stored.
//! Streak badges look at the longest streak, so they stay unlocked after a
//! streak breaks.

use std::fmt;

use serde::Serialize;

/// What an achievement threshold is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    /// Longest streak, in days.
    Streak,
    /// Total commit volume.
    Commits,
}

impl fmt::Display for AchievementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AchievementCategory::Streak => write!(f, "streak"),
            AchievementCategory::Commits => write!(f, "commits"),
        }
    }
}

/// A catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub threshold: u32,
}

const fn streak(
    id: &'static str,
    name: &'static str,
    emoji: &'static str,
    description: &'static str,
    threshold: u32,
) -> Achievement {
    Achievement {
        id,
        name,
        emoji,
        description,
        category: AchievementCategory::Streak,
        threshold,
    }
}

const fn commits(
    id: &'static str,
    name: &'static str,
    emoji: &'static str,
    description: &'static str,
    threshold: u32,
) -> Achievement {
    Achievement {
        id,
        name,
        emoji,
        description,
        category: AchievementCategory::Commits,
        threshold,
    }
}

/// Every achievement, streak badges first, each category by ascending threshold.
pub const CATALOG: [Achievement; 10] = [
    streak("streak_3", "First Steps", "\u{1f525}", "Maintain a 3-day coding streak", 3),
    streak("streak_7", "Week Warrior", "\u{1f3c6}", "Maintain a 7-day coding streak", 7),
    streak("streak_14", "Fortnight Fighter", "\u{1f4c5}", "Maintain a 14-day coding streak", 14),
    streak("streak_30", "Monthly Master", "\u{2b50}", "Maintain a 30-day coding streak", 30),
    streak("streak_100", "Century Coder", "\u{1f4af}", "Maintain a 100-day coding streak", 100),
    commits("first_commit", "Hello World", "\u{1f44b}", "Make your first commit", 1),
    commits("commits_10", "Getting Started", "\u{1f331}", "Make 10 total commits", 10),
    commits("commits_50", "Halfway Hero", "\u{1f680}", "Make 50 total commits", 50),
    commits("commits_100", "Century Club", "\u{1f4af}", "Make 100 total commits", 100),
    commits("commits_500", "Commit Champion", "\u{1f451}", "Make 500 total commits", 500),
];

/// A catalog entry together with whether it is unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementStatus {
    #[serde(flatten)]
    pub achievement: Achievement,
    pub unlocked: bool,
}

/// Evaluate the whole catalog.
///
/// # Examples
///
/// ```
/// use codedaily_pulse::achievements::evaluate;
///
/// let board = evaluate(7, 12);
/// assert_eq!(board.unlocked_count(), 4);
/// assert!(board.is_unlocked("streak_7"));
/// assert!(!board.is_unlocked("commits_50"));
/// ```
pub fn evaluate(longest_streak: u32, total_commits: u32) -> AchievementBoard {
    let entries = CATALOG
        .iter()
        .map(|achievement| {
            let value = match achievement.category {
                AchievementCategory::Streak => longest_streak,
                AchievementCategory::Commits => total_commits,
            };
            AchievementStatus {
                achievement: *achievement,
                unlocked: value >= achievement.threshold,
            }
        })
        .collect();
    AchievementBoard { entries }
}

/// Unlock state of every achievement, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AchievementBoard {
    pub entries: Vec<AchievementStatus>,
}

impl AchievementBoard {
    /// How many achievements are unlocked.
    pub fn unlocked_count(&self) -> usize {
        self.entries.iter().filter(|e| e.unlocked).count()
    }

    /// Whether the achievement with `id` is unlocked.
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.unlocked && e.achievement.id == id)
    }

    /// Render as a markdown checklist grouped by category.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "## Achievements ({}/{})\n",
            self.unlocked_count(),
            self.entries.len()
        ));
        for category in [AchievementCategory::Streak, AchievementCategory::Commits] {
            out.push_str(&format!("\n### {}\n\n", heading(category)));
            for entry in self.entries.iter().filter(|e| e.achievement.category == category) {
                let a = &entry.achievement;
                out.push_str(&format!(
                    "- [{}] {} **{}**: {}\n",
                    if entry.unlocked { "x" } else { " " },
                    a.emoji,
                    a.name,
                    a.description
                ));
            }
        }
        out
    }
}

fn heading(category: AchievementCategory) -> &'static str {
    match category {
        AchievementCategory::Streak => "Streak",
        AchievementCategory::Commits => "Commits",
    }
}

impl fmt::Display for AchievementBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Achievements ({}/{} unlocked):",
            self.unlocked_count(),
            self.entries.len()
        )?;
        for entry in &self.entries {
            let a = &entry.achievement;
            if entry.unlocked {
                writeln!(f, "  {} {} - {}", a.emoji, a.name, a.description)?;
            } else {
                writeln!(f, "  \u{1f512} {} - {}", a.name, a.description)?;
            }
        }
        Ok(())
    }
}
