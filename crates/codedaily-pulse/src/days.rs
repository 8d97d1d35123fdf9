//! Normalization of raw commit activity into calendar days.
//!
//! Every engine in this crate works on [`CommitDays`]: a de-duplicated,
//! ordered set of valid dates. Malformed or missing dates are dropped here,
//! never reported as errors.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate};
use codedaily_core::CommitEvent;
use serde::Serialize;

/// The set of unique calendar days on which at least one commit happened.
///
/// # Examples
///
/// ```
/// use codedaily_pulse::days::CommitDays;
///
/// let days = CommitDays::parse_lenient(["2026-01-20", "2026-01-20", "unknown", ""]);
/// assert_eq!(days.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommitDays(BTreeSet<NaiveDate>);

impl CommitDays {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-parsed dates, collapsing duplicates.
    pub fn from_dates<I>(dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self(dates.into_iter().collect())
    }

    /// Days of all events that carry a date. Events without one are skipped.
    pub fn from_events(events: &[CommitEvent]) -> Self {
        Self::from_dates(events.iter().filter_map(|e| e.date))
    }

    /// Parse raw date strings, keeping only the ones that name a real day.
    ///
    /// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (whose own calendar
    /// date is used). Empty strings, `"unknown"` and anything unparseable
    /// are dropped.
    pub fn parse_lenient<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dropped = 0usize;
        let days = raw
            .into_iter()
            .filter_map(|s| {
                let parsed = parse_day(s.as_ref());
                if parsed.is_none() {
                    dropped += 1;
                }
                parsed
            })
            .collect();
        if dropped > 0 {
            tracing::debug!(dropped, "skipped commit entries without a valid date");
        }
        Self(days)
    }

    /// Whether `day` had a commit.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.0.contains(&day)
    }

    /// Number of unique commit days.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when no day had a commit.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Most recent commit day.
    pub fn latest(&self) -> Option<NaiveDate> {
        self.0.last().copied()
    }

    /// Number of commit days in the closed interval `[start, end]`.
    ///
    /// An inverted interval is empty.
    pub fn count_between(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        if start > end {
            return 0;
        }
        saturating_u32(self.0.range(start..=end).count())
    }

    /// Days in ascending order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NaiveDate> + '_ {
        self.0.iter().copied()
    }

    /// Days in descending order (most recent first).
    pub fn iter_desc(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.iter().rev().copied()
    }
}

impl FromIterator<NaiveDate> for CommitDays {
    fn from_iter<T: IntoIterator<Item = NaiveDate>>(iter: T) -> Self {
        Self::from_dates(iter)
    }
}

/// Parse one raw date value.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use codedaily_pulse::days::parse_day;
///
/// let expected = NaiveDate::from_ymd_opt(2026, 1, 20);
/// assert_eq!(parse_day("2026-01-20"), expected);
/// assert_eq!(parse_day("2026-01-20T08:15:00Z"), expected);
/// assert_eq!(parse_day("unknown"), None);
/// assert_eq!(parse_day("2026-02-30"), None);
/// ```
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("unknown") {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Commit volume per day.
///
/// Unlike [`CommitDays`], this keeps how many commits landed on each day;
/// the heatmap and the commit-count achievements are based on it.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use codedaily_core::CommitEvent;
/// use codedaily_pulse::days::CommitActivity;
///
/// let day = NaiveDate::from_ymd_opt(2026, 1, 20);
/// let push = |n| CommitEvent { date: day, repo: "a/b".into(), commits: vec![], commit_count: n };
/// let activity = CommitActivity::from_events(&[push(2), push(3)]);
/// assert_eq!(activity.count_on(day.unwrap()), 5);
/// assert_eq!(activity.days().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitActivity {
    per_day: BTreeMap<NaiveDate, u32>,
}

impl CommitActivity {
    /// Sum commit counts per day. Events without a date are skipped.
    pub fn from_events(events: &[CommitEvent]) -> Self {
        let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
        for event in events {
            let Some(date) = event.date else {
                continue;
            };
            let entry = per_day.entry(date).or_default();
            *entry = entry.saturating_add(event.commit_count);
        }
        Self { per_day }
    }

    /// Commits on `day` (0 when none).
    pub fn count_on(&self, day: NaiveDate) -> u32 {
        self.per_day.get(&day).copied().unwrap_or(0)
    }

    /// Total commit volume across all days.
    pub fn total_commits(&self) -> u32 {
        self.per_day
            .values()
            .fold(0u32, |acc, n| acc.saturating_add(*n))
    }

    /// The unique days this activity covers.
    pub fn days(&self) -> CommitDays {
        CommitDays::from_dates(self.per_day.keys().copied())
    }

    /// `true` when there is no dated activity.
    pub fn is_empty(&self) -> bool {
        self.per_day.is_empty()
    }
}

/// Longest window the calendar and heatmap will lay out: one leap year.
pub const MAX_WINDOW_DAYS: u32 = 366;

pub(crate) fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
