use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which calendar turns an instant into a day.
///
/// The same boundary is used for "today" and for every event timestamp, so a
/// late-evening push and the reference day always agree on the date.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use codedaily_core::DayBoundary;
///
/// let instant = Utc.with_ymd_and_hms(2026, 1, 20, 23, 30, 0).unwrap();
/// assert_eq!(
///     DayBoundary::Utc.date_of(instant),
///     NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayBoundary {
    /// The machine's local timezone.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
}

impl DayBoundary {
    /// Calendar date of `instant` under this boundary.
    pub fn date_of(self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            DayBoundary::Local => instant.with_timezone(&Local).date_naive(),
            DayBoundary::Utc => instant.date_naive(),
        }
    }
}

impl fmt::Display for DayBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayBoundary::Local => write!(f, "local"),
            DayBoundary::Utc => write!(f, "utc"),
        }
    }
}

impl FromStr for DayBoundary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(DayBoundary::Local),
            "utc" => Ok(DayBoundary::Utc),
            other => Err(format!("unknown day boundary: {other}")),
        }
    }
}

/// Source of the reference day handed to the streak and stats engines.
///
/// The engines never read the system clock themselves.
pub trait Clock: Send + Sync {
    /// The current calendar day.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock time seen through a [`DayBoundary`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    /// Calendar used to derive the day.
    pub boundary: DayBoundary,
}

impl SystemClock {
    /// Create a clock for the given boundary.
    pub fn new(boundary: DayBoundary) -> Self {
        Self { boundary }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        self.boundary.date_of(Utc::now())
    }
}

/// A clock pinned to one day.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use codedaily_core::{Clock, FixedClock};
///
/// let day = NaiveDate::from_ymd_opt(2026, 1, 21).unwrap();
/// assert_eq!(FixedClock(day).today(), day);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
