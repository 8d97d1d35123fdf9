//! Commit streak and statistics engines for code-daily.
//!
//! Every function here is pure: it takes normalized commit days (or per-day
//! volume) and an explicit reference day, and returns plain serializable
//! records. No I/O, no clock access.
//!
//! - [`days`]: normalization of raw events into [`days::CommitDays`]
//! - [`streak`]: current and longest streak with a one-day grace period
//! - [`stats`]: commit-day counts per calendar and rolling window
//! - [`history`]: per-day volume and intensity levels for heatmaps
//! - [`calendar`]: Monday-first grid of recent days
//! - [`achievements`]: badge catalog and unlock evaluation
//! - [`goal`]: today's commit volume against the daily goal
//! - [`report`]: all of the above for one user and day

pub mod achievements;
pub mod calendar;
pub mod days;
pub mod goal;
pub mod history;
pub mod report;
pub mod stats;
pub mod streak;
