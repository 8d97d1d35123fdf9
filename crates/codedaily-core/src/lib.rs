//! Core types, configuration, and error handling for code-daily.
//!
//! This crate provides the shared foundation used by all other code-daily crates:
//! - [`DailyError`]: unified error type using `thiserror`
//! - [`DailyConfig`]: configuration loaded from `.code-daily.toml` and the environment
//! - [`Clock`] / [`DayBoundary`]: how "today" and event dates are decided
//! - Shared types: [`CommitEvent`], [`CommitRef`], [`OutputFormat`]

mod clock;
mod config;
mod error;
mod types;

pub use clock::{Clock, DayBoundary, FixedClock, SystemClock};
pub use config::{
    validate_daily_goal, DailyConfig, DisplayConfig, GitHubConfig, GitHubCredentials,
    ServerConfig, CONFIG_FILE_NAME, DEFAULT_DAILY_GOAL, MAX_DAILY_GOAL, MIN_DAILY_GOAL,
};
pub use error::DailyError;
pub use types::{CommitEvent, CommitRef, OutputFormat};

/// A convenience `Result` type for code-daily operations.
pub type Result<T> = std::result::Result<T, DailyError>;
