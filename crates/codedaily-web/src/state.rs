use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use codedaily_core::{validate_daily_goal, Clock, CommitEvent, Result, DEFAULT_DAILY_GOAL};
use codedaily_pulse::calendar::DEFAULT_CALENDAR_DAYS;
use codedaily_pulse::history::DEFAULT_HISTORY_DAYS;
use codedaily_sources::ActivitySource;

use crate::error::ApiResult;

/// Shared state for every handler.
///
/// Only the daily goal changes at runtime, and only for the life of the process.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn ActivitySource>,
    pub clock: Arc<dyn Clock>,
    /// Shown on the dashboard and in `/api/stats`.
    pub username: String,
    /// Default heatmap length for `/api/history` and the dashboard.
    pub history_days: u32,
    /// Length of the dashboard's calendar grid.
    pub calendar_days: u32,
    daily_goal: Arc<AtomicU32>,
}

impl AppState {
    pub fn new(
        source: Arc<dyn ActivitySource>,
        clock: Arc<dyn Clock>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            source,
            clock,
            username: username.into(),
            history_days: DEFAULT_HISTORY_DAYS,
            calendar_days: DEFAULT_CALENDAR_DAYS,
            daily_goal: Arc::new(AtomicU32::new(DEFAULT_DAILY_GOAL)),
        }
    }

    pub fn with_history_days(mut self, days: u32) -> Self {
        self.history_days = days;
        self
    }

    pub fn with_calendar_days(mut self, days: u32) -> Self {
        self.calendar_days = days;
        self
    }

    /// Starting goal, normally `display.daily_goal`.
    pub fn with_daily_goal(self, goal: u32) -> Self {
        self.daily_goal.store(goal, Ordering::Relaxed);
        self
    }

    pub fn daily_goal(&self) -> u32 {
        self.daily_goal.load(Ordering::Relaxed)
    }

    /// Replace the goal for every clone of this state.
    ///
    /// # Errors
    ///
    /// Returns [`codedaily_core::DailyError::InvalidGoal`] outside `1..=100`.
    pub fn set_daily_goal(&self, goal: u32) -> Result<u32> {
        let goal = validate_daily_goal(goal)?;
        self.daily_goal.store(goal, Ordering::Relaxed);
        Ok(goal)
    }

    /// Fresh events from the source; nothing is cached between requests.
    pub(crate) async fn events(&self) -> ApiResult<Vec<CommitEvent>> {
        let events = self.source.fetch_events().await?;
        tracing::debug!(source = %self.source.describe(), events = events.len(), "fetched events");
        Ok(events)
    }
}
