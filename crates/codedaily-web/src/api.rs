//! JSON endpoints.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use codedaily_pulse::achievements::AchievementBoard;
use codedaily_pulse::days::{CommitActivity, MAX_WINDOW_DAYS};
use codedaily_pulse::goal::GoalProgress;
use codedaily_pulse::history::{compute_history, History};
use codedaily_pulse::report::DailyReport;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::state::AppState;

/// Upper bound for `/api/history?days=`.
pub const MAX_HISTORY_DAYS: u32 = MAX_WINDOW_DAYS;

/// Streak block of [`StatsPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakPayload {
    pub current: u32,
    pub longest: u32,
    pub active: bool,
    pub last_commit_date: Option<NaiveDate>,
}

/// Window counts block of [`StatsPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowPayload {
    pub today: u32,
    pub this_week: u32,
    pub this_month: u32,
    pub last_7_days: u32,
    pub last_30_days: u32,
    pub total: u32,
}

/// Body of `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsPayload {
    pub username: String,
    pub streak: StreakPayload,
    pub stats: WindowPayload,
    /// Most recent first.
    pub commit_dates: Vec<NaiveDate>,
    pub goal: GoalProgress,
}

impl From<&DailyReport> for StatsPayload {
    fn from(report: &DailyReport) -> Self {
        Self {
            username: report.username.clone(),
            streak: StreakPayload {
                current: report.streak.current_streak,
                longest: report.streak.longest_streak,
                active: report.streak.streak_active,
                last_commit_date: report.streak.last_commit_date,
            },
            stats: WindowPayload {
                today: report.stats.commits_today,
                this_week: report.stats.commits_this_week,
                this_month: report.stats.commits_this_month,
                last_7_days: report.stats.commits_last_7_days,
                last_30_days: report.stats.commits_last_30_days,
                total: report.stats.total_commits,
            },
            commit_dates: report.commit_dates.clone(),
            goal: report.goal,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub days: Option<u32>,
}

/// Body of `GET /api/goal` and of `POST /api/goal` in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalBody {
    pub goal: u32,
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<StatsPayload>> {
    let events = state.events().await?;
    let report = DailyReport::build(state.username.clone(), &events, state.clock.today())
        .with_daily_goal(state.daily_goal());
    Ok(Json(StatsPayload::from(&report)))
}

pub async fn goal(State(state): State<AppState>) -> Json<GoalBody> {
    Json(GoalBody {
        goal: state.daily_goal(),
    })
}

/// Values outside `1..=100` are rejected with 422.
pub async fn set_goal(
    State(state): State<AppState>,
    Json(body): Json<GoalBody>,
) -> ApiResult<Json<GoalBody>> {
    let goal = state.set_daily_goal(body.goal)?;
    tracing::info!(goal, "daily goal updated");
    Ok(Json(GoalBody { goal }))
}

pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> ApiResult<Json<History>> {
    let days = params
        .days
        .unwrap_or(state.history_days)
        .clamp(1, MAX_HISTORY_DAYS);
    let events = state.events().await?;
    let activity = CommitActivity::from_events(&events);
    Ok(Json(compute_history(&activity, days, state.clock.today())))
}

pub async fn achievements(State(state): State<AppState>) -> ApiResult<Json<AchievementBoard>> {
    let events = state.events().await?;
    let report = DailyReport::build(state.username.clone(), &events, state.clock.today());
    Ok(Json(report.achievements))
}
