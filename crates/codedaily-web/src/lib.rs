//! Web dashboard and JSON API for code-daily.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | HTML dashboard |
//! | `GET /health` | `{"status":"ok"}` |
//! | `GET /api/stats` | [`api::StatsPayload`] |
//! | `GET /api/history?days=N` | heatmap, `N` clamped to `1..=366` |
//! | `GET /api/achievements` | achievement list with unlock flags |
//! | `GET /api/goal` | `{"goal": N}` |
//! | `POST /api/goal` | set the daily goal (`1..=100`, otherwise 422) |
//!
//! Every request reads fresh events from the configured source. The goal set
//! through `POST /api/goal` lives in memory until the server stops.

pub mod api;
pub mod dashboard;
pub mod error;
mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use server::{router, run_server};
pub use state::AppState;
