use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use codedaily_core::{DailyError, DayBoundary};
use codedaily_sources::{ActivitySource, GitHubClient};
use serde_json::json;

fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers.get(name).and_then(|v| v.to_str().ok()).unwrap_or("")
}

/// Stand-in for the events endpoint. The username picks the scenario.
async fn events(
    Path(user): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if header(&headers, "authorization") != "Bearer test-token"
        || header(&headers, "accept") != "application/vnd.github+json"
        || header(&headers, "x-github-api-version") != "2022-11-28"
        || header(&headers, "user-agent") != "code-daily"
    {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match user.as_str() {
        "octo" => Json(json!([
            {
                "type": "PushEvent",
                "created_at": "2026-01-21T09:00:00Z",
                "repo": {"name": "octo/app"},
                "payload": {"size": 2, "commits": [
                    {"sha": "aaaaaaaaaaaa", "message": "feat: one"},
                    {"sha": "bbbbbbbbbbbb", "message": "feat: two"}
                ]}
            },
            {"type": "WatchEvent", "created_at": "2026-01-21T08:00:00Z", "repo": {"name": "x/y"}},
            {
                "type": "PushEvent",
                "created_at": "2026-01-20T22:00:00Z",
                "repo": {"name": "octo/lib"},
                "payload": {}
            }
        ]))
        .into_response(),
        "pager" => Json(json!([{
            "type": "PushEvent",
            "created_at": "2026-01-21T09:00:00Z",
            "repo": {"name": params.get("per_page").cloned().unwrap_or_default()},
        }]))
        .into_response(),
        "limited" => (
            StatusCode::FORBIDDEN,
            [("X-RateLimit-Remaining", "0")],
            "rate limited",
        )
            .into_response(),
        "forbidden" => (StatusCode::FORBIDDEN, "nope").into_response(),
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "garbage" => "not json".into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_fake_github() -> String {
    let app = Router::new().route("/users/{user}/events", get(events));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base: &str, user: &str) -> GitHubClient {
    GitHubClient::new("test-token", user)
        .unwrap()
        .with_api_base(base)
        .with_day_boundary(DayBoundary::Utc)
}

#[tokio::test]
async fn fetches_and_parses_push_events() {
    let base = spawn_fake_github().await;
    let events = client(&base, "octo").fetch_events().await.unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].repo, "octo/app");
    assert_eq!(events[0].commit_count, 2);
    assert_eq!(events[0].date, NaiveDate::from_ymd_opt(2026, 1, 21));
    assert_eq!(events[0].commits[1].sha, "bbbbbbb");
    assert_eq!(events[1].repo, "octo/lib");
    assert_eq!(events[1].commit_count, 1);
    assert_eq!(events[1].date, NaiveDate::from_ymd_opt(2026, 1, 20));
}

#[tokio::test]
async fn per_page_is_sent_and_capped() {
    let base = spawn_fake_github().await;
    let c = client(&base, "pager");

    let raw = c.get_user_events(250).await.unwrap();
    assert_eq!(raw[0]["repo"]["name"], "100");

    let raw = c.get_user_events(30).await.unwrap();
    assert_eq!(raw[0]["repo"]["name"], "30");
}

#[tokio::test]
async fn bad_token_is_auth_error() {
    let base = spawn_fake_github().await;
    let err = GitHubClient::new("wrong", "octo")
        .unwrap()
        .with_api_base(&base)
        .fetch_events()
        .await
        .unwrap_err();
    assert!(matches!(err, DailyError::Auth));
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let base = spawn_fake_github().await;
    let err = client(&base, "ghost").fetch_events().await.unwrap_err();
    match err {
        DailyError::UserNotFound(user) => assert_eq!(user, "ghost"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn forbidden_reports_remaining_quota() {
    let base = spawn_fake_github().await;

    let err = client(&base, "limited").fetch_events().await.unwrap_err();
    match err {
        DailyError::RateLimited { remaining } => assert_eq!(remaining, "0"),
        other => panic!("unexpected error: {other}"),
    }

    let err = client(&base, "forbidden").fetch_events().await.unwrap_err();
    match err {
        DailyError::RateLimited { remaining } => assert_eq!(remaining, "unknown"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn other_statuses_carry_body() {
    let base = spawn_fake_github().await;
    let err = client(&base, "broken").fetch_events().await.unwrap_err();
    match err {
        DailyError::Api { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn undecodable_body_is_http_error() {
    let base = spawn_fake_github().await;
    let err = client(&base, "garbage").fetch_events().await.unwrap_err();
    assert!(matches!(err, DailyError::Http(_)));
}

#[tokio::test]
async fn unreachable_host_is_http_error() {
    let err = client("http://127.0.0.1:1", "octo")
        .fetch_events()
        .await
        .unwrap_err();
    assert!(matches!(err, DailyError::Http(_)));
    assert!(err.is_upstream());
}
