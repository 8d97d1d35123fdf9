use std::time::Duration;

use async_trait::async_trait;
use codedaily_core::{CommitEvent, DailyError, DayBoundary, GitHubCredentials, Result};
use reqwest::StatusCode;
use serde_json::Value;

use crate::events::parse_commit_events;
use crate::ActivitySource;

/// Default GitHub REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Largest page the events endpoint serves.
pub const MAX_PER_PAGE: u32 = 100;

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "code-daily";

/// Client for a user's public GitHub events feed.
///
/// # Examples
///
/// ```
/// use codedaily_sources::GitHubClient;
///
/// let client = GitHubClient::new("ghp_xxxx", "octocat")
///     .unwrap()
///     .with_per_page(500);
/// assert_eq!(client.per_page(), 100);
/// assert_eq!(client.events_url(), "https://api.github.com/users/octocat/events");
/// ```
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    token: String,
    username: String,
    api_base: String,
    per_page: u32,
    boundary: DayBoundary,
}

impl GitHubClient {
    /// Create a client for `username`, authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`DailyError::Http`] if the HTTP client cannot be built.
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DailyError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            token: token.into(),
            username: username.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            per_page: MAX_PER_PAGE,
            boundary: DayBoundary::default(),
        })
    }

    /// Create a client from validated credentials.
    pub fn from_credentials(credentials: &GitHubCredentials) -> Result<Self> {
        Self::new(credentials.token.clone(), credentials.username.clone())
    }

    /// Point the client at another API root (GitHub Enterprise, tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Events per request, capped at [`MAX_PER_PAGE`].
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    /// Calendar used to date events.
    pub fn with_day_boundary(mut self, boundary: DayBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// URL of the user's events feed.
    pub fn events_url(&self) -> String {
        format!("{}/users/{}/events", self.api_base, self.username)
    }

    /// Fetch the raw events feed.
    ///
    /// # Errors
    ///
    /// - [`DailyError::Auth`] on 401
    /// - [`DailyError::UserNotFound`] on 404
    /// - [`DailyError::RateLimited`] on 403
    /// - [`DailyError::Api`] on any other non-success status
    /// - [`DailyError::Http`] on transport or decoding failures
    pub async fn get_user_events(&self, per_page: u32) -> Result<Vec<Value>> {
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let url = self.events_url();
        tracing::debug!(%url, per_page, "fetching GitHub events");

        let response = self
            .http
            .get(&url)
            .query(&[("per_page", per_page)])
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await
            .map_err(|e| DailyError::Http(format!("failed to fetch events: {e}")))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "GitHub events response");
        if !status.is_success() {
            return Err(match status {
                StatusCode::UNAUTHORIZED => DailyError::Auth,
                StatusCode::NOT_FOUND => DailyError::UserNotFound(self.username.clone()),
                StatusCode::FORBIDDEN => DailyError::RateLimited {
                    remaining: response
                        .headers()
                        .get("X-RateLimit-Remaining")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown")
                        .to_string(),
                },
                other => DailyError::Api {
                    status: other.as_u16(),
                    body: response.text().await.unwrap_or_default(),
                },
            });
        }

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| DailyError::Http(format!("failed to decode events: {e}")))
    }
}

#[async_trait]
impl ActivitySource for GitHubClient {
    async fn fetch_events(&self) -> Result<Vec<CommitEvent>> {
        let raw = self.get_user_events(self.per_page).await?;
        let events = parse_commit_events(&raw, self.boundary);
        tracing::debug!(raw = raw.len(), pushes = events.len(), "parsed GitHub events");
        Ok(events)
    }

    fn describe(&self) -> String {
        format!("github:{}", self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_base_trailing_slash_is_trimmed() {
        let client = GitHubClient::new("t", "octo")
            .unwrap()
            .with_api_base("http://127.0.0.1:9999/");
        assert_eq!(client.events_url(), "http://127.0.0.1:9999/users/octo/events");
    }

    #[test]
    fn per_page_is_clamped() {
        let client = GitHubClient::new("t", "octo").unwrap();
        assert_eq!(client.per_page(), 100);
        assert_eq!(client.clone().with_per_page(30).per_page(), 30);
        assert_eq!(client.clone().with_per_page(1000).per_page(), 100);
        assert_eq!(client.with_per_page(0).per_page(), 1);
    }

    #[test]
    fn describe_names_the_user() {
        let client = GitHubClient::new("t", "octo").unwrap();
        assert_eq!(client.describe(), "github:octo");
        assert_eq!(client.username(), "octo");
    }

    #[test]
    fn built_from_credentials() {
        let creds = GitHubCredentials {
            token: "t".into(),
            username: "octo".into(),
        };
        let client = GitHubClient::from_credentials(&creds).unwrap();
        assert_eq!(client.username(), "octo");
    }
}
