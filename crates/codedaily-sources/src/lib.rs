//! Where commit activity comes from.
//!
//! - [`github::GitHubClient`] reads the public events feed of a GitHub user
//! - [`local::LocalRepoSource`] walks the history of a repository on disk
//!
//! Both turn their raw data into [`CommitEvent`]s behind the
//! [`ActivitySource`] trait, so the CLI and the dashboard do not care which
//! one is in use.

pub mod events;
pub mod github;
pub mod local;

use async_trait::async_trait;
use codedaily_core::{CommitEvent, Result};

pub use events::parse_commit_events;
pub use github::GitHubClient;
pub use local::LocalRepoSource;

/// A provider of recent commit events.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Fetch recent events, newest first.
    async fn fetch_events(&self) -> Result<Vec<CommitEvent>>;

    /// Short human-readable name, e.g. `github:octocat`.
    fn describe(&self) -> String;
}
