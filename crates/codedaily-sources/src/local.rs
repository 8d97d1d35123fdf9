//! Commit activity from a git repository on disk.
//!
//! Walks history from HEAD, newest first, and emits one event per commit.
//! Useful offline, for private work that never reaches the events feed, and
//! for exercising the CLI without credentials.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use codedaily_core::{CommitEvent, CommitRef, DailyError, DayBoundary, Result};
use git2::{Repository, Sort};

use crate::ActivitySource;

/// A local repository used as an activity source.
///
/// # Examples
///
/// ```
/// use codedaily_sources::LocalRepoSource;
///
/// let source = LocalRepoSource::new(".").with_author("alice@example.com").with_since_days(90);
/// assert_eq!(source.since_days, Some(90));
/// ```
#[derive(Debug, Clone)]
pub struct LocalRepoSource {
    /// Repository root (work tree or bare repository).
    pub path: PathBuf,
    /// Only keep commits whose author email or name matches, ignoring case.
    pub author: Option<String>,
    /// Stop at commits older than this many days.
    pub since_days: Option<u64>,
    /// Calendar used to date commits.
    pub boundary: DayBoundary,
}

impl LocalRepoSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            author: None,
            since_days: None,
            boundary: DayBoundary::default(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_since_days(mut self, days: u64) -> Self {
        self.since_days = Some(days);
        self
    }

    pub fn with_day_boundary(mut self, boundary: DayBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Walk the history synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`DailyError::Git`] if the repository cannot be opened or walked.
    pub fn mine_events(&self) -> Result<Vec<CommitEvent>> {
        let repo = Repository::open(&self.path)
            .map_err(|e| DailyError::Git(format!("failed to open repository: {e}")))?;

        let mut revwalk = repo
            .revwalk()
            .map_err(|e| DailyError::Git(format!("failed to create revwalk: {e}")))?;
        revwalk
            .set_sorting(Sort::TIME)
            .map_err(|e| DailyError::Git(format!("failed to sort revwalk: {e}")))?;
        revwalk
            .push_head()
            .map_err(|e| DailyError::Git(format!("failed to push HEAD: {e}")))?;

        let repo_name = repo_name(&repo, &self.path);
        let cutoff = self.since_days.map(cutoff_timestamp);
        let author = self.author.as_deref().map(str::to_lowercase);
        let mut events = Vec::new();

        for oid in revwalk {
            let oid = oid.map_err(|e| DailyError::Git(format!("revwalk error: {e}")))?;
            let commit = repo
                .find_commit(oid)
                .map_err(|e| DailyError::Git(format!("failed to find commit: {e}")))?;

            let seconds = commit.time().seconds();
            if cutoff.is_some_and(|cutoff| seconds < cutoff) {
                break;
            }

            if let Some(wanted) = &author {
                let signature = commit.author();
                let matches = [signature.email(), signature.name()]
                    .into_iter()
                    .flatten()
                    .any(|value| value.to_lowercase() == *wanted);
                if !matches {
                    continue;
                }
            }

            let date = DateTime::<Utc>::from_timestamp(seconds, 0)
                .map(|instant| self.boundary.date_of(instant));
            let sha = oid.to_string();
            events.push(CommitEvent {
                date,
                repo: repo_name.clone(),
                commits: vec![CommitRef::from_full(&sha, commit.message().unwrap_or(""))],
                commit_count: 1,
            });
        }

        tracing::debug!(path = %self.path.display(), commits = events.len(), "mined local history");
        Ok(events)
    }
}

fn cutoff_timestamp(since_days: u64) -> i64 {
    let days = i64::try_from(since_days).unwrap_or(i64::MAX);
    Duration::try_days(days)
        .and_then(|span| Utc::now().checked_sub_signed(span))
        .map_or(i64::MIN, |instant| instant.timestamp())
}

fn repo_name(repo: &Repository, fallback: &Path) -> String {
    let root = repo.workdir().unwrap_or_else(|| repo.path());
    root.canonicalize()
        .ok()
        .as_deref()
        .or(Some(fallback))
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}

#[async_trait]
impl ActivitySource for LocalRepoSource {
    /// Runs the revwalk on the blocking thread pool.
    async fn fetch_events(&self) -> Result<Vec<CommitEvent>> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.mine_events())
            .await
            .map_err(|e| DailyError::Git(format!("history walk task failed: {e}")))?
    }

    fn describe(&self) -> String {
        format!("git:{}", self.path.display())
    }
}
