use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One push (or one local commit) worth of activity.
///
/// `date` is `None` when the source timestamp was missing or malformed;
/// such events are dropped before any streak or stats computation.
///
/// # Examples
///
/// ```
/// use codedaily_core::CommitEvent;
/// use chrono::NaiveDate;
///
/// let event = CommitEvent {
///     date: NaiveDate::from_ymd_opt(2026, 1, 20),
///     repo: "octocat/hello-world".into(),
///     commits: vec![],
///     commit_count: 2,
/// };
/// assert_eq!(event.commit_count, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEvent {
    /// Calendar day the event happened on, in the configured day boundary.
    pub date: Option<NaiveDate>,
    /// Repository full name (`owner/name`), or `"unknown"`.
    pub repo: String,
    /// Commit details, when the source provides them.
    pub commits: Vec<CommitRef>,
    /// Number of commits this event represents (at least 1 for pushes).
    pub commit_count: u32,
}

impl CommitEvent {
    /// First commit message, if any commit details are present.
    pub fn first_message(&self) -> Option<&str> {
        self.commits.first().map(|c| c.message.as_str())
    }
}

/// Short reference to a single commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRef {
    /// Abbreviated SHA (7 characters).
    pub sha: String,
    /// First line of the commit message.
    pub message: String,
}

impl CommitRef {
    /// Build a reference from a full SHA and full message, keeping only the
    /// short SHA and the subject line.
    ///
    /// # Examples
    ///
    /// ```
    /// use codedaily_core::CommitRef;
    ///
    /// let c = CommitRef::from_full("0123456789abcdef", "fix: parser\n\nlong body");
    /// assert_eq!(c.sha, "0123456");
    /// assert_eq!(c.message, "fix: parser");
    /// ```
    pub fn from_full(sha: &str, message: &str) -> Self {
        Self {
            sha: sha.chars().take(7).collect(),
            message: message.lines().next().unwrap_or("").to_string(),
        }
    }
}

/// Output format for CLI results.
///
/// # Examples
///
/// ```
/// use codedaily_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summaries.
    #[default]
    Text,
    /// Machine-readable JSON, same shape as the web API.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
