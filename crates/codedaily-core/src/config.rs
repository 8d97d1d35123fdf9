use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clock::DayBoundary;
use crate::error::DailyError;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".code-daily.toml";

/// Smallest accepted daily commit goal.
pub const MIN_DAILY_GOAL: u32 = 1;
/// Largest accepted daily commit goal.
pub const MAX_DAILY_GOAL: u32 = 100;
/// Daily commit goal when none is configured.
pub const DEFAULT_DAILY_GOAL: u32 = 1;

const TOKEN_PLACEHOLDER: &str = "your_token_here";
const USERNAME_PLACEHOLDER: &str = "your_username_here";

/// Top-level configuration loaded from `.code-daily.toml`.
///
/// Resolution order: CLI flags > env vars (including `.env`) > config file > defaults.
///
/// # Examples
///
/// ```
/// use codedaily_core::DailyConfig;
///
/// let config = DailyConfig::default();
/// assert_eq!(config.display.calendar_days, 14);
/// assert_eq!(config.server.port, 8000);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyConfig {
    /// GitHub account and API settings.
    #[serde(default)]
    pub github: GitHubConfig,
    /// Rendering windows and day boundary.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Web dashboard bind address.
    #[serde(default)]
    pub server: ServerConfig,
}

impl DailyConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DailyError::Io`] if the file cannot be read, or
    /// [`DailyError::Toml`] if the content is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self, DailyError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`DailyError::Toml`] if parsing fails, or
    /// [`DailyError::InvalidGoal`] if `display.daily_goal` is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use codedaily_core::DailyConfig;
    ///
    /// let toml = r#"
    /// [github]
    /// username = "octocat"
    /// "#;
    /// let config = DailyConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.github.username.as_deref(), Some("octocat"));
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, DailyError> {
        let config: Self = toml::from_str(content)?;
        validate_daily_goal(config.display.daily_goal)?;
        Ok(config)
    }

    /// Load from an explicit path, or from `.code-daily.toml` in the working
    /// directory when it exists, or fall back to defaults.
    ///
    /// # Errors
    ///
    /// An explicit `path` that cannot be read or parsed is an error; a
    /// missing default file is not.
    pub fn load(path: Option<&Path>) -> Result<Self, DailyError> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply `GITHUB_TOKEN` / `GH_TOKEN` and `GITHUB_USERNAME` from the
    /// process environment.
    pub fn with_process_env(self) -> Self {
        self.with_env(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides using `lookup` to resolve variables.
    ///
    /// # Examples
    ///
    /// ```
    /// use codedaily_core::DailyConfig;
    ///
    /// let config = DailyConfig::default().with_env(|key| match key {
    ///     "GITHUB_USERNAME" => Some("octocat".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.github.username.as_deref(), Some("octocat"));
    /// ```
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty("GITHUB_TOKEN").or_else(|| non_empty("GH_TOKEN")) {
            self.github.token = Some(token);
        }
        if let Some(username) = non_empty("GITHUB_USERNAME") {
            self.github.username = Some(username);
        }
        self
    }
}

/// GitHub account and API settings.
///
/// # Examples
///
/// ```
/// use codedaily_core::GitHubConfig;
///
/// let config = GitHubConfig::default();
/// assert_eq!(config.api_base, "https://api.github.com");
/// assert_eq!(config.per_page, 100);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Account whose public events are tracked.
    pub username: Option<String>,
    /// Personal access token. Prefer `GITHUB_TOKEN` over storing it here.
    pub token: Option<String>,
    /// API root, overridable for GitHub Enterprise.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Events fetched per request (capped at 100 by the API).
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_api_base() -> String {
    "https://api.github.com".into()
}

fn default_per_page() -> u32 {
    100
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            username: None,
            token: None,
            api_base: default_api_base(),
            per_page: default_per_page(),
        }
    }
}

impl GitHubConfig {
    /// Validated token and username.
    ///
    /// Empty values and the `.env.example` placeholders count as missing.
    ///
    /// # Errors
    ///
    /// Returns [`DailyError::Config`] listing every missing key.
    ///
    /// # Examples
    ///
    /// ```
    /// use codedaily_core::GitHubConfig;
    ///
    /// let config = GitHubConfig {
    ///     token: Some("your_token_here".into()),
    ///     ..GitHubConfig::default()
    /// };
    /// let err = config.credentials().unwrap_err();
    /// assert!(err.to_string().contains("GITHUB_TOKEN, GITHUB_USERNAME"));
    /// ```
    pub fn credentials(&self) -> Result<GitHubCredentials, DailyError> {
        let token = usable(self.token.as_deref(), TOKEN_PLACEHOLDER);
        let username = usable(self.username.as_deref(), USERNAME_PLACEHOLDER);

        match (token, username) {
            (Some(token), Some(username)) => Ok(GitHubCredentials {
                token: token.to_string(),
                username: username.to_string(),
            }),
            (token, username) => {
                let mut missing = Vec::new();
                if token.is_none() {
                    missing.push("GITHUB_TOKEN");
                }
                if username.is_none() {
                    missing.push("GITHUB_USERNAME");
                }
                Err(DailyError::Config(format!(
                    "missing required configuration: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

fn usable<'a>(value: Option<&'a str>, placeholder: &str) -> Option<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != placeholder)
}

/// Validated GitHub credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubCredentials {
    /// Personal access token.
    pub token: String,
    /// Account name.
    pub username: String,
}

/// Rendering windows and day boundary.
///
/// # Examples
///
/// ```
/// use codedaily_core::{DayBoundary, DisplayConfig};
///
/// let config = DisplayConfig::default();
/// assert_eq!(config.history_days, 84);
/// assert_eq!(config.day_boundary, DayBoundary::Local);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Days shown by the activity calendar (default: 14).
    #[serde(default = "default_calendar_days")]
    pub calendar_days: u32,
    /// Days covered by the heatmap (default: 84, twelve weeks).
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    /// Calendar used for "today" and event dates (default: local).
    #[serde(default)]
    pub day_boundary: DayBoundary,
    /// Commits to aim for each day, 1 to 100 (default: 1).
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
}

fn default_daily_goal() -> u32 {
    DEFAULT_DAILY_GOAL
}

fn default_calendar_days() -> u32 {
    14
}

fn default_history_days() -> u32 {
    84
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            calendar_days: default_calendar_days(),
            history_days: default_history_days(),
            day_boundary: DayBoundary::default(),
            daily_goal: default_daily_goal(),
        }
    }
}

/// Check that `goal` lies in `MIN_DAILY_GOAL..=MAX_DAILY_GOAL`.
///
/// # Examples
///
/// ```
/// use codedaily_core::{validate_daily_goal, DailyError};
///
/// assert_eq!(validate_daily_goal(5).unwrap(), 5);
/// assert!(matches!(validate_daily_goal(0), Err(DailyError::InvalidGoal(0))));
/// ```
pub fn validate_daily_goal(goal: u32) -> Result<u32, DailyError> {
    if (MIN_DAILY_GOAL..=MAX_DAILY_GOAL).contains(&goal) {
        Ok(goal)
    } else {
        Err(DailyError::InvalidGoal(goal))
    }
}

/// Web dashboard bind address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind (default: `127.0.0.1`).
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind (default: 8000).
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = DailyConfig::default();
        assert!(config.github.username.is_none());
        assert!(config.github.token.is_none());
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert_eq!(config.github.per_page, 100);
        assert_eq!(config.display.calendar_days, 14);
        assert_eq!(config.display.history_days, 84);
        assert_eq!(config.display.day_boundary, DayBoundary::Local);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[github]
username = "octocat"
api_base = "https://github.example.com/api/v3"
per_page = 50

[display]
calendar_days = 21
history_days = 364
day_boundary = "utc"

[server]
host = "0.0.0.0"
port = 9000
"#;
        let config = DailyConfig::from_toml(toml).unwrap();
        assert_eq!(config.github.username.as_deref(), Some("octocat"));
        assert_eq!(config.github.api_base, "https://github.example.com/api/v3");
        assert_eq!(config.github.per_page, 50);
        assert_eq!(config.display.calendar_days, 21);
        assert_eq!(config.display.history_days, 364);
        assert_eq!(config.display.day_boundary, DayBoundary::Utc);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = DailyConfig::from_toml("").unwrap();
        assert_eq!(config.display.history_days, 84);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn invalid_toml_returns_error() {
        assert!(DailyConfig::from_toml("{{invalid}}").is_err());
    }

    #[test]
    fn unknown_day_boundary_is_rejected() {
        let result = DailyConfig::from_toml("[display]\nday_boundary = \"mars\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn daily_goal_is_range_checked() {
        let config = DailyConfig::from_toml("[display]\ndaily_goal = 100\n").unwrap();
        assert_eq!(config.display.daily_goal, 100);
        assert_eq!(DailyConfig::default().display.daily_goal, DEFAULT_DAILY_GOAL);

        for bad in ["0", "101"] {
            let result = DailyConfig::from_toml(&format!("[display]\ndaily_goal = {bad}\n"));
            assert!(matches!(result, Err(DailyError::InvalidGoal(_))), "{bad} accepted");
        }
    }

    #[test]
    fn env_overrides_file_values() {
        let config = DailyConfig::from_toml("[github]\nusername = \"from-file\"\n")
            .unwrap()
            .with_env(|key| match key {
                "GITHUB_USERNAME" => Some("from-env".into()),
                "GITHUB_TOKEN" => Some("ghp_env".into()),
                _ => None,
            });
        assert_eq!(config.github.username.as_deref(), Some("from-env"));
        assert_eq!(config.github.token.as_deref(), Some("ghp_env"));
    }

    #[test]
    fn gh_token_is_a_fallback() {
        let config = DailyConfig::default().with_env(|key| match key {
            "GH_TOKEN" => Some("ghp_cli".into()),
            _ => None,
        });
        assert_eq!(config.github.token.as_deref(), Some("ghp_cli"));
    }

    #[test]
    fn empty_env_values_do_not_override() {
        let config = DailyConfig::from_toml("[github]\nusername = \"kept\"\n")
            .unwrap()
            .with_env(|_| Some("  ".into()));
        assert_eq!(config.github.username.as_deref(), Some("kept"));
        assert!(config.github.token.is_none());
    }

    #[test]
    fn credentials_require_both_values() {
        let config = GitHubConfig {
            username: Some("octocat".into()),
            ..GitHubConfig::default()
        };
        let err = config.credentials().unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: missing required configuration: GITHUB_TOKEN"
        );
    }

    #[test]
    fn placeholders_count_as_missing() {
        let config = GitHubConfig {
            username: Some("your_username_here".into()),
            token: Some("ghp_real".into()),
            ..GitHubConfig::default()
        };
        let err = config.credentials().unwrap_err();
        assert!(err.to_string().ends_with("GITHUB_USERNAME"));
    }

    #[test]
    fn valid_credentials_are_trimmed() {
        let config = GitHubConfig {
            username: Some(" octocat ".into()),
            token: Some("ghp_x".into()),
            ..GitHubConfig::default()
        };
        let creds = config.credentials().unwrap();
        assert_eq!(creds.username, "octocat");
        assert_eq!(creds.token, "ghp_x");
    }

    #[test]
    fn load_explicit_missing_file_is_error() {
        let result = DailyConfig::load(Some(Path::new("/nonexistent/.code-daily.toml")));
        assert!(matches!(result, Err(DailyError::Io(_))));
    }
}
