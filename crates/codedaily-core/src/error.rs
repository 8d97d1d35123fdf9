/// Errors that can occur across code-daily.
///
/// Library crates use this type directly; the binary surfaces it through
/// `miette` and the web layer maps it onto HTTP status codes.
///
/// # Examples
///
/// ```
/// use codedaily_core::DailyError;
///
/// let err = DailyError::Config("missing GITHUB_TOKEN".into());
/// assert!(err.to_string().contains("GITHUB_TOKEN"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum DailyError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    #[diagnostic(
        code(code_daily::config),
        help("copy .env.example to .env or run `code-daily init`; tokens: https://github.com/settings/tokens")
    )]
    Config(String),

    /// The hosting API rejected the token.
    #[error("authentication failed. Check your GITHUB_TOKEN is valid.")]
    #[diagnostic(code(code_daily::auth))]
    Auth,

    /// The configured user does not exist on the hosting service.
    #[error("user '{0}' not found on GitHub.")]
    #[diagnostic(code(code_daily::user_not_found))]
    UserNotFound(String),

    /// Rate limited, or access forbidden for another reason.
    #[error("API rate limit exceeded or access forbidden. Remaining requests: {remaining}")]
    #[diagnostic(code(code_daily::rate_limited), help("wait for the rate limit window to reset"))]
    RateLimited {
        /// Value of the `X-RateLimit-Remaining` header, or `"unknown"`.
        remaining: String,
    },

    /// Any other non-success API response.
    #[error("GitHub API error: {status} - {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body as text.
        body: String,
    },

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Local git repository failure.
    #[error("git error: {0}")]
    Git(String),

    /// A daily commit goal outside the accepted range.
    #[error(
        "daily goal must be between {min} and {max}, got {0}",
        min = crate::config::MIN_DAILY_GOAL,
        max = crate::config::MAX_DAILY_GOAL
    )]
    #[diagnostic(code(code_daily::invalid_goal))]
    InvalidGoal(u32),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl DailyError {
    /// `true` when the error came from the commit-history source rather
    /// than from local configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use codedaily_core::DailyError;
    ///
    /// assert!(DailyError::Auth.is_upstream());
    /// assert!(!DailyError::Config("x".into()).is_upstream());
    /// ```
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            DailyError::Auth
                | DailyError::UserNotFound(_)
                | DailyError::RateLimited { .. }
                | DailyError::Api { .. }
                | DailyError::Http(_)
                | DailyError::Git(_)
        )
    }
}
