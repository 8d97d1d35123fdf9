use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use codedaily_core::{
    Clock, CommitEvent, DailyConfig, DayBoundary, FixedClock, OutputFormat, SystemClock,
    CONFIG_FILE_NAME,
};
use codedaily_pulse::calendar::CalendarGrid;
use codedaily_pulse::history::compute_history;
use codedaily_pulse::report::DailyReport;
use codedaily_sources::{ActivitySource, GitHubClient, LocalRepoSource};
use codedaily_web::api::StatsPayload;
use codedaily_web::AppState;

#[derive(Parser)]
#[command(
    name = "code-daily",
    version,
    about = "Gamified coding habit tracker",
    long_about = "code-daily turns your commit activity into a daily streak, simple stats,\n\
                   a heatmap and achievements, on the command line or in a small web dashboard.\n\n\
                   Examples:\n  \
                     code-daily                        Streak, recent activity and stats\n  \
                     code-daily stats --format json    Window counts as JSON\n  \
                     code-daily history --days 28      Four-week heatmap\n  \
                     code-daily --repo . streak        Streak from a local repository\n  \
                     code-daily serve --port 8000      Web dashboard\n  \
                     code-daily doctor                 Check setup and environment"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .code-daily.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable summaries (default)\n  \
                         json      Machine-readable JSON, same shapes as the web API\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,

    /// Treat this day (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Read activity from a local git repository instead of GitHub
    #[arg(long, global = true)]
    repo: Option<PathBuf>,

    /// Only count local commits by this author email or name (with --repo)
    #[arg(long, global = true)]
    author: Option<String>,

    /// Ignore local commits older than this many days (with --repo)
    #[arg(long, global = true)]
    since_days: Option<u64>,

    /// Calendar used to decide "today" and event dates: local or utc
    #[arg(long, global = true)]
    day_boundary: Option<DayBoundary>,
}

#[derive(Subcommand)]
enum Command {
    /// Show streak, recent activity, commit stats and the daily goal (default)
    Status,
    /// Show the current and longest streak
    Streak,
    /// Show days with commits per time window
    #[command(long_about = "Show days with commits per time window.\n\n\
        Counts unique commit days today, this ISO week (Monday to Sunday), this\n\
        calendar month, the last 7 and 30 days, and overall.")]
    Stats,
    /// Show a Monday-first grid of recent days
    Calendar {
        /// Days to show (default: display.calendar_days, 14)
        #[arg(long)]
        days: Option<u32>,
    },
    /// Show per-day commit counts and heatmap levels
    #[command(long_about = "Show per-day commit counts and heatmap levels.\n\n\
        Levels: 0 = none, 1 = one commit, 2 = 2-3, 3 = 4-5, 4 = 6 or more.")]
    History {
        /// Days to cover (default: display.history_days, 84)
        #[arg(long)]
        days: Option<u32>,
    },
    /// List recent push events
    Events {
        /// Maximum events to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Show every achievement and whether it is unlocked
    Achievements,
    /// Run the web dashboard
    #[command(long_about = "Run the web dashboard.\n\n\
        Serves an HTML page at / and JSON at /api/stats, /api/history,\n\
        /api/achievements and /api/goal. Stop with Ctrl-C.")]
    Serve {
        /// Interface to bind (default: server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (default: server.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Create a default .code-daily.toml in the current directory
    #[command(long_about = "Create a default .code-daily.toml in the current directory.\n\n\
        Generates a commented template with all available options.\n\
        Fails if .code-daily.toml already exists.")]
    Init,
    /// Check your code-daily setup and environment
    Doctor,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

const DEFAULT_CONFIG: &str = r#"# code-daily configuration
#
# Credentials are best kept out of this file: set GITHUB_TOKEN and
# GITHUB_USERNAME in the environment or in a .env file instead.
# Tokens: https://github.com/settings/tokens

[github]
# username = "your_username_here"
# token = "your_token_here"
# api_base = "https://api.github.com"
# per_page = 100

[display]
# calendar_days = 14
# history_days = 84
# day_boundary = "local"   # or "utc"
# daily_goal = 1           # commits per day, 1-100

[server]
# host = "127.0.0.1"
# port = 8000
"#;

#[derive(serde::Serialize)]
struct CheckResult {
    name: &'static str,
    status: &'static str,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl CheckResult {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "pass",
            detail: detail.into(),
            hint: None,
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            status: "fail",
            detail: detail.into(),
            hint: Some(hint.into()),
        }
    }

    fn info(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "info",
            detail: detail.into(),
            hint: None,
        }
    }

    fn symbol(&self) -> &'static str {
        match self.status {
            "pass" => "\u{2713}",
            "fail" => "\u{2717}",
            _ => "~",
        }
    }

    fn colored_symbol(&self) -> String {
        match self.status {
            "pass" => "\x1b[32m\u{2713}\x1b[0m".into(),
            "fail" => "\x1b[31m\u{2717}\x1b[0m".into(),
            _ => "\x1b[33m~\x1b[0m".into(),
        }
    }
}

async fn run_doctor(cli: &Cli, config: &DailyConfig, use_color: bool) -> Result<()> {
    let mut checks: Vec<CheckResult> = Vec::new();

    // 1. Config file
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    if config_path.exists() {
        checks.push(CheckResult::pass(
            "config_file",
            format!("{} found", config_path.display()),
        ));
    } else {
        checks.push(CheckResult::info(
            "config_file",
            format!("{} not found, using defaults (run 'code-daily init' to create one)", config_path.display()),
        ));
    }

    // 2. Credentials
    let credentials = config.github.credentials();
    if cli.repo.is_none() {
        match &credentials {
            Ok(creds) => checks.push(CheckResult::pass(
                "github_credentials",
                format!("token and username set (user: {})", creds.username),
            )),
            Err(e) => checks.push(CheckResult::fail(
                "github_credentials",
                e.to_string(),
                "export GITHUB_TOKEN=... GITHUB_USERNAME=... or add them to .env",
            )),
        }
    } else if credentials.is_err() {
        checks.push(CheckResult::info(
            "github_credentials",
            "not set (not needed with --repo)",
        ));
    }

    // 3. Day boundary
    let today = reference_day(cli, config);
    checks.push(CheckResult::info(
        "day_boundary",
        format!("{} (today is {today})", config.display.day_boundary),
    ));

    // 4. Activity source
    match build_source(cli, config) {
        Ok((source, _)) => match source.fetch_events().await {
            Ok(events) => checks.push(CheckResult::pass(
                "activity_source",
                format!("{} reachable ({} events)", source.describe(), events.len()),
            )),
            Err(e) => checks.push(CheckResult::fail(
                "activity_source",
                format!("{}: {e}", source.describe()),
                source_hint(&e),
            )),
        },
        Err(_) => checks.push(CheckResult::info(
            "activity_source",
            "skipped (no credentials)",
        )),
    }

    // 5. Local git repository
    match git_root(&std::env::current_dir().into_diagnostic()?) {
        Some(root) => checks.push(CheckResult::info(
            "git_repository",
            format!("{} (usable with --repo)", root.display()),
        )),
        None => checks.push(CheckResult::info("git_repository", "not inside a git repository")),
    }

    match cli.format {
        OutputFormat::Json => {
            let version = env!("CARGO_PKG_VERSION");
            let json = serde_json::json!({
                "version": version,
                "checks": checks,
            });
            println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
        }
        _ => {
            let version = env!("CARGO_PKG_VERSION");
            println!("code-daily v{version} - Environment Check\n");

            for check in &checks {
                let sym = if use_color {
                    check.colored_symbol()
                } else {
                    check.symbol().to_string()
                };
                let label = check.name.replace('_', " ");
                println!("  {sym} {label:<20} {}", check.detail);
                if let Some(hint) = &check.hint {
                    println!("    hint: {hint}");
                }
            }

            let passed = checks.iter().filter(|c| c.status == "pass").count();
            let failed = checks.iter().filter(|c| c.status == "fail").count();
            let info = checks.iter().filter(|c| c.status == "info").count();
            println!("\n{passed} checks passed, {failed} failed, {info} info");
        }
    }

    Ok(())
}

fn source_hint(err: &codedaily_core::DailyError) -> &'static str {
    use codedaily_core::DailyError;
    match err {
        DailyError::Auth => "create a new token at https://github.com/settings/tokens",
        DailyError::UserNotFound(_) => "check GITHUB_USERNAME",
        DailyError::RateLimited { .. } => "wait for the rate limit window to reset",
        DailyError::Git(_) => "point --repo at the root of a repository with at least one commit",
        _ => "check your network connection",
    }
}

fn git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Resolve the activity source and the name shown for it.
fn build_source(
    cli: &Cli,
    config: &DailyConfig,
) -> codedaily_core::Result<(Arc<dyn ActivitySource>, String)> {
    let boundary = config.display.day_boundary;

    if let Some(path) = &cli.repo {
        let mut source = LocalRepoSource::new(path).with_day_boundary(boundary);
        if let Some(author) = &cli.author {
            source = source.with_author(author.clone());
        }
        if let Some(days) = cli.since_days {
            source = source.with_since_days(days);
        }
        let name = cli
            .author
            .clone()
            .or_else(|| config.github.username.clone())
            .unwrap_or_else(|| source.describe());
        let source: Arc<dyn ActivitySource> = Arc::new(source);
        return Ok((source, name));
    }

    let credentials = config.github.credentials()?;
    let client = GitHubClient::from_credentials(&credentials)?
        .with_api_base(config.github.api_base.clone())
        .with_per_page(config.github.per_page)
        .with_day_boundary(boundary);
    let source: Arc<dyn ActivitySource> = Arc::new(client);
    Ok((source, credentials.username))
}

fn clock(cli: &Cli, config: &DailyConfig) -> Arc<dyn Clock> {
    match cli.today {
        Some(day) => Arc::new(FixedClock(day)),
        None => Arc::new(SystemClock::new(config.display.day_boundary)),
    }
}

fn reference_day(cli: &Cli, config: &DailyConfig) -> NaiveDate {
    clock(cli, config).today()
}

async fn fetch_events(source: &dyn ActivitySource, verbose: bool) -> Result<Vec<CommitEvent>> {
    let spinner = if std::io::stderr().is_terminal() && !verbose {
        let pb = indicatif::ProgressBar::new_spinner();
        if let Ok(style) = indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})") {
            pb.set_style(style);
        }
        pb.set_message(format!("Fetching activity from {}...", source.describe()));
        pb.enable_steady_tick(std::time::Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let result = source.fetch_events().await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    Ok(result?)
}

fn format_event(event: &CommitEvent) -> String {
    let date = event
        .date
        .map_or_else(|| "unknown".to_string(), |d| d.to_string());
    let plural = if event.commit_count == 1 { "commit" } else { "commits" };
    let message = truncate_message(event.first_message().unwrap_or("No commit message"));
    format!(
        "  {date}  {} {plural:<10} {:<30} {message}",
        event.commit_count, event.repo
    )
}

fn truncate_message(message: &str) -> String {
    if message.chars().count() > 50 {
        let head: String = message.chars().take(47).collect();
        format!("{head}...")
    } else {
        message.to_string()
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    human_panic::setup_panic!();

    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = match (&cli.command, cli.verbose) {
        (_, true) => Level::DEBUG,
        (Some(Command::Serve { .. }), false) => Level::INFO,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).into_diagnostic()?;

    let mut config = DailyConfig::load(cli.config.as_deref())?.with_process_env();
    if let Some(boundary) = cli.day_boundary {
        config.display.day_boundary = boundary;
    }

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    tracing::debug!(format = %cli.format, boundary = %config.display.day_boundary, "starting");

    match &cli.command {
        Some(Command::Init) => {
            let path = Path::new(CONFIG_FILE_NAME);
            if path.exists() {
                miette::bail!("{CONFIG_FILE_NAME} already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created {CONFIG_FILE_NAME} with default configuration");
            return Ok(());
        }
        Some(Command::Doctor) => {
            return run_doctor(&cli, &config, use_color).await;
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "code-daily", &mut std::io::stdout());
            return Ok(());
        }
        _ => {}
    }

    let (source, username) = build_source(&cli, &config)?;
    let clock = clock(&cli, &config);

    if let Some(Command::Serve { host, port }) = &cli.command {
        let host = host.clone().unwrap_or_else(|| config.server.host.clone());
        let port = port.unwrap_or(config.server.port);
        let state = AppState::new(source, clock, username)
            .with_history_days(config.display.history_days)
            .with_calendar_days(config.display.calendar_days)
            .with_daily_goal(config.display.daily_goal);
        eprintln!("Serving dashboard on http://{host}:{port} (Ctrl-C to stop)");
        codedaily_web::run_server(state, &host, port).await?;
        return Ok(());
    }

    let today = clock.today();
    let events = fetch_events(source.as_ref(), cli.verbose).await?;
    let report =
        DailyReport::build(username, &events, today).with_daily_goal(config.display.daily_goal);

    match &cli.command {
        None | Some(Command::Status) => {
            let grid = CalendarGrid::build(&report.days, config.display.calendar_days, today);
            match cli.format {
                OutputFormat::Json => print_json(&StatsPayload::from(&report))?,
                OutputFormat::Markdown => {
                    println!("{}", report.to_markdown());
                    println!("## Recent Activity\n\n```\n{grid}```");
                }
                OutputFormat::Text => {
                    print!("{}", report.streak);
                    println!();
                    print!("{grid}");
                    println!();
                    print!("{}", report.stats);
                    println!();
                    print!("{}", report.goal);
                }
            }
        }
        Some(Command::Streak) => match cli.format {
            OutputFormat::Json => print_json(&StatsPayload::from(&report).streak)?,
            OutputFormat::Markdown => print!("{}", report.streak.to_markdown()),
            OutputFormat::Text => print!("{}", report.streak),
        },
        Some(Command::Stats) => match cli.format {
            OutputFormat::Json => print_json(&StatsPayload::from(&report).stats)?,
            OutputFormat::Markdown => print!("{}", report.stats.to_markdown()),
            OutputFormat::Text => print!("{}", report.stats),
        },
        Some(Command::Calendar { days }) => {
            let span = days.unwrap_or(config.display.calendar_days);
            let grid = CalendarGrid::build(&report.days, span, today);
            match cli.format {
                OutputFormat::Json => print_json(&grid)?,
                OutputFormat::Markdown => println!("## Recent Activity\n\n```\n{grid}```"),
                OutputFormat::Text => print!("{grid}"),
            }
        }
        Some(Command::History { days }) => {
            let span = days.unwrap_or(config.display.history_days);
            let history = compute_history(&report.activity, span, today);
            match cli.format {
                OutputFormat::Json => print_json(&history)?,
                OutputFormat::Markdown => print!("{}", history.to_markdown()),
                OutputFormat::Text => print!("{history}"),
            }
        }
        Some(Command::Events { limit }) => {
            let recent: Vec<&CommitEvent> = events.iter().take(*limit).collect();
            match cli.format {
                OutputFormat::Json => print_json(&recent)?,
                OutputFormat::Markdown => {
                    println!("## Recent Pushes\n");
                    println!("| Date | Commits | Repository | Message |");
                    println!("|------|---------|------------|---------|");
                    for event in &recent {
                        println!(
                            "| {} | {} | {} | {} |",
                            event.date.map_or_else(|| "unknown".to_string(), |d| d.to_string()),
                            event.commit_count,
                            event.repo,
                            truncate_message(event.first_message().unwrap_or("")).replace('|', "\\|")
                        );
                    }
                }
                OutputFormat::Text => {
                    if recent.is_empty() {
                        println!("No recent push events.");
                    } else {
                        println!("Recent pushes:");
                        for event in &recent {
                            println!("{}", format_event(event));
                        }
                    }
                }
            }
        }
        Some(Command::Achievements) => match cli.format {
            OutputFormat::Json => print_json(&report.achievements)?,
            OutputFormat::Markdown => print!("{}", report.achievements.to_markdown()),
            OutputFormat::Text => print!("{}", report.achievements),
        },
        Some(Command::Serve { .. } | Command::Init | Command::Doctor | Command::Completions { .. }) => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(date: Option<&str>, count: u32, message: Option<&str>) -> CommitEvent {
        CommitEvent {
            date: date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            repo: "octo/app".into(),
            commits: message
                .map(|m| vec![codedaily_core::CommitRef::from_full("abcdef123", m)])
                .unwrap_or_default(),
            commit_count: count,
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn long_messages_are_truncated() {
        let long = "x".repeat(60);
        let cut = truncate_message(&long);
        assert_eq!(cut.chars().count(), 50);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_message(&"y".repeat(50)), "y".repeat(50));
    }

    #[test]
    fn event_line_layout() {
        let line = format_event(&event(Some("2026-01-20"), 1, Some("fix: parser")));
        assert_eq!(
            line,
            format!("  2026-01-20  1 {:<10} {:<30} fix: parser", "commit", "octo/app")
        );
    }

    #[test]
    fn event_line_defaults() {
        let line = format_event(&event(None, 3, None));
        assert!(line.starts_with("  unknown  3 commits"));
        assert!(line.ends_with("No commit message"));
    }

    #[test]
    fn default_config_parses() {
        let config = DailyConfig::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.display.calendar_days, 14);
        assert!(config.github.token.is_none());
    }
}
