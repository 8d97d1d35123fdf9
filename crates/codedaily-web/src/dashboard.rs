//! The HTML dashboard served at `/`.

use std::fmt::Write;

use axum::extract::State;
use axum::response::Html;
use chrono::Datelike;
use codedaily_core::{MAX_DAILY_GOAL, MIN_DAILY_GOAL};
use codedaily_pulse::calendar::CalendarGrid;
use codedaily_pulse::history::{compute_history, History};
use codedaily_pulse::report::DailyReport;

use crate::error::ApiResult;
use crate::state::AppState;

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif; background: #0d1117; color: #c9d1d9; margin: 0; padding: 2rem; }
main { max-width: 960px; margin: 0 auto; }
h1 { margin-bottom: 0.25rem; }
.muted { color: #8b949e; }
.card { background: #161b22; border: 1px solid #30363d; border-radius: 8px; padding: 1.25rem; margin: 1rem 0; }
.streak { font-size: 2.5rem; font-weight: 700; }
.streak.active { color: #f0883e; }
.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(130px, 1fr)); gap: 0.75rem; }
.stat .value { font-size: 1.75rem; font-weight: 600; }
.heatmap { display: grid; grid-template-rows: repeat(7, 12px); grid-auto-flow: column; grid-auto-columns: 12px; gap: 3px; }
.cell { width: 12px; height: 12px; border-radius: 2px; }
.l0 { background: #161b22; outline: 1px solid #21262d; }
.l1 { background: #0e4429; }
.l2 { background: #006d32; }
.l3 { background: #26a641; }
.l4 { background: #39d353; }
.badges { list-style: none; padding: 0; display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 0.5rem; }
.badge { padding: 0.5rem; border-radius: 6px; border: 1px solid #30363d; }
.badge.locked { opacity: 0.4; }
.calendar td { width: 2rem; height: 2rem; text-align: center; border-radius: 4px; }
.calendar td.on { background: #26a641; }
.calendar td.off { background: #161b22; outline: 1px solid #21262d; }
.goal .met { color: #39d353; font-weight: 600; }
[hidden] { display: none; }
"#;

/// Escape text for use in HTML element content and attribute values.
///
/// # Examples
///
/// ```
/// use codedaily_web::dashboard::escape_html;
///
/// assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
/// ```
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

pub async fn index(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let events = state.events().await?;
    let today = state.clock.today();
    let report = DailyReport::build(state.username.clone(), &events, today)
        .with_daily_goal(state.daily_goal());
    let history = compute_history(&report.activity, state.history_days.max(1), today);
    let calendar = CalendarGrid::build(&report.days, state.calendar_days, today);
    Ok(Html(render(&report, &history, &calendar)))
}

const GOAL_SCRIPT: &str = r#"
document.querySelector("[data-goal-edit-btn]").addEventListener("click", () => {
  document.querySelector("[data-goal-form]").hidden = false;
});
document.querySelector("[data-goal-form]").addEventListener("submit", async (event) => {
  event.preventDefault();
  const goal = Number(document.getElementById("goal-input").value);
  const response = await fetch("/api/goal", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({ goal }),
  });
  if (response.ok) { window.location.reload(); }
});
"#;

/// Render the full page.
pub fn render(report: &DailyReport, history: &History, calendar: &CalendarGrid) -> String {
    let mut body = String::new();

    let _ = write!(
        body,
        "<h1>code-daily</h1><p class=\"muted\">{} &middot; {}</p>",
        escape_html(&report.username),
        report.today
    );

    let streak = &report.streak;
    let _ = write!(
        body,
        "<section class=\"card\"><div class=\"streak{}\">&#128293; {}</div><p class=\"muted\">Longest streak: {} &middot; Last commit: {}</p></section>",
        if streak.streak_active { " active" } else { "" },
        escape_html(&streak.status_line()),
        streak.longest_streak,
        streak
            .last_commit_date
            .map_or_else(|| "never".to_string(), |d| d.to_string())
    );

    let goal = &report.goal;
    let noun = if goal.daily == 1 { "commit" } else { "commits" };
    let _ = write!(
        body,
        "<section class=\"card goal\" data-goal=\"{}\"><h2>Daily Goal</h2><p>{} / {} {noun}</p>",
        goal.daily, goal.today_progress, goal.daily
    );
    if goal.met {
        body.push_str("<p class=\"met\">Goal met!</p>");
    } else {
        let _ = write!(body, "<p class=\"muted\">{} more to reach your goal</p>", goal.remaining());
    }
    let _ = write!(
        body,
        "<button type=\"button\" data-goal-edit-btn>Edit goal</button><form data-goal-form hidden><input id=\"goal-input\" type=\"number\" min=\"{MIN_DAILY_GOAL}\" max=\"{MAX_DAILY_GOAL}\" value=\"{}\"><button type=\"submit\">Save</button></form></section>",
        goal.daily
    );

    let stats = &report.stats;
    body.push_str("<section class=\"card\"><h2>Days with commits</h2><div class=\"grid\">");
    for (label, value) in [
        ("Today", stats.commits_today),
        ("This week", stats.commits_this_week),
        ("This month", stats.commits_this_month),
        ("Last 7 days", stats.commits_last_7_days),
        ("Last 30 days", stats.commits_last_30_days),
        ("All time", stats.total_commits),
    ] {
        let _ = write!(
            body,
            "<div class=\"stat\"><div class=\"value\">{value}</div><div class=\"muted\">{label}</div></div>"
        );
    }
    body.push_str("</div></section>");

    let _ = write!(
        body,
        "<section class=\"card\"><h2>Last {} days</h2><div class=\"heatmap\">",
        history.period.total_days
    );
    // Blank cells so the first column lines up with its weekday.
    for _ in 0..history.period.start.weekday().num_days_from_monday() {
        body.push_str("<div></div>");
    }
    for day in &history.days {
        let _ = write!(
            body,
            "<div class=\"cell l{}\" title=\"{}: {} commits\"></div>",
            day.level, day.date, day.count
        );
    }
    body.push_str("</div></section>");

    body.push_str("<section class=\"card\"><h2>Recent Activity</h2><table class=\"calendar\"><tr>");
    for day in ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"] {
        let _ = write!(body, "<th>{day}</th>");
    }
    body.push_str("</tr>");
    for week in &calendar.weeks {
        body.push_str("<tr>");
        for cell in week {
            body.push_str(match cell {
                Some(true) => "<td class=\"on\">&#10003;</td>",
                Some(false) => "<td class=\"off\"></td>",
                None => "<td></td>",
            });
        }
        body.push_str("</tr>");
    }
    body.push_str("</table></section>");

    let _ = write!(
        body,
        "<section class=\"card\"><h2>Achievements ({}/{})</h2><ul class=\"badges\">",
        report.achievements.unlocked_count(),
        report.achievements.entries.len()
    );
    for entry in &report.achievements.entries {
        let a = &entry.achievement;
        let _ = write!(
            body,
            "<li class=\"badge{}\">{} <strong>{}</strong><br><span class=\"muted\">{}</span></li>",
            if entry.unlocked { "" } else { " locked" },
            a.emoji,
            escape_html(a.name),
            escape_html(a.description)
        );
    }
    body.push_str("</ul></section>");

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>code-daily: {}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<main>{body}</main>\n<script>{GOAL_SCRIPT}</script>\n</body>\n</html>\n",
        escape_html(&report.username)
    )
}
