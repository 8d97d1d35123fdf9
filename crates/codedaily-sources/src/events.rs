//! Push-event extraction from the GitHub events feed.

use chrono::{DateTime, Utc};
use codedaily_core::{CommitEvent, CommitRef, DayBoundary};
use serde_json::Value;

/// Keep the `PushEvent`s from a raw events list and turn each into a
/// [`CommitEvent`].
///
/// Every push counts as at least one commit: the feed sometimes omits both
/// `size` and the commit list.
///
/// # Examples
///
/// ```
/// use codedaily_core::DayBoundary;
/// use codedaily_sources::parse_commit_events;
/// use serde_json::json;
///
/// let raw = vec![
///     json!({"type": "PushEvent", "created_at": "2026-01-20T10:00:00Z",
///            "repo": {"name": "octo/app"}, "payload": {"size": 2}}),
///     json!({"type": "WatchEvent", "created_at": "2026-01-20T11:00:00Z"}),
/// ];
/// let events = parse_commit_events(&raw, DayBoundary::Utc);
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].commit_count, 2);
/// ```
pub fn parse_commit_events(events: &[Value], boundary: DayBoundary) -> Vec<CommitEvent> {
    events
        .iter()
        .filter(|event| event.get("type").and_then(Value::as_str) == Some("PushEvent"))
        .map(|event| parse_push(event, boundary))
        .collect()
}

fn parse_push(event: &Value, boundary: DayBoundary) -> CommitEvent {
    let date = event
        .get("created_at")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|instant| boundary.date_of(instant.with_timezone(&Utc)));
    if date.is_none() {
        tracing::debug!(id = ?event.get("id"), "push event without a usable created_at");
    }

    let repo = event
        .pointer("/repo/name")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    let commits: Vec<CommitRef> = event
        .pointer("/payload/commits")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .map(|c| {
                    CommitRef::from_full(
                        c.get("sha").and_then(Value::as_str).unwrap_or(""),
                        c.get("message").and_then(Value::as_str).unwrap_or(""),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    let commit_count = match event.pointer("/payload/size").and_then(Value::as_u64) {
        Some(size) => u32::try_from(size).unwrap_or(u32::MAX),
        None if !commits.is_empty() => u32::try_from(commits.len()).unwrap_or(u32::MAX),
        None => 1,
    };

    CommitEvent {
        date,
        repo,
        commits,
        commit_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn keeps_only_push_events() {
        let raw = vec![
            json!({"type": "PushEvent", "created_at": "2026-01-20T10:00:00Z", "repo": {"name": "a/b"}, "payload": {}}),
            json!({"type": "IssuesEvent", "created_at": "2026-01-20T10:00:00Z"}),
            json!({"type": "CreateEvent"}),
            json!({"created_at": "2026-01-20T10:00:00Z"}),
        ];
        assert_eq!(parse_commit_events(&raw, DayBoundary::Utc).len(), 1);
    }

    #[test]
    fn extracts_full_push() {
        let raw = vec![json!({
            "type": "PushEvent",
            "created_at": "2026-01-20T10:30:00Z",
            "repo": {"name": "octo/app"},
            "payload": {
                "size": 2,
                "commits": [
                    {"sha": "abcdef1234567890", "message": "feat: add thing\n\nDetails here"},
                    {"sha": "1234567abcdef", "message": "fix: typo"}
                ]
            }
        })];
        let events = parse_commit_events(&raw, DayBoundary::Utc);
        let event = &events[0];
        assert_eq!(event.date, Some(d("2026-01-20")));
        assert_eq!(event.repo, "octo/app");
        assert_eq!(event.commit_count, 2);
        assert_eq!(event.commits[0].sha, "abcdef1");
        assert_eq!(event.commits[0].message, "feat: add thing");
        assert_eq!(event.first_message(), Some("feat: add thing"));
    }

    #[test]
    fn size_wins_over_commit_list() {
        let raw = vec![json!({
            "type": "PushEvent",
            "created_at": "2026-01-20T10:30:00Z",
            "payload": {"size": 25, "commits": [{"sha": "a", "message": "m"}]}
        })];
        assert_eq!(parse_commit_events(&raw, DayBoundary::Utc)[0].commit_count, 25);
    }

    #[test]
    fn count_falls_back_to_commit_list_then_one() {
        let raw = vec![
            json!({"type": "PushEvent", "payload": {"commits": [{"sha": "a"}, {"sha": "b"}, {"sha": "c"}]}}),
            json!({"type": "PushEvent", "payload": {"commits": []}}),
            json!({"type": "PushEvent"}),
        ];
        let counts: Vec<u32> = parse_commit_events(&raw, DayBoundary::Utc)
            .iter()
            .map(|e| e.commit_count)
            .collect();
        assert_eq!(counts, vec![3, 1, 1]);
    }

    #[test]
    fn explicit_zero_size_is_kept() {
        let raw = vec![json!({"type": "PushEvent", "created_at": "2026-01-20T10:30:00Z", "payload": {"size": 0}})];
        let events = parse_commit_events(&raw, DayBoundary::Utc);
        assert_eq!(events[0].commit_count, 0);
        assert!(events[0].date.is_some());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let raw = vec![json!({"type": "PushEvent", "created_at": "not-a-date"})];
        let event = &parse_commit_events(&raw, DayBoundary::Utc)[0];
        assert_eq!(event.date, None);
        assert_eq!(event.repo, "unknown");
        assert!(event.commits.is_empty());
        assert_eq!(event.first_message(), None);
    }

    #[test]
    fn offset_timestamps_follow_the_boundary() {
        // 23:30 at -05:00 is 04:30 UTC the next day.
        let raw = vec![json!({"type": "PushEvent", "created_at": "2026-01-20T23:30:00-05:00"})];
        let event = &parse_commit_events(&raw, DayBoundary::Utc)[0];
        assert_eq!(event.date, Some(d("2026-01-21")));
    }

    #[test]
    fn empty_feed_is_empty() {
        assert!(parse_commit_events(&[], DayBoundary::Local).is_empty());
    }
}
