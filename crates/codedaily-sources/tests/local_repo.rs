use std::path::Path;

use chrono::{Days, NaiveDate, Utc};
use codedaily_core::DayBoundary;
use codedaily_sources::{ActivitySource, LocalRepoSource};
use git2::{Repository, Signature, Time};

/// Commit an empty tree change as `author` at `when` (unix seconds).
fn commit(repo: &Repository, name: &str, email: &str, when: i64, message: &str) {
    let signature = Signature::new(name, email, &Time::new(when, 0)).unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let parent = repo
        .head()
        .ok()
        .and_then(|head| head.target())
        .map(|oid| repo.find_commit(oid).unwrap());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .unwrap();
}

fn noon_utc(date: NaiveDate) -> i64 {
    date.and_hms_opt(12, 0, 0).unwrap().and_utc().timestamp()
}

fn init(dir: &Path) -> Repository {
    Repository::init(dir).unwrap()
}

#[tokio::test]
async fn one_event_per_commit_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init(dir.path());
    let day1 = NaiveDate::from_ymd_opt(2026, 1, 19).unwrap();
    let day2 = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
    commit(&repo, "Alice", "alice@example.com", noon_utc(day1), "first\n\nbody");
    commit(&repo, "Alice", "alice@example.com", noon_utc(day2), "second");

    let source = LocalRepoSource::new(dir.path()).with_day_boundary(DayBoundary::Utc);
    let events = source.fetch_events().await.unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].date, Some(day2));
    assert_eq!(events[0].first_message(), Some("second"));
    assert_eq!(events[1].date, Some(day1));
    assert_eq!(events[1].first_message(), Some("first"));
    assert!(events.iter().all(|e| e.commit_count == 1));
    assert_eq!(events[0].commits[0].sha.len(), 7);

    let dir_name = dir.path().file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(events[0].repo, dir_name);
}

#[tokio::test]
async fn author_filter_matches_email_or_name_ignoring_case() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init(dir.path());
    let day = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
    commit(&repo, "Alice", "alice@example.com", noon_utc(day), "a1");
    commit(&repo, "Bob", "bob@example.com", noon_utc(day) + 60, "b1");
    commit(&repo, "Alice", "alice@example.com", noon_utc(day) + 120, "a2");

    let by_email = LocalRepoSource::new(dir.path())
        .with_author("ALICE@example.com")
        .mine_events()
        .unwrap();
    assert_eq!(by_email.len(), 2);

    let by_name = LocalRepoSource::new(dir.path())
        .with_author("bob")
        .mine_events()
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].first_message(), Some("b1"));
}

#[tokio::test]
async fn since_days_stops_at_cutoff() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init(dir.path());
    let today = Utc::now().date_naive();
    let old = today.checked_sub_days(Days::new(40)).unwrap();
    let recent = today.checked_sub_days(Days::new(2)).unwrap();
    commit(&repo, "Alice", "alice@example.com", noon_utc(old), "old");
    commit(&repo, "Alice", "alice@example.com", noon_utc(recent), "recent");

    let events = LocalRepoSource::new(dir.path())
        .with_since_days(30)
        .mine_events()
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].first_message(), Some("recent"));
}

#[tokio::test]
async fn empty_repository_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path());
    assert!(LocalRepoSource::new(dir.path()).fetch_events().await.is_err());
}

#[tokio::test(flavor = "current_thread")]
async fn history_walk_does_not_hold_the_runtime() {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    let dir = tempfile::tempdir().unwrap();
    let repo = init(dir.path());
    let day = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
    for i in 0..50 {
        commit(&repo, "Alice", "alice@example.com", noon_utc(day) + i, "work");
    }

    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);
    tokio::spawn(async move { flag.store(true, Ordering::SeqCst) });

    let events = LocalRepoSource::new(dir.path()).fetch_events().await.unwrap();
    assert_eq!(events.len(), 50);
    // The single runtime thread was free to run other tasks during the walk.
    assert!(ran.load(Ordering::SeqCst));
}
