use unisurf_site::limiter::rate_limiter::{RateDecision, RateLimitPolicy, SubmissionWindow};

const NOW: i64 = 1_750_000_000;

fn policy() -> RateLimitPolicy {
    RateLimitPolicy {
        min_interval_secs: 30,
        max_per_window: 3,
        window_secs: 3600,
    }
}

#[test]
fn empty_window_admits() {
    let mut window = SubmissionWindow::new();

    assert_eq!(window.admit(&policy(), NOW), RateDecision::Admit);
    assert!(window.is_empty());
}

#[test]
fn admit_never_appends() {
    let mut window = SubmissionWindow::from_timestamps(vec![NOW - 100]);

    assert!(window.admit(&policy(), NOW).is_admitted());
    assert!(window.admit(&policy(), NOW).is_admitted());
    assert_eq!(window.len(), 1);
}

#[test]
fn too_soon_after_last_entry() {
    let mut window = SubmissionWindow::from_timestamps(vec![NOW - 5]);

    let decision = window.admit(&policy(), NOW);

    assert_eq!(decision, RateDecision::TooSoon { retry_after_secs: 25 });
    assert_eq!(decision.retry_after_secs(), Some(25));
}

#[test]
fn exactly_the_interval_is_enough() {
    let mut window = SubmissionWindow::from_timestamps(vec![NOW - 30]);

    assert!(window.admit(&policy(), NOW).is_admitted());
}

#[test]
fn full_window_rejects_until_oldest_leaves() {
    let mut window = SubmissionWindow::from_timestamps(vec![NOW - 3000, NOW - 2000, NOW - 1000]);

    let decision = window.admit(&policy(), NOW);

    assert_eq!(decision, RateDecision::WindowFull { retry_after_secs: 600 });
}

#[test]
fn old_entries_are_pruned() {
    let mut window = SubmissionWindow::from_timestamps(vec![NOW - 7200, NOW - 3600, NOW - 120]);

    assert!(window.admit(&policy(), NOW).is_admitted());
    assert_eq!(window.timestamps(), &[NOW - 120]);
}

#[test]
fn tick_appends_and_prunes() {
    let mut window = SubmissionWindow::from_timestamps(vec![NOW - 4000]);

    window.tick(&policy(), NOW);

    assert_eq!(window.timestamps(), &[NOW]);
}

#[test]
fn window_serializes_as_plain_list() {
    let window = SubmissionWindow::from_timestamps(vec![NOW, NOW - 60]);

    let json = serde_json::to_value(&window).unwrap();

    assert_eq!(json, serde_json::json!([NOW - 60, NOW]));
}
