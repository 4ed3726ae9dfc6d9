//! Integration tests for streak tracking against a file-backed store.

use chrono::NaiveDate;
use proptest::prelude::*;
use studyquest_core::streak::STREAK_KEY;
use studyquest_core::{
    Durability, Event, FixedClock, JsonFileStore, KvStore, MemoryStore, StreakChange, StreakTracker,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_grace_scenario_survives_restarts() {
    let temp = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(temp.path()).unwrap();
    let clock = FixedClock::new(date("2024-01-01"));

    // Each day is a fresh app session loading from disk.
    let first = StreakTracker::load(&clock, &store).mark_completed();
    assert_eq!(first.change, StreakChange::Started);

    clock.set(date("2024-01-03"));
    let mut tracker = StreakTracker::load(&clock, &store);
    let saved = tracker.mark_completed();
    assert!(saved.updated());
    assert!(saved.saved_by_break());
    assert_eq!(saved.streak, 2);
    assert_eq!(tracker.state().last_break_date(), Some(date("2024-01-03")));

    clock.set(date("2024-01-05"));
    let reset = StreakTracker::load(&clock, &store).mark_completed();
    assert!(reset.reset());
    assert_eq!(reset.streak, 1);

    let reloaded = StreakTracker::load(&clock, &store);
    let history: Vec<String> = reloaded.history().iter().map(|d| d.to_string()).collect();
    assert_eq!(history, vec!["2024-01-01", "2024-01-03", "2024-01-05"]);
    assert_eq!(reloaded.state().last_break_date(), Some(date("2024-01-03")));
}

#[test]
fn test_eight_day_gap_resets_without_consuming_grace() {
    let store = MemoryStore::new();
    let clock = FixedClock::new(date("2024-01-01"));
    let mut tracker = StreakTracker::load(&clock, &store);
    tracker.mark_completed();

    clock.set(date("2024-01-10"));
    let update = tracker.mark_completed();
    let summary = serde_json::to_value(update.summary()).unwrap();
    assert_eq!(
        summary,
        serde_json::json!({
            "updated": true,
            "streak": 1,
            "reset": true,
            "durability": { "status": "saved" }
        })
    );
    assert_eq!(tracker.state().last_break_date(), None);
}

#[test]
fn test_reads_record_written_in_published_format() {
    let store = MemoryStore::new();
    store.insert_raw(
        STREAK_KEY,
        r#"{"currentStreak":4,"lastCompletionDate":"2024-02-28","lastBreakDate":null,"history":["2024-02-25","2024-02-26","2024-02-27","2024-02-28"]}"#,
    );

    // Leap day follows the 28th.
    let clock = FixedClock::new(date("2024-02-29"));
    let mut tracker = StreakTracker::load(&clock, &store);
    let update = tracker.mark_completed();
    assert_eq!(update.change, StreakChange::Extended);
    assert_eq!(update.streak, 5);
}

#[test]
fn test_stale_streak_is_kept_until_next_completion() {
    let store = MemoryStore::new();
    store.insert_raw(
        STREAK_KEY,
        r#"{"currentStreak":12,"lastCompletionDate":"2024-01-01","lastBreakDate":null,"history":["2024-01-01"]}"#,
    );

    let clock = FixedClock::new(date("2024-03-01"));
    let mut tracker = StreakTracker::load(&clock, &store);
    assert_eq!(tracker.current_streak(), 12);

    assert!(tracker.mark_completed().reset());
    assert_eq!(tracker.current_streak(), 1);
}

#[test]
fn test_unreadable_file_starts_fresh() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("studyStreak.json"), "[1, 2").unwrap();
    let store = JsonFileStore::open(temp.path()).unwrap();
    let clock = FixedClock::new(date("2024-01-01"));

    let mut tracker = StreakTracker::load(&clock, &store);
    assert_eq!(tracker.current_streak(), 0);
    let update = tracker.mark_completed();
    assert_eq!(update.durability, Durability::Saved);

    let blob = store.load(STREAK_KEY).unwrap().unwrap();
    assert!(blob.contains(r#""currentStreak":1"#));
}

#[test]
fn test_failed_read_starts_fresh_and_reports_failed_write() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::create_dir(temp.path().join("studyStreak.json")).unwrap();
    let store = JsonFileStore::open(temp.path()).unwrap();
    let clock = FixedClock::new(date("2024-01-01"));

    let mut tracker = StreakTracker::load(&clock, &store);
    assert_eq!(tracker.current_streak(), 0);
    assert!(matches!(
        tracker.drain_events().as_slice(),
        [Event::StateRecovered { key, .. }] if key == STREAK_KEY
    ));

    let update = tracker.mark_completed();
    assert_eq!(update.streak, 1);
    assert!(update.durability.is_failed());
}

proptest! {
    #[test]
    fn prop_consecutive_days_count_up(days in 1usize..60) {
        let store = MemoryStore::new();
        let clock = FixedClock::new(date("2023-12-15"));
        let mut tracker = StreakTracker::load(&clock, &store);

        for k in 0..days {
            let update = tracker.mark_completed();
            prop_assert_eq!(update.streak as usize, k + 1);
            clock.advance_days(1);
        }
    }

    #[test]
    fn prop_streak_invariants_hold_for_any_schedule(gaps in prop::collection::vec(0i64..12, 1..40)) {
        let store = MemoryStore::new();
        let clock = FixedClock::new(date("2024-01-01"));
        let mut tracker = StreakTracker::load(&clock, &store);
        let mut distinct_days = 0usize;

        for gap in gaps {
            clock.advance_days(gap);
            let before = tracker.state().clone();
            let update = tracker.mark_completed();

            if update.updated() {
                distinct_days += 1;
            } else {
                prop_assert_eq!(tracker.state(), &before);
            }

            let state = tracker.state();
            prop_assert!(state.current_streak() >= 1);
            prop_assert_eq!(state.last_completion_date(), Some(clock_today(&clock)));
            prop_assert!(state.history().contains(&clock_today(&clock)));
            prop_assert_eq!(state.history().len(), distinct_days);
            prop_assert!(state.current_streak() as usize <= distinct_days);
        }
    }
}

fn clock_today(clock: &FixedClock) -> NaiveDate {
    use studyquest_core::Clock;
    clock.today()
}
