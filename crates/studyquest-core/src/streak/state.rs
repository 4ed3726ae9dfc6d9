//! Persisted streak record and its day-by-day transition rules.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days that must pass after using the grace before it is available again.
pub const GRACE_WINDOW_DAYS: i64 = 7;

/// What a completion did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakChange {
    /// First completion ever recorded.
    Started,
    /// A completion was already recorded today; nothing changed.
    AlreadyCompleted,
    /// Completion on the day after the previous one.
    Extended,
    /// Exactly one day was missed and the weekly grace covered it.
    SavedByBreak,
    /// The gap was too large or the grace was spent; restarted at 1.
    Reset,
}

impl StreakChange {
    /// Whether the state was mutated.
    pub fn is_update(self) -> bool {
        !matches!(self, StreakChange::AlreadyCompleted)
    }
}

/// Daily-completion streak state.
///
/// Serialized as the `studyStreak` record:
/// `{ currentStreak, lastCompletionDate, lastBreakDate, history }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreakState {
    current_streak: u32,
    last_completion_date: Option<NaiveDate>,
    last_break_date: Option<NaiveDate>,
    history: BTreeSet<NaiveDate>,
}

impl StreakState {
    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn last_completion_date(&self) -> Option<NaiveDate> {
        self.last_completion_date
    }

    pub fn last_break_date(&self) -> Option<NaiveDate> {
        self.last_break_date
    }

    /// Every date with at least one completion.
    pub fn history(&self) -> &BTreeSet<NaiveDate> {
        &self.history
    }

    /// Restore the record invariants after loading from storage.
    ///
    /// - `history` always contains `lastCompletionDate`
    /// - a record with any completion has a streak of at least 1
    /// - a record without completions has a streak of 0
    pub(crate) fn normalized(mut self) -> Self {
        if self.last_completion_date.is_none() {
            self.last_completion_date = self.history.last().copied();
        }

        match self.last_completion_date {
            Some(last) => {
                self.history.insert(last);
                self.current_streak = self.current_streak.max(1);
            }
            None => self.current_streak = 0,
        }
        self
    }

    /// Apply one completion on `today`.
    pub(crate) fn record_completion(&mut self, today: NaiveDate) -> StreakChange {
        let Some(last) = self.last_completion_date else {
            self.current_streak = 1;
            self.complete_on(today);
            return StreakChange::Started;
        };

        let diff = today.signed_duration_since(last).num_days();

        // A clock that moved backwards never rewinds the record.
        if diff <= 0 {
            return StreakChange::AlreadyCompleted;
        }

        if diff == 1 {
            self.current_streak = self.current_streak.saturating_add(1);
            self.complete_on(today);
            return StreakChange::Extended;
        }

        if diff == 2 && self.grace_available(today) {
            self.current_streak = self.current_streak.saturating_add(1);
            self.last_break_date = Some(today);
            self.complete_on(today);
            return StreakChange::SavedByBreak;
        }

        self.current_streak = 1;
        self.complete_on(today);
        StreakChange::Reset
    }

    /// Whether the weekly grace could cover a missed day as of `today`.
    pub fn grace_available(&self, today: NaiveDate) -> bool {
        match self.last_break_date {
            None => true,
            Some(used) => today.signed_duration_since(used).num_days() >= GRACE_WINDOW_DAYS,
        }
    }

    fn complete_on(&mut self, today: NaiveDate) {
        self.last_completion_date = Some(today);
        self.history.insert(today);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn first_completion_starts_streak() {
        let mut state = StreakState::default();
        assert_eq!(state.record_completion(day(1)), StreakChange::Started);
        assert_eq!(state.current_streak(), 1);
        assert_eq!(state.last_completion_date(), Some(day(1)));
        assert!(state.history().contains(&day(1)));
    }

    #[test]
    fn backwards_clock_is_ignored() {
        let mut state = StreakState::default();
        state.record_completion(day(5));
        let before = state.clone();

        assert_eq!(state.record_completion(day(3)), StreakChange::AlreadyCompleted);
        assert_eq!(state, before);
    }

    #[test]
    fn grace_becomes_available_after_seven_days() {
        let mut state = StreakState::default();
        state.record_completion(day(1));
        assert_eq!(state.record_completion(day(3)), StreakChange::SavedByBreak);

        assert!(!state.grace_available(day(9)));
        assert!(state.grace_available(day(10)));
    }

    #[test]
    fn grace_spent_exactly_seven_days_ago_saves_again() {
        let mut state = StreakState::default();
        state.record_completion(day(1));
        state.record_completion(day(3));
        for d in 4..=8 {
            state.record_completion(day(d));
        }
        assert_eq!(state.current_streak(), 7);

        // Miss the 9th; the grace was used on the 3rd, seven days before the 10th.
        assert_eq!(state.record_completion(day(10)), StreakChange::SavedByBreak);
        assert_eq!(state.current_streak(), 8);
        assert_eq!(state.last_break_date(), Some(day(10)));
    }

    #[test]
    fn reset_keeps_last_break_date() {
        let mut state = StreakState::default();
        state.record_completion(day(1));
        state.record_completion(day(3));
        assert_eq!(state.record_completion(day(5)), StreakChange::Reset);
        assert_eq!(state.last_break_date(), Some(day(3)));
        assert_eq!(state.current_streak(), 1);
    }

    #[test]
    fn normalized_repairs_missing_history_entry() {
        let raw = r#"{"currentStreak":3,"lastCompletionDate":"2024-01-04","lastBreakDate":null,"history":["2024-01-02","2024-01-03"]}"#;
        let state: StreakState = serde_json::from_str(raw).unwrap();
        let state = state.normalized();

        assert!(state.history().contains(&day(4)));
        assert_eq!(state.current_streak(), 3);
    }

    #[test]
    fn normalized_derives_last_completion_from_history() {
        let raw = r#"{"currentStreak":0,"history":["2024-01-02","2024-01-07"]}"#;
        let state: StreakState = serde_json::from_str(raw).unwrap();
        let state = state.normalized();

        assert_eq!(state.last_completion_date(), Some(day(7)));
        assert_eq!(state.current_streak(), 1);
    }

    #[test]
    fn normalized_zeroes_streak_without_completions() {
        let state: StreakState = serde_json::from_str(r#"{"currentStreak":4}"#).unwrap();
        assert_eq!(state.normalized().current_streak(), 0);
    }

    #[test]
    fn serializes_camel_case_record() {
        let mut state = StreakState::default();
        state.record_completion(day(1));
        let json: serde_json::Value = serde_json::to_value(&state).unwrap();

        assert_eq!(json["currentStreak"], 1);
        assert_eq!(json["lastCompletionDate"], "2024-01-01");
        assert!(json["lastBreakDate"].is_null());
        assert_eq!(json["history"], serde_json::json!(["2024-01-01"]));
    }
}
