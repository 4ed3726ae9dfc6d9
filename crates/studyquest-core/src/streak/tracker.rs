use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::state::{StreakChange, StreakState};
use crate::clock::Clock;
use crate::events::{Durability, Event};
use crate::persist;
use crate::storage::KvStore;

/// Namespace of the streak record in the store.
pub const STREAK_KEY: &str = "studyStreak";

/// Result of [`StreakTracker::mark_completed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakUpdate {
    pub change: StreakChange,
    pub streak: u32,
    pub durability: Durability,
}

impl StreakUpdate {
    pub fn updated(&self) -> bool {
        self.change.is_update()
    }

    pub fn saved_by_break(&self) -> bool {
        self.change == StreakChange::SavedByBreak
    }

    pub fn reset(&self) -> bool {
        self.change == StreakChange::Reset
    }

    /// Caller-facing descriptor: `{updated, streak, savedByBreak?, reset?}`.
    pub fn summary(&self) -> StreakSummary {
        StreakSummary {
            updated: self.updated(),
            streak: self.streak,
            saved_by_break: self.saved_by_break(),
            reset: self.reset(),
            durability: self.durability.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub updated: bool,
    pub streak: u32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub saved_by_break: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub reset: bool,
    pub durability: Durability,
}

/// Tracks consecutive days with at least one completed task.
///
/// The state is loaded once on construction and mirrored to the store
/// after every mutation. A stale streak is never collapsed on load; only
/// the next [`mark_completed`](Self::mark_completed) resolves it.
pub struct StreakTracker<C, S> {
    clock: C,
    store: S,
    state: StreakState,
    events: Vec<Event>,
}

impl<C: Clock, S: KvStore> StreakTracker<C, S> {
    /// Load the persisted record, falling back to a fresh state if it is
    /// missing or unreadable.
    pub fn load(clock: C, store: S) -> Self {
        let mut events = Vec::new();
        let state = persist::load_record::<StreakState, _>(&store, STREAK_KEY, &mut events)
            .map(StreakState::normalized)
            .unwrap_or_default();

        Self {
            clock,
            store,
            state,
            events,
        }
    }

    /// Record that a task was completed today.
    ///
    /// Safe to call any number of times per day.
    pub fn mark_completed(&mut self) -> StreakUpdate {
        let today = self.clock.today();
        let previous = self.state.current_streak();

        if let Some(last) = self.state.last_completion_date() {
            if today < last {
                tracing::warn!(%today, %last, "clock is behind last completion; ignoring");
            }
        }

        let change = self.state.record_completion(today);
        let streak = self.state.current_streak();

        let durability = if change.is_update() {
            self.events.push(match change {
                StreakChange::Started => Event::StreakStarted { on: today },
                StreakChange::SavedByBreak => {
                    tracing::info!(streak, %today, "streak saved by weekly break");
                    Event::StreakSavedByBreak { streak, on: today }
                }
                StreakChange::Reset => Event::StreakReset {
                    previous,
                    on: today,
                },
                _ => Event::StreakExtended { streak, on: today },
            });
            tracing::debug!(?change, streak, %today, "streak updated");
            persist::save_record(&self.store, STREAK_KEY, &self.state, &mut self.events)
        } else {
            Durability::Unchanged
        };

        StreakUpdate {
            change,
            streak,
            durability,
        }
    }

    pub fn state(&self) -> &StreakState {
        &self.state
    }

    pub fn current_streak(&self) -> u32 {
        self.state.current_streak()
    }

    pub fn history(&self) -> &BTreeSet<NaiveDate> {
        self.state.history()
    }

    /// Whether a completion was recorded on `date`.
    pub fn completed_on(&self, date: NaiveDate) -> bool {
        self.state.history().contains(&date)
    }

    /// Take the queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn clear(&mut self) {
        self.state = StreakState::default();
    }
}
