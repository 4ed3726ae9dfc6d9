//! Application-level progress flows.
//!
//! [`StudyProgress`] wires one streak tracker and one ledger to the same
//! clock and store, and implements what the app does when a task is
//! ticked off, when a focus session ends and when the user wipes data.

use std::rc::Rc;

use serde::Serialize;

use crate::clock::Clock;
use crate::error::{LedgerError, StoreError};
use crate::events::Event;
use crate::gamification::{BadgeAward, GamificationLedger, XpUpdate, GAMIFICATION_KEY};
use crate::storage::{KvStore, RewardsConfig};
use crate::streak::{StreakSummary, StreakTracker, STREAK_KEY};

/// Badges granted when the streak first reaches the given length.
pub const STREAK_MILESTONES: &[(u32, &str)] = &[
    (1, "first-streak"),
    (7, "week-streak"),
    (30, "month-streak"),
];

/// Result of [`StudyProgress::complete_task`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskCompletion {
    pub streak: StreakSummary,
    /// Milestone badges awarded by this completion.
    pub badges: Vec<BadgeAward>,
}

pub struct StudyProgress<C, S> {
    store: Rc<S>,
    streak: StreakTracker<C, Rc<S>>,
    ledger: GamificationLedger<Rc<S>>,
    rewards: RewardsConfig,
}

impl<C: Clock, S: KvStore> StudyProgress<C, S> {
    pub fn open(clock: C, store: S, rewards: RewardsConfig) -> Self {
        let store = Rc::new(store);
        Self {
            streak: StreakTracker::load(clock, Rc::clone(&store)),
            ledger: GamificationLedger::load(Rc::clone(&store)),
            store,
            rewards,
        }
    }

    /// A study task was ticked off.
    pub fn complete_task(&mut self) -> TaskCompletion {
        let update = self.streak.mark_completed();

        let mut badges = Vec::new();
        if update.updated() {
            for &(days, badge) in STREAK_MILESTONES {
                if update.streak < days {
                    break;
                }
                match self.ledger.award_badge(badge) {
                    Ok(award) if award.newly_awarded => badges.push(award),
                    Ok(_) => {}
                    Err(e) => tracing::warn!(badge, error = %e, "milestone badge rejected"),
                }
            }
        }

        TaskCompletion {
            streak: update.summary(),
            badges,
        }
    }

    /// A timed work session ran to completion.
    pub fn finish_focus_session(&mut self) -> Result<XpUpdate, LedgerError> {
        self.ledger.add_xp(self.rewards.focus_session_xp)
    }

    /// Delete both records and start over.
    ///
    /// An engine is only reset once its record has been removed, so a
    /// failing store leaves memory and storage in agreement.
    pub fn wipe(&mut self) -> Result<(), StoreError> {
        self.store.remove(STREAK_KEY)?;
        self.streak.clear();
        self.store.remove(GAMIFICATION_KEY)?;
        self.ledger.clear();
        tracing::info!("progress wiped");
        Ok(())
    }

    pub fn streak(&self) -> &StreakTracker<C, Rc<S>> {
        &self.streak
    }

    pub fn streak_mut(&mut self) -> &mut StreakTracker<C, Rc<S>> {
        &mut self.streak
    }

    pub fn ledger(&self) -> &GamificationLedger<Rc<S>> {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut GamificationLedger<Rc<S>> {
        &mut self.ledger
    }

    /// Take the queued events of both engines, streak events first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        let mut events = self.streak.drain_events();
        events.extend(self.ledger.drain_events());
        events
    }
}
