use std::collections::BTreeSet;

use serde::Serialize;

use super::state::{level_for_xp, BadgeId, GamificationState, XpAmount, XP_PER_LEVEL};
use crate::error::LedgerError;
use crate::events::{Durability, Event};
use crate::persist;
use crate::storage::KvStore;

/// Namespace of the gamification record in the store.
pub const GAMIFICATION_KEY: &str = "studyGamification";

/// Result of a successful [`GamificationLedger::add_xp`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XpUpdate {
    pub gained: u64,
    pub xp: u64,
    pub previous_level: u32,
    pub level: u32,
    pub durability: Durability,
}

impl XpUpdate {
    pub fn leveled_up(&self) -> bool {
        self.level > self.previous_level
    }
}

/// Result of [`GamificationLedger::award_badge`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeAward {
    pub badge: BadgeId,
    pub newly_awarded: bool,
    pub durability: Durability,
}

/// Accumulates XP, derives the level and records badges.
pub struct GamificationLedger<S> {
    store: S,
    state: GamificationState,
    events: Vec<Event>,
}

impl<S: KvStore> GamificationLedger<S> {
    /// Load the persisted record, falling back to a fresh ledger if it is
    /// missing or unreadable. A stale stored level is corrected here.
    pub fn load(store: S) -> Self {
        let mut events = Vec::new();
        let state =
            persist::load_record::<GamificationState, _>(&store, GAMIFICATION_KEY, &mut events)
                .map(GamificationState::normalized)
                .unwrap_or_default();

        Self {
            store,
            state,
            events,
        }
    }

    /// Credit XP.
    ///
    /// Accepts anything convertible to [`XpAmount`]: whole numbers directly,
    /// `f64` and strings after validation. Invalid amounts leave the ledger
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidAmount`] for NaN, infinite, negative or
    /// non-numeric input.
    pub fn add_xp<A>(&mut self, amount: A) -> Result<XpUpdate, LedgerError>
    where
        A: TryInto<XpAmount>,
        LedgerError: From<A::Error>,
    {
        let amount: XpAmount = amount.try_into()?;
        let gained = amount.points();

        let previous_level = self.state.level();
        let next_level = level_for_xp(self.state.xp().saturating_add(gained));
        if next_level > previous_level {
            tracing::info!(from = previous_level, to = next_level, "level up");
            self.events.push(Event::LevelUp {
                from: previous_level,
                to: next_level,
            });
        }
        self.state.credit(gained);
        tracing::debug!(gained, xp = self.state.xp(), "xp credited");

        let durability =
            persist::save_record(&self.store, GAMIFICATION_KEY, &self.state, &mut self.events);

        Ok(XpUpdate {
            gained,
            xp: self.state.xp(),
            previous_level,
            level: self.state.level(),
            durability,
        })
    }

    /// Award a badge once. Repeated awards are no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidBadge`] for an empty identifier.
    pub fn award_badge(&mut self, badge: &str) -> Result<BadgeAward, LedgerError> {
        let badge = BadgeId::new(badge)?;

        if !self.state.insert_badge(badge.clone()) {
            return Ok(BadgeAward {
                badge,
                newly_awarded: false,
                durability: Durability::Unchanged,
            });
        }

        tracing::info!(badge = %badge, "badge awarded");
        self.events.push(Event::BadgeAwarded {
            badge: badge.to_string(),
        });
        let durability =
            persist::save_record(&self.store, GAMIFICATION_KEY, &self.state, &mut self.events);

        Ok(BadgeAward {
            badge,
            newly_awarded: true,
            durability,
        })
    }

    pub fn state(&self) -> &GamificationState {
        &self.state
    }

    pub fn xp(&self) -> u64 {
        self.state.xp()
    }

    pub fn level(&self) -> u32 {
        self.state.level()
    }

    pub fn badges(&self) -> &BTreeSet<BadgeId> {
        self.state.badges()
    }

    pub fn has_badge(&self, badge: &str) -> bool {
        BadgeId::new(badge)
            .map(|id| self.state.badges().contains(&id))
            .unwrap_or(false)
    }

    /// Points still missing to reach the next level.
    pub fn xp_to_next_level(&self) -> u64 {
        (u64::from(self.state.level()) * XP_PER_LEVEL).saturating_sub(self.state.xp())
    }

    /// Take the queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn clear(&mut self) {
        self.state = GamificationState::default();
    }
}
