use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Every notable progress transition produces an Event.
/// Callers drain the queue after an operation and decide how to present it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A first completion started a new streak.
    StreakStarted { on: NaiveDate },
    /// A completion on the day after the previous one.
    StreakExtended { streak: u32, on: NaiveDate },
    /// One missed day was forgiven by the weekly grace.
    StreakSavedByBreak { streak: u32, on: NaiveDate },
    /// The streak was broken and restarted at 1.
    StreakReset { previous: u32, on: NaiveDate },
    /// XP crossed one or more level boundaries.
    LevelUp { from: u32, to: u32 },
    BadgeAwarded { badge: String },
    /// The persisted record could not be read and defaults were used.
    StateRecovered { key: String, reason: String },
    /// In-memory state changed but the store rejected the write.
    PersistFailed { key: String, reason: String },
}

/// Whether an operation's result reached the persistence gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Durability {
    /// The new state was written.
    Saved,
    /// Nothing changed, so nothing was written.
    Unchanged,
    /// The write failed; memory holds the newer state for this session.
    Failed { reason: String },
}

impl Durability {
    pub fn is_failed(&self) -> bool {
        matches!(self, Durability::Failed { .. })
    }
}
