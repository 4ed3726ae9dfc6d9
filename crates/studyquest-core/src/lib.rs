//! # StudyQuest Core Library
//!
//! This library provides the progress-tracking logic behind StudyQuest:
//! a daily-completion streak with a weekly grace day, and an XP ledger
//! with levels and badges. The CLI is a thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Engines**: synchronous state machines that own their state, write
//!   it through a [`KvStore`] after every change, and report what happened
//!   through outcome values and a drainable [`Event`] queue
//! - **Clock**: injected [`Clock`] so date arithmetic is deterministic in tests
//! - **Storage**: JSON records behind the [`KvStore`] trait, TOML-based
//!   [`Config`]
//!
//! ## Key Components
//!
//! - [`StreakTracker`]: daily streak with a once-per-week missed-day grace
//! - [`GamificationLedger`]: XP, derived level and idempotent badges
//! - [`StudyProgress`]: task completion, focus session and wipe flows

pub mod clock;
pub mod error;
pub mod events;
pub mod gamification;
mod persist;
pub mod progress;
pub mod storage;
pub mod streak;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, LedgerError, StoreError};
pub use events::{Durability, Event};
pub use gamification::{BadgeAward, BadgeId, GamificationLedger, GamificationState, XpAmount, XpUpdate};
pub use progress::{StudyProgress, TaskCompletion};
pub use storage::{Config, JsonFileStore, KvStore, MemoryStore};
pub use streak::{StreakChange, StreakState, StreakSummary, StreakTracker, StreakUpdate};
