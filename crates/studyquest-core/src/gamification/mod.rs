mod ledger;
mod state;

pub use ledger::{BadgeAward, GamificationLedger, XpUpdate, GAMIFICATION_KEY};
pub use state::{level_for_xp, BadgeId, GamificationState, XpAmount, XP_PER_LEVEL};
