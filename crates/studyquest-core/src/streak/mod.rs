mod state;
mod tracker;

pub use state::{StreakChange, StreakState, GRACE_WINDOW_DAYS};
pub use tracker::{StreakSummary, StreakTracker, StreakUpdate, STREAK_KEY};
