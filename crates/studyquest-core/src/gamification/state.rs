//! XP, level and badge record types.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::LedgerError;

/// XP needed per level.
pub const XP_PER_LEVEL: u64 = 100;

/// Level reached with `xp` points: `xp / XP_PER_LEVEL + 1`.
pub fn level_for_xp(xp: u64) -> u32 {
    u32::try_from(xp / XP_PER_LEVEL)
        .unwrap_or(u32::MAX - 1)
        .saturating_add(1)
}

/// A validated, whole, non-negative XP quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct XpAmount(u64);

impl XpAmount {
    pub const fn new(points: u64) -> Self {
        Self(points)
    }

    pub fn points(self) -> u64 {
        self.0
    }
}

impl From<u64> for XpAmount {
    fn from(points: u64) -> Self {
        Self(points)
    }
}

impl From<u32> for XpAmount {
    fn from(points: u32) -> Self {
        Self(u64::from(points))
    }
}

/// Finite, non-negative amounts are accepted; fractions are floored.
impl TryFrom<f64> for XpAmount {
    type Error = LedgerError;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(LedgerError::InvalidAmount(amount.to_string()));
        }
        Ok(Self(amount.floor() as u64))
    }
}

impl FromStr for XpAmount {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed: f64 = s
            .trim()
            .parse()
            .map_err(|_| LedgerError::InvalidAmount(s.to_string()))?;
        Self::try_from(parsed).map_err(|_| LedgerError::InvalidAmount(s.to_string()))
    }
}

impl TryFrom<&str> for XpAmount {
    type Error = LedgerError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for XpAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} XP", self.0)
    }
}

/// Identifier of an achievement badge. Never empty, never padded.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeId(String);

impl BadgeId {
    pub fn new(id: &str) -> Result<Self, LedgerError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::InvalidBadge(id.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for BadgeId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for BadgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// XP/level/badge state.
///
/// Serialized as the `studyGamification` record: `{ xp, level, badges }`.
/// `level` is written for readers of the record but always recomputed
/// from `xp` on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamificationState {
    #[serde(deserialize_with = "lenient_count")]
    xp: u64,
    #[serde(deserialize_with = "lenient_count")]
    level: u32,
    badges: BTreeSet<BadgeId>,
}

impl Default for GamificationState {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            badges: BTreeSet::new(),
        }
    }
}

impl GamificationState {
    pub fn xp(&self) -> u64 {
        self.xp
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn badges(&self) -> &BTreeSet<BadgeId> {
        &self.badges
    }

    /// Recompute `level` and drop badge ids that are not valid.
    pub(crate) fn normalized(mut self) -> Self {
        self.level = level_for_xp(self.xp);
        self.badges = std::mem::take(&mut self.badges)
            .into_iter()
            .filter_map(|badge| BadgeId::new(badge.as_str()).ok())
            .collect();
        self
    }

    /// Add `points` and rederive the level.
    pub(crate) fn credit(&mut self, points: u64) {
        self.xp = self.xp.saturating_add(points);
        self.level = level_for_xp(self.xp);
    }

    /// Insert `badge`, returning whether it was new.
    pub(crate) fn insert_badge(&mut self, badge: BadgeId) -> bool {
        self.badges.insert(badge)
    }
}

/// Accepts any JSON number or `null`. Whole numbers are taken exactly;
/// fractions are floored, negatives and `null` become 0.
fn lenient_count<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64> + Bounded,
{
    let whole = match Option::<serde_json::Number>::deserialize(deserializer)? {
        None => 0,
        Some(n) => match n.as_u64() {
            Some(exact) => exact,
            None => match n.as_f64() {
                Some(raw) if raw.is_finite() && raw > 0.0 => raw.floor() as u64,
                _ => 0,
            },
        },
    };
    Ok(T::try_from(whole).unwrap_or(T::MAX))
}

trait Bounded {
    const MAX: Self;
}

impl Bounded for u64 {
    const MAX: Self = u64::MAX;
}

impl Bounded for u32 {
    const MAX: Self = u32::MAX;
}
