// Star signals and unicorn traits: informational outlier flags that also
// feed the tier score.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::stats::{PlayerProfile, Position, StatKey};

/// Stats whose raw value strictly exceeds its configured threshold.
/// Absent stats never signal.
pub fn star_signals(profile: &PlayerProfile, thresholds: &BTreeMap<StatKey, f64>) -> Vec<StatKey> {
    thresholds
        .iter()
        .filter(|(key, threshold)| profile.stat(**key).is_some_and(|v| v > **threshold))
        .map(|(key, _)| *key)
        .collect()
}

/// Rare cross-position stat profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnicornTrait {
    ReboundingGuard,
    PassingBig,
    StretchBig,
    ShotBlockingWing,
    TallPlaymaker,
    Pickpocket,
    DefensiveUnicorn,
}

impl UnicornTrait {
    pub fn name(self) -> &'static str {
        match self {
            UnicornTrait::ReboundingGuard => "rebounding_guard",
            UnicornTrait::PassingBig => "passing_big",
            UnicornTrait::StretchBig => "stretch_big",
            UnicornTrait::ShotBlockingWing => "shot_blocking_wing",
            UnicornTrait::TallPlaymaker => "tall_playmaker",
            UnicornTrait::Pickpocket => "pickpocket",
            UnicornTrait::DefensiveUnicorn => "defensive_unicorn",
        }
    }
}

impl fmt::Display for UnicornTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detect unicorn traits from raw per-game stats. An absent three-point
/// percentage counts as a non-shooter here.
pub fn unicorn_traits(profile: &PlayerProfile) -> Vec<UnicornTrait> {
    let s = &profile.stats;
    let pos = profile.position;
    let h = profile.height_inches;
    let three = s.three_pct.unwrap_or(0.0);

    let checks = [
        (UnicornTrait::ReboundingGuard, pos == Position::Guard && s.rpg > 7.0),
        (UnicornTrait::PassingBig, pos == Position::Big && s.apg > 3.5),
        (
            UnicornTrait::StretchBig,
            pos == Position::Big && three > 33.0 && s.ppg > 10.0,
        ),
        (
            UnicornTrait::ShotBlockingWing,
            pos != Position::Big && s.bpg > 1.5,
        ),
        (
            UnicornTrait::TallPlaymaker,
            pos == Position::Guard && h > 77.0 && s.apg > 4.0,
        ),
        (
            UnicornTrait::Pickpocket,
            pos == Position::Guard && h < 75.0 && s.spg > 2.0,
        ),
        (
            UnicornTrait::DefensiveUnicorn,
            pos != Position::Guard && s.spg > 1.8,
        ),
    ];

    checks
        .into_iter()
        .filter(|(_, hit)| *hit)
        .map(|(t, _)| t)
        .collect()
}
