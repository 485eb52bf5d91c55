// Stat normalization: range scaling, outlier multipliers, and damped per-30
// minute adjustment with competition-level scaling.

use serde::Serialize;

use crate::config::{OutlierConfig, PositionAverages, ScoringConfig, StatRanges};
use crate::stats::{PlayerProfile, StatKey};

// ---------------------------------------------------------------------------
// Range normalization
// ---------------------------------------------------------------------------

/// Map a raw stat onto [0, 1] using its configured span. Values outside the
/// span clamp to the nearest bound; a zero-width span maps everything to 0.5.
pub fn range_normalize(value: f64, key: StatKey, ranges: &StatRanges) -> f64 {
    let (low, high) = ranges.span(key);
    if high == low {
        return 0.5;
    }
    ((value - low) / (high - low)).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Outlier multipliers
// ---------------------------------------------------------------------------

/// Weight multiplier for a stat that is unusual relative to the positional
/// average. A zero average yields 1.0.
pub fn outlier_multiplier(value: f64, average: f64, config: &OutlierConfig) -> f64 {
    if average == 0.0 {
        return 1.0;
    }
    let ratio = value / average;
    if ratio > config.extreme_ratio {
        config.extreme_multiplier
    } else if ratio > config.high_ratio {
        config.high_multiplier
    } else if ratio < config.low_ratio {
        config.low_multiplier
    } else {
        1.0
    }
}

// ---------------------------------------------------------------------------
// Per-30 adjustment
// ---------------------------------------------------------------------------

/// Damped per-30-minute scaling factor for a minutes-per-game figure.
///
/// The linear factor `baseline / mpg` is only partly applied, and players
/// under the low-minutes threshold are shrunk further toward zero so a
/// 12-minute reserve's per-30 line does not look like a starter's.
pub fn per30_factor(mpg: f64, config: &ScoringConfig) -> f64 {
    let per30 = &config.similarity.per30;
    let mpg = if mpg > 0.0 { mpg } else { per30.baseline_minutes };
    let linear = per30.baseline_minutes / mpg;
    let mut damped = 1.0 + (linear - 1.0) * per30.damping;
    if mpg < per30.low_minutes {
        let shrink = per30.low_minutes_floor
            + (1.0 - per30.low_minutes_floor) * (mpg / per30.low_minutes);
        damped *= shrink;
    }
    damped
}

/// Counting stats after per-30 scaling. The competition-level modifier
/// scales scoring only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Per30Line {
    pub ppg: f64,
    pub rpg: f64,
    pub apg: f64,
    pub spg: f64,
    pub bpg: f64,
    pub tpg: f64,
    pub factor: f64,
    pub level_modifier: f64,
}

impl Per30Line {
    pub fn for_profile(profile: &PlayerProfile, config: &ScoringConfig) -> Per30Line {
        let s = &profile.stats;
        let factor = per30_factor(s.minutes(), config);
        let level_modifier = config.levels.modifier(profile.competition_level);
        Per30Line {
            ppg: s.ppg * factor * level_modifier,
            rpg: s.rpg * factor,
            apg: s.apg * factor,
            spg: s.spg * factor,
            bpg: s.bpg * factor,
            tpg: s.tpg * factor,
            factor,
            level_modifier,
        }
    }

    /// Adjusted value for one of the per-30 counting keys.
    pub fn get(&self, key: StatKey) -> Option<f64> {
        match key {
            StatKey::Ppg => Some(self.ppg),
            StatKey::Rpg => Some(self.rpg),
            StatKey::Apg => Some(self.apg),
            StatKey::Spg => Some(self.spg),
            StatKey::Bpg => Some(self.bpg),
            StatKey::Tpg => Some(self.tpg),
            _ => None,
        }
    }

    /// Steals + blocks.
    pub fn stocks(&self) -> f64 {
        self.spg + self.bpg
    }
}

/// Identity multipliers: how strongly each of a prospect's unusual stats
/// is up-weighted against its positional average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IdentityMultipliers {
    pub ppg: f64,
    pub rpg: f64,
    pub apg: f64,
    pub spg: f64,
    pub bpg: f64,
    pub three_pct: f64,
    pub ft: f64,
    pub ato: f64,
    pub fg: f64,
}

impl IdentityMultipliers {
    pub fn compute(
        profile: &PlayerProfile,
        line: &Per30Line,
        averages: &PositionAverages,
        config: &OutlierConfig,
    ) -> IdentityMultipliers {
        let s = &profile.stats;
        IdentityMultipliers {
            ppg: outlier_multiplier(line.ppg, averages.ppg, config),
            rpg: outlier_multiplier(line.rpg, averages.rpg, config),
            apg: outlier_multiplier(line.apg, averages.apg, config),
            spg: outlier_multiplier(line.spg, averages.spg, config),
            bpg: outlier_multiplier(line.bpg, averages.bpg, config),
            three_pct: outlier_multiplier(s.three_or_neutral(), averages.three_pct, config),
            ft: outlier_multiplier(s.ft_or_neutral(), averages.ft, config),
            ato: outlier_multiplier(s.ato(), averages.ato, config),
            fg: outlier_multiplier(s.fg_or_neutral(), averages.fg, config),
        }
    }

    /// Multiplier for a stat key; keys without an identity check get 1.0.
    pub fn get(&self, key: StatKey) -> f64 {
        match key {
            StatKey::Ppg => self.ppg,
            StatKey::Rpg => self.rpg,
            StatKey::Apg => self.apg,
            StatKey::Spg => self.spg,
            StatKey::Bpg => self.bpg,
            StatKey::ThreePct => self.three_pct,
            StatKey::Ft => self.ft,
            StatKey::Ato => self.ato,
            StatKey::Fg => self.fg,
            _ => 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{CompetitionLevel, Position};

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn range_normalize_clamps_and_scales() {
        let ranges = StatRanges::default();
        assert!(approx_eq(range_normalize(78.0, StatKey::Height, &ranges), 0.5, 1e-9));
        assert_eq!(range_normalize(90.0, StatKey::Height, &ranges), 1.0);
        assert_eq!(range_normalize(60.0, StatKey::Height, &ranges), 0.0);
        assert!(approx_eq(range_normalize(5.0, StatKey::Bpm, &ranges), 0.5, 1e-9));
    }

    #[test]
    fn range_normalize_zero_width_span_is_midpoint() {
        let mut ranges = StatRanges::default();
        ranges.curated.insert(StatKey::Ppg, (10.0, 10.0));
        assert_eq!(range_normalize(3.0, StatKey::Ppg, &ranges), 0.5);
    }

    #[test]
    fn range_normalize_uses_known_max_fallback() {
        let ranges = StatRanges::default();
        assert!(approx_eq(range_normalize(2.5, StatKey::RimMade, &ranges), 0.5, 1e-9));
        assert_eq!(range_normalize(12.0, StatKey::Tpa, &ranges), 1.0);
    }

    #[test]
    fn outlier_bands() {
        let cfg = OutlierConfig::default();
        assert_eq!(outlier_multiplier(21.0, 14.0, &cfg), 3.0); // 1.5x
        assert_eq!(outlier_multiplier(18.0, 14.0, &cfg), 1.5); // ~1.29x
        assert_eq!(outlier_multiplier(14.0, 14.0, &cfg), 1.0);
        assert_eq!(outlier_multiplier(7.0, 14.0, &cfg), 1.5); // 0.5x
        assert_eq!(outlier_multiplier(7.0, 0.0, &cfg), 1.0);
    }

    #[test]
    fn outlier_band_edges_are_exclusive() {
        let cfg = OutlierConfig::default();
        assert_eq!(outlier_multiplier(14.0, 10.0, &cfg), 1.5); // exactly 1.4
        assert_eq!(outlier_multiplier(12.0, 10.0, &cfg), 1.0); // exactly 1.2
        assert_eq!(outlier_multiplier(7.0, 10.0, &cfg), 1.0); // exactly 0.7
    }

    #[test]
    fn per30_factor_is_neutral_at_baseline() {
        let cfg = ScoringConfig::default();
        assert!(approx_eq(per30_factor(30.0, &cfg), 1.0, 1e-12));
        // 35 minutes: 1 + (30/35 - 1) * 0.7
        assert!(approx_eq(per30_factor(35.0, &cfg), 0.9, 1e-9));
    }

    #[test]
    fn per30_factor_shrinks_low_minutes() {
        let cfg = ScoringConfig::default();
        // 15 minutes: linear 2.0, damped 1.7, shrink 0.88 + 0.12 * 15/22
        let expected = 1.7 * (0.88 + 0.12 * 15.0 / 22.0);
        assert!(approx_eq(per30_factor(15.0, &cfg), expected, 1e-9));
        assert!(per30_factor(15.0, &cfg) < 2.0);
    }

    #[test]
    fn per30_line_applies_level_to_scoring_only() {
        let cfg = ScoringConfig::default();
        let mut p = PlayerProfile::new("Mid", Position::Guard, 75.0);
        p.competition_level = CompetitionLevel::MidMajor;
        p.stats.ppg = 20.0;
        p.stats.rpg = 4.0;
        p.stats.mpg = Some(30.0);
        let line = Per30Line::for_profile(&p, &cfg);
        assert!(approx_eq(line.ppg, 17.0, 1e-9));
        assert!(approx_eq(line.rpg, 4.0, 1e-9));
        assert_eq!(line.level_modifier, 0.85);
    }

    #[test]
    fn identity_multipliers_flag_outliers() {
        let cfg = ScoringConfig::default();
        let mut p = PlayerProfile::new("Passer", Position::Big, 83.0);
        p.stats.mpg = Some(30.0);
        p.stats.apg = 4.0;
        p.stats.rpg = 8.5;
        let line = Per30Line::for_profile(&p, &cfg);
        let mult = IdentityMultipliers::compute(
            &p,
            &line,
            cfg.positional_averages.for_position(Position::Big),
            &cfg.similarity.outlier,
        );
        assert_eq!(mult.apg, 3.0);
        assert_eq!(mult.rpg, 1.0);
        assert_eq!(mult.get(StatKey::Bpm), 1.0);
    }
}
