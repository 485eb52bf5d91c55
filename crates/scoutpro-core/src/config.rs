// Scoring configuration: weight tables, stat ranges, thresholds, and tier
// cut points bundled into one immutable value passed to every scoring call.
//
// `ScoringConfig::default()` is the V3 profile. Every section carries
// `#[serde(default)]`, so a profile file only states what it changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::archetype::Archetype;
use crate::stats::{CompetitionLevel, Position, StatKey, Tier};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

/// Per-stat multiplier table. Missing entries mean "no change" for modifiers
/// and "not weighted" for base weights.
pub type WeightTable = BTreeMap<StatKey, f64>;

// ---------------------------------------------------------------------------
// Top-level assembled config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Profile name ("v2", "v3", ...), for reporting only.
    pub name: String,
    pub ranges: StatRanges,
    /// Base similarity weights.
    pub weights: WeightTable,
    pub archetype_mods: ArchetypeWeightMods,
    pub levels: LevelModifiers,
    pub positional_averages: PositionalAverages,
    pub similarity: SimilarityConfig,
    pub penalties: PenaltyConfig,
    pub tier: TierConfig,
    pub pool: PoolConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            name: "v3".into(),
            ranges: StatRanges::default(),
            weights: v3_weights(),
            archetype_mods: ArchetypeWeightMods::default(),
            levels: LevelModifiers::default(),
            positional_averages: PositionalAverages::default(),
            similarity: SimilarityConfig::default(),
            penalties: PenaltyConfig::default(),
            tier: TierConfig::default(),
            pool: PoolConfig::default(),
        }
    }
}

impl ScoringConfig {
    /// Base weight for a stat; unlisted stats carry no weight.
    pub fn weight(&self, key: StatKey) -> f64 {
        self.weights.get(&key).copied().unwrap_or(0.0)
    }

    /// Same config with positional averages replaced (e.g. by averages the
    /// caller computed from its own player database).
    pub fn with_positional_averages(mut self, averages: PositionalAverages) -> Self {
        self.positional_averages = averages;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, range) in &self.ranges.curated {
            if !(range.0.is_finite() && range.1.is_finite()) || range.1 < range.0 {
                return Err(invalid(
                    format!("ranges.curated.{key}"),
                    format!("low must be <= high and finite, got ({}, {})", range.0, range.1),
                ));
            }
        }
        for (key, max) in &self.ranges.known_max {
            if *max < 0.0 {
                return Err(invalid(
                    format!("ranges.known_max.{key}"),
                    format!("must be >= 0, got {max}"),
                ));
            }
        }

        for (key, w) in &self.weights {
            if !w.is_finite() || *w < 0.0 {
                return Err(invalid(format!("weights.{key}"), format!("must be >= 0, got {w}")));
            }
        }

        for archetype in Archetype::ALL {
            for (key, m) in self.archetype_mods.for_archetype(archetype) {
                if !m.is_finite() || *m < 0.0 {
                    return Err(invalid(
                        format!("archetype_mods.{}.{key}", archetype.config_key()),
                        format!("must be >= 0, got {m}"),
                    ));
                }
            }
        }

        let levels = &self.levels;
        for (name, val) in [
            ("levels.high_major", levels.high_major),
            ("levels.mid_major", levels.mid_major),
            ("levels.low_major", levels.low_major),
            ("levels.unknown", levels.unknown),
        ] {
            if !(0.0..=2.0).contains(&val) {
                return Err(invalid(name, format!("must be between 0.0 and 2.0, got {val}")));
            }
        }

        if self.similarity.max_distance <= 0.0 {
            return Err(invalid(
                "similarity.max_distance",
                format!("must be > 0, got {}", self.similarity.max_distance),
            ));
        }
        if self.similarity.per30.baseline_minutes <= 0.0 {
            return Err(invalid(
                "similarity.per30.baseline_minutes",
                "must be > 0",
            ));
        }

        if self.penalties.cap < 0.0 {
            return Err(invalid(
                "penalties.cap",
                format!("must be >= 0, got {}", self.penalties.cap),
            ));
        }

        let t = &self.tier;
        let staircases: [(&str, &Staircase); 11] = [
            ("tier.bpm", &t.bpm),
            ("tier.obpm", &t.obpm),
            ("tier.dbpm", &t.dbpm),
            ("tier.fta", &t.fta),
            ("tier.steal_rate", &t.steal_rate),
            ("tier.steals_per_game", &t.steals_per_game),
            ("tier.usage", &t.usage),
            ("tier.free_throw", &t.free_throw),
            ("tier.scoring", &t.scoring),
            ("tier.star_bonus", &t.star_bonus),
            ("tier.fallback.scoring", &t.fallback.scoring),
        ];
        for (name, stair) in staircases {
            stair.validate(name)?;
        }

        let cuts = &t.cut_points;
        let floors = [cuts.superstar, cuts.all_star, cuts.starter, cuts.role_player];
        if floors.windows(2).any(|w| w[0] <= w[1]) {
            return Err(invalid(
                "tier.cut_points",
                format!("must be strictly descending, got {floors:?}"),
            ));
        }

        if self.pool.min_comp_similarity < 0.0 || self.pool.min_comp_similarity > 100.0 {
            return Err(invalid(
                "pool.min_comp_similarity",
                format!("must be between 0 and 100, got {}", self.pool.min_comp_similarity),
            ));
        }
        if let Some(window) = &self.pool.draft_years {
            if window.first > window.last {
                return Err(invalid(
                    "pool.draft_years",
                    format!("first ({}) must be <= last ({})", window.first, window.last),
                ));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Stat ranges
// ---------------------------------------------------------------------------

/// Normalization spans. `curated` holds physically meaningful (low, high)
/// ranges; `known_max` is the (0, max) fallback for everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatRanges {
    pub curated: BTreeMap<StatKey, (f64, f64)>,
    pub known_max: BTreeMap<StatKey, f64>,
}

impl StatRanges {
    /// The (low, high) span used for a stat.
    pub fn span(&self, key: StatKey) -> (f64, f64) {
        if let Some(&range) = self.curated.get(&key) {
            return range;
        }
        (0.0, self.known_max.get(&key).copied().unwrap_or(1.0))
    }
}

impl Default for StatRanges {
    fn default() -> Self {
        use StatKey::*;
        let curated = BTreeMap::from([
            (Height, (70.0, 86.0)),
            (Weight, (160.0, 280.0)),
            (Wingspan, (70.0, 96.0)),
            (Ft, (40.0, 95.0)),
            (Fg, (35.0, 65.0)),
            (ThreePct, (0.0, 50.0)),
            (Bpm, (-5.0, 15.0)),
            (Obpm, (-5.0, 12.0)),
            (Dbpm, (-3.0, 8.0)),
            (Usg, (12.0, 40.0)),
            (Ppg, (0.0, 30.0)),
            (Rpg, (0.0, 15.0)),
            (Apg, (0.0, 11.0)),
            (Spg, (0.0, 3.5)),
            (Bpg, (0.0, 5.0)),
            (Tpg, (0.0, 5.0)),
            (Mpg, (15.0, 40.0)),
            (Ato, (0.0, 4.0)),
            (ClassYear, (1.0, 4.0)),
            (Fta, (0.0, 10.0)),
            (StlPer, (0.0, 5.0)),
            (RimAtt, (0.0, 8.0)),
        ]);
        let known_max = BTreeMap::from([(RimMade, 5.0), (Tpa, 10.0)]);
        StatRanges { curated, known_max }
    }
}

// ---------------------------------------------------------------------------
// Weight tables
// ---------------------------------------------------------------------------

/// V3 base weights, retuned on the clean 2009-2019 draft set.
pub fn v3_weights() -> WeightTable {
    use StatKey::*;
    BTreeMap::from([
        (Bpm, 5.0),
        (Fg, 3.2),
        (Fta, 3.0),
        (Obpm, 2.72),
        (Dbpm, 2.66),
        (Usg, 2.61),
        (Height, 2.5),
        (ClassYear, 2.13),
        (Ft, 3.5),
        (Ppg, 1.0),
        (Rpg, 1.0),
        (Mpg, 1.0),
        (Bpg, 0.83),
        (StlPer, 0.76),
        (Spg, 0.63),
        (Ato, 0.5),
        (ThreePct, 0.3),
        (Apg, 0.17),
        (Weight, 0.0),
        (Wingspan, 0.0),
    ])
}

/// Per-archetype multipliers over the base weights. One table per
/// archetype; lookups are an exhaustive match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeWeightMods {
    pub scoring_guard: WeightTable,
    pub playmaking_guard: WeightTable,
    pub three_and_d_wing: WeightTable,
    pub scoring_wing: WeightTable,
    pub skilled_big: WeightTable,
    pub athletic_big: WeightTable,
}

impl ArchetypeWeightMods {
    pub fn for_archetype(&self, archetype: Archetype) -> &WeightTable {
        match archetype {
            Archetype::ScoringGuard => &self.scoring_guard,
            Archetype::PlaymakingGuard => &self.playmaking_guard,
            Archetype::ThreeAndDWing => &self.three_and_d_wing,
            Archetype::ScoringWing => &self.scoring_wing,
            Archetype::SkilledBig => &self.skilled_big,
            Archetype::AthleticBig => &self.athletic_big,
        }
    }

    /// All-neutral tables (every archetype uses the base weights unchanged).
    pub fn neutral() -> Self {
        ArchetypeWeightMods {
            scoring_guard: WeightTable::new(),
            playmaking_guard: WeightTable::new(),
            three_and_d_wing: WeightTable::new(),
            scoring_wing: WeightTable::new(),
            skilled_big: WeightTable::new(),
            athletic_big: WeightTable::new(),
        }
    }
}

impl Default for ArchetypeWeightMods {
    fn default() -> Self {
        use StatKey::*;
        ArchetypeWeightMods {
            scoring_guard: BTreeMap::from([
                (Usg, 1.3),
                (Fta, 1.3),
                (Obpm, 1.2),
                (Rpg, 0.5),
                (Bpg, 0.3),
            ]),
            playmaking_guard: BTreeMap::from([
                (Apg, 1.5),
                (Ato, 1.5),
                (StlPer, 1.3),
                (Ppg, 0.5),
            ]),
            three_and_d_wing: BTreeMap::from([
                (ThreePct, 1.5),
                (Spg, 1.3),
                (Dbpm, 1.3),
                (Ppg, 0.5),
                (Usg, 0.7),
                (Fta, 0.7),
            ]),
            scoring_wing: BTreeMap::from([
                (Height, 1.3),
                (Usg, 1.2),
                (Fta, 1.2),
                (Apg, 0.5),
                (ThreePct, 0.7),
            ]),
            skilled_big: BTreeMap::from([
                (Ft, 1.3),
                (Obpm, 1.3),
                (Fg, 1.2),
                (Apg, 0.5),
                (Spg, 0.7),
            ]),
            athletic_big: BTreeMap::from([
                (Dbpm, 1.5),
                (Bpg, 2.0),
                (Ft, 0.5),
                (ThreePct, 0.3),
                (Obpm, 0.7),
            ]),
        }
    }
}

// ---------------------------------------------------------------------------
// Competition level modifiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelModifiers {
    pub high_major: f64,
    pub mid_major: f64,
    pub low_major: f64,
    pub unknown: f64,
}

impl LevelModifiers {
    pub fn modifier(&self, level: CompetitionLevel) -> f64 {
        match level {
            CompetitionLevel::HighMajor => self.high_major,
            CompetitionLevel::MidMajor => self.mid_major,
            CompetitionLevel::LowMajor => self.low_major,
            CompetitionLevel::Unknown => self.unknown,
        }
    }
}

impl Default for LevelModifiers {
    fn default() -> Self {
        LevelModifiers {
            high_major: 1.0,
            mid_major: 0.85,
            low_major: 0.70,
            unknown: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Positional averages
// ---------------------------------------------------------------------------

/// Average stat line for one position, the baseline for outlier detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionAverages {
    pub ppg: f64,
    pub rpg: f64,
    pub apg: f64,
    pub spg: f64,
    pub bpg: f64,
    pub fg: f64,
    #[serde(alias = "threeP")]
    pub three_pct: f64,
    pub ft: f64,
    pub tpg: f64,
    pub ato: f64,
}

impl Default for PositionAverages {
    fn default() -> Self {
        PositionalAverages::default().wing
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionalAverages {
    #[serde(alias = "G")]
    pub guard: PositionAverages,
    #[serde(alias = "W")]
    pub wing: PositionAverages,
    #[serde(alias = "B")]
    pub big: PositionAverages,
}

impl PositionalAverages {
    pub fn for_position(&self, position: Position) -> &PositionAverages {
        match position {
            Position::Guard => &self.guard,
            Position::Wing => &self.wing,
            Position::Big => &self.big,
        }
    }

    pub fn for_position_mut(&mut self, position: Position) -> &mut PositionAverages {
        match position {
            Position::Guard => &mut self.guard,
            Position::Wing => &mut self.wing,
            Position::Big => &mut self.big,
        }
    }
}

impl Default for PositionalAverages {
    fn default() -> Self {
        PositionalAverages {
            guard: PositionAverages {
                ppg: 13.0,
                rpg: 3.5,
                apg: 3.5,
                spg: 1.2,
                bpg: 0.2,
                fg: 43.0,
                three_pct: 34.0,
                ft: 75.0,
                tpg: 2.2,
                ato: 1.6,
            },
            wing: PositionAverages {
                ppg: 14.0,
                rpg: 5.5,
                apg: 2.0,
                spg: 1.0,
                bpg: 0.6,
                fg: 46.0,
                three_pct: 35.0,
                ft: 72.0,
                tpg: 1.8,
                ato: 1.1,
            },
            big: PositionAverages {
                ppg: 12.0,
                rpg: 8.5,
                apg: 1.2,
                spg: 0.6,
                bpg: 1.5,
                fg: 55.0,
                three_pct: 25.0,
                ft: 65.0,
                tpg: 1.8,
                ato: 0.7,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Similarity engine settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Root-sum distance that maps to 0% similarity.
    pub max_distance: f64,
    /// Normalized value substituted when the candidate lacks a stat the
    /// prospect has.
    pub missing_midpoint: f64,
    /// Weight factor applied to midpoint-substituted terms.
    pub missing_weight_factor: f64,
    pub per30: Per30Config,
    pub outlier: OutlierConfig,
    pub defensive_specialist: DefensiveSpecialist,
    /// Wingspan weight boost for long-armed prospects (V2 only).
    pub wingspan_boost: Option<WingspanBoost>,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        SimilarityConfig {
            max_distance: 6.0,
            missing_midpoint: 0.5,
            missing_weight_factor: 0.5,
            per30: Per30Config::default(),
            outlier: OutlierConfig::default(),
            defensive_specialist: DefensiveSpecialist::default(),
            wingspan_boost: None,
        }
    }
}

/// Damped per-30-minute scaling for counting stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Per30Config {
    pub baseline_minutes: f64,
    /// Fraction of the linear correction actually applied.
    pub damping: f64,
    /// Below this many minutes the factor is shrunk further.
    pub low_minutes: f64,
    /// Shrink factor at zero minutes; rises linearly to 1.0 at `low_minutes`.
    pub low_minutes_floor: f64,
}

impl Default for Per30Config {
    fn default() -> Self {
        Per30Config {
            baseline_minutes: 30.0,
            damping: 0.7,
            low_minutes: 22.0,
            low_minutes_floor: 0.88,
        }
    }
}

/// Ratio bands (value / positional average) that up-weight unusual stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierConfig {
    pub extreme_ratio: f64,
    pub extreme_multiplier: f64,
    pub high_ratio: f64,
    pub high_multiplier: f64,
    pub low_ratio: f64,
    pub low_multiplier: f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        OutlierConfig {
            extreme_ratio: 1.4,
            extreme_multiplier: 3.0,
            high_ratio: 1.2,
            high_multiplier: 1.5,
            low_ratio: 0.7,
            low_multiplier: 1.5,
        }
    }
}

/// Scoring-weight override for high-stocks, low-scoring prospects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefensiveSpecialist {
    /// Minimum per-30 steals + blocks.
    pub min_stocks: f64,
    /// Maximum adjusted per-30 scoring.
    pub max_ppg: f64,
    /// Scoring weight used when the override applies.
    pub ppg_weight: f64,
}

impl Default for DefensiveSpecialist {
    fn default() -> Self {
        DefensiveSpecialist {
            min_stocks: 2.5,
            max_ppg: 10.0,
            ppg_weight: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WingspanBoost {
    pub min_ratio: f64,
    pub multiplier: f64,
}

// ---------------------------------------------------------------------------
// Comparison penalties
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyConfig {
    /// Maximum total deduction, in percentage points.
    pub cap: f64,
    pub position: PositionGapPenalty,
    pub chucker: ChuckerPenalty,
    pub broken_shot: BrokenShotPenalty,
    pub usage_gap: UsageGapPenalty,
    pub height: HeightPenalty,
    pub low_volume_efficiency: LowVolumeEfficiencyPenalty,
    pub shooting_archetype: ShootingArchetypePenalty,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        PenaltyConfig {
            cap: 25.0,
            position: PositionGapPenalty::default(),
            chucker: ChuckerPenalty::default(),
            broken_shot: BrokenShotPenalty::default(),
            usage_gap: UsageGapPenalty::default(),
            height: HeightPenalty::default(),
            low_volume_efficiency: LowVolumeEfficiencyPenalty::default(),
            shooting_archetype: ShootingArchetypePenalty::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionGapPenalty {
    /// One step apart (G-W or W-B).
    pub adjacent: f64,
    /// Two steps apart (G-B).
    pub far: f64,
    /// A big passing above this (per 30) may be compared to guards and wings.
    pub passing_big_min_apg: f64,
    /// A guard rebounding above this (per 30) may be compared to wings and bigs.
    pub rebounding_guard_min_rpg: f64,
}

impl Default for PositionGapPenalty {
    fn default() -> Self {
        PositionGapPenalty {
            adjacent: 5.0,
            far: 15.0,
            passing_big_min_apg: 4.0,
            rebounding_guard_min_rpg: 7.0,
        }
    }
}

/// High-volume inefficient prospect against an efficient comp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChuckerPenalty {
    pub min_ppg: f64,
    pub max_fg: f64,
    pub comp_min_fg: f64,
    pub points: f64,
}

impl Default for ChuckerPenalty {
    fn default() -> Self {
        ChuckerPenalty {
            min_ppg: 18.0,
            max_fg: 42.0,
            comp_min_fg: 48.0,
            points: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokenShotPenalty {
    pub max_ft: f64,
    pub comp_min_ft: f64,
    pub points: f64,
}

impl Default for BrokenShotPenalty {
    fn default() -> Self {
        BrokenShotPenalty {
            max_ft: 55.0,
            comp_min_ft: 72.0,
            points: 8.0,
        }
    }
}

/// Low-usage prospect against a go-to scorer; usage here is per-30
/// points + assists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageGapPenalty {
    pub max_usage: f64,
    pub comp_min_usage: f64,
    pub points: f64,
}

impl Default for UsageGapPenalty {
    fn default() -> Self {
        UsageGapPenalty {
            max_usage: 12.0,
            comp_min_usage: 25.0,
            points: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightPenalty {
    /// Gaps strictly larger than this many inches are penalized.
    pub max_gap: f64,
    pub points: f64,
}

impl Default for HeightPenalty {
    fn default() -> Self {
        HeightPenalty {
            max_gap: 4.0,
            points: 10.0,
        }
    }
}

/// Efficient low-volume prospect against an efficient high-volume comp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowVolumeEfficiencyPenalty {
    pub min_fg: f64,
    pub max_ppg: f64,
    pub comp_min_ppg: f64,
    pub points: f64,
}

impl Default for LowVolumeEfficiencyPenalty {
    fn default() -> Self {
        LowVolumeEfficiencyPenalty {
            min_fg: 50.0,
            max_ppg: 10.0,
            comp_min_ppg: 18.0,
            points: 5.0,
        }
    }
}

/// Sniper vs. non-shooter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootingArchetypePenalty {
    pub sniper_above: f64,
    /// Comp three-point% below this counts as a non-shooter.
    pub comp_non_shooter_below: f64,
    /// Prospect three-point% below this counts as a non-shooter.
    pub non_shooter_below: f64,
    pub points: f64,
}

impl Default for ShootingArchetypePenalty {
    fn default() -> Self {
        ShootingArchetypePenalty {
            sniper_above: 40.0,
            comp_non_shooter_below: 28.0,
            non_shooter_below: 25.0,
            points: 5.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tier projection rules
// ---------------------------------------------------------------------------

/// One rung of a staircase: values at or above `min` earn `points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub min: f64,
    pub points: f64,
    /// Reason text emitted when this rung fires; silent when absent.
    #[serde(default)]
    pub label: Option<String>,
}

impl Step {
    pub fn new(min: f64, points: f64) -> Self {
        Step {
            min,
            points,
            label: None,
        }
    }

    pub fn labeled(min: f64, points: f64, label: &str) -> Self {
        Step {
            min,
            points,
            label: Some(label.to_string()),
        }
    }
}

/// Bucketed thresholds, highest first. The first rung whose `min` the value
/// reaches wins; below every rung scores nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Staircase {
    pub steps: Vec<Step>,
}

impl Staircase {
    pub fn new(steps: Vec<Step>) -> Self {
        Staircase { steps }
    }

    pub fn lookup(&self, value: f64) -> Option<&Step> {
        self.steps.iter().find(|s| value >= s.min)
    }

    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        if self.steps.windows(2).any(|w| w[0].min <= w[1].min) {
            return Err(invalid(field, "steps must be ordered by strictly descending `min`"));
        }
        if self.steps.iter().any(|s| s.min.is_nan() || !s.points.is_finite()) {
            return Err(invalid(field, "steps must have numeric `min` and finite `points`"));
        }
        Ok(())
    }
}

/// Discount for a known draft slot: picks at or before `max_pick` (and after
/// the previous bracket) earn `points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickBracket {
    pub max_pick: u16,
    pub points: f64,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionWeights {
    pub guard: f64,
    pub wing: f64,
    pub big: f64,
}

impl PositionWeights {
    pub fn for_position(&self, position: Position) -> f64 {
        match position {
            Position::Guard => self.guard,
            Position::Wing => self.wing,
            Position::Big => self.big,
        }
    }
}

impl Default for PositionWeights {
    fn default() -> Self {
        PositionWeights {
            guard: 1.0,
            wing: 1.0,
            big: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReboundingRule {
    pub guard_min: f64,
    pub guard_points: f64,
    pub frontcourt_min: f64,
    pub frontcourt_points: f64,
    pub baseline_min: f64,
    pub baseline_points: f64,
}

impl Default for ReboundingRule {
    fn default() -> Self {
        ReboundingRule {
            guard_min: 6.0,
            guard_points: 4.0,
            frontcourt_min: 9.0,
            frontcourt_points: 4.0,
            baseline_min: 5.0,
            baseline_points: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EfficiencyRule {
    pub min_fg: f64,
    pub min_ppg: f64,
    pub points: f64,
}

impl Default for EfficiencyRule {
    fn default() -> Self {
        EfficiencyRule {
            min_fg: 52.0,
            min_ppg: 15.0,
            points: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelPenalty {
    pub mid_major: f64,
    pub low_major: f64,
}

impl LevelPenalty {
    pub fn points(&self, level: CompetitionLevel) -> f64 {
        match level {
            CompetitionLevel::MidMajor => self.mid_major,
            CompetitionLevel::LowMajor => self.low_major,
            CompetitionLevel::HighMajor | CompetitionLevel::Unknown => 0.0,
        }
    }
}

impl Default for LevelPenalty {
    fn default() -> Self {
        LevelPenalty {
            mid_major: -5.0,
            low_major: -10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinutesRule {
    /// Playing strictly fewer minutes than this is penalized.
    pub low_below: f64,
    pub low_points: f64,
    /// An early pick playing fewer minutes than this earns a bonus.
    pub early_pick_below: f64,
    pub early_pick_max: u16,
    pub early_pick_points: f64,
}

impl Default for MinutesRule {
    fn default() -> Self {
        MinutesRule {
            low_below: 22.0,
            low_points: -5.0,
            early_pick_below: 25.0,
            early_pick_max: 14,
            early_pick_points: 8.0,
        }
    }
}

/// Proxy scoring for box-score-only profiles, plus the hard cap applied when
/// no proxy signal fires either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedFallback {
    /// Adjusted scoring rungs; each carries its minimum free-throw% in
    /// `ft_floors` at the same index.
    pub scoring: Staircase,
    pub ft_floors: Vec<f64>,
    pub steals_min: f64,
    pub steals_points: f64,
    pub cap: f64,
}

impl Default for AdvancedFallback {
    fn default() -> Self {
        AdvancedFallback {
            scoring: Staircase::new(vec![
                Step::labeled(20.0, 12.0, "Proxy: elite scorer + good FT"),
                Step::labeled(16.0, 6.0, "Proxy: strong scorer + decent FT"),
            ]),
            ft_floors: vec![78.0, 75.0],
            steals_min: 1.8,
            steals_points: 4.0,
            cap: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassYearPoints {
    pub freshman: f64,
    pub sophomore: f64,
    pub junior: f64,
    pub senior: f64,
}

impl Default for ClassYearPoints {
    fn default() -> Self {
        ClassYearPoints {
            freshman: 5.0,
            sophomore: 2.0,
            junior: 0.0,
            senior: -4.0,
        }
    }
}

/// Score floors for tiers 1-4 (anything lower is tier 5) and the base
/// confidence for each tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierCutPoints {
    pub superstar: f64,
    pub all_star: f64,
    pub starter: f64,
    pub role_player: f64,
    /// Base confidence for tiers 1..5, in order.
    pub base_confidence: [f64; 5],
    pub max_confidence: f64,
}

impl TierCutPoints {
    /// Floor score for a tier; tier 5 has none.
    pub fn floor(&self, tier: Tier) -> Option<f64> {
        match tier {
            Tier::Superstar => Some(self.superstar),
            Tier::AllStar => Some(self.all_star),
            Tier::Starter => Some(self.starter),
            Tier::RolePlayer => Some(self.role_player),
            Tier::Bust => None,
        }
    }
}

impl Default for TierCutPoints {
    fn default() -> Self {
        TierCutPoints {
            superstar: 68.0,
            all_star: 48.0,
            starter: 30.0,
            role_player: 15.0,
            base_confidence: [60.0, 50.0, 40.0, 35.0, 30.0],
            max_confidence: 95.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    pub draft_pick: Vec<PickBracket>,
    /// Competition-adjusted BPM.
    pub bpm: Staircase,
    /// Competition-adjusted OBPM; only positive values are scored.
    pub obpm: Staircase,
    /// DBPM; only positive values are scored.
    pub dbpm: Staircase,
    /// Free-throw attempts per game.
    pub fta: Staircase,
    /// Steal percentage, preferred when present.
    pub steal_rate: Staircase,
    /// Steals per game, used only when steal percentage is absent.
    pub steals_per_game: Staircase,
    pub usage: Staircase,
    /// Free-throw% penalty rungs (penalty only).
    pub free_throw: Staircase,
    pub free_throw_weight: PositionWeights,
    /// Competition-adjusted points per game.
    pub scoring: Staircase,
    pub rebounding: ReboundingRule,
    pub efficient_scoring: EfficiencyRule,
    /// Star-signal thresholds; a signal fires when the raw stat exceeds it.
    pub star_thresholds: BTreeMap<StatKey, f64>,
    /// Bonus by number of star signals.
    pub star_bonus: Staircase,
    pub unicorn_points: f64,
    pub level_penalty: LevelPenalty,
    pub minutes: MinutesRule,
    pub fallback: AdvancedFallback,
    pub class_year: ClassYearPoints,
    pub cut_points: TierCutPoints,
    /// Rule names to skip entirely.
    pub disabled_rules: Vec<String>,
}

impl TierConfig {
    pub fn is_disabled(&self, rule: &str) -> bool {
        self.disabled_rules.iter().any(|r| r == rule)
    }
}

impl Default for TierConfig {
    fn default() -> Self {
        TierConfig {
            draft_pick: vec![
                PickBracket {
                    max_pick: 20,
                    points: 0.0,
                    label: None,
                },
                PickBracket {
                    max_pick: 30,
                    points: -5.0,
                    label: Some("Mid-1st discount".into()),
                },
                PickBracket {
                    max_pick: 45,
                    points: -15.0,
                    label: Some("Late pick discount".into()),
                },
                PickBracket {
                    max_pick: 60,
                    points: -25.0,
                    label: Some("Deep 2nd round discount".into()),
                },
            ],
            bpm: Staircase::new(vec![
                Step::labeled(12.0, 20.0, "Elite adj-BPM"),
                Step::labeled(8.0, 14.0, "Star-level adj-BPM"),
                Step::labeled(5.0, 9.0, "Strong adj-BPM"),
                Step::labeled(3.0, 5.0, "Above-avg adj-BPM"),
                Step::new(0.0, 2.0),
                Step::new(-2.0, -3.0),
                Step::labeled(f64::NEG_INFINITY, -8.0, "Negative adj-BPM, bust signal"),
            ]),
            obpm: Staircase::new(vec![
                Step::labeled(7.0, 16.0, "Elite adj-OBPM"),
                Step::labeled(5.0, 11.0, "Star adj-OBPM"),
                Step::labeled(3.0, 7.0, "Strong adj-OBPM"),
                Step::new(1.0, 3.0),
            ]),
            dbpm: Staircase::new(vec![
                Step::labeled(4.0, 8.0, "Elite DBPM"),
                Step::new(2.5, 4.0),
            ]),
            fta: Staircase::new(vec![
                Step::labeled(7.0, 16.0, "Elite FTA rate"),
                Step::labeled(5.5, 10.0, "High FTA rate"),
                Step::new(4.0, 5.0),
                Step::new(2.5, 2.0),
            ]),
            steal_rate: Staircase::new(vec![
                Step::labeled(2.5, 8.0, "Elite steal rate"),
                Step::new(1.8, 4.0),
            ]),
            steals_per_game: Staircase::new(vec![
                Step::labeled(1.8, 8.0, "Elite steals"),
                Step::new(1.3, 4.0),
            ]),
            usage: Staircase::new(vec![
                Step::labeled(30.0, 8.0, "High usage"),
                Step::new(27.0, 5.0),
                Step::new(24.0, 2.0),
            ]),
            free_throw: Staircase::new(vec![
                Step::new(70.0, 0.0),
                Step::labeled(60.0, -6.0, "Poor FT shooter"),
                Step::labeled(f64::NEG_INFINITY, -12.0, "Broken FT shot"),
            ]),
            free_throw_weight: PositionWeights::default(),
            scoring: Staircase::new(vec![
                Step::labeled(20.0, 8.0, "20+ PPG scorer"),
                Step::new(16.0, 4.0),
                Step::new(12.0, 1.0),
            ]),
            rebounding: ReboundingRule::default(),
            efficient_scoring: EfficiencyRule::default(),
            star_thresholds: BTreeMap::from([
                (StatKey::Bpm, 9.6),
                (StatKey::Obpm, 7.1),
                (StatKey::Fta, 4.6),
                (StatKey::Spg, 1.4),
                (StatKey::StlPer, 2.5),
                (StatKey::Usg, 25.9),
                (StatKey::Ft, 79.9),
            ]),
            star_bonus: Staircase::new(vec![
                Step::labeled(5.0, 12.0, "5+ star signals"),
                Step::labeled(3.0, 6.0, "3+ star signals"),
                Step::new(2.0, 2.0),
            ]),
            unicorn_points: 3.0,
            level_penalty: LevelPenalty::default(),
            minutes: MinutesRule::default(),
            fallback: AdvancedFallback::default(),
            class_year: ClassYearPoints::default(),
            cut_points: TierCutPoints::default(),
            disabled_rules: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Candidate pool
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftYearWindow {
    pub first: u16,
    pub last: u16,
}

impl DraftYearWindow {
    pub fn contains(&self, year: u16) -> bool {
        (self.first..=self.last).contains(&year)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Minimum games played to enter a comp pool.
    pub min_games: f64,
    /// Minimum minutes per game to enter a comp pool.
    pub min_minutes: f64,
    /// Names with known-bad college data.
    pub excluded_players: Vec<String>,
    /// Restrict candidates to these draft years (inclusive).
    pub draft_years: Option<DraftYearWindow>,
    /// Ceiling/floor comps must reach this similarity.
    pub min_comp_similarity: f64,
    /// Anchor used when none is supplied and the pool is empty.
    pub default_anchor_tier: Tier,
    /// Pools larger than this are scored on the rayon thread pool.
    pub parallel_threshold: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            min_games: 25.0,
            min_minutes: 20.0,
            excluded_players: [
                "Joel Embiid",
                "Donovan Mitchell",
                "Larry Johnson",
                "Emeka Okafor",
                "Isaiah Thomas",
                "Steve Smith",
                "Shawn Kemp",
                "Donyell Marshall",
                "Vin Baker",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            draft_years: None,
            min_comp_similarity: 30.0,
            default_anchor_tier: Tier::RolePlayer,
            parallel_threshold: 512,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
