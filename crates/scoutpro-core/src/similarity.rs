// Weighted-distance similarity between a prospect and one historical player.
//
// Distance is a root sum of weighted squared differences over range-normalized
// stats; incompatibility penalties are computed separately, capped, and
// subtracted as flat percentage points.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::config::{ScoringConfig, WeightTable};
use crate::normalize::{range_normalize, IdentityMultipliers, Per30Line};
use crate::stats::{PlayerProfile, Position, StatKey};

/// Terms compared on per-30 adjusted values; always present.
const PER30_TERMS: [StatKey; 5] = [
    StatKey::Ppg,
    StatKey::Rpg,
    StatKey::Apg,
    StatKey::Spg,
    StatKey::Bpg,
];

/// Terms that may be absent on either side. ATO and height are always
/// compared on raw values.
const OPTIONAL_TERMS: [StatKey; 13] = [
    StatKey::Fg,
    StatKey::ThreePct,
    StatKey::Ft,
    StatKey::Weight,
    StatKey::Wingspan,
    StatKey::ClassYear,
    StatKey::Mpg,
    StatKey::Bpm,
    StatKey::Obpm,
    StatKey::Dbpm,
    StatKey::StlPer,
    StatKey::Usg,
    StatKey::Fta,
];

/// Stats whose weight is scaled by the prospect's outlier multiplier.
const IDENTITY_TERMS: [StatKey; 9] = [
    StatKey::Ppg,
    StatKey::Rpg,
    StatKey::Apg,
    StatKey::Spg,
    StatKey::Bpg,
    StatKey::Fg,
    StatKey::ThreePct,
    StatKey::Ft,
    StatKey::Ato,
];

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Why two players should not be compared at face value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PenaltyCause {
    PositionGap { steps: u8 },
    Chucker,
    BrokenShot,
    UsageGap,
    HeightMismatch { inches: f64 },
    LowVolumeEfficiency,
    ShootingArchetype,
}

impl fmt::Display for PenaltyCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PenaltyCause::PositionGap { steps } => write!(f, "Position gap ({steps})"),
            PenaltyCause::Chucker => f.write_str("Chucker vs efficient"),
            PenaltyCause::BrokenShot => f.write_str("Broken shot mismatch"),
            PenaltyCause::UsageGap => f.write_str("Usage gap"),
            PenaltyCause::HeightMismatch { inches } => {
                write!(f, "Height mismatch ({inches:.0}\")")
            }
            PenaltyCause::LowVolumeEfficiency => f.write_str("Low-volume efficiency mismatch"),
            PenaltyCause::ShootingArchetype => f.write_str("Shooting archetype mismatch"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Penalty {
    pub cause: PenaltyCause,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityResult {
    /// 0-100, rounded to one decimal.
    pub score: f64,
    /// Total deduction after the cap.
    pub penalty: f64,
    /// Every penalty that fired, uncapped, in evaluation order.
    pub penalties: Vec<Penalty>,
    /// Weighted squared difference per compared stat.
    pub diffs: BTreeMap<StatKey, f64>,
    /// Effective weight per stat after modifiers and overrides.
    pub weights: BTreeMap<StatKey, f64>,
    pub prospect_ato: f64,
    pub candidate_ato: f64,
    pub identity: IdentityMultipliers,
}

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Effective weight vector for a prospect: base weights, times archetype
/// modifiers, times outlier multipliers, with the wingspan boost and the
/// defensive-specialist override applied last.
pub fn dynamic_weights(
    prospect: &PlayerProfile,
    line: &Per30Line,
    identity: &IdentityMultipliers,
    mods: Option<&WeightTable>,
    config: &ScoringConfig,
) -> BTreeMap<StatKey, f64> {
    let mut weights = config.weights.clone();
    if let Some(mods) = mods {
        for (key, m) in mods {
            if let Some(w) = weights.get_mut(key) {
                *w *= m;
            }
        }
    }

    for key in IDENTITY_TERMS {
        if let Some(w) = weights.get_mut(&key) {
            *w *= identity.get(key);
        }
    }

    if let (Some(boost), Some(ws)) = (&config.similarity.wingspan_boost, prospect.wingspan_inches) {
        if prospect.height_inches > 0.0 && ws / prospect.height_inches >= boost.min_ratio {
            if let Some(w) = weights.get_mut(&StatKey::Wingspan) {
                *w *= boost.multiplier;
            }
        }
    }

    let specialist = &config.similarity.defensive_specialist;
    if line.stocks() > specialist.min_stocks && line.ppg < specialist.max_ppg {
        weights.insert(StatKey::Ppg, specialist.ppg_weight);
    }

    weights
}

// ---------------------------------------------------------------------------
// Similarity
// ---------------------------------------------------------------------------

/// Compare a prospect to one candidate.
///
/// `mods` is the prospect archetype's weight-modifier table, if comparisons
/// are archetype-restricted.
pub fn calculate_similarity(
    prospect: &PlayerProfile,
    candidate: &PlayerProfile,
    mods: Option<&WeightTable>,
    config: &ScoringConfig,
) -> SimilarityResult {
    let ranges = &config.ranges;
    let sim = &config.similarity;

    let line_a = Per30Line::for_profile(prospect, config);
    let line_b = Per30Line::for_profile(candidate, config);
    let averages = config.positional_averages.for_position(prospect.position);
    let identity = IdentityMultipliers::compute(prospect, &line_a, averages, &sim.outlier);
    let weights = dynamic_weights(prospect, &line_a, &identity, mods, config);

    let prospect_ato = prospect.stats.ato();
    let candidate_ato = candidate.stats.ato();

    let mut diffs = BTreeMap::new();
    let mut term = |key: StatKey, a: f64, b: Option<f64>| {
        let w = weights.get(&key).copied().unwrap_or(0.0);
        if w == 0.0 {
            return;
        }
        let norm_a = range_normalize(a, key, ranges);
        let d = match b {
            Some(b) => (norm_a - range_normalize(b, key, ranges)).powi(2) * w,
            None => (norm_a - sim.missing_midpoint).powi(2) * w * sim.missing_weight_factor,
        };
        diffs.insert(key, d);
    };

    for key in PER30_TERMS {
        if let (Some(a), Some(b)) = (line_a.get(key), line_b.get(key)) {
            term(key, a, Some(b));
        }
    }
    term(StatKey::Ato, prospect_ato, Some(candidate_ato));
    term(StatKey::Height, prospect.height_inches, Some(candidate.height_inches));
    for key in OPTIONAL_TERMS {
        // A stat the prospect lacks is not compared at all.
        if let Some(a) = prospect.stat(key) {
            term(key, a, candidate.stat(key));
        }
    }

    let penalties = collect_penalties(prospect, candidate, &line_a, &line_b, config);
    let penalty = penalties
        .iter()
        .map(|p| p.points)
        .sum::<f64>()
        .min(config.penalties.cap);

    let distance = diffs.values().sum::<f64>().sqrt();
    let raw = (100.0 - distance / sim.max_distance * 100.0).clamp(0.0, 100.0);
    let score = (raw - penalty).max(0.0);

    SimilarityResult {
        score: (score * 10.0).round() / 10.0,
        penalty,
        penalties,
        diffs,
        weights,
        prospect_ato,
        candidate_ato,
        identity,
    }
}

// ---------------------------------------------------------------------------
// Penalties
// ---------------------------------------------------------------------------

fn collect_penalties(
    a: &PlayerProfile,
    b: &PlayerProfile,
    line_a: &Per30Line,
    line_b: &Per30Line,
    config: &ScoringConfig,
) -> Vec<Penalty> {
    let cfg = &config.penalties;
    let mut out = Vec::new();
    let mut push = |cause: PenaltyCause, points: f64| {
        if points > 0.0 {
            out.push(Penalty { cause, points });
        }
    };

    let steps = a.position.axis().abs_diff(b.position.axis());
    let passing_big = a.position == Position::Big
        && line_a.apg > cfg.position.passing_big_min_apg
        && b.position != Position::Big;
    let rebounding_guard = a.position == Position::Guard
        && line_a.rpg > cfg.position.rebounding_guard_min_rpg
        && b.position != Position::Guard;
    if !passing_big && !rebounding_guard {
        let points = match steps {
            0 => 0.0,
            1 => cfg.position.adjacent,
            _ => cfg.position.far,
        };
        push(PenaltyCause::PositionGap { steps }, points);
    }

    let (fg_a, fg_b) = (a.stats.fg_or_neutral(), b.stats.fg_or_neutral());
    let chucker = &cfg.chucker;
    if line_a.ppg > chucker.min_ppg && fg_a < chucker.max_fg && fg_b > chucker.comp_min_fg {
        push(PenaltyCause::Chucker, chucker.points);
    }

    let broken = &cfg.broken_shot;
    if a.stats.ft_or_neutral() < broken.max_ft && b.stats.ft_or_neutral() > broken.comp_min_ft {
        push(PenaltyCause::BrokenShot, broken.points);
    }

    let usage = &cfg.usage_gap;
    if line_a.ppg + line_a.apg < usage.max_usage && line_b.ppg + line_b.apg > usage.comp_min_usage
    {
        push(PenaltyCause::UsageGap, usage.points);
    }

    let gap = (a.height_inches - b.height_inches).abs();
    if gap > cfg.height.max_gap {
        push(PenaltyCause::HeightMismatch { inches: gap }, cfg.height.points);
    }

    let lve = &cfg.low_volume_efficiency;
    if fg_a > lve.min_fg && line_a.ppg < lve.max_ppg && fg_b > lve.min_fg && line_b.ppg > lve.comp_min_ppg
    {
        push(PenaltyCause::LowVolumeEfficiency, lve.points);
    }

    let shooting = &cfg.shooting_archetype;
    let (three_a, three_b) = (a.stats.three_or_neutral(), b.stats.three_or_neutral());
    let sniper_vs_non = three_a > shooting.sniper_above && three_b < shooting.comp_non_shooter_below;
    let non_vs_sniper = three_a < shooting.non_shooter_below && three_b > shooting.sniper_above;
    if sniper_vs_non || non_vs_sniper {
        push(PenaltyCause::ShootingArchetype, shooting.points);
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
