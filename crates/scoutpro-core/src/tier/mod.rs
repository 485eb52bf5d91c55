// Tier projection: additive rule scoring mapped onto tiers 1-5.

pub mod rules;
pub mod signals;

use serde::Serialize;

use crate::config::{ScoringConfig, TierCutPoints};
use crate::stats::{PlayerProfile, StatKey, Tier};

use rules::{RuleContext, RULES};
pub use signals::UnicornTrait;

/// One rule's non-zero contribution, kept for explainability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleDelta {
    pub rule: &'static str,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierPrediction {
    pub tier: Tier,
    /// Accumulated points, rounded to one decimal.
    pub score: f64,
    /// 0-95, whole number.
    pub confidence: f64,
    /// Reasons from every rule that fired, in rule order.
    pub reasons: Vec<String>,
    pub star_signals: usize,
    pub star_signal_tags: Vec<StatKey>,
    pub unicorn_traits: Vec<UnicornTrait>,
    pub has_advanced_stats: bool,
    pub breakdown: Vec<RuleDelta>,
}

/// Project a prospect's NBA tier.
///
/// `draft_pick` is optional; without one the draft-slot rules are neutral.
/// Never fails: missing stats resolve to their neutral defaults, and an empty
/// profile lands in tier 5.
pub fn predict_tier(
    profile: &PlayerProfile,
    draft_pick: Option<u16>,
    config: &ScoringConfig,
) -> TierPrediction {
    let tier_config = &config.tier;
    let stats = &profile.stats;
    let level_modifier = config.levels.modifier(profile.competition_level);

    let star_signal_tags = signals::star_signals(profile, &tier_config.star_thresholds);
    let unicorn_traits = signals::unicorn_traits(profile);
    let has_advanced = stats.has_advanced();

    let ctx = RuleContext {
        profile,
        config: tier_config,
        draft_pick,
        adj_bpm: stats.bpm.map(|v| v * level_modifier),
        adj_obpm: stats.obpm.map(|v| v * level_modifier),
        adj_ppg: stats.ppg * level_modifier,
        star_signals: &star_signal_tags,
        unicorns: &unicorn_traits,
        has_advanced,
    };

    let mut score = 0.0;
    let mut reasons = Vec::new();
    let mut breakdown = Vec::new();
    for rule in RULES {
        if tier_config.is_disabled(rule.name) {
            continue;
        }
        let outcome = (rule.apply)(&ctx, score);
        score += outcome.delta;
        if outcome.delta != 0.0 {
            breakdown.push(RuleDelta {
                rule: rule.name,
                points: outcome.delta,
            });
        }
        if let Some(reason) = outcome.reason {
            reasons.push(reason);
        }
    }

    let (tier, confidence) = map_score(score, &tier_config.cut_points);

    TierPrediction {
        tier,
        score: (score * 10.0).round() / 10.0,
        confidence: confidence.round(),
        reasons,
        star_signals: star_signal_tags.len(),
        star_signal_tags,
        unicorn_traits,
        has_advanced_stats: has_advanced,
        breakdown,
    }
}

/// Map a raw score onto a tier and its (uncapped-then-capped) confidence.
///
/// Tiers 1-4 gain confidence the further the score clears the tier floor;
/// tier 5 gains it the further the score falls below the tier-4 floor.
pub fn map_score(score: f64, cuts: &TierCutPoints) -> (Tier, f64) {
    let [t1, t2, t3, t4, t5] = cuts.base_confidence;
    let (tier, confidence) = if score >= cuts.superstar {
        (Tier::Superstar, t1 + (score - cuts.superstar))
    } else if score >= cuts.all_star {
        (Tier::AllStar, t2 + (score - cuts.all_star))
    } else if score >= cuts.starter {
        (Tier::Starter, t3 + (score - cuts.starter))
    } else if score >= cuts.role_player {
        (Tier::RolePlayer, t4 + (score - cuts.role_player))
    } else {
        (Tier::Bust, t5 + (cuts.role_player - score).max(0.0))
    };
    (tier, confidence.min(cuts.max_confidence))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
