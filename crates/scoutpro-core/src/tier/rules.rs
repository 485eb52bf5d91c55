// Tier scoring rules. Each rule reads the shared context and returns a signed
// point delta plus an optional reason; every rule runs, in list order.

use crate::config::{Staircase, TierConfig};
use crate::stats::{ClassYear, PlayerProfile, Position, StatKey};
use crate::tier::signals::UnicornTrait;

// ---------------------------------------------------------------------------
// Rule plumbing
// ---------------------------------------------------------------------------

/// Everything a rule may read, resolved once per prediction.
pub struct RuleContext<'a> {
    pub profile: &'a PlayerProfile,
    pub config: &'a TierConfig,
    /// Known draft slot; `None` (or 0) is neutral.
    pub draft_pick: Option<u16>,
    /// BPM after the competition-level modifier.
    pub adj_bpm: Option<f64>,
    /// OBPM after the competition-level modifier.
    pub adj_obpm: Option<f64>,
    /// Points per game after the competition-level modifier.
    pub adj_ppg: f64,
    pub star_signals: &'a [StatKey],
    pub unicorns: &'a [UnicornTrait],
    pub has_advanced: bool,
}

impl RuleContext<'_> {
    fn pick(&self) -> Option<u16> {
        self.draft_pick.filter(|p| *p > 0)
    }
}

/// A rule's contribution to the score.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub delta: f64,
    pub reason: Option<String>,
}

impl RuleOutcome {
    pub fn none() -> Self {
        RuleOutcome {
            delta: 0.0,
            reason: None,
        }
    }

    pub fn silent(delta: f64) -> Self {
        RuleOutcome {
            delta,
            reason: None,
        }
    }

    pub fn with_reason(delta: f64, reason: String) -> Self {
        RuleOutcome {
            delta,
            reason: Some(reason),
        }
    }
}

pub type RuleFn = fn(&RuleContext<'_>, f64) -> RuleOutcome;

/// A named scoring rule. The second argument to `apply` is the score
/// accumulated by the rules before it.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub apply: RuleFn,
}

/// Every rule, in evaluation order.
pub const RULES: &[Rule] = &[
    Rule { name: "draft_pick", apply: draft_pick },
    Rule { name: "bpm", apply: bpm },
    Rule { name: "obpm", apply: obpm },
    Rule { name: "dbpm", apply: dbpm },
    Rule { name: "fta", apply: fta },
    Rule { name: "steals", apply: steals },
    Rule { name: "usage", apply: usage },
    Rule { name: "free_throw", apply: free_throw },
    Rule { name: "scoring", apply: scoring },
    Rule { name: "rebounding", apply: rebounding },
    Rule { name: "efficiency", apply: efficiency },
    Rule { name: "star_signals", apply: star_signal_bonus },
    Rule { name: "unicorns", apply: unicorn_bonus },
    Rule { name: "level", apply: level },
    Rule { name: "low_minutes", apply: low_minutes },
    Rule { name: "early_pick", apply: early_pick },
    Rule { name: "advanced_fallback", apply: advanced_fallback },
    Rule { name: "class_year", apply: class_year },
];

/// Score a value against a staircase; labeled rungs emit a reason built by
/// `describe` from the rung label.
fn stair(stairs: &Staircase, value: f64, describe: impl Fn(&str) -> String) -> RuleOutcome {
    match stairs.lookup(value) {
        Some(step) => RuleOutcome {
            delta: step.points,
            reason: step.label.as_deref().map(describe),
        },
        None => RuleOutcome::none(),
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Late picks are discounted; early picks earn nothing.
fn draft_pick(ctx: &RuleContext<'_>, _score: f64) -> RuleOutcome {
    let Some(pick) = ctx.pick() else {
        return RuleOutcome::none();
    };
    match ctx.config.draft_pick.iter().find(|b| pick <= b.max_pick) {
        Some(bracket) => RuleOutcome {
            delta: bracket.points,
            reason: bracket.label.as_ref().map(|l| format!("{l} (#{pick})")),
        },
        None => RuleOutcome::none(),
    }
}

fn bpm(ctx: &RuleContext<'_>, _score: f64) -> RuleOutcome {
    match ctx.adj_bpm {
        Some(v) => stair(&ctx.config.bpm, v, |l| format!("{l} ({v:.1})")),
        None => RuleOutcome::none(),
    }
}

fn obpm(ctx: &RuleContext<'_>, _score: f64) -> RuleOutcome {
    match ctx.adj_obpm {
        Some(v) if v > 0.0 => stair(&ctx.config.obpm, v, |l| format!("{l} ({v:.1})")),
        _ => RuleOutcome::none(),
    }
}

fn dbpm(ctx: &RuleContext<'_>, _score: f64) -> RuleOutcome {
    match ctx.profile.stats.dbpm {
        Some(v) if v > 0.0 => stair(&ctx.config.dbpm, v, |l| format!("{l} ({v:.1})")),
        _ => RuleOutcome::none(),
    }
}

fn fta(ctx: &RuleContext<'_>, _score: f64) -> RuleOutcome {
    let v = ctx.profile.stats.fta.unwrap_or(0.0);
    stair(&ctx.config.fta, v, |l| format!("{l} ({v:.1}/game)"))
}

/// Steal percentage when recorded, otherwise steals per game. Never both.
fn steals(ctx: &RuleContext<'_>, _score: f64) -> RuleOutcome {
    let s = &ctx.profile.stats;
    match s.stl_per {
        Some(rate) if rate > 0.0 => {
            stair(&ctx.config.steal_rate, rate, |l| format!("{l} ({rate:.1}%)"))
        }
        _ => {
            let spg = s.spg;
            stair(&ctx.config.steals_per_game, spg, |l| format!("{l} ({spg:.1})"))
        }
    }
}

fn usage(ctx: &RuleContext<'_>, _score: f64) -> RuleOutcome {
    match ctx.profile.stats.usg {
        Some(v) if v > 0.0 => stair(&ctx.config.usage, v, |l| format!("{l} ({v:.0}%)")),
        _ => RuleOutcome::none(),
    }
}

/// Penalty only, scaled by position: bigs survive poor touch, guards and
/// wings do not.
fn free_throw(ctx: &RuleContext<'_>, _score: f64) -> RuleOutcome {
    let ft = ctx.profile.stats.ft_or_neutral();
    let weight = ctx.config.free_throw_weight.for_position(ctx.profile.position);
    let mut out = stair(&ctx.config.free_throw, ft, |l| format!("{l} ({ft:.0}%)"));
    out.delta *= weight;
    out
}

fn scoring(ctx: &RuleContext<'_>, _score: f64) -> RuleOutcome {
    let v = ctx.adj_ppg;
    stair(&ctx.config.scoring, v, |l| format!("{l} ({v:.1} adj)"))
}

fn rebounding(ctx: &RuleContext<'_>, _score: f64) -> RuleOutcome {
    let rule = &ctx.config.rebounding;
    let rpg = ctx.profile.stats.rpg;
    match ctx.profile.position {
        Position::Guard if rpg >= rule.guard_min => RuleOutcome::with_reason(
            rule.guard_points,
            format!("Rebounding guard ({rpg:.1})"),
        ),
        Position::Wing | Position::Big if rpg >= rule.frontcourt_min => {
            RuleOutcome::silent(rule.frontcourt_points)
        }
        _ if rpg >= rule.baseline_min => RuleOutcome::silent(rule.baseline_points),
        _ => RuleOutcome::none(),
    }
}

/// Efficiency only counts at volume.
fn efficiency(ctx: &RuleContext<'_>, _score: f64) -> RuleOutcome {
    let rule = &ctx.config.efficient_scoring;
    let fg = ctx.profile.stats.fg_or_neutral();
    if fg >= rule.min_fg && ctx.adj_ppg >= rule.min_ppg {
        RuleOutcome::with_reason(
            rule.points,
            format!("Efficient scorer ({fg:.0}% on {:.0} PPG)", ctx.adj_ppg),
        )
    } else {
        RuleOutcome::none()
    }
}

fn star_signal_bonus(ctx: &RuleContext<'_>, _score: f64) -> RuleOutcome {
    let count = ctx.star_signals.len();
    let total = ctx.config.star_thresholds.len();
    stair(&ctx.config.star_bonus, count as f64, |l| {
        format!("{l} ({count}/{total})")
    })
}

fn unicorn_bonus(ctx: &RuleContext<'_>, _score: f64) -> RuleOutcome {
    if ctx.unicorns.is_empty() {
        return RuleOutcome::none();
    }
    let names: Vec<&str> = ctx.unicorns.iter().map(|u| u.name()).collect();
    RuleOutcome::with_reason(
        ctx.config.unicorn_points * ctx.unicorns.len() as f64,
        format!("Unicorn traits: {}", names.join(", ")),
    )
}

fn level(ctx: &RuleContext<'_>, _score: f64) -> RuleOutcome {
    let level = ctx.profile.competition_level;
    let points = ctx.config.level_penalty.points(level);
    if points == 0.0 {
        RuleOutcome::none()
    } else {
        RuleOutcome::with_reason(points, format!("{} discount", level.label()))
    }
}

fn low_minutes(ctx: &RuleContext<'_>, _score: f64) -> RuleOutcome {
    let rule = &ctx.config.minutes;
    let mpg = ctx.profile.stats.minutes();
    if mpg < rule.low_below {
        RuleOutcome::with_reason(rule.low_points, format!("Low minutes ({mpg:.0} MPG)"))
    } else {
        RuleOutcome::none()
    }
}

/// Teams see something the box score does not when they take a low-minutes
/// player in the lottery.
fn early_pick(ctx: &RuleContext<'_>, _score: f64) -> RuleOutcome {
    let rule = &ctx.config.minutes;
    let mpg = ctx.profile.stats.minutes();
    match ctx.pick() {
        Some(pick) if mpg < rule.early_pick_below && pick <= rule.early_pick_max => {
            RuleOutcome::with_reason(
                rule.early_pick_points,
                "Early pick despite low minutes (potential)".to_string(),
            )
        }
        _ => RuleOutcome::none(),
    }
}

/// Box-score-only profiles earn proxy points; with no proxy signal either,
/// the running score is capped. A recorded FTA rate counts as an advanced
/// stat, so free-throw volume never reaches the proxy set.
fn advanced_fallback(ctx: &RuleContext<'_>, score: f64) -> RuleOutcome {
    if ctx.has_advanced {
        return RuleOutcome::none();
    }
    let fb = &ctx.config.fallback;
    let s = &ctx.profile.stats;
    let ft = s.ft_or_neutral();
    let ppg = ctx.adj_ppg;
    let mut proxy = 0.0;
    let mut reasons = Vec::new();

    let scoring_hit = fb
        .scoring
        .steps
        .iter()
        .enumerate()
        .find(|(i, step)| {
            ppg >= step.min && fb.ft_floors.get(*i).map_or(true, |floor| ft >= *floor)
        })
        .map(|(_, step)| step);
    if let Some(step) = scoring_hit {
        proxy += step.points;
        if let Some(label) = &step.label {
            reasons.push(format!("{label} ({ppg:.0} PPG, {ft:.0}% FT)"));
        }
    }

    if s.spg >= fb.steals_min {
        proxy += fb.steals_points;
    }

    let mut delta = proxy;
    if proxy == 0.0 && score > fb.cap {
        delta = fb.cap - score;
        reasons.push("Capped: no advanced stats, no proxy signals".to_string());
    }

    RuleOutcome {
        delta,
        reason: if reasons.is_empty() {
            None
        } else {
            Some(reasons.join("; "))
        },
    }
}

fn class_year(ctx: &RuleContext<'_>, _score: f64) -> RuleOutcome {
    let points = &ctx.config.class_year;
    match ctx.profile.class_year {
        Some(ClassYear::Freshman) => RuleOutcome::with_reason(
            points.freshman,
            "Freshman declaring (strong signal)".to_string(),
        ),
        Some(ClassYear::Sophomore) => RuleOutcome::silent(points.sophomore),
        Some(ClassYear::Junior) => RuleOutcome::silent(points.junior),
        Some(ClassYear::Senior) => RuleOutcome::with_reason(
            points.senior,
            "Senior (weaker NBA outlook)".to_string(),
        ),
        None => RuleOutcome::none(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
