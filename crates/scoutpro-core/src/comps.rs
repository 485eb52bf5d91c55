// Comp selection: filter the historical pool, score every candidate, rank,
// and pick the closest / ceiling / floor references around an anchor tier.

use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use crate::archetype::{classify_archetype, Archetype};
use crate::config::{ScoringConfig, WeightTable};
use crate::similarity::{calculate_similarity, SimilarityResult};
use crate::stats::{HistoricalPlayer, PlayerProfile, Tier};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One scored candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompMatch {
    pub player: HistoricalPlayer,
    /// The candidate's graded outcome.
    pub tier: Tier,
    pub similarity: SimilarityResult,
}

impl CompMatch {
    pub fn score(&self) -> f64 {
        self.similarity.score
    }
}

/// Which search stage produced a ceiling or floor comp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPath {
    /// Within one or two tiers of the anchor, above the similarity floor.
    Window,
    /// Any tier on the right side of the anchor, above the similarity floor.
    Widened,
    /// Nothing qualified; the closest comp stands in.
    Closest,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedComp {
    pub comp: CompMatch,
    pub via: SelectionPath,
}

/// Archetype-restricted comps for one prospect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompSet {
    pub archetype: Archetype,
    pub secondary: Archetype,
    pub archetype_score: i32,
    /// Top N by similarity.
    pub matches: Vec<CompMatch>,
    /// Qualified same-archetype candidates scored.
    pub pool_size: usize,
    pub anchor_tier: Tier,
    pub closest: Option<CompMatch>,
    pub ceiling: Option<NamedComp>,
    pub floor: Option<NamedComp>,
    /// Ceiling comp's tier, or the anchor when there is none.
    pub ceiling_tier: Tier,
    /// Floor comp's tier, or the anchor when there is none.
    pub floor_tier: Tier,
}

// ---------------------------------------------------------------------------
// Pool filtering and ranking
// ---------------------------------------------------------------------------

/// Whether a historical record may serve as a comp at all. Returns its
/// graded tier when it qualifies.
pub fn qualifies(player: &HistoricalPlayer, config: &ScoringConfig) -> Option<Tier> {
    let pool = &config.pool;
    if player.excluded || !player.has_college_stats {
        return None;
    }
    if pool.excluded_players.iter().any(|n| n == player.name()) {
        return None;
    }
    let stats = player.stats();
    if stats.games() < pool.min_games || stats.minutes() < pool.min_minutes {
        return None;
    }
    if let Some(window) = &pool.draft_years {
        match player.draft_year {
            Some(year) if window.contains(year) => {}
            _ => return None,
        }
    }
    player.graded_tier()
}

/// A ranked candidate borrowed from the pool.
struct Ranked<'a> {
    player: &'a HistoricalPlayer,
    tier: Tier,
    similarity: SimilarityResult,
}

impl Ranked<'_> {
    fn to_match(&self) -> CompMatch {
        CompMatch {
            player: self.player.clone(),
            tier: self.tier,
            similarity: self.similarity.clone(),
        }
    }
}

/// Score every pool entry and sort by similarity, best first. Ties keep
/// pool order, in parallel or not.
fn rank<'a>(
    prospect: &PlayerProfile,
    pool: &[(&'a HistoricalPlayer, Tier)],
    mods: Option<&WeightTable>,
    config: &ScoringConfig,
) -> Vec<Ranked<'a>> {
    let score = |&(player, tier): &(&'a HistoricalPlayer, Tier)| Ranked {
        player,
        tier,
        similarity: calculate_similarity(prospect, &player.profile, mods, config),
    };

    let mut ranked: Vec<Ranked<'a>> = if pool.len() > config.pool.parallel_threshold {
        pool.par_iter().map(score).collect()
    } else {
        pool.iter().map(score).collect()
    };
    ranked.sort_by(|a, b| {
        b.similarity
            .score
            .partial_cmp(&a.similarity.score)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}

/// Top `top_n` comps for a prospect over the whole qualified pool, using the
/// base weights.
pub fn find_top_matches(
    prospect: &PlayerProfile,
    db: &[HistoricalPlayer],
    top_n: usize,
    config: &ScoringConfig,
) -> Vec<CompMatch> {
    let pool: Vec<_> = db
        .iter()
        .filter_map(|p| qualifies(p, config).map(|t| (p, t)))
        .collect();
    debug!("top matches for {}: {} of {} qualify", prospect.name, pool.len(), db.len());

    rank(prospect, &pool, None, config)
        .iter()
        .take(top_n)
        .map(Ranked::to_match)
        .collect()
}

/// Comps within the prospect's own archetype, scored with that archetype's
/// weight modifiers, plus closest / ceiling / floor references around
/// `anchor_tier`.
///
/// Without an anchor, the closest comp's tier is used; with an empty pool,
/// the configured default.
pub fn find_archetype_matches(
    prospect: &PlayerProfile,
    db: &[HistoricalPlayer],
    top_n: usize,
    anchor_tier: Option<Tier>,
    config: &ScoringConfig,
) -> CompSet {
    let fit = classify_archetype(prospect);
    let mods = config.archetype_mods.for_archetype(fit.primary);

    let pool: Vec<_> = db
        .iter()
        .filter_map(|p| qualifies(p, config).map(|t| (p, t)))
        .filter(|(p, _)| p.archetype_or_classify() == fit.primary)
        .collect();
    debug!(
        "archetype pool for {} ({}): {} candidates",
        prospect.name,
        fit.primary,
        pool.len()
    );

    let ranked = rank(prospect, &pool, Some(mods), config);
    let scored: Vec<(Tier, f64)> = ranked.iter().map(|r| (r.tier, r.similarity.score)).collect();

    let anchor = match (anchor_tier, scored.first()) {
        (Some(t), _) => t,
        (None, Some((closest_tier, _))) => {
            debug!("no anchor supplied; using closest comp tier {closest_tier}");
            *closest_tier
        }
        (None, None) => config.pool.default_anchor_tier,
    };

    let picks = select_references(&scored, anchor, config.pool.min_comp_similarity);
    let named = |pick: Option<(usize, SelectionPath)>| {
        pick.map(|(i, via)| NamedComp {
            comp: ranked[i].to_match(),
            via,
        })
    };
    let ceiling = named(picks.ceiling);
    let floor = named(picks.floor);

    CompSet {
        archetype: fit.primary,
        secondary: fit.secondary,
        archetype_score: fit.score,
        matches: ranked.iter().take(top_n).map(Ranked::to_match).collect(),
        pool_size: pool.len(),
        anchor_tier: anchor,
        closest: ranked.first().map(Ranked::to_match),
        ceiling_tier: ceiling.as_ref().map_or(anchor, |c| c.comp.tier),
        floor_tier: floor.as_ref().map_or(anchor, |c| c.comp.tier),
        ceiling,
        floor,
    }
}

// ---------------------------------------------------------------------------
// Reference selection
// ---------------------------------------------------------------------------

/// Indices into a ranked list for the three named references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct References {
    pub closest: Option<usize>,
    pub ceiling: Option<(usize, SelectionPath)>,
    pub floor: Option<(usize, SelectionPath)>,
}

/// Pick closest / ceiling / floor from `(tier, similarity)` pairs already
/// sorted best-first.
///
/// The ceiling is searched one to two tiers better than the anchor, then any
/// tier at least as good, then falls back to the closest comp; the floor
/// mirrors it on the worse side. If the result would put the ceiling below
/// the floor, the two are swapped.
pub fn select_references(ranked: &[(Tier, f64)], anchor: Tier, min_similarity: f64) -> References {
    let closest = if ranked.is_empty() { None } else { Some(0) };
    let a = anchor.number();

    let find = |lo: u8, hi: u8| {
        ranked
            .iter()
            .position(|(t, s)| (lo..=hi).contains(&t.number()) && *s >= min_similarity)
    };
    let search = |window: (u8, u8), widened: (u8, u8)| {
        let in_window = if window.0 <= window.1 {
            find(window.0, window.1)
        } else {
            None
        };
        in_window
            .map(|i| (i, SelectionPath::Window))
            .or_else(|| find(widened.0, widened.1).map(|i| (i, SelectionPath::Widened)))
            .or_else(|| closest.map(|i| (i, SelectionPath::Closest)))
    };

    let mut ceiling = search((a.saturating_sub(2).max(1), a.saturating_sub(1)), (1, a));
    let mut floor = search((a + 1, (a + 2).min(5)), (a, 5));

    if let (Some((c, _)), Some((f, _))) = (ceiling, floor) {
        if ranked[c].0 > ranked[f].0 {
            debug!("ceiling tier {} below floor tier {}; swapping", ranked[c].0, ranked[f].0);
            std::mem::swap(&mut ceiling, &mut floor);
        }
    }

    References {
        closest,
        ceiling,
        floor,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DraftYearWindow;
    use crate::stats::{OutcomeTier, Position, StatBlock};

    fn historical(name: &str, tier: u8, ppg: f64) -> HistoricalPlayer {
        let mut profile = PlayerProfile::new(name, Position::Wing, 79.0);
        profile.stats = StatBlock {
            ppg,
            rpg: 5.0,
            apg: 2.0,
            mpg: Some(30.0),
            gp: Some(32.0),
            ..Default::default()
        };
        let outcome = OutcomeTier::try_from(tier).unwrap();
        let mut p = HistoricalPlayer::new(profile, outcome);
        p.draft_year = Some(2012);
        p
    }

    #[test]
    fn pool_filter_rules() {
        let config = ScoringConfig::default();
        assert_eq!(qualifies(&historical("Ok", 3, 12.0), &config), Some(Tier::Starter));

        let mut excluded = historical("Flagged", 3, 12.0);
        excluded.excluded = true;
        assert_eq!(qualifies(&excluded, &config), None);

        assert_eq!(qualifies(&historical("Joel Embiid", 1, 20.0), &config), None);
        assert_eq!(qualifies(&historical("Rookie", 6, 12.0), &config), None);

        let mut short = historical("Short", 3, 12.0);
        short.profile.stats.gp = Some(24.0);
        assert_eq!(qualifies(&short, &config), None);

        let mut bench = historical("Bench", 3, 12.0);
        bench.profile.stats.mpg = Some(19.5);
        assert_eq!(qualifies(&bench, &config), None);

        let mut no_college = historical("Intl", 3, 12.0);
        no_college.has_college_stats = false;
        assert_eq!(qualifies(&no_college, &config), None);
    }

    #[test]
    fn draft_year_window_restricts_pool() {
        let mut config = ScoringConfig::default();
        config.pool.draft_years = Some(DraftYearWindow {
            first: 2014,
            last: 2016,
        });
        assert_eq!(qualifies(&historical("Old", 2, 15.0), &config), None);
        let mut recent = historical("Recent", 2, 15.0);
        recent.draft_year = Some(2015);
        assert_eq!(qualifies(&recent, &config), Some(Tier::AllStar));
    }

    #[test]
    fn top_matches_sorted_and_truncated() {
        let db = vec![
            historical("Far", 4, 3.0),
            historical("Near", 2, 14.0),
            historical("Mid", 3, 9.0),
        ];
        let prospect = historical("Prospect", 6, 14.0).profile;
        let top = find_top_matches(&prospect, &db, 2, &ScoringConfig::default());
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].player.name(), "Near");
        assert_eq!(top[1].player.name(), "Mid");
        assert!(top[0].score() >= top[1].score());
    }

    #[test]
    fn ties_keep_pool_order() {
        let db = vec![historical("First", 3, 12.0), historical("Second", 2, 12.0)];
        let prospect = historical("Prospect", 6, 12.0).profile;
        let top = find_top_matches(&prospect, &db, 5, &ScoringConfig::default());
        assert_eq!(top[0].player.name(), "First");
        assert_eq!(top[1].player.name(), "Second");
    }

    #[test]
    fn parallel_ranking_matches_sequential() {
        let db: Vec<_> = (0..40)
            .map(|i| historical(&format!("P{i}"), (i % 5 + 1) as u8, 4.0 + (i % 7) as f64))
            .collect();
        let prospect = historical("Prospect", 6, 10.0).profile;
        let sequential = ScoringConfig::default();
        let mut parallel = ScoringConfig::default();
        parallel.pool.parallel_threshold = 0;
        let a = find_top_matches(&prospect, &db, 40, &sequential);
        let b = find_top_matches(&prospect, &db, 40, &parallel);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_pool_yields_no_comps_and_default_anchor() {
        let prospect = historical("Prospect", 6, 12.0).profile;
        let set = find_archetype_matches(&prospect, &[], 10, None, &ScoringConfig::default());
        assert!(set.closest.is_none());
        assert!(set.ceiling.is_none());
        assert!(set.floor.is_none());
        assert_eq!(set.anchor_tier, Tier::RolePlayer);
        assert_eq!(set.ceiling_tier, Tier::RolePlayer);
        assert_eq!(set.pool_size, 0);
    }

    #[test]
    fn ceiling_prefers_window() {
        let ranked = [
            (Tier::Starter, 90.0),
            (Tier::Superstar, 80.0),
            (Tier::AllStar, 70.0),
            (Tier::Bust, 60.0),
        ];
        let refs = select_references(&ranked, Tier::Starter, 30.0);
        assert_eq!(refs.closest, Some(0));
        assert_eq!(refs.ceiling, Some((1, SelectionPath::Window)));
        assert_eq!(refs.floor, Some((3, SelectionPath::Window)));
    }

    #[test]
    fn ceiling_falls_through_to_widened_before_closest() {
        // Anchor 3; the only better-tier candidate is below the threshold.
        let ranked = [
            (Tier::RolePlayer, 70.0),
            (Tier::Starter, 55.0),
            (Tier::Superstar, 25.0),
        ];
        let refs = select_references(&ranked, Tier::Starter, 30.0);
        assert_eq!(refs.ceiling, Some((1, SelectionPath::Widened)));

        // With no tier <= 3 above the threshold either, fall back to closest.
        let ranked = [(Tier::RolePlayer, 70.0), (Tier::Superstar, 25.0)];
        let refs = select_references(&ranked, Tier::Starter, 30.0);
        assert_eq!(refs.ceiling, Some((0, SelectionPath::Closest)));
    }

    #[test]
    fn anchor_at_edges_skips_empty_window() {
        let ranked = [(Tier::Superstar, 60.0), (Tier::AllStar, 50.0)];
        let refs = select_references(&ranked, Tier::Superstar, 30.0);
        assert_eq!(refs.ceiling, Some((0, SelectionPath::Widened)));
        assert_eq!(refs.floor, Some((1, SelectionPath::Window)));

        let ranked = [(Tier::Bust, 60.0)];
        let refs = select_references(&ranked, Tier::Bust, 30.0);
        assert_eq!(refs.floor, Some((0, SelectionPath::Widened)));
    }

    #[test]
    fn inverted_references_are_swapped() {
        // Ceiling falls back to a tier-5 closest comp while the floor finds a
        // tier-4 comp in its window.
        let ranked = [(Tier::Bust, 80.0), (Tier::RolePlayer, 50.0)];
        let refs = select_references(&ranked, Tier::Starter, 30.0);
        let (c, _) = refs.ceiling.unwrap();
        let (f, _) = refs.floor.unwrap();
        assert!(ranked[c].0 <= ranked[f].0);
        assert_eq!(refs.ceiling, Some((1, SelectionPath::Window)));
        assert_eq!(refs.floor, Some((0, SelectionPath::Closest)));
    }
}
