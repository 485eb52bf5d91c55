// End-to-end checks of the documented scoring scenarios through the public API.

use scoutpro_core::comps::select_references;
use scoutpro_core::normalize::range_normalize;
use scoutpro_core::{
    calculate_similarity, find_archetype_matches, find_top_matches, predict_tier, Archetype,
    HistoricalPlayer, OutcomeTier, PenaltyCause, PlayerProfile, Position, ScoringConfig,
    SelectionPath, StatBlock, StatKey, Tier,
};

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

fn scoring_guard(name: &str) -> PlayerProfile {
    let mut p = PlayerProfile::new(name, Position::Guard, 75.0);
    p.stats = StatBlock {
        ppg: 19.0,
        rpg: 3.8,
        apg: 3.0,
        spg: 1.2,
        bpg: 0.2,
        tpg: 2.5,
        mpg: Some(32.0),
        gp: Some(31.0),
        fg: Some(48.0),
        three_pct: Some(36.0),
        ft: Some(80.0),
        usg: Some(27.0),
        fta: Some(5.0),
        ..Default::default()
    };
    p
}

fn big(name: &str) -> PlayerProfile {
    let mut p = PlayerProfile::new(name, Position::Big, 84.0);
    p.stats = StatBlock {
        ppg: 12.0,
        rpg: 9.5,
        apg: 1.0,
        bpg: 2.2,
        tpg: 1.5,
        mpg: Some(28.0),
        gp: Some(33.0),
        fg: Some(58.0),
        ft: Some(62.0),
        ..Default::default()
    };
    p
}

fn graded(profile: PlayerProfile, tier: Tier) -> HistoricalPlayer {
    HistoricalPlayer::new(profile, OutcomeTier::Graded(tier))
}

// ---------------------------------------------------------------------------
// Scenario A: broken free-throw shot
// ---------------------------------------------------------------------------

#[test]
fn broken_ft_guard_takes_full_penalty() {
    let config = ScoringConfig::default();
    let mut p = PlayerProfile::new("Bricklayer", Position::Guard, 75.0);
    p.stats.ft = Some(50.0);

    let pred = predict_tier(&p, None, &config);
    assert!(pred.reasons.iter().any(|r| r == "Broken FT shot (50%)"));
    let ft = pred
        .breakdown
        .iter()
        .find(|d| d.rule == "free_throw")
        .map(|d| d.points);
    assert_eq!(ft, Some(-12.0));
}

// ---------------------------------------------------------------------------
// Scenario B: candidate without advanced stats
// ---------------------------------------------------------------------------

#[test]
fn missing_candidate_bpm_uses_midpoint_at_half_weight() {
    let config = ScoringConfig::default();
    let mut prospect = PlayerProfile::new("Prospect", Position::Wing, 79.0);
    prospect.stats.bpm = Some(10.0);
    let candidate = PlayerProfile::new("Old Timer", Position::Wing, 79.0);

    let result = calculate_similarity(&prospect, &candidate, None, &config);
    let norm = range_normalize(10.0, StatKey::Bpm, &config.ranges);
    let expected = (norm - 0.5).powi(2) * config.weight(StatKey::Bpm) * 0.5;
    let actual = result.diffs.get(&StatKey::Bpm).copied().unwrap_or_default();
    assert!(approx_eq(actual, expected, 1e-12));
    assert!(actual > 0.0);
}

// ---------------------------------------------------------------------------
// Scenario C: ceiling search falls through in order
// ---------------------------------------------------------------------------

#[test]
fn ceiling_search_widens_before_closest_fallback() {
    let ranked = [
        (Tier::RolePlayer, 72.0),
        (Tier::Superstar, 22.0), // better tier, under the similarity floor
        (Tier::Starter, 41.0),
        (Tier::Bust, 35.0),
    ];
    let refs = select_references(&ranked, Tier::Starter, 30.0);
    assert_eq!(refs.ceiling, Some((2, SelectionPath::Widened)));
    assert_eq!(refs.floor, Some((0, SelectionPath::Window)));
}

// ---------------------------------------------------------------------------
// Scenario D: passing big exception
// ---------------------------------------------------------------------------

#[test]
fn passing_big_is_not_position_penalized() {
    let config = ScoringConfig::default();
    let mut prospect = big("Point Center");
    prospect.stats.apg = 4.6;
    prospect.stats.mpg = Some(30.0);

    for other in [scoring_guard("Guard"), big("Center")] {
        let result = calculate_similarity(&prospect, &other, None, &config);
        assert!(!result
            .penalties
            .iter()
            .any(|p| matches!(p.cause, PenaltyCause::PositionGap { .. })));
    }

    prospect.stats.apg = 3.5;
    let result = calculate_similarity(&prospect, &scoring_guard("Guard"), None, &config);
    let gap: Vec<_> = result
        .penalties
        .iter()
        .filter(|p| matches!(p.cause, PenaltyCause::PositionGap { .. }))
        .collect();
    assert_eq!(gap.len(), 1);
    assert_eq!(gap[0].points, 15.0);
}

// ---------------------------------------------------------------------------
// Comp sets over a real pool
// ---------------------------------------------------------------------------

fn pool() -> Vec<HistoricalPlayer> {
    vec![
        graded(scoring_guard("A"), Tier::RolePlayer),
        graded(big("Big One"), Tier::AllStar),
        graded(scoring_guard("B"), Tier::AllStar),
        graded(scoring_guard("C"), Tier::Superstar),
        graded(scoring_guard("D"), Tier::Bust),
        HistoricalPlayer::new(scoring_guard("Rookie"), OutcomeTier::TooEarly),
        graded(scoring_guard("E"), Tier::Starter),
    ]
}

#[test]
fn archetype_comps_restrict_pool_and_bracket_anchor() {
    let config = ScoringConfig::default();
    let prospect = scoring_guard("Prospect");
    let db = pool();

    let set = find_archetype_matches(&prospect, &db, 3, Some(Tier::Starter), &config);
    assert_eq!(set.archetype, Archetype::ScoringGuard);
    // Five graded scoring guards; the big and the ungraded rookie drop out.
    assert_eq!(set.pool_size, 5);
    assert_eq!(set.matches.len(), 3);
    assert!(set.matches.iter().all(|m| m.player.name() != "Big One"));

    // Identical stat lines tie, so pool order decides.
    let closest = set.closest.as_ref().map(|c| c.player.name());
    assert_eq!(closest, Some("A"));
    let ceiling = set.ceiling.as_ref().map(|c| (c.comp.player.name(), c.via));
    assert_eq!(ceiling, Some(("B", SelectionPath::Window)));
    let floor = set.floor.as_ref().map(|c| (c.comp.player.name(), c.via));
    assert_eq!(floor, Some(("A", SelectionPath::Window)));
    assert!(set.ceiling_tier <= set.floor_tier);
}

#[test]
fn missing_anchor_uses_closest_comp_tier() {
    let config = ScoringConfig::default();
    let set = find_archetype_matches(&scoring_guard("Prospect"), &pool(), 10, None, &config);
    assert_eq!(set.anchor_tier, Tier::RolePlayer);
}

#[test]
fn top_matches_span_archetypes() {
    let config = ScoringConfig::default();
    let top = find_top_matches(&scoring_guard("Prospect"), &pool(), 10, &config);
    assert_eq!(top.len(), 6);
    assert_eq!(top.last().map(|m| m.player.name()), Some("Big One"));
}
