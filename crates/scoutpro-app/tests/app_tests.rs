// Integration tests for the app layer: shipped defaults, fixture databases,
// reports, and the backtest harness working together.

use std::path::{Path, PathBuf};

use scoutpro_app::averages::{compute_positional_averages, load_positional_averages, save_positional_averages};
use scoutpro_app::backtest::{run_backtest, BacktestOptions};
use scoutpro_app::config::{ensure_config_files, load_config_from};
use scoutpro_app::database::{load_player_db, load_prospects, DataError};
use scoutpro_app::report::evaluate;
use scoutpro_core::{
    calculate_similarity, Archetype, OutcomeTier, PlayerProfile, Position, ScoringConfig, StatBlock,
    StatKey, Tier,
};

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the crate root, which is the cwd for
/// `cargo test`).
const FIXTURES: &str = "tests/fixtures";

fn fixture(name: &str) -> PathBuf {
    Path::new(FIXTURES).join(name)
}

/// Workspace `defaults/` directory.
fn shipped_defaults() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../defaults")
}

fn copy_dir(src: &Path, dst: &Path) {
    std::fs::create_dir_all(dst).unwrap();
    for entry in std::fs::read_dir(src).unwrap() {
        let path = entry.unwrap().path();
        let target = dst.join(path.file_name().unwrap());
        if path.is_dir() {
            copy_dir(&path, &target);
        } else {
            std::fs::copy(&path, &target).unwrap();
        }
    }
}

// ===========================================================================
// Configuration
// ===========================================================================

#[test]
fn shipped_defaults_load_and_validate() {
    let tmp = tempfile::tempdir().unwrap();
    copy_dir(&shipped_defaults(), &tmp.path().join("defaults"));

    let copied = ensure_config_files(tmp.path()).unwrap();
    assert!(copied.iter().any(|p| p.ends_with("scoutpro.toml")));

    let config = load_config_from(tmp.path()).unwrap();
    assert_eq!(config.profile_names(), vec!["v2", "v3", "v4"]);
    assert_eq!(config.scoring.default_profile, "v3");

    // V3 on disk matches the built-in defaults.
    let v3 = config.profile("v3").unwrap();
    assert_eq!(v3.weights, ScoringConfig::default().weights);
    assert!(v3.similarity.wingspan_boost.is_none());

    // V2 carries the wingspan boost; V4 does not.
    let v2 = config.profile("v2").unwrap();
    assert!(v2.similarity.wingspan_boost.is_some());
    assert_ne!(v2.weights, v3.weights);
    let v4 = config.profile("v4").unwrap();
    assert!(v4.similarity.wingspan_boost.is_none());
    assert_ne!(v4.weights, v3.weights);
}

#[test]
fn shipped_v2_and_v4_weigh_body_weight() {
    let tmp = tempfile::tempdir().unwrap();
    copy_dir(&shipped_defaults(), &tmp.path().join("defaults"));
    ensure_config_files(tmp.path()).unwrap();
    let config = load_config_from(tmp.path()).unwrap();

    let wing = |name: &str, lbs: f64| {
        let mut p = PlayerProfile::new(name, Position::Wing, 79.0);
        p.weight_lbs = Some(lbs);
        p.stats = StatBlock {
            ppg: 15.0,
            rpg: 6.0,
            apg: 2.0,
            spg: 1.0,
            bpg: 0.5,
            tpg: 1.8,
            mpg: Some(30.0),
            gp: Some(32.0),
            fg: Some(50.0),
            three_pct: Some(35.0),
            ft: Some(75.0),
            ..Default::default()
        };
        p
    };
    let heavy = wing("Heavy", 250.0);
    let light = wing("Light", 180.0);

    for (name, expected) in [("v2", 0.6), ("v4", 1.0)] {
        let profile = config.profile(name).unwrap();
        assert_eq!(profile.weights.get(&StatKey::Weight), Some(&expected), "{name}");

        let result = calculate_similarity(&heavy, &light, None, profile);
        let diff = result.diffs.get(&StatKey::Weight).copied().unwrap_or(0.0);
        assert!(diff > 0.0, "{name}: a 70 lb gap must register, got {diff}");
        assert!(result.score < 100.0, "{name}: score {}", result.score);
    }

    // V3 keeps body weight out of the distance.
    let v3 = config.profile("v3").unwrap();
    let result = calculate_similarity(&heavy, &light, None, v3);
    assert!(result.diffs.get(&StatKey::Weight).map_or(true, |d| *d == 0.0));
}

// ===========================================================================
// Data loading
// ===========================================================================

#[test]
fn json_database_skips_bad_entries_and_caches_archetypes() {
    let players = load_player_db(&fixture("players.json")).unwrap();
    assert_eq!(players.len(), 6);
    assert!(players.iter().all(|p| p.archetype.is_some()));
    assert!(players.iter().all(|p| p.name() != "Fixture Broken"));

    let rookie = players.iter().find(|p| p.name() == "Fixture Rookie").unwrap();
    assert_eq!(rookie.outcome_tier, OutcomeTier::TooEarly);
    let big = players.iter().find(|p| p.name() == "Fixture Rim Runner").unwrap();
    assert_eq!(big.stats().three_pct, None);
}

#[test]
fn csv_database_matches_json_shape() {
    let players = load_player_db(&fixture("players.csv")).unwrap();
    assert_eq!(players.len(), 2);
    assert_eq!(players[0].name(), "CSV Scorer");
    assert_eq!(players[0].graded_tier(), Some(Tier::Superstar));
    assert_eq!(players[1].profile.position, Position::Big);
}

#[test]
fn missing_database_is_io_error() {
    match load_player_db(&fixture("nope.json")) {
        Err(DataError::Io { .. }) => {}
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn prospects_load_from_toml_and_json() {
    let toml = load_prospects(&fixture("prospect.toml")).unwrap();
    assert_eq!(toml.len(), 1);
    assert_eq!(toml[0].draft_pick, Some(7));
    assert_eq!(toml[0].profile.stats.three_pct, Some(36.5));

    let json = load_prospects(&fixture("prospect.json")).unwrap();
    assert_eq!(json[0].profile.position, Position::Big);
    assert_eq!(json[0].draft_pick, None);
}

// ===========================================================================
// Reports
// ===========================================================================

#[test]
fn report_over_fixture_database() {
    let db = load_player_db(&fixture("players.json")).unwrap();
    let prospect = load_prospects(&fixture("prospect.toml")).unwrap().remove(0);
    let config = ScoringConfig::default();

    let report = evaluate(&prospect, &db, &config, 10);
    assert_eq!(report.archetype.primary, Archetype::ScoringGuard);
    assert!(report.comps.pool_size >= 1);
    assert!(report
        .comps
        .matches
        .iter()
        .all(|m| m.player.profile.position == Position::Guard));
    assert!(report.comps.ceiling_tier <= report.comps.floor_tier);
    assert!(report.prediction.has_advanced_stats);

    let text = report.to_string();
    assert!(text.contains("Fixture Prospect"));
    assert!(text.contains("Scoring Guard"));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["archetype"]["primary"], "Scoring Guard");
    assert_eq!(json["prospect"]["name"], "Fixture Prospect");
}

// ===========================================================================
// Positional averages
// ===========================================================================

#[test]
fn averages_from_fixture_round_trip() {
    let db = load_player_db(&fixture("players.json")).unwrap();
    let fallback = ScoringConfig::default().positional_averages;
    let averages = compute_positional_averages(&db, &fallback);
    // Four guards in the fixture: (21.5 + 17.8 + 19.0 + 16.1) / 4 = 18.6
    assert!((averages.guard.ppg - 18.6).abs() < 1e-9);

    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("averages.json");
    save_positional_averages(&path, &averages).unwrap();
    assert_eq!(load_positional_averages(&path).unwrap(), averages);
}

// ===========================================================================
// Backtest
// ===========================================================================

#[test]
fn backtest_over_fixture_database() {
    let db = load_player_db(&fixture("players.json")).unwrap();
    let options = BacktestOptions {
        first_year: 2012,
        last_year: 2014,
        top_n: 5,
    };
    let summary = run_backtest(&db, &ScoringConfig::default(), &options);

    assert_eq!(summary.profile, "v3");
    assert_eq!(summary.players.len(), 5);
    assert_eq!(summary.model.n, 5);
    assert_eq!(summary.comps.n, 5);
    let years: Vec<u16> = summary.years.iter().map(|y| y.year).collect();
    assert_eq!(years, vec![2012, 2013, 2014]);
    // Held-out players never comp against their own draft class.
    for h in &summary.players {
        if let Some(top) = &h.top_comp {
            let comp = db.iter().find(|p| p.name() == top).unwrap();
            assert_ne!(comp.draft_year, Some(h.year));
        }
    }
    assert!(summary.to_string().contains("Backtest [v3] 2012-2014"));
}
