// Scout report: tier projection plus archetype comps for one prospect, and
// its plain-text rendering.

use scoutpro_core::{
    classify_archetype, find_archetype_matches, predict_tier, Archetype, ArchetypeFit, CompMatch,
    CompSet, HistoricalPlayer, NamedComp, ScoringConfig, Tier, TierPrediction,
};
use serde::Serialize;
use std::fmt;
use tracing::info;

use crate::database::Prospect;

#[derive(Debug, Clone, Serialize)]
pub struct ScoutReport {
    pub prospect: Prospect,
    /// Scoring profile the report was produced with.
    pub profile: String,
    pub archetype: ArchetypeFit,
    pub prediction: TierPrediction,
    pub comps: CompSet,
}

/// Project the prospect's tier, then pull archetype comps anchored on it.
pub fn evaluate(
    prospect: &Prospect,
    db: &[HistoricalPlayer],
    config: &ScoringConfig,
    top_n: usize,
) -> ScoutReport {
    let profile = &prospect.profile;
    let archetype = classify_archetype(profile);
    let prediction = predict_tier(profile, prospect.draft_pick, config);
    let comps = find_archetype_matches(profile, db, top_n, Some(prediction.tier), config);
    info!(
        "{} [{}]: {} ({} pts), {} comps from pool of {}",
        profile.name,
        config.name,
        prediction.tier,
        prediction.score,
        comps.matches.len(),
        comps.pool_size
    );

    ScoutReport {
        prospect: prospect.clone(),
        profile: config.name.clone(),
        archetype,
        prediction,
        comps,
    }
}

pub fn archetype_blurb(archetype: Archetype) -> &'static str {
    match archetype {
        Archetype::ScoringGuard => "Bucket-getter who creates their own shot",
        Archetype::PlaymakingGuard => "Pass-first floor general who controls tempo",
        Archetype::ThreeAndDWing => "Shooting and defense role player",
        Archetype::ScoringWing => "Primary scorer with size and versatility",
        Archetype::SkilledBig => "Big with shooting touch and floor spacing",
        Archetype::AthleticBig => "Rim protector and rebounder",
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn pick_label(pick: Option<u16>) -> String {
    match pick {
        Some(p) if (1..=60).contains(&p) => format!("#{p}"),
        _ => "-".into(),
    }
}

fn range_line(f: &mut fmt::Formatter<'_>, label: &str, comp: Option<&NamedComp>, tier: Tier) -> fmt::Result {
    match comp {
        Some(named) => {
            let c = &named.comp;
            writeln!(
                f,
                "  {label:<8} {} ({} {}) | {:.0} WS | {:.0}% match",
                c.player.name(),
                c.tier,
                c.tier.label(),
                c.player.nba_win_shares.unwrap_or(0.0),
                c.score()
            )
        }
        None => writeln!(f, "  {label:<8} {} {} (no comp found)", tier, tier.label()),
    }
}

fn comp_marker(m: &CompMatch, comps: &CompSet) -> &'static str {
    let is = |named: &Option<NamedComp>| {
        named
            .as_ref()
            .is_some_and(|n| n.comp.player.name() == m.player.name())
    };
    if is(&comps.ceiling) {
        " ^"
    } else if is(&comps.floor) {
        " v"
    } else {
        ""
    }
}

impl fmt::Display for ScoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.prospect.profile;
        let pred = &self.prediction;
        let comps = &self.comps;

        writeln!(
            f,
            "{} ({}, {:.0}\", {})",
            p.name, p.position, p.height_inches, p.competition_level
        )?;
        writeln!(
            f,
            "{} | {} (2nd: {})",
            self.archetype.primary,
            archetype_blurb(self.archetype.primary),
            self.archetype.secondary
        )?;
        writeln!(
            f,
            "Projection: {} {} | score {:.1} | confidence {:.0}% | profile {}",
            pred.tier,
            pred.tier.label(),
            pred.score,
            pred.confidence,
            self.profile
        )?;
        if !pred.has_advanced_stats {
            writeln!(f, "  (no advanced stats: BPM, OBPM and FTA sharpen the projection)")?;
        }

        writeln!(f)?;
        writeln!(f, "Outcome range ({} pool: {} players)", comps.archetype, comps.pool_size)?;
        range_line(f, "Ceiling", comps.ceiling.as_ref(), comps.ceiling_tier)?;
        match &comps.closest {
            Some(c) => writeln!(
                f,
                "  {:<8} {} ({} {}) | {:.0}% match",
                "Closest",
                c.player.name(),
                c.tier,
                c.tier.label(),
                c.score()
            )?,
            None => writeln!(f, "  {:<8} none", "Closest")?,
        }
        range_line(f, "Floor", comps.floor.as_ref(), comps.floor_tier)?;

        if !pred.star_signal_tags.is_empty() {
            let tags: Vec<_> = pred.star_signal_tags.iter().map(|k| k.name()).collect();
            writeln!(f)?;
            writeln!(f, "Star signals ({}): {}", pred.star_signals, tags.join(", "))?;
        }
        if !pred.unicorn_traits.is_empty() {
            let traits: Vec<_> = pred.unicorn_traits.iter().map(|t| t.name()).collect();
            writeln!(f, "Unicorn traits: {}", traits.join(", "))?;
        }
        if !pred.reasons.is_empty() {
            writeln!(f)?;
            writeln!(f, "Why:")?;
            for reason in &pred.reasons {
                writeln!(f, "  - {reason}")?;
            }
        }

        if !comps.matches.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "{:>3}  {:<26} {:>5}  {:<4} {:>5}  {:>5}",
                "#", "Player", "Sim%", "Tier", "WS", "Pick"
            )?;
            for (i, m) in comps.matches.iter().enumerate() {
                let name = format!("{}{}", m.player.name(), comp_marker(m, comps));
                writeln!(
                    f,
                    "{:>3}  {:<26} {:>5.0}  {:<4} {:>5.0}  {:>5}",
                    i + 1,
                    name,
                    m.score(),
                    m.tier.to_string(),
                    m.player.nba_win_shares.unwrap_or(0.0),
                    pick_label(m.player.draft_pick)
                )?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use scoutpro_core::{OutcomeTier, PlayerProfile, Position, StatBlock};

    fn wing(name: &str) -> PlayerProfile {
        let mut p = PlayerProfile::new(name, Position::Wing, 79.0);
        p.stats = StatBlock {
            ppg: 16.0,
            rpg: 6.0,
            apg: 2.0,
            spg: 1.2,
            bpg: 0.6,
            tpg: 1.9,
            mpg: Some(31.0),
            gp: Some(33.0),
            fg: Some(51.0),
            three_pct: Some(36.0),
            ft: Some(76.0),
            ..Default::default()
        };
        p
    }

    fn db() -> Vec<HistoricalPlayer> {
        [("Alpha", 2u8), ("Bravo", 4), ("Charlie", 3)]
            .into_iter()
            .map(|(name, tier)| {
                let mut h = HistoricalPlayer::new(
                    wing(name),
                    OutcomeTier::try_from(tier).unwrap(),
                );
                h.nba_win_shares = Some(20.0);
                h.draft_pick = Some(12);
                h
            })
            .collect()
    }

    #[test]
    fn report_anchors_comps_on_projection() {
        let prospect = Prospect {
            profile: wing("Prospect"),
            draft_pick: Some(8),
        };
        let report = evaluate(&prospect, &db(), &ScoringConfig::default(), 5);
        assert_eq!(report.comps.anchor_tier, report.prediction.tier);
        assert_eq!(report.archetype.primary, report.comps.archetype);
        assert_eq!(report.profile, "v3");
    }

    #[test]
    fn rendering_names_the_references() {
        let prospect = Prospect {
            profile: wing("Prospect"),
            draft_pick: None,
        };
        let report = evaluate(&prospect, &db(), &ScoringConfig::default(), 5);
        let text = report.to_string();
        assert!(text.starts_with("Prospect (W, 79\", High Major)"));
        assert!(text.contains("Ceiling"));
        assert!(text.contains("Floor"));
        assert!(text.contains("Alpha"));
    }

    #[test]
    fn empty_database_renders_without_comps() {
        let prospect = Prospect {
            profile: wing("Prospect"),
            draft_pick: None,
        };
        let report = evaluate(&prospect, &[], &ScoringConfig::default(), 5);
        assert!(report.comps.closest.is_none());
        let text = report.to_string();
        assert!(text.contains("(no comp found)"));
        assert!(text.contains("Closest  none"));
    }
}
