// Archetype classification: six additive rubrics scored over position,
// height, and stat thresholds.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::stats::{PlayerProfile, Position};

// ---------------------------------------------------------------------------
// Archetype
// ---------------------------------------------------------------------------

/// Stylistic player category. Declaration order is rubric evaluation order,
/// which is also the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Archetype {
    #[serde(rename = "Scoring Guard")]
    ScoringGuard,
    #[serde(rename = "Playmaking Guard")]
    PlaymakingGuard,
    #[serde(rename = "3&D Wing", alias = "3-and-D Wing")]
    ThreeAndDWing,
    #[serde(rename = "Scoring Wing")]
    ScoringWing,
    #[serde(rename = "Skilled Big")]
    SkilledBig,
    #[serde(rename = "Athletic Big")]
    AthleticBig,
}

impl Archetype {
    pub const ALL: [Archetype; 6] = [
        Archetype::ScoringGuard,
        Archetype::PlaymakingGuard,
        Archetype::ThreeAndDWing,
        Archetype::ScoringWing,
        Archetype::SkilledBig,
        Archetype::AthleticBig,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Archetype::ScoringGuard => "Scoring Guard",
            Archetype::PlaymakingGuard => "Playmaking Guard",
            Archetype::ThreeAndDWing => "3&D Wing",
            Archetype::ScoringWing => "Scoring Wing",
            Archetype::SkilledBig => "Skilled Big",
            Archetype::AthleticBig => "Athletic Big",
        }
    }

    /// Key of this archetype's table under `[archetype_mods]`.
    pub fn config_key(self) -> &'static str {
        match self {
            Archetype::ScoringGuard => "scoring_guard",
            Archetype::PlaymakingGuard => "playmaking_guard",
            Archetype::ThreeAndDWing => "three_and_d_wing",
            Archetype::ScoringWing => "scoring_wing",
            Archetype::SkilledBig => "skilled_big",
            Archetype::AthleticBig => "athletic_big",
        }
    }

    fn score(self, line: &RubricLine) -> i32 {
        match self {
            Archetype::ScoringGuard => scoring_guard(line),
            Archetype::PlaymakingGuard => playmaking_guard(line),
            Archetype::ThreeAndDWing => three_and_d_wing(line),
            Archetype::ScoringWing => scoring_wing(line),
            Archetype::SkilledBig => skilled_big(line),
            Archetype::AthleticBig => athletic_big(line),
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification result: best archetype, its rubric score, the runner-up,
/// and every rubric's score in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchetypeFit {
    pub primary: Archetype,
    pub score: i32,
    pub secondary: Archetype,
    pub scores: [(Archetype, i32); 6],
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify a profile into its primary and secondary archetypes.
///
/// Raw (unadjusted) stats are used. Ties resolve to the earlier rubric.
pub fn classify_archetype(profile: &PlayerProfile) -> ArchetypeFit {
    let line = RubricLine::from_profile(profile);
    let scores = Archetype::ALL.map(|a| (a, a.score(&line)));

    let mut ranked = scores;
    // Stable: equal scores keep rubric order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ArchetypeFit {
        primary: ranked[0].0,
        score: ranked[0].1,
        secondary: ranked[1].0,
        scores,
    }
}

/// Stat values the rubrics read, with neutral defaults resolved.
struct RubricLine {
    pos: Position,
    height: f64,
    ppg: f64,
    rpg: f64,
    apg: f64,
    spg: f64,
    bpg: f64,
    ato: f64,
    three_pct: f64,
    ft: f64,
    fta: f64,
    usg: f64,
    bpm: f64,
    obpm: f64,
    dbpm: f64,
    rim_att: f64,
    stl_per: f64,
    /// A wing who plays like a guard: short, or assist-heavy, or a
    /// high-volume scorer who does not rebound.
    guard_like: bool,
}

impl RubricLine {
    fn from_profile(p: &PlayerProfile) -> RubricLine {
        let s = &p.stats;
        let h = p.height_inches;
        let guard_like = p.position == Position::Wing
            && (h <= 76.0 || (h <= 78.0 && (s.apg >= 3.5 || (s.ppg >= 18.0 && s.rpg < 5.0))));
        RubricLine {
            pos: p.position,
            height: h,
            ppg: s.ppg,
            rpg: s.rpg,
            apg: s.apg,
            spg: s.spg,
            bpg: s.bpg,
            ato: s.ato(),
            three_pct: s.three_or_neutral(),
            ft: s.ft_or_neutral(),
            fta: s.fta.unwrap_or(0.0),
            usg: s.usg.unwrap_or(0.0),
            bpm: s.bpm.unwrap_or(0.0),
            obpm: s.obpm.unwrap_or(0.0),
            dbpm: s.dbpm.unwrap_or(0.0),
            rim_att: s.rim_att.unwrap_or(0.0),
            stl_per: s.stl_per.unwrap_or(0.0),
            guard_like,
        }
    }
}

/// Points for the first threshold the value reaches, else zero.
fn tiered(value: f64, steps: &[(f64, i32)]) -> i32 {
    steps
        .iter()
        .find(|(min, _)| value >= *min)
        .map_or(0, |(_, pts)| *pts)
}

// ---------------------------------------------------------------------------
// Rubrics
// ---------------------------------------------------------------------------

fn scoring_guard(l: &RubricLine) -> i32 {
    let mut score = match l.pos {
        Position::Guard => 12,
        Position::Wing if l.guard_like => 8,
        _ => 0,
    };
    score += tiered(l.ppg, &[(20.0, 10), (16.0, 6), (12.0, 3)]);
    score += tiered(l.usg, &[(28.0, 6), (24.0, 3)]);
    score += tiered(l.fta, &[(5.0, 4), (3.0, 2)]);
    score += tiered(l.ft, &[(78.0, 3)]);
    score += tiered(l.three_pct, &[(35.0, 2)]);
    score += tiered(l.apg, &[(4.0, 2)]);
    score
}

fn playmaking_guard(l: &RubricLine) -> i32 {
    let mut score = match l.pos {
        Position::Guard => 12,
        Position::Wing if l.guard_like && l.apg >= 3.0 => 8,
        Position::Wing if l.apg >= 5.0 => 6,
        _ => 0,
    };
    score += tiered(l.apg, &[(6.0, 10), (4.5, 7), (3.5, 4), (2.5, 2)]);
    score += tiered(l.ato, &[(2.5, 6), (1.8, 4), (1.3, 2)]);
    score += tiered(l.spg, &[(1.5, 3)]);
    score += tiered(l.stl_per, &[(2.5, 3)]);
    if l.ppg < 14.0 {
        score += 2;
    }
    score
}

fn three_and_d_wing(l: &RubricLine) -> i32 {
    let mut score = match l.pos {
        Position::Wing => 8,
        Position::Guard if l.height >= 76.0 => 4,
        _ => 0,
    };
    score += tiered(l.three_pct, &[(38.0, 7), (35.0, 5), (33.0, 3)]);
    score += tiered(l.ft, &[(78.0, 3), (73.0, 1)]);
    score += tiered(l.spg, &[(1.5, 5), (1.0, 3), (0.8, 1)]);
    score += tiered(l.bpg, &[(0.8, 2)]);
    score += tiered(l.dbpm, &[(3.0, 3), (1.5, 1)]);
    // Primary scorers are not 3-and-D role players.
    score += if l.ppg < 12.0 {
        3
    } else if l.ppg < 15.0 {
        1
    } else {
        tiered(l.ppg, &[(20.0, -5), (18.0, -3)])
    };
    score
}

fn scoring_wing(l: &RubricLine) -> i32 {
    let mut score = match l.pos {
        Position::Wing => 10,
        Position::Big if l.height <= 81.0 => 5,
        Position::Guard if l.height >= 77.0 => 5,
        _ => 0,
    };
    score += tiered(l.ppg, &[(20.0, 10), (16.0, 7), (13.0, 4), (10.0, 1)]);
    score += tiered(l.usg, &[(28.0, 6), (24.0, 4), (20.0, 2)]);
    score += tiered(l.fta, &[(5.0, 4), (3.0, 2)]);
    score += tiered(l.height, &[(79.0, 3), (77.0, 1)]);
    score += tiered(l.rpg, &[(7.0, 3), (5.0, 1)]);
    score
}

fn skilled_big(l: &RubricLine) -> i32 {
    let mut score = match l.pos {
        Position::Big => 10,
        Position::Wing if l.height >= 81.0 => 5,
        _ => 0,
    };
    score += tiered(l.ft, &[(78.0, 8), (72.0, 6), (65.0, 3)]);
    score += tiered(l.three_pct, &[(33.0, 6), (25.0, 3), (15.0, 1)]);
    score += tiered(l.rpg, &[(8.0, 3), (6.0, 1)]);
    score += tiered(l.bpm, &[(6.0, 4), (3.0, 2)]);
    score += tiered(l.obpm, &[(4.0, 4), (2.0, 2)]);
    score += tiered(l.ppg, &[(15.0, 2)]);
    score
}

fn athletic_big(l: &RubricLine) -> i32 {
    let mut score = match l.pos {
        Position::Big => 10,
        Position::Wing if l.height >= 82.0 => 5,
        _ => 0,
    };
    score += tiered(l.bpg, &[(2.5, 8), (1.5, 5), (1.0, 3)]);
    score += tiered(l.rim_att, &[(4.0, 6), (2.5, 4), (1.0, 2)]);
    score += tiered(l.rpg, &[(9.0, 5), (7.0, 3), (5.0, 1)]);
    score += tiered(l.dbpm, &[(5.0, 5), (3.0, 3), (1.0, 1)]);
    // Poor touch reads as a rim-runner; good touch reads as skilled.
    score += if l.ft < 55.0 {
        4
    } else if l.ft < 65.0 {
        2
    } else {
        tiered(l.ft, &[(78.0, -4), (72.0, -2)])
    };
    score
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatBlock;

    fn profile(pos: Position, height: f64, stats: StatBlock) -> PlayerProfile {
        let mut p = PlayerProfile::new("Test", pos, height);
        p.stats = stats;
        p
    }

    fn score_of(fit: &ArchetypeFit, a: Archetype) -> i32 {
        fit.scores.iter().find(|(x, _)| *x == a).map(|(_, s)| *s).unwrap()
    }

    #[test]
    fn volume_guard_is_scoring_guard() {
        let p = profile(
            Position::Guard,
            76.0,
            StatBlock {
                ppg: 22.0,
                apg: 3.0,
                tpg: 3.0,
                usg: Some(30.0),
                fta: Some(6.0),
                ft: Some(82.0),
                ..Default::default()
            },
        );
        let fit = classify_archetype(&p);
        assert_eq!(fit.primary, Archetype::ScoringGuard);
        // 12 + 10 + 6 + 4 + 3 (+0 three at neutral 33, +0 apg)
        assert_eq!(fit.score, 35);
    }

    #[test]
    fn pass_first_guard_is_playmaker() {
        let p = profile(
            Position::Guard,
            74.0,
            StatBlock {
                ppg: 10.0,
                apg: 7.0,
                tpg: 2.0,
                spg: 1.8,
                ..Default::default()
            },
        );
        let fit = classify_archetype(&p);
        assert_eq!(fit.primary, Archetype::PlaymakingGuard);
        // 12 + 10 + 6 (ato 3.5) + 3 + 2
        assert_eq!(fit.score, 33);
    }

    #[test]
    fn shot_blocking_rim_runner_is_athletic_big() {
        let p = profile(
            Position::Big,
            83.0,
            StatBlock {
                ppg: 11.0,
                rpg: 10.0,
                bpg: 3.0,
                ft: Some(52.0),
                rim_att: Some(5.0),
                dbpm: Some(5.5),
                ..Default::default()
            },
        );
        let fit = classify_archetype(&p);
        assert_eq!(fit.primary, Archetype::AthleticBig);
        assert_eq!(fit.score, 10 + 8 + 6 + 5 + 5 + 4);
    }

    #[test]
    fn shooting_big_is_skilled_big() {
        let p = profile(
            Position::Big,
            82.0,
            StatBlock {
                ppg: 16.0,
                rpg: 8.0,
                ft: Some(80.0),
                three_pct: Some(36.0),
                ..Default::default()
            },
        );
        assert_eq!(classify_archetype(&p).primary, Archetype::SkilledBig);
    }

    #[test]
    fn short_wing_gets_guard_affinity() {
        let p = profile(
            Position::Wing,
            76.0,
            StatBlock {
                ppg: 8.0,
                ..Default::default()
            },
        );
        let fit = classify_archetype(&p);
        assert_eq!(score_of(&fit, Archetype::ScoringGuard), 8);
    }

    #[test]
    fn high_volume_scoring_subtracts_from_three_and_d() {
        let p = profile(
            Position::Wing,
            79.0,
            StatBlock {
                ppg: 21.0,
                ..Default::default()
            },
        );
        let fit = classify_archetype(&p);
        // 8 for wing, +3 neutral 33% three, -5 for 20+ ppg
        assert_eq!(score_of(&fit, Archetype::ThreeAndDWing), 6);
    }

    #[test]
    fn guard_rubrics_split_on_assists() {
        let p = profile(
            Position::Guard,
            72.0,
            StatBlock {
                ppg: 14.0,
                three_pct: Some(20.0),
                ft: Some(60.0),
                ..Default::default()
            },
        );
        let fit = classify_archetype(&p);
        assert_eq!(score_of(&fit, Archetype::ScoringGuard), 15);
        assert_eq!(score_of(&fit, Archetype::PlaymakingGuard), 12);

        let q = profile(
            Position::Guard,
            72.0,
            StatBlock {
                ppg: 14.0,
                apg: 2.5,
                three_pct: Some(20.0),
                ft: Some(60.0),
                ..Default::default()
            },
        );
        // No turnovers recorded, so ATO is the raw 2.5 assists: 12 + 2 + 6.
        let fit = classify_archetype(&q);
        assert_eq!(score_of(&fit, Archetype::PlaymakingGuard), 20);
        assert_eq!(fit.primary, Archetype::PlaymakingGuard);
        assert_eq!(fit.secondary, Archetype::ScoringGuard);
    }

    #[test]
    fn ties_resolve_to_first_rubric() {
        let p = profile(
            Position::Big,
            83.0,
            StatBlock {
                bpg: 1.0,
                ft: Some(66.0),
                three_pct: Some(0.0),
                ..Default::default()
            },
        );
        let fit = classify_archetype(&p);
        assert_eq!(score_of(&fit, Archetype::SkilledBig), 13);
        assert_eq!(score_of(&fit, Archetype::AthleticBig), 13);
        assert_eq!(fit.primary, Archetype::SkilledBig);
        assert_eq!(fit.secondary, Archetype::AthleticBig);
    }

    #[test]
    fn classification_is_idempotent() {
        let p = profile(
            Position::Wing,
            79.0,
            StatBlock {
                ppg: 14.0,
                rpg: 6.0,
                spg: 1.2,
                three_pct: Some(37.0),
                ..Default::default()
            },
        );
        assert_eq!(classify_archetype(&p), classify_archetype(&p));
    }

    #[test]
    fn archetype_serde_names() {
        let json = serde_json::to_string(&Archetype::ThreeAndDWing).unwrap();
        assert_eq!(json, "\"3&D Wing\"");
        let a: Archetype = serde_json::from_str("\"Athletic Big\"").unwrap();
        assert_eq!(a, Archetype::AthleticBig);
    }
}
