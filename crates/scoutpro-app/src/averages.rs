// Positional averages: the per-position baselines the similarity engine
// measures outlier stats against.

use crate::database::DataError;
use scoutpro_core::config::{PositionAverages, PositionalAverages};
use scoutpro_core::{HistoricalPlayer, Position};
use std::path::Path;
use tracing::{debug, info};

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

#[derive(Default)]
struct Accumulator {
    players: usize,
    ppg: Vec<f64>,
    rpg: Vec<f64>,
    apg: Vec<f64>,
    spg: Vec<f64>,
    bpg: Vec<f64>,
    tpg: Vec<f64>,
    fg: Vec<f64>,
    three_pct: Vec<f64>,
    ft: Vec<f64>,
}

impl Accumulator {
    fn add(&mut self, player: &HistoricalPlayer) {
        let s = player.stats();
        self.players += 1;
        self.ppg.push(s.ppg);
        self.rpg.push(s.rpg);
        self.apg.push(s.apg);
        self.spg.push(s.spg);
        self.bpg.push(s.bpg);
        self.tpg.push(s.tpg);
        self.fg.extend(s.fg);
        self.three_pct.extend(s.three_pct);
        self.ft.extend(s.ft);
    }

    /// Means rounded to one decimal; stats with no samples keep `fallback`.
    fn finish(&self, fallback: &PositionAverages) -> PositionAverages {
        let mean = |values: &[f64], fallback: f64| {
            if values.is_empty() {
                fallback
            } else {
                round_to(values.iter().sum::<f64>() / values.len() as f64, 1)
            }
        };
        let apg = mean(&self.apg, fallback.apg);
        let tpg = mean(&self.tpg, fallback.tpg);
        PositionAverages {
            ppg: mean(&self.ppg, fallback.ppg),
            rpg: mean(&self.rpg, fallback.rpg),
            apg,
            spg: mean(&self.spg, fallback.spg),
            bpg: mean(&self.bpg, fallback.bpg),
            fg: mean(&self.fg, fallback.fg),
            three_pct: mean(&self.three_pct, fallback.three_pct),
            ft: mean(&self.ft, fallback.ft),
            tpg,
            ato: if tpg > 0.0 { round_to(apg / tpg, 2) } else { 1.0 },
        }
    }
}

/// Per-position means over every record with college stats. Positions with
/// no qualifying players keep `fallback`'s entry.
pub fn compute_positional_averages(
    players: &[HistoricalPlayer],
    fallback: &PositionalAverages,
) -> PositionalAverages {
    let mut guard = Accumulator::default();
    let mut wing = Accumulator::default();
    let mut big = Accumulator::default();

    for player in players.iter().filter(|p| p.has_college_stats) {
        match player.profile.position {
            Position::Guard => guard.add(player),
            Position::Wing => wing.add(player),
            Position::Big => big.add(player),
        }
    }

    let mut out = fallback.clone();
    for (position, acc) in [
        (Position::Guard, &guard),
        (Position::Wing, &wing),
        (Position::Big, &big),
    ] {
        if acc.players == 0 {
            debug!("no {} players with college stats; keeping fallback averages", position);
            continue;
        }
        *out.for_position_mut(position) = acc.finish(fallback.for_position(position));
    }
    out
}

/// Load averages written by `save_positional_averages` (or the pipeline's
/// `{"G": {...}, "W": {...}, "B": {...}}` shape).
pub fn load_positional_averages(path: &Path) -> Result<PositionalAverages, DataError> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let averages = serde_json::from_str(&text).map_err(|e| DataError::Json {
        path: path.display().to_string(),
        source: e,
    })?;
    info!("Loaded positional averages from {}", path.display());
    Ok(averages)
}

pub fn save_positional_averages(path: &Path, averages: &PositionalAverages) -> Result<(), DataError> {
    let json = serde_json::to_string_pretty(averages).map_err(|e| DataError::Json {
        path: path.display().to_string(),
        source: e,
    })?;
    std::fs::write(path, json).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use scoutpro_core::{OutcomeTier, PlayerProfile, StatBlock};

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn player(pos: Position, ppg: f64, apg: f64, tpg: f64, ft: Option<f64>) -> HistoricalPlayer {
        let mut profile = PlayerProfile::new("P", pos, 78.0);
        profile.stats = StatBlock {
            ppg,
            apg,
            tpg,
            ft,
            ..Default::default()
        };
        HistoricalPlayer::new(profile, OutcomeTier::TooEarly)
    }

    #[test]
    fn means_per_position() {
        let players = vec![
            player(Position::Guard, 10.0, 4.0, 2.0, Some(70.0)),
            player(Position::Guard, 15.0, 5.0, 3.0, None),
            player(Position::Big, 12.0, 1.0, 0.0, Some(60.0)),
        ];
        let fallback = PositionalAverages::default();
        let avgs = compute_positional_averages(&players, &fallback);

        assert!(approx_eq(avgs.guard.ppg, 12.5, 1e-9));
        assert!(approx_eq(avgs.guard.apg, 4.5, 1e-9));
        assert!(approx_eq(avgs.guard.ato, 1.8, 1e-9));
        // Absent FT is skipped, not averaged as zero.
        assert!(approx_eq(avgs.guard.ft, 70.0, 1e-9));
        // No FG samples: keeps the fallback.
        assert_eq!(avgs.guard.fg, fallback.guard.fg);
        // Zero turnovers: neutral ratio.
        assert_eq!(avgs.big.ato, 1.0);
        // No wings at all.
        assert_eq!(avgs.wing, fallback.wing);
    }

    #[test]
    fn records_without_college_stats_are_ignored() {
        let mut p = player(Position::Guard, 40.0, 1.0, 1.0, None);
        p.has_college_stats = false;
        let fallback = PositionalAverages::default();
        let avgs = compute_positional_averages(&[p], &fallback);
        assert_eq!(avgs.guard, fallback.guard);
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("averages.json");
        let mut avgs = PositionalAverages::default();
        avgs.big.apg = 2.3;
        save_positional_averages(&path, &avgs).unwrap();
        assert_eq!(load_positional_averages(&path).unwrap(), avgs);
    }

    #[test]
    fn loads_pipeline_shape() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("positional_avgs.json");
        std::fs::write(
            &path,
            r#"{"G": {"ppg": 13.1, "threeP": 35.2}, "B": {"rpg": 8.0}}"#,
        )
        .unwrap();
        let avgs = load_positional_averages(&path).unwrap();
        assert_eq!(avgs.guard.ppg, 13.1);
        assert_eq!(avgs.guard.three_pct, 35.2);
        assert_eq!(avgs.big.rpg, 8.0);
    }
}
