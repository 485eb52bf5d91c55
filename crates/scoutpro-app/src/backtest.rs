// Leave-one-year-out backtest: hold out each draft class, project it from
// the rest of the database, and score the projections against real outcomes.

use chrono::{DateTime, Utc};
use scoutpro_core::{find_top_matches, predict_tier, CompMatch, HistoricalPlayer, ScoringConfig, Tier};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BacktestOptions {
    pub first_year: u16,
    pub last_year: u16,
    /// Comps averaged into the comp-based tier.
    pub top_n: usize,
}

impl Default for BacktestOptions {
    fn default() -> Self {
        BacktestOptions {
            first_year: 2009,
            last_year: 2019,
            top_n: 5,
        }
    }
}

/// One held-out player's projections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeldOut {
    pub name: String,
    pub year: u16,
    pub pick: u16,
    pub actual: Tier,
    /// Rule-based projection using the real draft slot.
    pub model_tier: Tier,
    /// Similarity-weighted mean tier of the top comps.
    pub comp_tier: Tier,
    pub top_comp: Option<String>,
    pub top_score: f64,
}

impl HeldOut {
    fn error(predicted: Tier, actual: Tier) -> i32 {
        predicted.number() as i32 - actual.number() as i32
    }

    pub fn model_error(&self) -> i32 {
        Self::error(self.model_tier, self.actual)
    }

    pub fn comp_error(&self) -> i32 {
        Self::error(self.comp_tier, self.actual)
    }
}

/// Exact and within-one hit counts for one predictor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Accuracy {
    pub n: usize,
    pub exact: usize,
    pub within_one: usize,
    pub rmse: f64,
    /// Actual tier 1-2 players projected at tier 1-2.
    pub stars_found: usize,
    pub stars: usize,
    /// Actual tier 5 players projected at tier 4-5.
    pub busts_found: usize,
    pub busts: usize,
}

impl Accuracy {
    fn from_pairs(pairs: impl Iterator<Item = (Tier, Tier)>) -> Accuracy {
        let mut acc = Accuracy::default();
        let mut squared = 0.0;
        for (predicted, actual) in pairs {
            let err = HeldOut::error(predicted, actual);
            acc.n += 1;
            if err == 0 {
                acc.exact += 1;
            }
            if err.abs() <= 1 {
                acc.within_one += 1;
            }
            squared += (err * err) as f64;
            if actual <= Tier::AllStar {
                acc.stars += 1;
                if predicted <= Tier::AllStar {
                    acc.stars_found += 1;
                }
            }
            if actual == Tier::Bust {
                acc.busts += 1;
                if predicted >= Tier::RolePlayer {
                    acc.busts_found += 1;
                }
            }
        }
        if acc.n > 0 {
            acc.rmse = (squared / acc.n as f64).sqrt();
        }
        acc
    }

    pub fn exact_rate(&self) -> f64 {
        rate(self.exact, self.n)
    }

    pub fn within_one_rate(&self) -> f64 {
        rate(self.within_one, self.n)
    }
}

fn rate(hits: usize, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        hits as f64 / n as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearResult {
    pub year: u16,
    pub model: Accuracy,
    pub comps: Accuracy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestSummary {
    pub profile: String,
    pub generated_at: DateTime<Utc>,
    pub first_year: u16,
    pub last_year: u16,
    pub years: Vec<YearResult>,
    pub model: Accuracy,
    pub comps: Accuracy,
    pub players: Vec<HeldOut>,
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// Similarity-weighted mean tier of a comp list, rounded. Tier 5 when there
/// is nothing to average.
pub fn comp_tier(matches: &[CompMatch]) -> Tier {
    let total: f64 = matches.iter().map(|m| m.score()).sum();
    if total <= 0.0 {
        return Tier::Bust;
    }
    let weighted: f64 = matches
        .iter()
        .map(|m| m.score() * m.tier.number() as f64)
        .sum();
    Tier::clamped((weighted / total).round() as i32)
}

/// Whether a player of `year` is held out and graded: drafted in the top 60,
/// with college stats, a career win-share figure, a graded outcome, and
/// enough games and minutes.
fn held_out_tier(player: &HistoricalPlayer, year: u16, config: &ScoringConfig) -> Option<(u16, Tier)> {
    if player.draft_year != Some(year) || !player.has_college_stats {
        return None;
    }
    let pick = player.draft_pick.filter(|p| (1..=60).contains(p))?;
    player.nba_win_shares?;
    let stats = player.stats();
    if stats.games() < config.pool.min_games || stats.minutes() < config.pool.min_minutes {
        return None;
    }
    player.graded_tier().map(|t| (pick, t))
}

pub fn run_backtest(
    db: &[HistoricalPlayer],
    config: &ScoringConfig,
    options: &BacktestOptions,
) -> BacktestSummary {
    let mut players = Vec::new();
    let mut years = Vec::new();

    for year in options.first_year..=options.last_year {
        let train: Vec<HistoricalPlayer> = db
            .iter()
            .filter(|p| p.draft_year != Some(year))
            .cloned()
            .collect();

        let mut held = Vec::new();
        for player in db {
            let Some((pick, actual)) = held_out_tier(player, year, config) else {
                continue;
            };
            let prospect = &player.profile;
            let matches = find_top_matches(prospect, &train, options.top_n, config);
            let model_tier = predict_tier(prospect, Some(pick), config).tier;
            held.push(HeldOut {
                name: player.name().to_string(),
                year,
                pick,
                actual,
                model_tier,
                comp_tier: comp_tier(&matches),
                top_comp: matches.first().map(|m| m.player.name().to_string()),
                top_score: matches.first().map_or(0.0, |m| m.score()),
            });
        }

        if held.is_empty() {
            debug!("{}: no testable players", year);
            continue;
        }

        let result = YearResult {
            year,
            model: Accuracy::from_pairs(held.iter().map(|h| (h.model_tier, h.actual))),
            comps: Accuracy::from_pairs(held.iter().map(|h| (h.comp_tier, h.actual))),
        };
        info!(
            "[{}] {}: {} players, model exact {}/{}, comps exact {}/{}",
            config.name,
            year,
            held.len(),
            result.model.exact,
            result.model.n,
            result.comps.exact,
            result.comps.n
        );
        years.push(result);
        players.extend(held);
    }

    BacktestSummary {
        profile: config.name.clone(),
        generated_at: Utc::now(),
        first_year: options.first_year,
        last_year: options.last_year,
        model: Accuracy::from_pairs(players.iter().map(|h| (h.model_tier, h.actual))),
        comps: Accuracy::from_pairs(players.iter().map(|h| (h.comp_tier, h.actual))),
        years,
        players,
    }
}

impl BacktestSummary {
    /// Actual-by-predicted counts for the comp-based tier, indexed
    /// `[actual - 1][predicted - 1]`.
    pub fn comp_confusion(&self) -> [[usize; 5]; 5] {
        let mut grid = [[0usize; 5]; 5];
        for h in &self.players {
            grid[h.actual.number() as usize - 1][h.comp_tier.number() as usize - 1] += 1;
        }
        grid
    }

    /// Held-out players with the largest comp-tier miss, worst first.
    pub fn biggest_misses(&self, n: usize) -> Vec<&HeldOut> {
        let mut sorted: Vec<&HeldOut> = self.players.iter().collect();
        sorted.sort_by_key(|h| std::cmp::Reverse(h.comp_error().abs()));
        sorted.truncate(n);
        sorted
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn pct(r: f64) -> String {
    format!("{:.1}%", r * 100.0)
}

impl fmt::Display for BacktestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Backtest [{}] {}-{} (generated {})",
            self.profile,
            self.first_year,
            self.last_year,
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        )?;
        writeln!(f, "{:>6} {:>4}  {:>8} {:>8}  {:>8} {:>8}", "year", "n", "model", "model±1", "comps", "comps±1")?;
        for y in &self.years {
            writeln!(
                f,
                "{:>6} {:>4}  {:>8} {:>8}  {:>8} {:>8}",
                y.year,
                y.model.n,
                pct(y.model.exact_rate()),
                pct(y.model.within_one_rate()),
                pct(y.comps.exact_rate()),
                pct(y.comps.within_one_rate())
            )?;
        }
        if self.players.is_empty() {
            return writeln!(f, "No testable players found.");
        }

        writeln!(f)?;
        for (name, acc) in [("model", &self.model), ("comps", &self.comps)] {
            writeln!(
                f,
                "{name:>6}: exact {} | within-1 {} | RMSE {:.2} | stars {}/{} | busts {}/{}",
                pct(acc.exact_rate()),
                pct(acc.within_one_rate()),
                acc.rmse,
                acc.stars_found,
                acc.stars,
                acc.busts_found,
                acc.busts
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Comp confusion (rows actual, columns predicted):")?;
        for (i, row) in self.comp_confusion().iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|c| format!("{c:>5}")).collect();
            writeln!(f, "  T{} {}", i + 1, cells.join(""))?;
        }

        writeln!(f)?;
        writeln!(f, "Biggest misses:")?;
        for h in self.biggest_misses(5) {
            writeln!(
                f,
                "  {:<24} #{:<2} {} actual {} comps {} model {} (top comp {})",
                h.name,
                h.pick,
                h.year,
                h.actual,
                h.comp_tier,
                h.model_tier,
                h.top_comp.as_deref().unwrap_or("none")
            )?;
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

    fn player(name: &str, year: u16, pick: u16, tier: u8, ppg: f64) -> HistoricalPlayer {
        let mut profile = PlayerProfile::new(name, Position::Wing, 79.0);
        profile.stats = StatBlock {
            ppg,
            rpg: 5.0,
            apg: 2.0,
            tpg: 1.5,
            mpg: Some(30.0),
            gp: Some(32.0),
            fg: Some(50.0),
            ft: Some(74.0),
            ..Default::default()
        };
        let mut p = HistoricalPlayer::new(profile, OutcomeTier::try_from(tier).unwrap());
        p.draft_year = Some(year);
        p.draft_pick = Some(pick);
        p.nba_win_shares = Some(10.0);
        p
    }

    #[test]
    fn comp_tier_is_similarity_weighted() {
        let db = vec![player("A", 2010, 3, 1, 20.0), player("B", 2010, 30, 4, 20.0)];
        let prospect = player("P", 2012, 5, 2, 20.0).profile;
        let matches = find_top_matches(&prospect, &db, 5, &ScoringConfig::default());
        // Identical scores: (1 + 4) / 2 = 2.5 rounds to 3.
        assert_eq!(comp_tier(&matches), Tier::Starter);
        assert_eq!(comp_tier(&[]), Tier::Bust);
    }

    #[test]
    fn holds_out_one_year_at_a_time() {
        let db = vec![
            player("Train A", 2010, 3, 2, 18.0),
            player("Train B", 2010, 40, 5, 6.0),
            player("Test A", 2011, 5, 2, 18.0),
            player("Test B", 2011, 45, 5, 6.0),
        ];
        let options = BacktestOptions {
            first_year: 2011,
            last_year: 2011,
            top_n: 1,
        };
        let summary = run_backtest(&db, &ScoringConfig::default(), &options);
        assert_eq!(summary.years.len(), 1);
        assert_eq!(summary.players.len(), 2);
        let a = &summary.players[0];
        assert_eq!(a.top_comp.as_deref(), Some("Train A"));
        assert_eq!(a.comp_tier, Tier::AllStar);
        let b = &summary.players[1];
        assert_eq!(b.top_comp.as_deref(), Some("Train B"));
        assert_eq!(summary.comps.exact, 2);
        assert_eq!(summary.comps.stars, 1);
        assert_eq!(summary.comps.busts_found, 1);
    }

    #[test]
    fn ineligible_players_are_not_held_out() {
        let mut undrafted = player("Undrafted", 2011, 61, 5, 6.0);
        undrafted.draft_pick = None;
        let mut ungraded = player("Ungraded", 2011, 10, 6, 12.0);
        ungraded.nba_win_shares = None;
        let mut short = player("Short", 2011, 10, 3, 12.0);
        short.profile.stats.gp = Some(12.0);
        let db = vec![player("Train", 2010, 3, 2, 18.0), undrafted, ungraded, short];

        let options = BacktestOptions {
            first_year: 2011,
            last_year: 2011,
            top_n: 5,
        };
        let summary = run_backtest(&db, &ScoringConfig::default(), &options);
        assert!(summary.players.is_empty());
        assert!(summary.years.is_empty());
        assert!(summary.to_string().contains("No testable players found."));
    }

    #[test]
    fn accuracy_counts_and_rmse() {
        let acc = Accuracy::from_pairs(
            [
                (Tier::AllStar, Tier::AllStar),
                (Tier::Starter, Tier::AllStar),
                (Tier::Bust, Tier::Superstar),
            ]
            .into_iter(),
        );
        assert_eq!(acc.n, 3);
        assert_eq!(acc.exact, 1);
        assert_eq!(acc.within_one, 2);
        assert!((acc.rmse - (17.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(acc.stars, 3);
        assert_eq!(acc.stars_found, 1);
    }
}
