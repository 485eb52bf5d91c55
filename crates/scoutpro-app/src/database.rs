// Player database and prospect loading.
//
// The historical database comes from the scraping pipeline as either a JSON
// array of player records or a flat CSV export. Prospects are hand-entered
// TOML or JSON files.

use scoutpro_core::{
    ClassYear, CompetitionLevel, HistoricalPlayer, OutcomeTier, PlayerProfile, Position,
    StatBlock,
};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A prospect under evaluation, optionally with a known draft slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    #[serde(flatten)]
    pub profile: PlayerProfile,
    #[serde(default)]
    pub draft_pick: Option<u16>,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("TOML error in {path}: {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

/// Flat export row. Every column but `name` may be blank; unknown columns
/// are ignored.
#[derive(Debug, Deserialize)]
struct RawPlayerRow {
    name: String,
    #[serde(default, alias = "position")]
    pos: Option<String>,
    #[serde(default, alias = "height")]
    h: Option<f64>,
    #[serde(default, alias = "weight")]
    w: Option<f64>,
    #[serde(default, alias = "wingspan")]
    ws: Option<f64>,
    #[serde(default, alias = "class_year")]
    age: Option<u8>,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    conf: Option<String>,
    #[serde(default)]
    draft_year: Option<u16>,
    #[serde(default)]
    draft_pick: Option<u16>,
    #[serde(default)]
    nba_ws: Option<f64>,
    #[serde(default)]
    tier: Option<u8>,
    #[serde(default)]
    excluded: Option<bool>,
    #[serde(default)]
    has_college_stats: Option<bool>,
    #[serde(default)]
    ppg: Option<f64>,
    #[serde(default)]
    rpg: Option<f64>,
    #[serde(default)]
    apg: Option<f64>,
    #[serde(default)]
    spg: Option<f64>,
    #[serde(default)]
    bpg: Option<f64>,
    #[serde(default)]
    tpg: Option<f64>,
    #[serde(default)]
    mpg: Option<f64>,
    #[serde(default)]
    gp: Option<f64>,
    #[serde(default)]
    fg: Option<f64>,
    #[serde(default, alias = "threeP")]
    three_pct: Option<f64>,
    #[serde(default)]
    ft: Option<f64>,
    #[serde(default)]
    bpm: Option<f64>,
    #[serde(default)]
    obpm: Option<f64>,
    #[serde(default)]
    dbpm: Option<f64>,
    #[serde(default)]
    usg: Option<f64>,
    #[serde(default)]
    fta: Option<f64>,
    #[serde(default)]
    stl_per: Option<f64>,
    #[serde(default)]
    rim_att: Option<f64>,
    #[serde(default)]
    rim_made: Option<f64>,
    #[serde(default)]
    tpa: Option<f64>,
}

impl RawPlayerRow {
    fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        [
            self.h, self.w, self.ws, self.nba_ws, self.ppg, self.rpg, self.apg, self.spg,
            self.bpg, self.tpg, self.mpg, self.gp, self.fg, self.three_pct, self.ft, self.bpm,
            self.obpm, self.dbpm, self.usg, self.fta, self.stl_per, self.rim_att, self.rim_made,
            self.tpa,
        ]
        .into_iter()
        .flatten()
    }

    fn into_player(self) -> Result<HistoricalPlayer, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("empty name".into());
        }
        if self.numbers().any(|v| !v.is_finite()) {
            return Err(format!("'{name}': non-finite stat value"));
        }
        let outcome = match self.tier {
            Some(t) => OutcomeTier::try_from(t).map_err(|e| format!("'{name}': {e}"))?,
            None => OutcomeTier::TooEarly,
        };
        let class_year = match self.age {
            Some(n) => Some(ClassYear::try_from(n).map_err(|e| format!("'{name}': {e}"))?),
            None => None,
        };

        let height = self.h.unwrap_or(scoutpro_core::stats::NEUTRAL_HEIGHT);
        let position = self
            .pos
            .as_deref()
            .and_then(Position::from_str_pos)
            .unwrap_or_else(|| Position::from_height(height));
        let competition_level = match (self.level.as_deref(), self.conf.as_deref()) {
            (Some(l), _) if !l.trim().is_empty() => CompetitionLevel::from_label(l),
            (_, Some(c)) if !c.trim().is_empty() => CompetitionLevel::from_conference(c),
            _ => CompetitionLevel::default(),
        };

        let stats = StatBlock {
            ppg: self.ppg.unwrap_or(0.0),
            rpg: self.rpg.unwrap_or(0.0),
            apg: self.apg.unwrap_or(0.0),
            spg: self.spg.unwrap_or(0.0),
            bpg: self.bpg.unwrap_or(0.0),
            tpg: self.tpg.unwrap_or(0.0),
            mpg: self.mpg,
            gp: self.gp,
            fg: self.fg,
            three_pct: self.three_pct,
            ft: self.ft,
            bpm: self.bpm,
            obpm: self.obpm,
            dbpm: self.dbpm,
            usg: self.usg,
            fta: self.fta,
            stl_per: self.stl_per,
            rim_att: self.rim_att,
            rim_made: self.rim_made,
            tpa: self.tpa,
        };

        let profile = PlayerProfile {
            name,
            position,
            height_inches: height,
            weight_lbs: self.w,
            wingspan_inches: self.ws,
            class_year,
            competition_level,
            stats,
        };
        let mut player = HistoricalPlayer::new(profile, outcome);
        player.draft_year = self.draft_year;
        player.draft_pick = self.draft_pick;
        player.nba_win_shares = self.nba_ws;
        player.excluded = self.excluded.unwrap_or(false);
        player.has_college_stats = self.has_college_stats.unwrap_or(true);
        Ok(player)
    }
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_players_from_csv_reader<R: Read>(rdr: R) -> Result<Vec<HistoricalPlayer>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawPlayerRow>() {
        match result {
            Ok(raw) => match raw.into_player() {
                Ok(player) => players.push(player),
                Err(reason) => warn!("skipping player row: {}", reason),
            },
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(players)
}

fn load_players_from_json_reader<R: Read>(rdr: R) -> Result<Vec<HistoricalPlayer>, serde_json::Error> {
    let entries: Vec<serde_json::Value> = serde_json::from_reader(rdr)?;
    let mut players = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<HistoricalPlayer>(entry) {
            Ok(player) if player.name().trim().is_empty() => {
                warn!("skipping player entry {}: empty name", i);
            }
            Ok(player) => players.push(player),
            Err(e) => {
                warn!("skipping malformed player entry {}: {}", i, e);
            }
        }
    }
    Ok(players)
}

/// Prospect files hold one prospect, a bare list, or a `prospect` table array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProspectDoc {
    Table {
        #[serde(alias = "prospect")]
        prospects: Vec<Prospect>,
    },
    List(Vec<Prospect>),
    Single(Prospect),
}

impl ProspectDoc {
    fn into_vec(self) -> Vec<Prospect> {
        match self {
            ProspectDoc::Table { prospects } | ProspectDoc::List(prospects) => prospects,
            ProspectDoc::Single(p) => vec![p],
        }
    }
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, DataError> {
    std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// Load the historical player database from a `.json` or `.csv` file.
/// Malformed entries are skipped with a warning; an empty result is an error.
/// Archetypes are classified up front for records that carry none.
pub fn load_player_db(path: &Path) -> Result<Vec<HistoricalPlayer>, DataError> {
    let file = open(path)?;
    let mut players = if is_csv(path) {
        load_players_from_csv_reader(file).map_err(|e| DataError::Csv {
            path: path.display().to_string(),
            source: e,
        })?
    } else {
        load_players_from_json_reader(std::io::BufReader::new(file)).map_err(|e| {
            DataError::Json {
                path: path.display().to_string(),
                source: e,
            }
        })?
    };

    if players.is_empty() {
        return Err(DataError::Validation(format!(
            "player database {} produced zero valid records",
            path.display()
        )));
    }

    for player in &mut players {
        player.cache_archetype();
    }
    info!("Loaded {} players from {}", players.len(), path.display());
    Ok(players)
}

/// Load prospects from a `.toml` or `.json` file.
pub fn load_prospects(path: &Path) -> Result<Vec<Prospect>, DataError> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    let doc: ProspectDoc = if is_toml {
        toml::from_str(&text).map_err(|e| DataError::Toml {
            path: path.display().to_string(),
            source: e,
        })?
    } else {
        serde_json::from_str(&text).map_err(|e| DataError::Json {
            path: path.display().to_string(),
            source: e,
        })?
    };

    let prospects = doc.into_vec();
    if prospects.is_empty() {
        return Err(DataError::Validation(format!(
            "{} contains no prospects",
            path.display()
        )));
    }
    Ok(prospects)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
