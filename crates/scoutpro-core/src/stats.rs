// Player records and the closed vocabularies they are built from.
//
// Stat fields that can legitimately be unknown are `Option<f64>`. Each one has
// a resolution helper on `StatBlock` documenting its neutral default, so the
// "absent vs. zero" distinction lives in the type instead of at call sites.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::archetype::{classify_archetype, Archetype};

/// Minutes per game assumed when the value is unknown or degenerate.
pub const NEUTRAL_MPG: f64 = 30.0;
/// Effective FG% assumed when unknown.
pub const NEUTRAL_FG: f64 = 45.0;
/// Three-point% assumed when unknown.
pub const NEUTRAL_THREE_PCT: f64 = 33.0;
/// Free-throw% assumed when unknown.
pub const NEUTRAL_FT: f64 = 70.0;
/// Height (inches) assumed when a record carries none.
pub const NEUTRAL_HEIGHT: f64 = 78.0;
/// Games played assumed when unknown (passes the sample-size filter).
pub const NEUTRAL_GAMES: f64 = 30.0;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Listed position bucket. Unrecognized labels resolve to `Wing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Position {
    Guard,
    #[default]
    Wing,
    Big,
}

impl Position {
    /// Parse a position label ("G", "W", "B", or the spelled-out names).
    /// Returns `None` for anything else.
    pub fn from_str_pos(s: &str) -> Option<Position> {
        match s.trim().to_ascii_uppercase().as_str() {
            "G" | "GUARD" | "PG" | "SG" => Some(Position::Guard),
            "W" | "WING" | "SF" | "F" => Some(Position::Wing),
            "B" | "BIG" | "PF" | "C" => Some(Position::Big),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Position::Guard => "G",
            Position::Wing => "W",
            Position::Big => "B",
        }
    }

    /// Ordinal on the guard-to-big axis, used for position-gap distance.
    pub fn axis(self) -> u8 {
        match self {
            Position::Guard => 0,
            Position::Wing => 1,
            Position::Big => 2,
        }
    }

    /// Bucket a player purely by height, the way the pipeline does when no
    /// listed position exists.
    pub fn from_height(height_inches: f64) -> Position {
        if height_inches < 76.0 {
            Position::Guard
        } else if height_inches > 81.0 {
            Position::Big
        } else {
            Position::Wing
        }
    }
}

impl From<String> for Position {
    fn from(s: String) -> Self {
        Position::from_str_pos(&s).unwrap_or_default()
    }
}

impl From<Position> for String {
    fn from(p: Position) -> Self {
        p.code().to_string()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Competition level
// ---------------------------------------------------------------------------

/// Conference-strength context a stat line was earned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompetitionLevel {
    #[default]
    HighMajor,
    MidMajor,
    LowMajor,
    /// Label not recognized; scored with the neutral modifier.
    Unknown,
}

const HIGH_MAJOR_CONFERENCES: &[&str] = &[
    "ACC", "B12", "B10", "SEC", "P10", "P12", "BE", "Big East", "Pac-12", "Big 12", "Big Ten",
];

const MID_MAJOR_CONFERENCES: &[&str] = &["A10", "MWC", "WCC", "AAC", "Amer", "CUSA", "MAC"];

impl CompetitionLevel {
    pub fn from_label(s: &str) -> CompetitionLevel {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "highmajor" | "hm" | "high" => CompetitionLevel::HighMajor,
            "midmajor" | "mm" | "mid" => CompetitionLevel::MidMajor,
            "lowmajor" | "lm" | "low" => CompetitionLevel::LowMajor,
            _ => CompetitionLevel::Unknown,
        }
    }

    /// Map a conference abbreviation to its level. Conferences on neither
    /// list are low major.
    pub fn from_conference(conf: &str) -> CompetitionLevel {
        let conf = conf.trim();
        if HIGH_MAJOR_CONFERENCES.contains(&conf) {
            CompetitionLevel::HighMajor
        } else if MID_MAJOR_CONFERENCES.contains(&conf) {
            CompetitionLevel::MidMajor
        } else {
            CompetitionLevel::LowMajor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CompetitionLevel::HighMajor => "High Major",
            CompetitionLevel::MidMajor => "Mid Major",
            CompetitionLevel::LowMajor => "Low Major",
            CompetitionLevel::Unknown => "Unknown",
        }
    }
}

impl From<String> for CompetitionLevel {
    fn from(s: String) -> Self {
        CompetitionLevel::from_label(&s)
    }
}

impl From<CompetitionLevel> for String {
    fn from(level: CompetitionLevel) -> Self {
        level.label().to_string()
    }
}

impl fmt::Display for CompetitionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Class year
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ClassYear {
    Freshman = 1,
    Sophomore = 2,
    Junior = 3,
    Senior = 4,
}

impl ClassYear {
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Parse "Fr"/"So"/"Jr"/"Sr" (any case).
    pub fn from_abbrev(s: &str) -> Option<ClassYear> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" => Some(ClassYear::Freshman),
            "so" => Some(ClassYear::Sophomore),
            "jr" => Some(ClassYear::Junior),
            "sr" => Some(ClassYear::Senior),
            _ => None,
        }
    }
}

impl TryFrom<u8> for ClassYear {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(ClassYear::Freshman),
            2 => Ok(ClassYear::Sophomore),
            3 => Ok(ClassYear::Junior),
            4 => Ok(ClassYear::Senior),
            other => Err(format!("class year must be 1-4, got {other}")),
        }
    }
}

impl From<ClassYear> for u8 {
    fn from(c: ClassYear) -> Self {
        c.number()
    }
}

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// NBA outcome bucket. Tier 1 is best; ordering follows the number, so
/// `Superstar < Bust`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tier {
    Superstar = 1,
    AllStar = 2,
    Starter = 3,
    RolePlayer = 4,
    Bust = 5,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Superstar,
        Tier::AllStar,
        Tier::Starter,
        Tier::RolePlayer,
        Tier::Bust,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Tier> {
        match n {
            1 => Some(Tier::Superstar),
            2 => Some(Tier::AllStar),
            3 => Some(Tier::Starter),
            4 => Some(Tier::RolePlayer),
            5 => Some(Tier::Bust),
            _ => None,
        }
    }

    /// Clamp an arbitrary integer into the tier range.
    pub fn clamped(n: i32) -> Tier {
        Tier::from_number(n.clamp(1, 5) as u8).unwrap_or(Tier::Bust)
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Superstar => "Superstar / MVP",
            Tier::AllStar => "All-Star",
            Tier::Starter => "Solid Starter",
            Tier::RolePlayer => "Role Player",
            Tier::Bust => "Bust / Out of League",
        }
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Tier::from_number(n).ok_or_else(|| format!("tier must be 1-5, got {n}"))
    }
}

impl From<Tier> for u8 {
    fn from(t: Tier) -> Self {
        t.number()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.number())
    }
}

/// Realized outcome of a historical player. Recent draftees have not played
/// long enough to grade; the pipeline writes them as tier 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OutcomeTier {
    Graded(Tier),
    #[default]
    TooEarly,
}

impl OutcomeTier {
    pub const TOO_EARLY_CODE: u8 = 6;

    pub fn graded(self) -> Option<Tier> {
        match self {
            OutcomeTier::Graded(t) => Some(t),
            OutcomeTier::TooEarly => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OutcomeTier::Graded(t) => t.label(),
            OutcomeTier::TooEarly => "Too Early to Grade",
        }
    }
}

impl TryFrom<u8> for OutcomeTier {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        if n == Self::TOO_EARLY_CODE {
            return Ok(OutcomeTier::TooEarly);
        }
        Tier::from_number(n)
            .map(OutcomeTier::Graded)
            .ok_or_else(|| format!("outcome tier must be 1-6, got {n}"))
    }
}

impl From<OutcomeTier> for u8 {
    fn from(t: OutcomeTier) -> Self {
        match t {
            OutcomeTier::Graded(tier) => tier.number(),
            OutcomeTier::TooEarly => OutcomeTier::TOO_EARLY_CODE,
        }
    }
}

// ---------------------------------------------------------------------------
// Stat keys
// ---------------------------------------------------------------------------

/// Every stat the engine can range-normalize, weight, or threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    Ppg,
    Rpg,
    Apg,
    Spg,
    Bpg,
    Tpg,
    Mpg,
    /// Effective field-goal percentage.
    Fg,
    #[serde(alias = "threeP")]
    ThreePct,
    Ft,
    Ato,
    Height,
    Weight,
    #[serde(alias = "ws")]
    Wingspan,
    #[serde(alias = "age")]
    ClassYear,
    Bpm,
    Obpm,
    Dbpm,
    /// Free-throw attempts per game.
    #[serde(alias = "fta_pg")]
    Fta,
    StlPer,
    Usg,
    RimAtt,
    RimMade,
    Tpa,
}

impl StatKey {
    pub fn name(self) -> &'static str {
        match self {
            StatKey::Ppg => "ppg",
            StatKey::Rpg => "rpg",
            StatKey::Apg => "apg",
            StatKey::Spg => "spg",
            StatKey::Bpg => "bpg",
            StatKey::Tpg => "tpg",
            StatKey::Mpg => "mpg",
            StatKey::Fg => "fg",
            StatKey::ThreePct => "three_pct",
            StatKey::Ft => "ft",
            StatKey::Ato => "ato",
            StatKey::Height => "height",
            StatKey::Weight => "weight",
            StatKey::Wingspan => "wingspan",
            StatKey::ClassYear => "class_year",
            StatKey::Bpm => "bpm",
            StatKey::Obpm => "obpm",
            StatKey::Dbpm => "dbpm",
            StatKey::Fta => "fta",
            StatKey::StlPer => "stl_per",
            StatKey::Usg => "usg",
            StatKey::RimAtt => "rim_att",
            StatKey::RimMade => "rim_made",
            StatKey::Tpa => "tpa",
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Stat block
// ---------------------------------------------------------------------------

/// One college season line. Counting stats are per game and default to zero
/// (zero is meaningful for them); everything else is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBlock {
    pub ppg: f64,
    pub rpg: f64,
    pub apg: f64,
    pub spg: f64,
    pub bpg: f64,
    /// Turnovers per game.
    pub tpg: f64,
    pub mpg: Option<f64>,
    /// Games played.
    pub gp: Option<f64>,
    /// Effective FG%, 0-100 scale.
    pub fg: Option<f64>,
    #[serde(alias = "threeP")]
    pub three_pct: Option<f64>,
    pub ft: Option<f64>,
    pub bpm: Option<f64>,
    pub obpm: Option<f64>,
    pub dbpm: Option<f64>,
    pub usg: Option<f64>,
    /// Free-throw attempts per game.
    #[serde(alias = "fta_pg")]
    pub fta: Option<f64>,
    pub stl_per: Option<f64>,
    /// Rim attempts per game.
    pub rim_att: Option<f64>,
    /// Rim makes per game.
    #[serde(alias = "rimmade")]
    pub rim_made: Option<f64>,
    /// Three-point attempts per game.
    pub tpa: Option<f64>,
}

impl StatBlock {
    /// Minutes per game; unknown or non-positive resolves to the 30-minute
    /// baseline so it is always a safe divisor.
    pub fn minutes(&self) -> f64 {
        match self.mpg {
            Some(m) if m > 0.0 => m,
            _ => NEUTRAL_MPG,
        }
    }

    pub fn games(&self) -> f64 {
        match self.gp {
            Some(g) if g > 0.0 => g,
            _ => NEUTRAL_GAMES,
        }
    }

    pub fn fg_or_neutral(&self) -> f64 {
        self.fg.unwrap_or(NEUTRAL_FG)
    }

    pub fn three_or_neutral(&self) -> f64 {
        self.three_pct.unwrap_or(NEUTRAL_THREE_PCT)
    }

    pub fn ft_or_neutral(&self) -> f64 {
        self.ft.unwrap_or(NEUTRAL_FT)
    }

    /// Assist-to-turnover ratio; with no turnovers recorded, assists alone.
    pub fn ato(&self) -> f64 {
        if self.tpg > 0.0 {
            self.apg / self.tpg
        } else {
            self.apg
        }
    }

    /// Rim finishing percentage, when both rim makes and attempts are known.
    pub fn rim_pct(&self) -> Option<f64> {
        match (self.rim_made, self.rim_att) {
            (Some(made), Some(att)) if att > 0.0 => Some(made / att * 100.0),
            _ => None,
        }
    }

    /// True when any of the advanced impact stats the tier scorer keys on is
    /// present.
    pub fn has_advanced(&self) -> bool {
        self.bpm.is_some()
            || self.obpm.is_some()
            || self.fta.is_some()
            || self.stl_per.is_some()
            || self.usg.is_some()
    }

    /// Raw (unadjusted) value for a stat key, `None` when unknown. Player
    /// attributes that live on the profile (height, weight, wingspan, class
    /// year) are not part of the stat block and return `None`.
    pub fn get(&self, key: StatKey) -> Option<f64> {
        match key {
            StatKey::Ppg => Some(self.ppg),
            StatKey::Rpg => Some(self.rpg),
            StatKey::Apg => Some(self.apg),
            StatKey::Spg => Some(self.spg),
            StatKey::Bpg => Some(self.bpg),
            StatKey::Tpg => Some(self.tpg),
            StatKey::Mpg => self.mpg,
            StatKey::Fg => self.fg,
            StatKey::ThreePct => self.three_pct,
            StatKey::Ft => self.ft,
            StatKey::Ato => Some(self.ato()),
            StatKey::Bpm => self.bpm,
            StatKey::Obpm => self.obpm,
            StatKey::Dbpm => self.dbpm,
            StatKey::Fta => self.fta,
            StatKey::StlPer => self.stl_per,
            StatKey::Usg => self.usg,
            StatKey::RimAtt => self.rim_att,
            StatKey::RimMade => self.rim_made,
            StatKey::Tpa => self.tpa,
            StatKey::Height | StatKey::Weight | StatKey::Wingspan | StatKey::ClassYear => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Player records
// ---------------------------------------------------------------------------

fn default_height() -> f64 {
    NEUTRAL_HEIGHT
}

/// A player's identity, physical profile, context, and stat line. Prospects
/// under evaluation are just this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    #[serde(default, alias = "pos")]
    pub position: Position,
    #[serde(default = "default_height", alias = "h")]
    pub height_inches: f64,
    #[serde(default, alias = "w")]
    pub weight_lbs: Option<f64>,
    #[serde(default, alias = "ws")]
    pub wingspan_inches: Option<f64>,
    #[serde(default, alias = "age")]
    pub class_year: Option<ClassYear>,
    #[serde(default, alias = "level")]
    pub competition_level: CompetitionLevel,
    #[serde(default)]
    pub stats: StatBlock,
}

impl PlayerProfile {
    pub fn new(name: impl Into<String>, position: Position, height_inches: f64) -> Self {
        PlayerProfile {
            name: name.into(),
            position,
            height_inches,
            weight_lbs: None,
            wingspan_inches: None,
            class_year: None,
            competition_level: CompetitionLevel::default(),
            stats: StatBlock::default(),
        }
    }

    /// Raw value for any stat key, including profile-level attributes.
    pub fn stat(&self, key: StatKey) -> Option<f64> {
        match key {
            StatKey::Height => Some(self.height_inches),
            StatKey::Weight => self.weight_lbs,
            StatKey::Wingspan => self.wingspan_inches,
            StatKey::ClassYear => self.class_year.map(|c| c.number() as f64),
            other => self.stats.get(other),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A drafted player with a known (or pending) NBA outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPlayer {
    #[serde(flatten)]
    pub profile: PlayerProfile,
    #[serde(default)]
    pub draft_year: Option<u16>,
    #[serde(default)]
    pub draft_pick: Option<u16>,
    /// Career NBA Win Shares.
    #[serde(default, alias = "nba_ws")]
    pub nba_win_shares: Option<f64>,
    #[serde(default, alias = "tier")]
    pub outcome_tier: OutcomeTier,
    /// Cached classification; computed lazily when absent.
    #[serde(default)]
    pub archetype: Option<Archetype>,
    /// Known-bad data entry.
    #[serde(default)]
    pub excluded: bool,
    #[serde(default = "default_true")]
    pub has_college_stats: bool,
}

impl HistoricalPlayer {
    pub fn new(profile: PlayerProfile, outcome_tier: OutcomeTier) -> Self {
        HistoricalPlayer {
            profile,
            draft_year: None,
            draft_pick: None,
            nba_win_shares: None,
            outcome_tier,
            archetype: None,
            excluded: false,
            has_college_stats: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn stats(&self) -> &StatBlock {
        &self.profile.stats
    }

    pub fn graded_tier(&self) -> Option<Tier> {
        self.outcome_tier.graded()
    }

    /// The cached archetype, or a fresh classification when none is cached.
    pub fn archetype_or_classify(&self) -> Archetype {
        self.archetype
            .unwrap_or_else(|| classify_archetype(&self.profile).primary)
    }

    /// Fill the archetype cache if it is empty.
    pub fn cache_archetype(&mut self) {
        if self.archetype.is_none() {
            self.archetype = Some(classify_archetype(&self.profile).primary);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
