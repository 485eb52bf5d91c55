// Scoring and comparison engine: stat normalization, archetype classification,
// tier projection, weighted similarity, and comp selection.
//
// Everything here is synchronous and side-effect free. Callers pass a
// `ScoringConfig` into every entry point; nothing reads global state.

pub mod archetype;
pub mod comps;
pub mod config;
pub mod normalize;
pub mod similarity;
pub mod stats;
pub mod tier;

pub use archetype::{classify_archetype, Archetype, ArchetypeFit};
pub use comps::{find_archetype_matches, find_top_matches, CompMatch, CompSet, NamedComp, SelectionPath};
pub use config::{ConfigError, ScoringConfig};
pub use similarity::{calculate_similarity, PenaltyCause, SimilarityResult};
pub use stats::{
    ClassYear, CompetitionLevel, HistoricalPlayer, OutcomeTier, PlayerProfile, Position, StatBlock,
    StatKey, Tier,
};
pub use tier::{predict_tier, TierPrediction};
