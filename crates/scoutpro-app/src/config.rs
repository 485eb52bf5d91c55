// Configuration loading (scoutpro.toml plus named scoring profiles under
// config/profiles/).

use scoutpro_core::ScoringConfig;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },

    #[error("unknown scoring profile `{name}` (available: {available})")]
    UnknownProfile { name: String, available: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory that `config/` and relative data paths resolve against.
    pub base_dir: PathBuf,
    pub data: DataSection,
    pub scoring: ScoringSection,
    pub backtest: BacktestSection,
    /// Scoring profiles keyed by file stem ("v2", "v3", ...).
    pub profiles: BTreeMap<String, ScoringConfig>,
}

// ---------------------------------------------------------------------------
// scoutpro.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for scoutpro.toml.
#[derive(Debug, Clone, Deserialize)]
struct AppFile {
    data: DataSection,
    #[serde(default)]
    scoring: ScoringSection,
    #[serde(default)]
    backtest: BacktestSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSection {
    /// Historical player database (.json or .csv).
    pub player_db: String,
    /// Precomputed positional averages. When absent, averages are computed
    /// from the player database at load time.
    #[serde(default)]
    pub positional_averages: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringSection {
    pub default_profile: String,
    /// Comps listed per report.
    pub top_n: usize,
}

impl Default for ScoringSection {
    fn default() -> Self {
        ScoringSection {
            default_profile: "v3".into(),
            top_n: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BacktestSection {
    pub first_year: u16,
    pub last_year: u16,
    /// Comps averaged into the comp-based tier.
    pub top_n: usize,
}

impl Default for BacktestSection {
    fn default() -> Self {
        BacktestSection {
            first_year: 2009,
            last_year: 2019,
            top_n: 5,
        }
    }
}

impl AppConfig {
    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&ScoringConfig, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                name: name.to_string(),
                available: self.profile_names().join(", "),
            })
    }

    /// The profile named by `scoring.default_profile`.
    pub fn default_profile(&self) -> Result<&ScoringConfig, ConfigError> {
        self.profile(&self.scoring.default_profile)
    }

    pub fn profile_names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    /// Resolve a configured data path against the base directory.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }

    pub fn player_db_path(&self) -> PathBuf {
        self.resolve(&self.data.player_db)
    }

    pub fn positional_averages_path(&self) -> Option<PathBuf> {
        self.data.positional_averages.as_deref().map(|p| self.resolve(p))
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/scoutpro.toml` and every
/// `config/profiles/*.toml` relative to `base_dir`.
///
/// This does not copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<AppConfig, ConfigError> {
    let config_dir = base_dir.join("config");

    let app_path = config_dir.join("scoutpro.toml");
    let app_text = read_file(&app_path)?;
    let app_file: AppFile = toml::from_str(&app_text).map_err(|e| ConfigError::ParseError {
        path: app_path.clone(),
        source: e,
    })?;

    let profiles = load_profiles(&config_dir.join("profiles"))?;

    let config = AppConfig {
        base_dir: base_dir.to_path_buf(),
        data: app_file.data,
        scoring: app_file.scoring,
        backtest: app_file.backtest,
        profiles,
    };

    validate(&config)?;

    Ok(config)
}

/// Parse every `*.toml` in `dir` into a named scoring profile. With no
/// profile files at all, the built-in defaults are used under their own name.
pub fn load_profiles(dir: &Path) -> Result<BTreeMap<String, ScoringConfig>, ConfigError> {
    let mut profiles = BTreeMap::new();

    if dir.is_dir() {
        let entries = std::fs::read_dir(dir).map_err(|_| ConfigError::FileNotFound {
            path: dir.to_path_buf(),
        })?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = read_file(&path)?;
            let mut profile: ScoringConfig =
                toml::from_str(&text).map_err(|e| ConfigError::ParseError {
                    path: path.clone(),
                    source: e,
                })?;
            profile.name = stem.to_string();
            profile.validate().map_err(|e| match e {
                scoutpro_core::ConfigError::ValidationError { field, message } => {
                    ConfigError::ValidationError {
                        field: format!("profiles.{stem}.{field}"),
                        message,
                    }
                }
            })?;
            debug!("loaded scoring profile `{}` from {}", stem, path.display());
            profiles.insert(stem.to_string(), profile);
        }
    }

    if profiles.is_empty() {
        let builtin = ScoringConfig::default();
        warn!(
            "no scoring profiles found in {}; using built-in `{}`",
            dir.display(),
            builtin.name
        );
        profiles.insert(builtin.name.clone(), builtin);
    }

    Ok(profiles)
}

/// Seed `config/` from the shipped `defaults/`: `scoutpro.toml` plus every
/// profile under `defaults/profiles/`. Only `.toml` files are seeded and an
/// existing file is never replaced.
/// Returns the paths that were written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() {
        if config_dir.is_dir() {
            return Ok(vec![]);
        }
        return Err(seed_error(format!(
            "no scoutpro defaults/ or config/ under {}",
            base_dir.display()
        )));
    }

    let mut seeded = Vec::new();
    for (from, to) in [
        (defaults_dir.clone(), config_dir.clone()),
        (defaults_dir.join("profiles"), config_dir.join("profiles")),
    ] {
        if from.is_dir() {
            seed_toml_files(&from, &to, &mut seeded)?;
        }
    }
    Ok(seeded)
}

fn seed_error(message: String) -> ConfigError {
    ConfigError::DefaultsCopyError { message }
}

fn seed_toml_files(from: &Path, to: &Path, seeded: &mut Vec<PathBuf>) -> Result<(), ConfigError> {
    std::fs::create_dir_all(to)
        .map_err(|e| seed_error(format!("cannot create {}: {e}", to.display())))?;
    let entries = std::fs::read_dir(from)
        .map_err(|e| seed_error(format!("cannot list {}: {e}", from.display())))?;

    for entry in entries.flatten() {
        let source = entry.path();
        if !source.is_file() || source.extension().and_then(|e| e.to_str()) != Some("toml") {
            continue;
        }
        let Some(file_name) = source.file_name() else {
            continue;
        };
        let target = to.join(file_name);

        // create_new: existing files are left alone.
        let mut dest = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(dest) => dest,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(seed_error(format!("cannot create {}: {e}", target.display()))),
        };
        let mut src = std::fs::File::open(&source)
            .map_err(|e| seed_error(format!("cannot open {}: {e}", source.display())))?;
        std::io::copy(&mut src, &mut dest)
            .map_err(|e| seed_error(format!("cannot seed {}: {e}", target.display())))?;
        debug!("seeded {} from {}", target.display(), source.display());
        seeded.push(target);
    }
    Ok(())
}

/// Pick the directory configuration is loaded from: the working directory
/// when it has `defaults/` or `config/`, otherwise the platform config dir.
pub fn resolve_base_dir() -> Result<PathBuf, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    if cwd.join("defaults").exists() || cwd.join("config").exists() {
        return Ok(cwd);
    }
    match directories::ProjectDirs::from("", "", "scoutpro") {
        Some(dirs) => Ok(dirs.config_dir().to_path_buf()),
        None => Ok(cwd),
    }
}

/// Convenience wrapper: ensure defaults are copied, then load from the
/// resolved base directory.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let base = resolve_base_dir()?;
    ensure_config_files(&base)?;
    load_config_from(&base)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.data.player_db.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.player_db".into(),
            message: "must not be empty".into(),
        });
    }

    if config.scoring.top_n == 0 {
        return Err(ConfigError::ValidationError {
            field: "scoring.top_n".into(),
            message: "must be > 0".into(),
        });
    }

    if !config.profiles.contains_key(&config.scoring.default_profile) {
        return Err(ConfigError::ValidationError {
            field: "scoring.default_profile".into(),
            message: format!(
                "`{}` is not one of the loaded profiles ({})",
                config.scoring.default_profile,
                config.profile_names().join(", ")
            ),
        });
    }

    let bt = &config.backtest;
    if bt.first_year > bt.last_year {
        return Err(ConfigError::ValidationError {
            field: "backtest.first_year".into(),
            message: format!(
                "must be <= backtest.last_year, got {} > {}",
                bt.first_year, bt.last_year
            ),
        });
    }
    if bt.top_n == 0 {
        return Err(ConfigError::ValidationError {
            field: "backtest.top_n".into(),
            message: "must be > 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
