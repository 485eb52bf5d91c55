mod cli;

use anyhow::{bail, Context};
use clap::Parser;
use scoutpro_app::averages::{compute_positional_averages, load_positional_averages};
use scoutpro_app::backtest::{run_backtest, BacktestOptions, BacktestSummary};
use scoutpro_app::config::{self, AppConfig};
use scoutpro_app::database::{load_player_db, load_prospects, Prospect};
use scoutpro_app::report::{evaluate, ScoutReport};
use scoutpro_core::{HistoricalPlayer, ScoringConfig};
use tracing::info;

use crate::cli::{BacktestArgs, Cli, Command, CompareArgs, EvaluateArgs};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Initialize tracing (log file, optionally mirrored to stderr)
    init_tracing(cli.verbose)?;
    info!("scoutpro starting up");

    // 2. Load config (copies defaults/ into config/ on first run)
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded from {}: profiles [{}], default `{}`",
        config.base_dir.display(),
        config.profile_names().join(", "),
        config.scoring.default_profile
    );

    match cli.command {
        Command::Profiles => list_profiles(&config),
        Command::Evaluate(args) => run_evaluate(&config, args),
        Command::Compare(args) => run_compare(&config, args),
        Command::Backtest(args) => run_backtests(&config, args),
    }
}

/// Initialize tracing to log to a file; `verbose` mirrors it to stderr so
/// stdout stays clean for reports and JSON.
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("scoutpro.log"))?;
    let writer = if verbose {
        BoxMakeWriter::new(log_file.and(std::io::stderr))
    } else {
        BoxMakeWriter::new(log_file)
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scoutpro=info,warn")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Shared loading
// ---------------------------------------------------------------------------

fn load_database(config: &AppConfig) -> anyhow::Result<Vec<HistoricalPlayer>> {
    let path = config.player_db_path();
    let db = load_player_db(&path)
        .with_context(|| format!("failed to load player database {}", path.display()))?;
    info!("Loaded {} historical players", db.len());
    Ok(db)
}

/// A configured profile with positional averages filled in, either from the
/// configured averages file or computed from the database.
fn scoring_profile(
    config: &AppConfig,
    name: &str,
    db: &[HistoricalPlayer],
) -> anyhow::Result<ScoringConfig> {
    let profile = config.profile(name)?.clone();
    let averages = match config.positional_averages_path() {
        Some(path) => load_positional_averages(&path)
            .with_context(|| format!("failed to load positional averages {}", path.display()))?,
        None => compute_positional_averages(db, &profile.positional_averages),
    };
    Ok(profile.with_positional_averages(averages))
}

fn read_prospects(path: &std::path::Path) -> anyhow::Result<Vec<Prospect>> {
    let prospects = load_prospects(path)
        .with_context(|| format!("failed to load prospects from {}", path.display()))?;
    if prospects.is_empty() {
        bail!("no prospects found in {}", path.display());
    }
    Ok(prospects)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize output")?
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn list_profiles(config: &AppConfig) -> anyhow::Result<()> {
    for name in config.profile_names() {
        let profile = config.profile(&name)?;
        let marker = if name == config.scoring.default_profile { "*" } else { " " };
        let weighted = profile.weights.values().filter(|w| **w > 0.0).count();
        let boost = if profile.similarity.wingspan_boost.is_some() {
            ", wingspan boost"
        } else {
            ""
        };
        println!("{marker} {name:<6} {weighted} weighted stats{boost}");
    }
    Ok(())
}

fn run_evaluate(config: &AppConfig, args: EvaluateArgs) -> anyhow::Result<()> {
    let name = args
        .profile
        .unwrap_or_else(|| config.scoring.default_profile.clone());
    let top_n = args.top.unwrap_or(config.scoring.top_n);

    let db = load_database(config)?;
    let scoring = scoring_profile(config, &name, &db)?;
    let prospects = read_prospects(&args.file)?;

    let reports: Vec<ScoutReport> = prospects
        .iter()
        .map(|p| evaluate(p, &db, &scoring, top_n))
        .collect();

    if args.json {
        return print_json(&reports);
    }
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            println!("{}", "-".repeat(60));
        }
        print!("{report}");
    }
    Ok(())
}

fn run_compare(config: &AppConfig, args: CompareArgs) -> anyhow::Result<()> {
    let top_n = args.top.unwrap_or(config.scoring.top_n);
    let db = load_database(config)?;
    let profiles = args
        .profiles
        .iter()
        .map(|name| scoring_profile(config, name, &db))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let prospects = read_prospects(&args.file)?;

    let reports: Vec<Vec<ScoutReport>> = prospects
        .iter()
        .map(|p| profiles.iter().map(|s| evaluate(p, &db, s, top_n)).collect())
        .collect();

    if args.json {
        return print_json(&reports);
    }
    for (prospect, row) in prospects.iter().zip(&reports) {
        println!("{}", prospect.profile.name);
        for report in row {
            let comps = &report.comps;
            let closest = comps
                .closest
                .as_ref()
                .map(|c| format!("{} ({:.0}%)", c.player.name(), c.score()))
                .unwrap_or_else(|| "-".into());
            println!(
                "  {:<6} {} {:<12} score {:>5.1} | range {}-{} | closest {}",
                report.profile,
                report.prediction.tier,
                report.prediction.tier.label(),
                report.prediction.score,
                comps.ceiling_tier,
                comps.floor_tier,
                closest
            );
        }
    }
    Ok(())
}

fn run_backtests(config: &AppConfig, args: BacktestArgs) -> anyhow::Result<()> {
    let names = if args.profiles.is_empty() {
        vec![config.scoring.default_profile.clone()]
    } else {
        args.profiles
    };
    let options = BacktestOptions {
        first_year: args.from.unwrap_or(config.backtest.first_year),
        last_year: args.to.unwrap_or(config.backtest.last_year),
        top_n: config.backtest.top_n,
    };
    if options.first_year > options.last_year {
        bail!(
            "--from ({}) must not be after --to ({})",
            options.first_year,
            options.last_year
        );
    }

    let db = load_database(config)?;
    let summaries = names
        .iter()
        .map(|name| {
            let scoring = scoring_profile(config, name, &db)?;
            Ok(run_backtest(&db, &scoring, &options))
        })
        .collect::<anyhow::Result<Vec<BacktestSummary>>>()?;

    if args.json {
        return print_json(&summaries);
    }
    for summary in &summaries {
        println!("{summary}");
    }
    if summaries.len() > 1 {
        println!("{:<6} {:>4}  {:>8} {:>8} {:>6}", "prof", "n", "exact", "within1", "rmse");
        for s in &summaries {
            println!(
                "{:<6} {:>4}  {:>7.1}% {:>7.1}% {:>6.2}",
                s.profile,
                s.comps.n,
                s.comps.exact_rate() * 100.0,
                s.comps.within_one_rate() * 100.0,
                s.comps.rmse
            );
        }
    }
    Ok(())
}
