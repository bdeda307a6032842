//! BRVM CLI: rank BRVM instruments from SikaFinance CSV exports.
//!
//! Commands:
//! - `analyze`: load a data directory, run the analysis, print the ranking
//! - `config`: print the default configuration as TOML

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use brvm_cli::loader::load_dir;
use brvm_cli::render::{render, OutputFormat};
use brvm_core::analysis::analyze_universe;
use brvm_core::config::AnalysisConfig;
use brvm_core::domain::Signal;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "brvm",
    about = "BRVM opportunity scanner: technical signals, scores and position sizing"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every CSV file in a directory and rank the instruments.
    Analyze {
        /// Directory of SikaFinance CSV files (columns d,o,h,l,c,v).
        #[arg(long, default_value = "brvm_data")]
        data_dir: PathBuf,

        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Capital available for each position.
        #[arg(long)]
        capital: Option<f64>,

        /// Drop opportunities scoring below this value.
        #[arg(long)]
        min_score: Option<f64>,

        /// Comma-separated signals to keep (e.g. STRONG_BUY,BUY).
        #[arg(long, value_delimiter = ',')]
        signals: Vec<String>,

        /// Keep only the top N opportunities.
        #[arg(long)]
        top: Option<usize>,

        /// Skip position sizing.
        #[arg(long, default_value_t = false)]
        no_sizing: bool,

        /// Analyze instruments one at a time instead of in parallel.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Print the default configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            data_dir,
            config,
            capital,
            min_score,
            signals,
            top,
            no_sizing,
            sequential,
            format,
        } => {
            let overrides = Overrides {
                capital,
                min_score,
                signals,
                top,
                no_sizing,
                sequential,
            };
            run_analyze(&data_dir, config.as_deref(), overrides, format)
        }
        Commands::Config => {
            print!("{}", AnalysisConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Command-line settings layered over the config file.
struct Overrides {
    capital: Option<f64>,
    min_score: Option<f64>,
    signals: Vec<String>,
    top: Option<usize>,
    no_sizing: bool,
    sequential: bool,
}

fn build_config(path: Option<&Path>, overrides: Overrides) -> Result<AnalysisConfig> {
    let mut config = match path {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };

    if let Some(capital) = overrides.capital {
        config = config.with_capital(capital);
    }
    if overrides.no_sizing {
        config = config.without_risk();
    }
    if let Some(min_score) = overrides.min_score {
        config.filter.min_score = min_score;
    }
    if !overrides.signals.is_empty() {
        config.filter.allowed_signals = overrides
            .signals
            .iter()
            .map(|s| s.parse::<Signal>())
            .collect::<Result<_, _>>()?;
    }
    if overrides.top.is_some() {
        config.filter.limit = overrides.top;
    }
    if overrides.sequential {
        config = config.sequential();
    }

    config.validate()?;
    Ok(config)
}

fn run_analyze(
    data_dir: &Path,
    config_path: Option<&Path>,
    overrides: Overrides,
    format: OutputFormat,
) -> Result<()> {
    let config = build_config(config_path, overrides)?;

    let loaded = load_dir(data_dir)
        .with_context(|| format!("failed to load data from {}", data_dir.display()))?;
    for failure in &loaded.failures {
        eprintln!("skipped: {failure}");
    }
    if loaded.series.is_empty() {
        bail!("no usable CSV file in {}", data_dir.display());
    }
    if let Some((first, last)) = loaded.date_range() {
        log::info!(
            "loaded {} instruments, {} bars, {first} to {last}",
            loaded.series.len(),
            loaded.total_bars()
        );
    }

    let report = analyze_universe(&loaded.series, &config)?;
    print!("{}", render(&report, format)?);

    Ok(())
}
