//! ExitLab CLI: exit-reason reports and strategy scores.
//!
//! Commands:
//! - `report` prints the exit-reason, ROI-exit, win/loss and metric tables
//!   for every strategy in a backtest result file
//! - `score` computes the composite score for hand-entered metrics

mod format;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use exitlab_core::SummaryMetrics;
use exitlab_report::{load_and_build, ReportConfig};

#[derive(Parser)]
#[command(name = "exitlab", about = "ExitLab: exit-reason breakdown and scoring for backtest results")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the exit-reason report for a backtest result file.
    Report {
        /// Path to the backtest result JSON.
        file: PathBuf,

        /// TOML file with classifier and score settings.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Only report this strategy.
        #[arg(long)]
        strategy: Option<String>,
    },
    /// Compute the composite score. Drawdown and profits are percentages.
    Score {
        #[arg(long, allow_hyphen_values = true)]
        expectancy: f64,

        #[arg(long, allow_hyphen_values = true)]
        profit_factor: f64,

        /// Maximum relative drawdown, in percent.
        #[arg(long, allow_hyphen_values = true)]
        drawdown: f64,

        /// Mean profit per trade, in percent.
        #[arg(long, allow_hyphen_values = true)]
        avg_profit: f64,

        /// Total profit, in percent.
        #[arg(long, allow_hyphen_values = true)]
        total_profit: f64,

        /// TOML file with score settings.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            file,
            config,
            strategy,
        } => run_report(&file, config.as_deref(), strategy.as_deref()),
        Commands::Score {
            expectancy,
            profit_factor,
            drawdown,
            avg_profit,
            total_profit,
            config,
        } => run_score(
            SummaryMetrics {
                expectancy,
                profit_factor,
                drawdown_pct: drawdown,
                avg_profit_pct: avg_profit,
                total_profit_pct: total_profit,
            },
            config.as_deref(),
        ),
    }
}

fn load_config(path: Option<&Path>) -> Result<ReportConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            ReportConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))
        }
        None => Ok(ReportConfig::default()),
    }
}

fn run_report(file: &Path, config: Option<&Path>, strategy: Option<&str>) -> Result<()> {
    let config = load_config(config)?;
    let loaded = load_and_build(file, &config, strategy)
        .with_context(|| format!("failed to build report for {}", file.display()))?;

    if loaded.reports.is_empty() {
        println!("No strategies in {}", file.display());
        return Ok(());
    }

    for report in &loaded.reports {
        let Some(record) = loaded.strategy(report) else {
            continue;
        };
        println!("{}", render::strategy_report(record, report));
    }
    Ok(())
}

fn run_score(inputs: SummaryMetrics, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let card = config.score.evaluate(&inputs);
    print!("{}", render::score_table(&card, &inputs));
    Ok(())
}
