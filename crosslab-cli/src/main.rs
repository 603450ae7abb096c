//! CrossLab CLI — crossover study runs and session defaults.
//!
//! Commands:
//! - `run` — fetch prices, compute the signal and KPI comparison, print a
//!   summary, and save the artifact set
//! - `defaults show` — print the saved session parameters
//! - `defaults clear` — remove the saved session file

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

use crosslab_core::data::{DataSource, QuoteProvider, SyntheticProvider, YahooProvider};
use crosslab_core::indicators::IndicatorKind;
use crosslab_runner::pipeline::run_study;
use crosslab_runner::{report, save_artifacts, session, BaselineMode, StudyParams, StudyResult};

#[derive(Parser)]
#[command(
    name = "crosslab",
    about = "CrossLab CLI — moving-average crossover studies"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a crossover study and save its artifacts.
    Run {
        /// Ticker symbol (e.g., SPY).
        #[arg(long)]
        symbol: Option<String>,

        /// Short moving-average window in trading days.
        #[arg(long)]
        short: Option<usize>,

        /// Long moving-average window in trading days.
        #[arg(long)]
        long: Option<usize>,

        /// Moving-average kind: sma or ema.
        #[arg(long, value_parser = IndicatorKind::from_str)]
        indicator: Option<IndicatorKind>,

        /// Lookback start, in years before today.
        #[arg(long)]
        start_years_ago: Option<u32>,

        /// Lookback end, in years before today.
        #[arg(long)]
        end_years_ago: Option<u32>,

        /// Annual risk-free rate as a fraction (e.g., 0.025).
        #[arg(long)]
        risk_free_rate: Option<f64>,

        /// Baseline strategy: entry-anchored or buy-and-hold.
        #[arg(long, value_parser = BaselineMode::from_str)]
        baseline: Option<BaselineMode>,

        /// Load parameters from a TOML file instead of the saved session.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Use the offline synthetic provider instead of Yahoo Finance.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Seed for the synthetic provider.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output directory for study artifacts.
        #[arg(long, default_value = "studies")]
        out: PathBuf,

        /// Skip writing artifacts and the session file.
        #[arg(long, default_value_t = false)]
        no_save: bool,
    },
    /// Saved session defaults.
    Defaults {
        #[command(subcommand)]
        action: DefaultsAction,
    },
}

#[derive(Subcommand)]
enum DefaultsAction {
    /// Print the saved parameters and where they live.
    Show,
    /// Remove the saved session file.
    Clear,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            symbol,
            short,
            long,
            indicator,
            start_years_ago,
            end_years_ago,
            risk_free_rate,
            baseline,
            config,
            synthetic,
            seed,
            out,
            no_save,
        } => run_cmd(
            symbol,
            short,
            long,
            indicator,
            start_years_ago,
            end_years_ago,
            risk_free_rate,
            baseline,
            config,
            synthetic,
            seed,
            out,
            no_save,
        ),
        Commands::Defaults { action } => match action {
            DefaultsAction::Show => defaults_show(),
            DefaultsAction::Clear => defaults_clear(),
        },
    }
}

#[allow(clippy::too_many_arguments)]
fn run_cmd(
    symbol: Option<String>,
    short: Option<usize>,
    long: Option<usize>,
    indicator: Option<IndicatorKind>,
    start_years_ago: Option<u32>,
    end_years_ago: Option<u32>,
    risk_free_rate: Option<f64>,
    baseline: Option<BaselineMode>,
    config: Option<PathBuf>,
    synthetic: bool,
    seed: u64,
    out: PathBuf,
    no_save: bool,
) -> Result<()> {
    let session_path = session_path();

    // Parameters come from an explicit config file or the saved session;
    // individual flags override either.
    let mut params = match &config {
        Some(path) => StudyParams::from_file(path)?,
        None => session::load(&session_path),
    };

    if let Some(symbol) = symbol {
        params.symbol = symbol;
    }
    if let Some(short) = short {
        params.short_window = short;
    }
    if let Some(long) = long {
        params.long_window = long;
    }
    if let Some(indicator) = indicator {
        params.indicator = indicator;
    }
    if let Some(start) = start_years_ago {
        params.start_years_ago = start;
    }
    if let Some(end) = end_years_ago {
        params.end_years_ago = end;
    }
    if let Some(rate) = risk_free_rate {
        params.risk_free_rate = rate;
    }
    if let Some(baseline) = baseline {
        params.baseline_mode = baseline;
    }

    let provider: Box<dyn QuoteProvider> = if synthetic {
        Box::new(SyntheticProvider::new(seed))
    } else {
        Box::new(YahooProvider::new())
    };

    let result = run_study(&params, provider.as_ref())?;

    print_summary(&result);

    if !no_save {
        let run_dir = save_artifacts(&result, &out)?;
        println!("Artifacts saved to: {}", run_dir.display());
        let _ = session::save(&session_path, &params);
    }

    Ok(())
}

fn defaults_show() -> Result<()> {
    let path = session_path();
    let params = session::load(&path);

    println!("Session file: {}", path.display());
    if !path.exists() {
        println!("(no session saved yet — showing built-in defaults)");
    }
    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}

fn defaults_clear() -> Result<()> {
    let path = session_path();
    if path.exists() {
        session::clear(&path)?;
        println!("Removed: {}", path.display());
    } else {
        println!("No saved session at {}", path.display());
    }
    Ok(())
}

fn session_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("crosslab")
        .join("session.json")
}

fn print_summary(result: &StudyResult) {
    let gated = &result.kpis.gated;
    let baseline = &result.kpis.baseline;

    println!();
    println!("=== Crossover Study ===");
    println!("Symbol:         {}", result.symbol);
    println!("Source:         {}", result.source.label());
    println!(
        "Period:         {} to {}",
        result.start_date, result.end_date
    );
    println!("Bars:           {}", result.bar_count);
    println!(
        "Indicator:      {} {}/{}",
        result.params.indicator.label(),
        result.params.short_window,
        result.params.long_window
    );
    println!("Baseline:       {}", result.kpis.baseline_mode.label());
    println!(
        "Transitions:    {} ({} buys, {} sells)",
        result.transition_count,
        result.frame.buys().count(),
        result.frame.sells().count()
    );
    println!();
    println!("--- KPI Comparison ---");
    println!("{:<16} {:>12} {:>12}", "", "w/ signal", "w/o signal");
    println!(
        "{:<16} {:>12} {:>12}",
        "CAGR:",
        report::fmt_percent(gated.cagr, 1),
        report::fmt_percent(baseline.cagr, 1)
    );
    println!(
        "{:<16} {:>12} {:>12}",
        "Sharpe:",
        report::fmt_scalar(gated.sharpe),
        report::fmt_scalar(baseline.sharpe)
    );
    println!(
        "{:<16} {:>12} {:>12}",
        "Max Drawdown:",
        report::fmt_percent(gated.max_drawdown, 0),
        report::fmt_percent(baseline.max_drawdown, 0)
    );
    println!(
        "{:<16} {:>12} {:>12}",
        "Total Return:",
        report::fmt_multiple(gated.total_return_multiple),
        report::fmt_multiple(baseline.total_return_multiple)
    );

    if result.source == DataSource::Synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    for warn in &result.warnings {
        println!("WARNING: {warn}");
    }
    println!();
}
