//! TrendSignal CLI: replay runs and configuration checks.
//!
//! Commands:
//! - `run`: replay a CSV of bars through the trend signal engine
//! - `check-config`: parse and validate a TOML run config, print its run id
//! - `init-config`: print a default run config as TOML

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use trendsignal_runner::{load_bars_csv, replay_universe, save_result, ReplayResult, RunConfig};

#[derive(Parser)]
#[command(
    name = "trendsignal",
    about = "TrendSignal CLI: Aroon/crossover trend signal replay"
)]
struct Cli {
    /// Emit logs as JSON lines instead of human-readable text.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay historical bars through the engine.
    Run {
        /// Path to a TOML run config.
        #[arg(long)]
        config: PathBuf,

        /// CSV with columns symbol,date,open,high,low,close,volume.
        #[arg(long)]
        data: PathBuf,

        /// Replay only this symbol (overrides the config's symbol list).
        #[arg(long)]
        symbol: Option<String>,

        /// Write one JSON result per symbol into this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Parse and validate a run config, then print its run id.
    CheckConfig {
        #[arg(long)]
        config: PathBuf,
    },
    /// Print a default run config as TOML.
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    match cli.command {
        Commands::Run {
            config,
            data,
            symbol,
            output_dir,
        } => run_replay_cmd(config, data, symbol, output_dir),
        Commands::CheckConfig { config } => run_check_config(config),
        Commands::InitConfig => run_init_config(),
    }
}

/// Logs go to stderr so stdout stays clean for summaries and generated TOML.
/// Level comes from `RUST_LOG`, defaulting to `info`.
fn init_logging(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

fn run_replay_cmd(
    config_path: PathBuf,
    data_path: PathBuf,
    symbol: Option<String>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let mut config = RunConfig::load(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    if let Some(sym) = symbol {
        config.symbols = vec![sym];
    }

    let data = load_bars_csv(&data_path)
        .with_context(|| format!("loading bars from {}", data_path.display()))?;
    info!(symbols = data.len(), "bars loaded");

    let results = replay_universe(&data, &config)?;
    if results.is_empty() {
        bail!("no symbols selected for replay");
    }

    for result in &results {
        print_summary(result);
    }

    if let Some(dir) = output_dir {
        for result in &results {
            let path = save_result(result, &dir)?;
            println!("Result saved to: {}", path.display());
        }
    }

    Ok(())
}

fn run_check_config(config_path: PathBuf) -> Result<()> {
    let config = RunConfig::load(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    println!("Config OK: {}", config_path.display());
    println!("Run ID:    {}", config.run_id()?);
    println!("Warmup:    {} bars", config.indicators.warmup_bars());
    Ok(())
}

fn run_init_config() -> Result<()> {
    let text = RunConfig::default().to_toml_string()?;
    print!("{text}");
    Ok(())
}

fn print_summary(result: &ReplayResult) {
    println!();
    println!("=== {} ===", result.symbol);
    println!("Run ID:         {}", result.run_id);
    println!("Bars:           {} ({} warmup)", result.bar_count, result.warmup_bars);
    println!("Ticks:          {}", result.ticks);
    println!(
        "Intents:        {} ({} buy, {} sell)",
        result.intents.len(),
        result.buy_count(),
        result.sell_count()
    );
    println!("Final position: {}", result.final_position);
    println!(
        "Aroon trend:    {} (breakout count {})",
        result.final_trend.last_trend, result.final_trend.breakout_count
    );
    println!("Last crossover: {}", result.final_edge.last_ema_trend);

    if !result.intents.is_empty() {
        println!();
        println!(
            "{:<12} {:>5} {:<5} {:>12} {:<8} {:<8}  Reason",
            "Date", "Bar", "Side", "Price", "Before", "After"
        );
        for r in &result.intents {
            println!(
                "{:<12} {:>5} {:<5} {:>12.4} {:<8} {:<8}  {}",
                r.date.to_string(),
                r.bar_index,
                r.intent.direction.to_string(),
                r.price,
                r.position_before.to_string(),
                r.position_after.to_string(),
                r.intent.reason
            );
        }
    }
}
