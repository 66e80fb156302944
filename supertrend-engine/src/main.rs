use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use supertrend_engine::{
    build_source, evaluate_grid, prepare_series, write_html, AtrSeeding, BarSource, ParameterGrid,
    RunConfig, SupertrendEngine, SupertrendResult, SweepReport, SyntheticSource,
};

#[derive(Parser, Debug)]
#[command(name = "supertrend")]
#[command(version = "0.1.0")]
#[command(about = "Supertrend indicator over daily OHLC bars, with an HTML candlestick chart", long_about = None)]
struct Args {
    /// JSON run configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Symbol to chart
    #[arg(short, long)]
    symbol: Option<String>,

    /// Data file path (CSV/JSON). Synthetic data is used when no file is given.
    #[arg(short = 'f', long)]
    data_file: Option<PathBuf>,

    /// Fall back to synthetic data if the data file cannot be loaded
    #[arg(long)]
    synthetic: bool,

    /// Number of days of synthetic data
    #[arg(short, long, default_value = "700")]
    days: usize,

    /// Initial price for synthetic data
    #[arg(long, default_value = "1.0")]
    initial_price: f64,

    /// Seed for reproducible synthetic data
    #[arg(long)]
    seed: Option<u64>,

    /// First date of synthetic data (YYYY-MM-DD); defaults to `days` before today
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// ATR period
    #[arg(short, long)]
    period: Option<usize>,

    /// Band multiplier
    #[arg(short, long)]
    multiplier: Option<f64>,

    /// Seed ATR with the mean of the first window instead of the first bar
    #[arg(long)]
    windowed_atr: bool,

    /// Keep only the most recent N bars (0 = all)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Output format (text, json, csv)
    #[arg(short, long, default_value = "text")]
    output: String,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// HTML chart path
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Skip writing the HTML chart
    #[arg(long)]
    no_chart: bool,

    /// ATR periods to sweep, e.g. 7,10,14
    #[arg(long, value_delimiter = ',')]
    sweep_periods: Vec<usize>,

    /// Multipliers to sweep, e.g. 2,3
    #[arg(long, value_delimiter = ',')]
    sweep_multipliers: Vec<f64>,
}

impl Args {
    /// Layer CLI flags over the loaded or default configuration
    fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };

        if let Some(symbol) = &self.symbol {
            config = config.with_symbol(symbol.clone());
        }
        if self.data_file.is_some() {
            config.data_file = self.data_file.clone();
        }
        if let Some(period) = self.period {
            config.supertrend.period = period;
        }
        if let Some(multiplier) = self.multiplier {
            config.supertrend.multiplier = multiplier;
        }
        if self.windowed_atr {
            config.supertrend.atr_seeding = AtrSeeding::Window;
        }
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
        if let Some(chart) = &self.chart {
            config.chart.output_path = chart.clone();
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.run_config()?;

    let synthetic = match args.start_date {
        Some(start) => SyntheticSource::new(args.days, args.initial_price, start),
        None => SyntheticSource::ending_today(args.days, args.initial_price),
    }
    .with_seed(args.seed);
    if config.data_file.is_none() {
        warn!(symbol = %config.symbol, "no data file given, using synthetic bars");
    }
    let source = build_source(config.data_file.clone(), synthetic, args.synthetic);

    let bars = prepare_series(source.fetch(&config.symbol)?, config.limit);
    info!(symbol = %config.symbol, bars = bars.len(), "series prepared");

    if !args.sweep_periods.is_empty() || !args.sweep_multipliers.is_empty() {
        let periods = or_default(args.sweep_periods.clone(), config.supertrend.period);
        let multipliers = or_default(args.sweep_multipliers.clone(), config.supertrend.multiplier);
        let grid = ParameterGrid::new(periods, multipliers).with_base(config.supertrend.clone());
        let reports = evaluate_grid(&bars, &grid)?;
        print_sweep(&reports, &args)?;
        return Ok(());
    }

    let engine = SupertrendEngine::new(config.supertrend.clone());
    let result = engine.run(&bars)?;

    match args.output.as_str() {
        "json" => {
            let json = if args.pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{}", json);
        }
        "csv" => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            for row in &result.bars {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        "text" => print_text_report(&config, &result),
        _ => {
            warn!(format = %args.output, "unknown output format, using text");
            print_text_report(&config, &result);
        }
    }

    if !args.no_chart {
        write_html(&config.chart.output_path, &result.bars, &config.chart)?;
    }

    Ok(())
}

fn or_default<T>(values: Vec<T>, fallback: T) -> Vec<T> {
    if values.is_empty() {
        vec![fallback]
    } else {
        values
    }
}

fn print_sweep(reports: &[SweepReport], args: &Args) -> Result<()> {
    match args.output.as_str() {
        "json" => {
            let json = if args.pretty {
                serde_json::to_string_pretty(reports)?
            } else {
                serde_json::to_string(reports)?
            };
            println!("{}", json);
        }
        "csv" => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            for report in reports {
                writer.serialize(report)?;
            }
            writer.flush()?;
        }
        _ => {
            println!();
            println!("  PERIOD   MULT   REGIME       LEVEL   FLIPS    UP %");
            println!("----------------------------------------------------------------");
            for r in reports {
                println!(
                    "  {:>6} {:>6.2} {:>8} {:>11.4} {:>7} {:>7.1}",
                    r.period, r.multiplier, r.final_regime, r.final_level, r.regime_changes, r.up_pct
                );
            }
            println!();
        }
    }
    Ok(())
}

fn print_text_report(config: &RunConfig, result: &SupertrendResult) {
    println!();
    println!("================================================================");
    println!("  SUPERTREND REPORT - {}", config.symbol);
    println!("================================================================");
    println!();
    println!("  Period: {} to {}", result.start_date, result.end_date);
    println!("  Bars: {}", result.bars.len());
    println!(
        "  ATR Period: {}  Multiplier: {:.2}  Seeding: {:?}",
        result.parameters.period, result.parameters.multiplier, result.parameters.atr_seeding
    );
    println!("  Execution Time: {}ms", result.execution_time_ms);
    println!();

    if let Some(last) = result.last() {
        println!("----------------------------------------------------------------");
        println!("  CURRENT STATE ({})", last.date);
        println!("----------------------------------------------------------------");
        println!("  Close:            {:>12.4}", last.close);
        println!("  Regime:           {:>12}", last.regime);
        println!("  Supertrend:       {:>12.4}", last.supertrend_level);
        println!("  ATR:              {:>12.4}", last.atr);
        println!("  Final Upper:      {:>12.4}", last.final_upper_band);
        println!("  Final Lower:      {:>12.4}", last.final_lower_band);
        println!(
            "  Time in Uptrend:  {:>12.1}%",
            SupertrendEngine::up_percentage(result)
        );
        println!();
    }

    println!("================================================================");

    if !result.regime_changes.is_empty() {
        println!();
        println!("  RECENT REGIME CHANGES (last 5 of {})", result.regime_changes.len());
        println!("----------------------------------------------------------------");
        for change in result.regime_changes.iter().rev().take(5) {
            println!(
                "  {} | {:>4} -> {:<4} | level {:.4}",
                change.date, change.from, change.to, change.level
            );
        }
        println!();
    }
}
