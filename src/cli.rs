//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{CsvAdapter, write_equity_csv};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report::{self, TextReportAdapter};
use crate::domain::backtest::{self as backtest_engine, BacktestConfig};
use crate::domain::bar::Bar;
use crate::domain::config_validation::{
    backtest_config_from, data_path, report_path, validate_config,
};
use crate::domain::error::BandtraderError;
use crate::domain::indicator::bands::calculate_bands;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "bandtrader", about = "VWAP band mean-reversion backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Command-line values that take precedence over the config file.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ParamOverrides {
    #[arg(long)]
    pub capital: Option<f64>,
    /// Percent of capital risked per trade
    #[arg(long)]
    pub risk: Option<f64>,
    #[arg(long)]
    pub stop_loss: Option<f64>,
    #[arg(long)]
    pub take_profit: Option<f64>,
    #[arg(long)]
    pub window: Option<usize>,
    #[arg(long)]
    pub band_multiplier: Option<f64>,
}

impl ParamOverrides {
    pub fn apply(&self, config: &mut BacktestConfig) {
        if let Some(v) = self.capital {
            config.capital = v;
        }
        if let Some(v) = self.risk {
            config.risk_pct = v;
        }
        if let Some(v) = self.stop_loss {
            config.stop_loss = v;
        }
        if let Some(v) = self.take_profit {
            config.take_profit = v;
        }
        if let Some(v) = self.window {
            config.indicator.window = v;
        }
        if let Some(v) = self.band_multiplier {
            config.indicator.band_multiplier = v;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over a CSV bar file
    Backtest {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        equity_csv: Option<PathBuf>,
        #[command(flatten)]
        params: ParamOverrides,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Everything a backtest run needs once config file and flags are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub data_path: PathBuf,
    pub backtest: BacktestConfig,
    pub output: Option<PathBuf>,
    pub equity_csv: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

/// Dispatches a parsed command line without mapping the outcome to an exit code.
pub fn execute(cli: Cli) -> Result<(), BandtraderError> {
    match cli.command {
        Command::Backtest {
            config,
            data,
            output,
            equity_csv,
            params,
            dry_run,
        } => resolve_settings(config.as_deref(), data, output, equity_csv, &params).and_then(
            |settings| {
                if dry_run {
                    run_dry_run(&settings)
                } else {
                    run_backtest(&settings)
                }
            },
        ),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, BandtraderError> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

/// Merge config file values, defaults and command-line flags; flags win.
pub fn resolve_settings(
    config_path: Option<&Path>,
    data: Option<PathBuf>,
    output: Option<PathBuf>,
    equity_csv: Option<PathBuf>,
    params: &ParamOverrides,
) -> Result<RunSettings, BandtraderError> {
    let (mut backtest, file_data, file_output, file_equity) = match config_path {
        Some(path) => {
            let adapter = load_config(path)?;
            (
                backtest_config_from(&adapter)?,
                data_path(&adapter).ok().map(PathBuf::from),
                report_path(&adapter, "output").map(PathBuf::from),
                report_path(&adapter, "equity_csv").map(PathBuf::from),
            )
        }
        None => (BacktestConfig::default(), None, None, None),
    };

    params.apply(&mut backtest);
    backtest.validate()?;

    let data_path = data
        .or(file_data)
        .ok_or_else(|| BandtraderError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        })?;

    Ok(RunSettings {
        data_path,
        backtest,
        output: output.or(file_output),
        equity_csv: equity_csv.or(file_equity),
    })
}

fn load_bars(settings: &RunSettings) -> Result<Vec<Bar>, BandtraderError> {
    eprintln!("Loading bars from {}", settings.data_path.display());
    let source = CsvAdapter::new(settings.data_path.clone());
    let bars = source.fetch_bars()?;
    eprintln!("  {} bars loaded", bars.len());
    Ok(bars)
}

pub fn run_backtest(settings: &RunSettings) -> Result<(), BandtraderError> {
    let bars = load_bars(settings)?;
    let config = &settings.backtest;
    eprintln!("Running backtest: {}", config.indicator);

    let result = backtest_engine::run_backtest(&bars, config)?;

    match &settings.output {
        Some(path) => {
            TextReportAdapter::new().write(&result, config, &path.to_string_lossy())?;
            eprintln!("Report written to: {}", path.display());
        }
        None => print!("{}", text_report::render(&result, config)),
    }

    if let Some(path) = &settings.equity_csv {
        write_equity_csv(path, result.equity_curve())?;
        eprintln!("Equity curve written to: {}", path.display());
    }

    if result.open_position.is_some() {
        eprintln!("warning: run ended with an open position");
    }
    Ok(())
}

pub fn run_dry_run(settings: &RunSettings) -> Result<(), BandtraderError> {
    let bars = load_bars(settings)?;
    let config = &settings.backtest;
    eprintln!("Config validated successfully");
    eprintln!(
        "  capital={} risk={}% stop_loss={} take_profit={} {}",
        config.capital, config.risk_pct, config.stop_loss, config.take_profit, config.indicator
    );

    match (bars.first(), bars.last()) {
        (Some(first), Some(last)) => {
            eprintln!("  range: {} .. {}", first.timestamp, last.timestamp)
        }
        _ => eprintln!("  range: empty series"),
    }

    let warmup = config.indicator.window - 1;
    let frame = calculate_bands(&bars, config.indicator);
    match frame.first_tradeable() {
        Some(index) => eprintln!(
            "  warm-up: {warmup} bars, first tradeable bar {index} ({})",
            bars[index].timestamp
        ),
        None => eprintln!("  warm-up: {warmup} bars, series never leaves warm-up"),
    }

    eprintln!("\nDry run complete: configuration and data are valid");
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), BandtraderError> {
    let adapter = load_config(config_path)?;
    validate_config(&adapter)?;
    let config = backtest_config_from(&adapter)?;
    eprintln!("Config validated successfully");
    eprintln!("  data: {}", data_path(&adapter)?);
    eprintln!("  indicator: {}", config.indicator);
    Ok(())
}
