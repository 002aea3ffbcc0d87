//! Backtest driver.
//!
//! Validates the run parameters and the bar series, computes the indicator
//! frame once, then walks the bars in order feeding the position state
//! machine. Closed trades are folded into the running statistics and the
//! report metrics are derived at the end.

use tracing::{debug, info, warn};

use crate::domain::bar::{Bar, validate_series};
use crate::domain::error::BandtraderError;
use crate::domain::indicator::bands::calculate_bands;
use crate::domain::indicator::{IndicatorFrame, IndicatorParams};
use crate::domain::metrics::Metrics;
use crate::domain::position::{Position, TradeEvent, TradeRecord};
use crate::domain::risk::RiskSizer;
use crate::domain::signal::{BarSnapshot, PositionState, TradeRules, Transition, evaluate};
use crate::domain::stats::RunningStats;

pub const DEFAULT_CAPITAL: f64 = 10_000.0;
pub const DEFAULT_RISK_PCT: f64 = 1.0;
pub const DEFAULT_STOP_LOSS: f64 = 50.0;
pub const DEFAULT_TAKE_PROFIT: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub capital: f64,
    /// Percentage of capital risked per trade (1.0 = 1%).
    pub risk_pct: f64,
    /// Stop-loss offset from the entry price.
    pub stop_loss: f64,
    /// Take-profit offset from the entry price.
    pub take_profit: f64,
    pub indicator: IndicatorParams,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            capital: DEFAULT_CAPITAL,
            risk_pct: DEFAULT_RISK_PCT,
            stop_loss: DEFAULT_STOP_LOSS,
            take_profit: DEFAULT_TAKE_PROFIT,
            indicator: IndicatorParams::default(),
        }
    }
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<(), BandtraderError> {
        for (name, value) in [
            ("capital", self.capital),
            ("risk", self.risk_pct),
            ("stop_loss", self.stop_loss),
            ("take_profit", self.take_profit),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(BandtraderError::invalid_parameter(
                    name,
                    format!("{name} must be a positive number, got {value}"),
                ));
            }
        }
        self.indicator.validate()
    }

    pub fn trade_rules(&self) -> TradeRules {
        TradeRules {
            sizer: RiskSizer::new(self.capital, self.risk_pct),
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub metrics: Metrics,
    /// Every open and close, in the order they happened.
    pub events: Vec<TradeEvent>,
    pub trades: Vec<TradeRecord>,
    pub stats: RunningStats,
    /// Position still alive after the last bar, if any.
    pub open_position: Option<Position>,
    pub frame: IndicatorFrame,
}

impl BacktestResult {
    pub fn equity_curve(&self) -> &[f64] {
        &self.stats.equity_curve
    }

    pub fn trade_descriptions(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }
}

fn snapshot(bar: &Bar, frame: &IndicatorFrame, index: usize) -> BarSnapshot {
    BarSnapshot {
        timestamp: bar.timestamp,
        close: bar.close,
        bands: frame.points[index].bands,
    }
}

pub fn run_backtest(
    bars: &[Bar],
    config: &BacktestConfig,
) -> Result<BacktestResult, BandtraderError> {
    config.validate()?;
    let frame = calculate_bands(bars, config.indicator);
    simulate(bars, frame, config)
}

/// Walk `bars` against an already computed frame. `run_backtest` is the
/// usual entry point; this one lets callers supply their own bands.
pub fn simulate(
    bars: &[Bar],
    frame: IndicatorFrame,
    config: &BacktestConfig,
) -> Result<BacktestResult, BandtraderError> {
    config.validate()?;
    validate_series(bars)?;
    if frame.len() != bars.len() {
        return Err(BandtraderError::invalid_parameter(
            "frame",
            format!(
                "indicator frame has {} points for {} bars",
                frame.len(),
                bars.len()
            ),
        ));
    }
    let rules = config.trade_rules();

    let mut state = PositionState::Flat;
    let mut stats = RunningStats::new(config.capital);
    let mut events = Vec::new();
    let mut trades = Vec::new();

    for i in 1..bars.len() {
        let prev = snapshot(&bars[i - 1], &frame, i - 1);
        let curr = snapshot(&bars[i], &frame, i);

        match evaluate(&state, &prev, &curr, &rules)? {
            Transition::Hold => {}
            Transition::Enter(position) => {
                debug!(
                    side = %position.side,
                    price = position.entry_price,
                    size = position.size,
                    timestamp = %position.entry_time,
                    "opened position"
                );
                events.push(TradeEvent::Open {
                    side: position.side,
                    price: position.entry_price,
                    timestamp: position.entry_time,
                    size: position.size,
                    balance: stats.balance,
                });
                state = PositionState::Open(position);
            }
            Transition::Exit { trade, reason } => {
                stats = stats.apply_trade(&trade);
                debug!(
                    side = %trade.side,
                    price = trade.exit_price,
                    pnl = trade.pnl,
                    %reason,
                    balance = stats.balance,
                    "closed position"
                );
                events.push(TradeEvent::Close {
                    trade: trade.clone(),
                    reason,
                    balance: stats.balance,
                });
                trades.push(trade);
                state = PositionState::Flat;
            }
        }
    }

    let open_position = state.position().cloned();
    if let Some(position) = &open_position {
        warn!(
            side = %position.side,
            entry_price = position.entry_price,
            entry_time = %position.entry_time,
            "run ended with an open position"
        );
    }

    let metrics = Metrics::compute(&stats);
    info!(
        bars = bars.len(),
        indicator = %config.indicator,
        trades = metrics.total_trades,
        final_balance = metrics.final_balance,
        "backtest complete"
    );

    Ok(BacktestResult {
        metrics,
        events,
        trades,
        stats,
        open_position,
        frame,
    })
}
