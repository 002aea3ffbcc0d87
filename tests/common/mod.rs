#![allow(dead_code)]

use bandtrader::domain::backtest::BacktestConfig;
pub use bandtrader::domain::bar::Bar;
use bandtrader::domain::error::BandtraderError;
use bandtrader::domain::indicator::{Bands, IndicatorFrame, IndicatorParams, IndicatorPoint};
use bandtrader::ports::data_port::DataPort;
use chrono::{Duration, NaiveDate, NaiveDateTime};

pub struct MockDataPort {
    pub bars: Vec<Bar>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            bars: Vec::new(),
            error: None,
        }
    }

    pub fn with_bars(mut self, bars: Vec<Bar>) -> Self {
        self.bars = bars;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self) -> Result<Vec<Bar>, BandtraderError> {
        if let Some(reason) = &self.error {
            return Err(BandtraderError::Io(std::io::Error::other(reason.clone())));
        }
        Ok(self.bars.clone())
    }
}

pub fn start_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

/// Bars five minutes apart starting at `start_time()`.
pub fn make_bars(data: &[(f64, f64)]) -> Vec<Bar> {
    data.iter()
        .enumerate()
        .map(|(i, &(close, volume))| {
            Bar::new(
                start_time() + Duration::minutes(5 * i as i64),
                close,
                volume,
            )
        })
        .collect()
}

pub fn make_bars_flat_volume(closes: &[f64]) -> Vec<Bar> {
    let data: Vec<(f64, f64)> = closes.iter().map(|&c| (c, 1000.0)).collect();
    make_bars(&data)
}

/// A frame with caller-chosen bands, one `(lower, upper)` per bar.
pub fn frame_with_bands(bars: &[Bar], bands: &[(f64, f64)]) -> IndicatorFrame {
    IndicatorFrame {
        params: IndicatorParams::default(),
        points: bars
            .iter()
            .zip(bands)
            .map(|(bar, &(lower, upper))| IndicatorPoint {
                timestamp: bar.timestamp,
                reference: Some((lower + upper) / 2.0),
                stddev: Some((upper - lower) / 3.0),
                bands: Some(Bands { upper, lower }),
            })
            .collect(),
    }
}

pub fn scenario_config() -> BacktestConfig {
    BacktestConfig {
        capital: 10_000.0,
        risk_pct: 1.0,
        stop_loss: 2.0,
        take_profit: 5.0,
        indicator: IndicatorParams::default(),
    }
}

pub fn short_window_config() -> BacktestConfig {
    BacktestConfig {
        indicator: IndicatorParams {
            window: 3,
            band_multiplier: 1.0,
        },
        ..scenario_config()
    }
}

/// A noisy oscillating series that crosses its bands several times.
pub fn oscillating_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 + 6.0 * (t * 0.7).sin() + 3.0 * (t * 2.3).cos()
        })
        .collect()
}
