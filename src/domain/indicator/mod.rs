//! Indicator calculations over a bar series.
//!
//! - `vwap`: cumulative volume-weighted reference price
//! - `stddev`: rolling sample standard deviation of close
//! - `bands`: reference +/- multiplier * stddev, assembled into an `IndicatorFrame`
//!
//! Values that cannot be computed yet (warmup, zero cumulative volume) are
//! `None` rather than NaN.

pub mod bands;
pub mod stddev;
pub mod vwap;

use chrono::NaiveDateTime;
use std::fmt;

use crate::domain::error::BandtraderError;

pub const DEFAULT_WINDOW: usize = 20;
pub const DEFAULT_BAND_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorParams {
    pub window: usize,
    pub band_multiplier: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            window: DEFAULT_WINDOW,
            band_multiplier: DEFAULT_BAND_MULTIPLIER,
        }
    }
}

impl IndicatorParams {
    pub fn validate(&self) -> Result<(), BandtraderError> {
        if self.window < 2 {
            return Err(BandtraderError::invalid_parameter(
                "window",
                format!(
                    "window must be at least 2 for a sample deviation, got {}",
                    self.window
                ),
            ));
        }
        if !self.band_multiplier.is_finite() || self.band_multiplier < 0.0 {
            return Err(BandtraderError::invalid_parameter(
                "band_multiplier",
                format!(
                    "band_multiplier must be finite and non-negative, got {}",
                    self.band_multiplier
                ),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for IndicatorParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VWAP_BANDS({},{})", self.window, self.band_multiplier)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub lower: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub timestamp: NaiveDateTime,
    pub reference: Option<f64>,
    pub stddev: Option<f64>,
    pub bands: Option<Bands>,
}

impl IndicatorPoint {
    pub fn upper(&self) -> Option<f64> {
        self.bands.map(|b| b.upper)
    }

    pub fn lower(&self) -> Option<f64> {
        self.bands.map(|b| b.lower)
    }
}

/// Per-bar derived values, one point per input bar.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub params: IndicatorParams,
    pub points: Vec<IndicatorPoint>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the first bar with defined bands, if any.
    pub fn first_tradeable(&self) -> Option<usize> {
        self.points.iter().position(|p| p.bands.is_some())
    }
}
