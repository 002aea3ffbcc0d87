//! VWAP volatility bands.
//!
//! Bands consist of:
//! - Reference: cumulative VWAP from the first bar
//! - Upper: Reference + (multiplier x StdDev)
//! - Lower: Reference - (multiplier x StdDev)
//!
//! Where StdDev is the rolling sample standard deviation of close.
//!
//! Default parameters: window=20, multiplier=1.5
//! Warmup: first (window-1) bars have no bands. Bands that would not be
//! finite are left undefined.

use crate::domain::bar::Bar;
use crate::domain::indicator::stddev::calculate_stddev;
use crate::domain::indicator::vwap::calculate_vwap;
use crate::domain::indicator::{Bands, IndicatorFrame, IndicatorParams, IndicatorPoint};

pub fn calculate_bands(bars: &[Bar], params: IndicatorParams) -> IndicatorFrame {
    let references = calculate_vwap(bars);
    let deviations = calculate_stddev(bars, params.window);
    let mult = params.band_multiplier;

    let points = bars
        .iter()
        .zip(references)
        .zip(deviations)
        .map(|((bar, reference), stddev)| {
            let bands = match (reference, stddev) {
                (Some(reference), Some(stddev)) => {
                    let upper = reference + mult * stddev;
                    let lower = reference - mult * stddev;
                    (upper.is_finite() && lower.is_finite()).then_some(Bands { upper, lower })
                }
                _ => None,
            };

            IndicatorPoint {
                timestamp: bar.timestamp,
                reference,
                stddev,
                bands,
            }
        })
        .collect();

    IndicatorFrame { params, points }
}
