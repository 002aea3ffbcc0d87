//! Price/volume bar representation and series validation.

use chrono::NaiveDateTime;

use super::error::BandtraderError;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(timestamp: NaiveDateTime, close: f64, volume: f64) -> Self {
        Bar {
            timestamp,
            close,
            volume,
        }
    }

    /// close * volume
    pub fn turnover(&self) -> f64 {
        self.close * self.volume
    }
}

/// Check the input contract for a bar series: finite close, finite
/// non-negative volume, strictly increasing timestamps.
///
/// `row` in the returned error is the zero-based position of the bar.
pub fn validate_series(bars: &[Bar]) -> Result<(), BandtraderError> {
    for (row, bar) in bars.iter().enumerate() {
        if !bar.close.is_finite() {
            return Err(BandtraderError::data(
                row,
                "close",
                format!("close must be finite, got {}", bar.close),
            ));
        }
        if !bar.volume.is_finite() {
            return Err(BandtraderError::data(
                row,
                "volume",
                format!("volume must be finite, got {}", bar.volume),
            ));
        }
        if bar.volume < 0.0 {
            return Err(BandtraderError::data(
                row,
                "volume",
                format!("volume must be non-negative, got {}", bar.volume),
            ));
        }
        if row > 0 && bar.timestamp <= bars[row - 1].timestamp {
            return Err(BandtraderError::data(
                row,
                "timestamp",
                format!(
                    "timestamp {} does not follow {}",
                    bar.timestamp,
                    bars[row - 1].timestamp
                ),
            ));
        }
    }
    Ok(())
}
