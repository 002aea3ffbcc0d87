//! Fixed-fractional position sizing.

use super::error::BandtraderError;

/// Sizes every entry from the starting capital, never the running balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskSizer {
    pub capital: f64,
    /// Percentage of capital risked per trade (1.0 = 1%).
    pub risk_pct: f64,
}

impl RiskSizer {
    pub fn new(capital: f64, risk_pct: f64) -> Self {
        RiskSizer { capital, risk_pct }
    }

    /// capital * risk_pct / 100
    pub fn risk_amount(&self) -> f64 {
        self.capital * (self.risk_pct / 100.0)
    }

    /// Size such that a move of `stop_distance` against the entry loses
    /// exactly `risk_amount()`: `(capital * risk_pct / 100) / stop_distance`.
    pub fn position_size(&self, stop_distance: f64) -> Result<f64, BandtraderError> {
        if !stop_distance.is_finite() || stop_distance <= 0.0 {
            return Err(BandtraderError::invalid_parameter(
                "stop_distance",
                format!("stop distance must be positive, got {stop_distance}"),
            ));
        }
        Ok(self.risk_amount() / stop_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_amount_is_percentage_of_capital() {
        let sizer = RiskSizer::new(10_000.0, 1.0);
        assert!((sizer.risk_amount() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn size_divides_risk_by_stop() {
        let sizer = RiskSizer::new(10_000.0, 1.0);
        let size = sizer.position_size(2.0).unwrap();
        assert!((size - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fractional_risk() {
        let size = RiskSizer::new(10_000.0, 0.01).position_size(1.0).unwrap();
        assert!((size - 1.0).abs() < 1e-12);
    }

    #[test]
    fn wider_stop_means_smaller_size() {
        let sizer = RiskSizer::new(10_000.0, 1.0);
        let tight = sizer.position_size(50.0).unwrap();
        let wide = sizer.position_size(100.0).unwrap();
        assert!(wide < tight);
        assert!((tight - 2.0).abs() < f64::EPSILON);
        assert!((wide - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_stop_rejected() {
        let err = RiskSizer::new(10_000.0, 1.0).position_size(0.0).unwrap_err();
        assert!(
            matches!(err, BandtraderError::InvalidParameter { name, .. } if name == "stop_distance")
        );
    }

    #[test]
    fn negative_stop_rejected() {
        assert!(RiskSizer::new(10_000.0, 1.0).position_size(-2.0).is_err());
    }

    #[test]
    fn nan_stop_rejected() {
        assert!(RiskSizer::new(10_000.0, 1.0).position_size(f64::NAN).is_err());
    }
}
