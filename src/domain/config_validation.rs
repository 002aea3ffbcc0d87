//! Configuration validation.
//!
//! Checks every config key before a backtest runs: keys that are present must
//! parse and be in range, absent keys fall back to the defaults.

use crate::domain::backtest::{
    BacktestConfig, DEFAULT_CAPITAL, DEFAULT_RISK_PCT, DEFAULT_STOP_LOSS, DEFAULT_TAKE_PROFIT,
};
use crate::domain::error::BandtraderError;
use crate::domain::indicator::{DEFAULT_BAND_MULTIPLIER, DEFAULT_WINDOW, IndicatorParams};
use crate::ports::config_port::ConfigPort;

/// Full check used by `validate`: parameters plus a data source.
pub fn validate_config(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    data_path(config)?;
    backtest_config_from(config)?;
    Ok(())
}

pub fn data_path(config: &dyn ConfigPort) -> Result<String, BandtraderError> {
    match config.get_string("data", "path") {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(BandtraderError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

/// Optional `[report]` key; empty values count as absent.
pub fn report_path(config: &dyn ConfigPort, key: &str) -> Option<String> {
    config
        .get_string("report", key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn backtest_config_from(config: &dyn ConfigPort) -> Result<BacktestConfig, BandtraderError> {
    let capital = positive(config, "backtest", "capital", DEFAULT_CAPITAL)?;
    let risk_pct = positive(config, "backtest", "risk", DEFAULT_RISK_PCT)?;
    let stop_loss = positive(config, "backtest", "stop_loss", DEFAULT_STOP_LOSS)?;
    let take_profit = positive(config, "backtest", "take_profit", DEFAULT_TAKE_PROFIT)?;
    let window = validate_window(config)?;
    let band_multiplier = validate_band_multiplier(config)?;

    Ok(BacktestConfig {
        capital,
        risk_pct,
        stop_loss,
        take_profit,
        indicator: IndicatorParams {
            window,
            band_multiplier,
        },
    })
}

fn invalid(section: &str, key: &str, reason: String) -> BandtraderError {
    BandtraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}

fn read_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, BandtraderError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(section, key, format!("expected a number, got '{raw}'"))),
    }
}

fn positive(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, BandtraderError> {
    let value = read_double(config, section, key, default)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(section, key, format!("{key} must be positive")));
    }
    Ok(value)
}

fn validate_window(config: &dyn ConfigPort) -> Result<usize, BandtraderError> {
    let window = match config.get_string("indicator", "window") {
        None => DEFAULT_WINDOW,
        Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
            invalid(
                "indicator",
                "window",
                format!("expected a whole number, got '{raw}'"),
            )
        })?,
    };
    if window < 2 {
        return Err(invalid(
            "indicator",
            "window",
            "window must be at least 2".to_string(),
        ));
    }
    Ok(window)
}

fn validate_band_multiplier(config: &dyn ConfigPort) -> Result<f64, BandtraderError> {
    let value = read_double(
        config,
        "indicator",
        "band_multiplier",
        DEFAULT_BAND_MULTIPLIER,
    )?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(
            "indicator",
            "band_multiplier",
            "band_multiplier must be non-negative".to_string(),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MockConfig {
        values: HashMap<(String, String), String>,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                values: HashMap::new(),
            }
        }

        fn set(mut self, section: &str, key: &str, value: &str) -> Self {
            self.values
                .insert((section.to_string(), key.to_string()), value.to_string());
            self
        }
    }

    impl ConfigPort for MockConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.values
                .get(&(section.to_string(), key.to_string()))
                .cloned()
        }
    }

    fn valid_config() -> MockConfig {
        MockConfig::new()
            .set("data", "path", "data/historical_data.csv")
            .set("backtest", "capital", "10000")
            .set("backtest", "risk", "1")
            .set("backtest", "stop_loss", "50")
            .set("backtest", "take_profit", "100")
            .set("indicator", "window", "20")
            .set("indicator", "band_multiplier", "1.5")
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config = MockConfig::new().set("data", "path", "bars.csv");
        let bt = backtest_config_from(&config).unwrap();
        assert_eq!(bt, BacktestConfig::default());
    }

    #[test]
    fn values_are_read() {
        let config = valid_config()
            .set("backtest", "capital", "2500.5")
            .set("indicator", "window", "14")
            .set("indicator", "band_multiplier", "2");
        let bt = backtest_config_from(&config).unwrap();
        assert!((bt.capital - 2500.5).abs() < f64::EPSILON);
        assert_eq!(bt.indicator.window, 14);
        assert!((bt.indicator.band_multiplier - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_data_path() {
        let config = MockConfig::new();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(
            err,
            BandtraderError::ConfigMissing { ref section, ref key } if section == "data" && key == "path"
        ));
    }

    #[test]
    fn blank_data_path_is_missing() {
        let config = valid_config().set("data", "path", "   ");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, BandtraderError::ConfigMissing { .. }));
    }

    #[test]
    fn non_numeric_capital() {
        let config = valid_config().set("backtest", "capital", "lots");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(
            err,
            BandtraderError::ConfigInvalid { ref key, ref reason, .. }
                if key == "capital" && reason.contains("lots")
        ));
    }

    #[test]
    fn zero_capital() {
        let config = valid_config().set("backtest", "capital", "0");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, BandtraderError::ConfigInvalid { ref key, .. } if key == "capital"));
    }

    #[test]
    fn negative_risk() {
        let config = valid_config().set("backtest", "risk", "-1");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, BandtraderError::ConfigInvalid { ref key, .. } if key == "risk"));
    }

    #[test]
    fn zero_stop_loss() {
        let config = valid_config().set("backtest", "stop_loss", "0");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, BandtraderError::ConfigInvalid { ref key, .. } if key == "stop_loss"));
    }

    #[test]
    fn nan_take_profit() {
        let config = valid_config().set("backtest", "take_profit", "NaN");
        let err = validate_config(&config).unwrap_err();
        assert!(
            matches!(err, BandtraderError::ConfigInvalid { ref key, .. } if key == "take_profit")
        );
    }

    #[test]
    fn window_too_small() {
        let config = valid_config().set("indicator", "window", "1");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(
            err,
            BandtraderError::ConfigInvalid { ref section, ref key, .. } if section == "indicator" && key == "window"
        ));
    }

    #[test]
    fn fractional_window_rejected() {
        let config = valid_config().set("indicator", "window", "2.5");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, BandtraderError::ConfigInvalid { ref key, .. } if key == "window"));
    }

    #[test]
    fn negative_band_multiplier() {
        let config = valid_config().set("indicator", "band_multiplier", "-0.1");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(
            err,
            BandtraderError::ConfigInvalid { ref key, .. } if key == "band_multiplier"
        ));
    }

    #[test]
    fn report_paths_optional() {
        let config = valid_config()
            .set("report", "output", "out.txt")
            .set("report", "equity_csv", "");
        assert_eq!(report_path(&config, "output"), Some("out.txt".to_string()));
        assert_eq!(report_path(&config, "equity_csv"), None);
        assert_eq!(report_path(&config, "missing"), None);
    }
}
