//! Plain-text report adapter implementing ReportPort.
//!
//! Labeled summary metrics followed by the trade list, with a blank line
//! after each open/close pair.

use std::fs;
use std::path::Path;

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::BandtraderError;
use crate::ports::report_port::ReportPort;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render(result: &BacktestResult, config: &BacktestConfig) -> String {
    let m = &result.metrics;
    let mut lines = vec![
        "Backtest results:".to_string(),
        format!(
            "Parameters: capital={}, risk={}%, stop_loss={}, take_profit={}, {}",
            config.capital, config.risk_pct, config.stop_loss, config.take_profit, config.indicator
        ),
        format!("Final Capital: {}", m.final_balance),
        format!("Win Rate: {}%", m.win_rate),
        format!("Max Drawdown: {}", m.max_drawdown),
        format!("Total Trades: {}", m.total_trades),
        format!("Total Profit: {}", m.total_profit),
        format!("Minimum Balance: {}", m.min_balance),
        format!("Profit Factor: {}", m.profit_factor),
        format!("Average Win: {}", m.avg_win),
        format!("Average Loss: {}", m.avg_loss),
        format!("Max Consecutive Wins: {}", m.max_consecutive_wins),
        format!("Max Consecutive Losses: {}", m.max_consecutive_losses),
        format!("Average Trade Duration (seconds): {}", m.avg_trade_duration),
        format!("Losses: {}", m.losses),
        format!("Wins: {}", m.wins),
    ];

    if let Some(pos) = &result.open_position {
        lines.push(format!(
            "Open Position: {} at {} on {}, Lots: {}",
            pos.side, pos.entry_price, pos.entry_time, pos.size
        ));
    }

    lines.push(String::new());
    lines.push("List of Trades:".to_string());
    for (i, line) in result.trade_descriptions().into_iter().enumerate() {
        lines.push(line);
        if i % 2 == 1 {
            lines.push(String::new());
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        config: &BacktestConfig,
        output_path: &str,
    ) -> Result<(), BandtraderError> {
        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, render(result, config))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::run_backtest;
    use crate::domain::bar::Bar;
    use crate::domain::indicator::IndicatorParams;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn sample_config() -> BacktestConfig {
        BacktestConfig {
            capital: 10_000.0,
            risk_pct: 1.0,
            stop_loss: 2.0,
            take_profit: 5.0,
            indicator: IndicatorParams {
                window: 2,
                band_multiplier: 0.5,
            },
        }
    }

    fn sample_backtest_result(closes: &[f64]) -> BacktestResult {
        let bars: Vec<Bar> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                Bar::new(
                    NaiveDate::from_ymd_opt(2023, 6, i as u32 + 1)
                        .unwrap()
                        .and_hms_opt(0, 0, 0)
                        .unwrap(),
                    c,
                    1000.0,
                )
            })
            .collect();
        run_backtest(&bars, &sample_config()).unwrap()
    }

    #[test]
    fn render_lists_metrics_in_order() {
        let result = sample_backtest_result(&[100.0, 100.0, 90.0, 95.0, 95.5, 101.0]);
        let text = render(&result, &sample_config());

        let labels = [
            "Backtest results:",
            "Final Capital: 10300",
            "Win Rate: 100%",
            "Max Drawdown: 0",
            "Total Trades: 1",
            "Total Profit: 300",
            "Minimum Balance: 10000",
            "Profit Factor: inf",
            "Average Win: 300",
            "Average Loss: 0",
            "Max Consecutive Wins: 1",
            "Max Consecutive Losses: 0",
            "Average Trade Duration (seconds): 172800",
            "Losses: 0",
            "Wins: 1",
            "List of Trades:",
        ];
        let mut last = 0;
        for label in labels {
            let at = text[last..]
                .find(label)
                .unwrap_or_else(|| panic!("missing or out of order: {label}"));
            last += at + label.len();
        }
        assert!(text.lines().any(|line| line == "Win Rate: 100%"));
    }

    #[test]
    fn render_separates_trade_pairs() {
        let result = sample_backtest_result(&[100.0, 100.0, 90.0, 95.0, 95.5, 101.0]);
        let text = render(&result, &sample_config());
        let trades = text.split("List of Trades:\n").nth(1).unwrap();

        let lines: Vec<&str> = trades.lines().collect();
        assert!(lines[0].starts_with("Buy at 95"));
        assert!(lines[1].starts_with("Sell at 101"));
        assert_eq!(lines[2], "");
    }

    #[test]
    fn render_reports_open_position() {
        let result = sample_backtest_result(&[100.0, 100.0, 90.0, 95.0, 95.5]);
        let text = render(&result, &sample_config());
        assert!(text.contains("Open Position: Long at 95 on 2023-06-04 00:00:00, Lots: 50"));
    }

    #[test]
    fn write_creates_file_and_parent_directories() {
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("nested/report.txt");
        let output_str = output_path.to_str().unwrap();

        let result = sample_backtest_result(&[1.0, 2.0, 3.0]);
        TextReportAdapter::new()
            .write(&result, &sample_config(), output_str)
            .unwrap();

        let written = fs::read_to_string(&output_path).unwrap();
        assert!(written.starts_with("Backtest results:"));
        assert!(written.contains("Total Trades: 0"));
    }
}
