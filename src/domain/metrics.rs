//! Report-time performance metrics derived from the running statistics.

use super::stats::RunningStats;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub final_balance: f64,
    /// Percentage of trades that were wins (0-100).
    pub win_rate: f64,
    pub max_drawdown: f64,
    pub total_trades: usize,
    pub total_profit: f64,
    pub min_balance: f64,
    pub profit_factor: f64,
    pub avg_win: f64,
    /// Mean of the losing pnls; zero or negative.
    pub avg_loss: f64,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
    /// Mean holding time in seconds.
    pub avg_trade_duration: f64,
    pub wins: usize,
    pub losses: usize,
}

impl Metrics {
    pub fn compute(stats: &RunningStats) -> Self {
        let win_rate = if stats.total_trades > 0 {
            stats.wins as f64 / stats.total_trades as f64 * 100.0
        } else {
            0.0
        };

        Metrics {
            final_balance: stats.balance,
            win_rate,
            max_drawdown: stats.max_drawdown,
            total_trades: stats.total_trades,
            total_profit: stats.total_profit,
            min_balance: stats.min_balance,
            profit_factor: profit_factor(&stats.win_pnls, &stats.loss_pnls),
            avg_win: mean(&stats.win_pnls),
            avg_loss: mean(&stats.loss_pnls),
            max_consecutive_wins: stats.max_consecutive_wins,
            max_consecutive_losses: stats.max_consecutive_losses,
            avg_trade_duration: mean(&stats.durations),
            wins: stats.wins,
            losses: stats.losses,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Summed wins over the absolute summed losses. Infinite without losing
/// trades; losses that sum to zero (breakevens only) give infinity when
/// there are gains and zero otherwise.
fn profit_factor(win_pnls: &[f64], loss_pnls: &[f64]) -> f64 {
    let total_wins: f64 = win_pnls.iter().sum();
    let total_losses = loss_pnls.iter().sum::<f64>().abs();

    if loss_pnls.is_empty() {
        f64::INFINITY
    } else if total_losses > 0.0 {
        total_wins / total_losses
    } else if total_wins > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}
