//! Running statistics, updated once per closed trade.

use crate::domain::position::TradeRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct RunningStats {
    pub capital: f64,
    pub balance: f64,
    /// Balance after each closed trade.
    pub equity_curve: Vec<f64>,
    /// Highest point of the equity curve so far.
    pub peak_equity: Option<f64>,
    pub max_drawdown: f64,
    pub total_trades: usize,
    pub total_profit: f64,
    pub wins: usize,
    pub losses: usize,
    pub win_pnls: Vec<f64>,
    pub loss_pnls: Vec<f64>,
    pub consecutive_wins: usize,
    pub consecutive_losses: usize,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
    /// Holding time of each trade in seconds.
    pub durations: Vec<f64>,
    pub min_balance: f64,
}

impl RunningStats {
    pub fn new(capital: f64) -> Self {
        RunningStats {
            capital,
            balance: capital,
            equity_curve: Vec::new(),
            peak_equity: None,
            max_drawdown: 0.0,
            total_trades: 0,
            total_profit: 0.0,
            wins: 0,
            losses: 0,
            win_pnls: Vec::new(),
            loss_pnls: Vec::new(),
            consecutive_wins: 0,
            consecutive_losses: 0,
            max_consecutive_wins: 0,
            max_consecutive_losses: 0,
            durations: Vec::new(),
            min_balance: capital,
        }
    }

    /// Fold one closed trade into the statistics.
    ///
    /// A zero pnl counts as a loss. Drawdown is measured as
    /// `max(equity_curve) - total_profit` and only once the curve holds more
    /// than one point.
    pub fn apply_trade(mut self, trade: &TradeRecord) -> Self {
        let pnl = trade.pnl;

        self.total_trades += 1;
        self.total_profit += pnl;
        self.balance += pnl;
        self.durations.push(trade.duration_secs());

        if trade.is_win() {
            self.wins += 1;
            self.win_pnls.push(pnl);
            self.consecutive_wins += 1;
            self.consecutive_losses = 0;
        } else {
            self.losses += 1;
            self.loss_pnls.push(pnl);
            self.consecutive_losses += 1;
            self.consecutive_wins = 0;
        }

        self.equity_curve.push(self.balance);
        let peak = match self.peak_equity {
            Some(peak) => peak.max(self.balance),
            None => self.balance,
        };
        self.peak_equity = Some(peak);
        self.min_balance = self.min_balance.min(self.balance);

        if self.equity_curve.len() > 1 {
            let drawdown = peak - self.total_profit;
            self.max_drawdown = self.max_drawdown.max(drawdown);
        }

        self.max_consecutive_wins = self.max_consecutive_wins.max(self.consecutive_wins);
        self.max_consecutive_losses = self.max_consecutive_losses.max(self.consecutive_losses);

        self
    }
}
