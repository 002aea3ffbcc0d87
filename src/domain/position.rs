//! Open position, closed trade records and the trade event log.

use chrono::NaiveDateTime;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// Order action that opens a position on this side.
    pub fn entry_action(&self) -> &'static str {
        match self {
            Side::Long => "Buy",
            Side::Short => "Sell",
        }
    }

    /// Order action that closes a position on this side.
    pub fn exit_action(&self) -> &'static str {
        match self {
            Side::Long => "Sell",
            Side::Short => "Buy",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "Long"),
            Side::Short => write!(f, "Short"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::StopLoss => write!(f, "Stop Loss"),
            ExitReason::TakeProfit => write!(f, "Take Profit"),
        }
    }
}

/// A live position. `stop_loss` and `take_profit` are absolute price levels
/// derived from the entry price and the configured offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub side: Side,
    pub entry_price: f64,
    pub entry_time: NaiveDateTime,
    pub size: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

impl Position {
    pub fn open(
        side: Side,
        entry_price: f64,
        entry_time: NaiveDateTime,
        size: f64,
        stop_offset: f64,
        target_offset: f64,
    ) -> Self {
        let (stop_loss, take_profit) = match side {
            Side::Long => (entry_price - stop_offset, entry_price + target_offset),
            Side::Short => (entry_price + stop_offset, entry_price - target_offset),
        };
        Position {
            side,
            entry_price,
            entry_time,
            size,
            stop_loss,
            take_profit,
        }
    }

    pub fn pnl_at(&self, price: f64) -> f64 {
        match self.side {
            Side::Long => (price - self.entry_price) * self.size,
            Side::Short => (self.entry_price - price) * self.size,
        }
    }

    pub fn should_stop_loss(&self, price: f64) -> bool {
        match self.side {
            Side::Long => price <= self.stop_loss,
            Side::Short => price >= self.stop_loss,
        }
    }

    pub fn should_take_profit(&self, price: f64) -> bool {
        match self.side {
            Side::Long => price >= self.take_profit,
            Side::Short => price <= self.take_profit,
        }
    }

    /// Which exit fires at `price`, stop first.
    pub fn exit_trigger(&self, price: f64) -> Option<ExitReason> {
        if self.should_stop_loss(price) {
            Some(ExitReason::StopLoss)
        } else if self.should_take_profit(price) {
            Some(ExitReason::TakeProfit)
        } else {
            None
        }
    }

    pub fn close(&self, exit_price: f64, exit_time: NaiveDateTime) -> TradeRecord {
        TradeRecord {
            side: self.side,
            entry_price: self.entry_price,
            entry_time: self.entry_time,
            exit_price,
            exit_time,
            size: self.size,
            pnl: self.pnl_at(exit_price),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub side: Side,
    pub entry_price: f64,
    pub entry_time: NaiveDateTime,
    pub exit_price: f64,
    pub exit_time: NaiveDateTime,
    pub size: f64,
    pub pnl: f64,
}

impl TradeRecord {
    /// Holding time in seconds, fractional part kept.
    pub fn duration_secs(&self) -> f64 {
        (self.exit_time - self.entry_time).num_milliseconds() as f64 / 1000.0
    }

    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }
}

/// One entry in the ordered trade log: every open and every close.
#[derive(Debug, Clone, PartialEq)]
pub enum TradeEvent {
    Open {
        side: Side,
        price: f64,
        timestamp: NaiveDateTime,
        size: f64,
        balance: f64,
    },
    Close {
        trade: TradeRecord,
        reason: ExitReason,
        balance: f64,
    },
}

impl TradeEvent {
    pub fn is_open(&self) -> bool {
        matches!(self, TradeEvent::Open { .. })
    }

    pub fn is_close(&self) -> bool {
        matches!(self, TradeEvent::Close { .. })
    }
}

impl fmt::Display for TradeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeEvent::Open {
                side,
                price,
                timestamp,
                size,
                balance,
            } => write!(
                f,
                "{} at {} on {}, Lots: {}, Balance: {}",
                side.entry_action(),
                price,
                timestamp,
                size,
                balance
            ),
            TradeEvent::Close {
                trade,
                reason,
                balance,
            } => write!(
                f,
                "{} at {} on {} ({}), Lots: {}, Profit/Loss: {}, Balance: {}",
                trade.side.exit_action(),
                trade.exit_price,
                trade.exit_time,
                reason,
                trade.size,
                trade.pnl,
                balance
            ),
        }
    }
}
