//! Position state machine.
//!
//! Evaluated once per bar from the second bar onwards, looking only at the
//! current and previous bar.
//!
//! # Transitions
//!
//! - `Flat -> Long`: previous close below the previous lower band and current
//!   close back above the current lower band
//! - `Flat -> Short`: previous close above the previous upper band and current
//!   close back below the current upper band (checked after long)
//! - `Long/Short -> Flat`: close reaches the stop-loss or take-profit level
//!
//! A flat bar checks entries only, an open bar checks exits only. Exits never
//! consult the bands.

use chrono::NaiveDateTime;

use crate::domain::error::BandtraderError;
use crate::domain::indicator::Bands;
use crate::domain::position::{ExitReason, Position, Side, TradeRecord};
use crate::domain::risk::RiskSizer;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Open(Position),
}

impl PositionState {
    pub fn position(&self) -> Option<&Position> {
        match self {
            PositionState::Flat => None,
            PositionState::Open(pos) => Some(pos),
        }
    }
}

/// What the state machine sees of one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSnapshot {
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub bands: Option<Bands>,
}

/// Fixed trading parameters for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeRules {
    pub sizer: RiskSizer,
    /// Price offset from entry to the stop level.
    pub stop_loss: f64,
    /// Price offset from entry to the target level.
    pub take_profit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Hold,
    Enter(Position),
    Exit {
        trade: TradeRecord,
        reason: ExitReason,
    },
}

/// Band re-entry check. `None` when either bar lacks bands.
pub fn entry_signal(prev: &BarSnapshot, curr: &BarSnapshot) -> Option<Side> {
    let (prev_bands, curr_bands) = (prev.bands?, curr.bands?);

    if prev.close < prev_bands.lower && curr.close > curr_bands.lower {
        Some(Side::Long)
    } else if prev.close > prev_bands.upper && curr.close < curr_bands.upper {
        Some(Side::Short)
    } else {
        None
    }
}

/// Decide the transition for `curr` given the state carried from `prev`.
pub fn evaluate(
    state: &PositionState,
    prev: &BarSnapshot,
    curr: &BarSnapshot,
    rules: &TradeRules,
) -> Result<Transition, BandtraderError> {
    match state {
        PositionState::Flat => {
            let Some(side) = entry_signal(prev, curr) else {
                return Ok(Transition::Hold);
            };
            let size = rules.sizer.position_size(rules.stop_loss)?;
            Ok(Transition::Enter(Position::open(
                side,
                curr.close,
                curr.timestamp,
                size,
                rules.stop_loss,
                rules.take_profit,
            )))
        }
        PositionState::Open(pos) => Ok(match pos.exit_trigger(curr.close) {
            Some(reason) => Transition::Exit {
                trade: pos.close(curr.close, curr.timestamp),
                reason,
            },
            None => Transition::Hold,
        }),
    }
}
