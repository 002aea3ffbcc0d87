//! Bar source port trait.

use crate::domain::bar::Bar;
use crate::domain::error::BandtraderError;

pub trait DataPort {
    /// The full series in file/source order. Implementations do not sort;
    /// ordering is checked by the backtest driver.
    fn fetch_bars(&self) -> Result<Vec<Bar>, BandtraderError>;
}
