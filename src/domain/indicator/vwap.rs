//! Cumulative volume-weighted average price.
//!
//! VWAP[i] = sum(C[j] * V[j] for j in 0..=i) / sum(V[j] for j in 0..=i)
//! Anchored at the start of the series; not a sliding window.
//! Undefined while the cumulative volume is zero or the running sums overflow.

use crate::domain::bar::Bar;

pub fn calculate_vwap(bars: &[Bar]) -> Vec<Option<f64>> {
    let mut values = Vec::with_capacity(bars.len());
    let mut cum_turnover = 0.0_f64;
    let mut cum_volume = 0.0_f64;

    for bar in bars {
        cum_turnover += bar.turnover();
        cum_volume += bar.volume;

        let reference = cum_turnover / cum_volume;
        if cum_volume > 0.0 && reference.is_finite() {
            values.push(Some(reference));
        } else {
            values.push(None);
        }
    }

    values
}
