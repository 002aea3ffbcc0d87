//! Rolling standard deviation of closing prices.
//!
//! Sample standard deviation (n - 1 denominator) over the trailing `window` closes.
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n) / (n - 1))
//! Warmup: first (n-1) bars are `None`.

use crate::domain::bar::Bar;

pub fn calculate_stddev(bars: &[Bar], window: usize) -> Vec<Option<f64>> {
    let mut values = Vec::with_capacity(bars.len());

    if window < 2 {
        values.resize(bars.len(), None);
        return values;
    }

    let warmup = window - 1;

    for i in 0..bars.len() {
        if i < warmup {
            values.push(None);
            continue;
        }

        let start = i + 1 - window;
        let slice = &bars[start..=i];

        let mean: f64 = slice.iter().map(|b| b.close).sum::<f64>() / window as f64;

        let variance: f64 = slice
            .iter()
            .map(|b| {
                let diff = b.close - mean;
                diff * diff
            })
            .sum::<f64>()
            / (window - 1) as f64;

        let stddev = variance.sqrt();
        values.push(stddev.is_finite().then_some(stddev));
    }

    values
}
