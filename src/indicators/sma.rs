// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Unweighted rolling mean of the price column:
//
//   SMA_i = (price_{i-window+1} + ... + price_i) / window     for i >= window-1
//
// Indices before `window - 1` have no value.
// =============================================================================

use super::rolling::rolling_mean;

/// Compute the SMA column for `prices`, aligned index-for-index with the input.
///
/// An empty or shorter-than-window input yields an all-`None` column, as does
/// `window == 0`.
pub fn simple_moving_average(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    let values: Vec<Option<f64>> = prices.iter().copied().map(Some).collect();
    rolling_mean(&values, window)
}
