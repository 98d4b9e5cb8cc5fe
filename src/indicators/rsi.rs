// =============================================================================
// Relative Strength Index (RSI) — simple rolling means
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive prices.  The first
//          index has no delta.
// Step 2 — Split deltas into gains (max(delta, 0)) and losses (max(-delta, 0)).
// Step 3 — Average gains and losses with an unweighted rolling mean over
//          `window` deltas (not Wilder smoothing).
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Division by zero is left to IEEE-754: avg_loss == 0 gives RS = +inf and
// RSI = 100; a flat window gives 0 / 0 = NaN and RSI = NaN.
//
// Thresholds:  RSI >= 70 => OVERBOUGHT,  RSI <= 30 => OVERSOLD.
// =============================================================================

use serde::Serialize;

use super::rolling::rolling_mean;

/// Compute the RSI column for `prices`, aligned index-for-index with the input.
///
/// Index `i` is defined once `window` deltas exist, i.e. for `i >= window`.
///
/// # Edge cases
/// - `window == 0` => every output is `None`
/// - `prices.len() <= window` => every output is `None`
/// - Non-finite RSI values (NaN from a flat window) are returned as-is.
pub fn relative_strength_index(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut gains: Vec<Option<f64>> = Vec::with_capacity(prices.len());
    let mut losses: Vec<Option<f64>> = Vec::with_capacity(prices.len());

    if !prices.is_empty() {
        gains.push(None);
        losses.push(None);
    }
    for w in prices.windows(2) {
        let delta = w[1] - w[0];
        gains.push(Some(delta.max(0.0)));
        losses.push(Some((-delta).max(0.0)));
    }

    let mean_gain = rolling_mean(&gains, window);
    let mean_loss = rolling_mean(&losses, window);

    mean_gain
        .into_iter()
        .zip(mean_loss)
        .map(|(g, l)| Some(rsi_from_averages(g?, l?)))
        .collect()
}

/// Momentum zone of a single RSI reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
    Undefined,
}

impl RsiZone {
    /// Classify an RSI reading. Missing and NaN readings are `Undefined`.
    pub fn classify(rsi: Option<f64>) -> Self {
        match rsi {
            Some(v) if v.is_nan() => Self::Undefined,
            Some(v) if v >= 70.0 => Self::Overbought,
            Some(v) if v <= 30.0 => Self::Oversold,
            Some(_) => Self::Neutral,
            None => Self::Undefined,
        }
    }
}

impl std::fmt::Display for RsiZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overbought => write!(f, "OVERBOUGHT"),
            Self::Oversold => write!(f, "OVERSOLD"),
            Self::Neutral => write!(f, "NEUTRAL"),
            Self::Undefined => write!(f, "UNDEFINED"),
        }
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value.
///
/// No special-casing of a zero `avg_loss`: the float division result flows
/// straight through the formula.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
