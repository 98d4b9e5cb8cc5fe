// =============================================================================
// Analysis Pipeline — acquisition followed by indicator computation
// =============================================================================
//
// One render cycle: fetch the price series for a `ChartRequest`, then derive
// the SMA and RSI columns aligned to the same timestamps.  An acquisition
// failure short-circuits the cycle before any indicator is computed.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::coingecko::{AcquisitionError, PriceSource};
use crate::indicators::{relative_strength_index, simple_moving_average, RsiZone};
use crate::market_data::PriceSeries;
use crate::types::{Asset, ChartRequest};

// =============================================================================
// Data types
// =============================================================================

/// One row of the combined series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorPoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    /// Defined from index `window - 1` on.
    pub moving_average: Option<f64>,
    /// Defined from index `window` on. May be NaN for a flat window.
    pub rsi: Option<f64>,
}

/// A price series extended with its SMA and RSI columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    pub window: usize,
    pub points: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn last(&self) -> Option<&IndicatorPoint> {
        self.points.last()
    }

    /// The last `n` rows (fewer when the series is shorter).
    pub fn tail(&self, n: usize) -> &[IndicatorPoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}

/// Scalar values shown beneath the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    /// RSI of the final row; `None` when the series is too short.
    pub last_rsi: Option<f64>,
    pub last_price: Option<f64>,
    pub rsi_zone: RsiZone,
}

/// Everything one render cycle produces before presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub asset: Asset,
    pub days: u32,
    pub series: IndicatorSeries,
    pub summary: Summary,
}

// =============================================================================
// Computation
// =============================================================================

/// Extend `series` with SMA and RSI columns over `window`.
///
/// Existing timestamps and prices are carried over unchanged.
pub fn compute_indicators(series: &PriceSeries, window: usize) -> IndicatorSeries {
    let prices = series.prices();
    let sma = simple_moving_average(&prices, window);
    let rsi = relative_strength_index(&prices, window);

    let points = series
        .points()
        .iter()
        .zip(sma)
        .zip(rsi)
        .map(|((p, moving_average), rsi)| IndicatorPoint {
            timestamp: p.timestamp,
            price: p.price,
            moving_average,
            rsi,
        })
        .collect();

    IndicatorSeries { window, points }
}

/// Summarise the final row of `series`.
pub fn summarize(series: &IndicatorSeries) -> Summary {
    let last = series.last();
    let last_rsi = last.and_then(|p| p.rsi);
    Summary {
        last_rsi,
        last_price: last.map(|p| p.price),
        rsi_zone: RsiZone::classify(last_rsi),
    }
}

/// Run one full render cycle against `source`.
///
/// The request is already validated, so the only failure left is the fetch
/// itself. On failure nothing else is computed.
pub async fn run<S: PriceSource>(
    source: &S,
    request: ChartRequest,
    window: usize,
) -> Result<Analysis, AcquisitionError> {
    let prices = match source.market_chart(request).await {
        Ok(prices) => prices,
        Err(e) => {
            warn!(asset = %request.asset, days = request.days, error = %e, "acquisition failed");
            return Err(e);
        }
    };

    let series = compute_indicators(&prices, window);
    let summary = summarize(&series);

    info!(
        asset = %request.asset,
        days = request.days,
        points = series.points.len(),
        last_price = ?summary.last_price,
        last_rsi = ?summary.last_rsi,
        "analysis complete"
    );

    Ok(Analysis {
        asset: request.asset,
        days: request.days,
        series,
        summary,
    })
}

/// Parse raw request parameters and run the cycle.
///
/// An unknown asset slug or an out-of-range day count fails before `source`
/// is ever called.
pub async fn run_raw<S: PriceSource>(
    source: &S,
    asset: &str,
    days: u32,
    window: usize,
) -> Result<Analysis, AcquisitionError> {
    let request = ChartRequest::parse(asset, days)?;
    run(source, request, window).await
}
