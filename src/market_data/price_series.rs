use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single daily USD price sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Price history for one asset, ordered by ascending timestamp.
///
/// The order is whatever the upstream API delivered; the series is never
/// re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Price column, in series order.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// Build a series from raw prices on consecutive UTC days starting at the
/// epoch. Test fixture helper.
#[cfg(test)]
pub fn daily_series(prices: &[f64]) -> PriceSeries {
    const DAY_MS: i64 = 86_400_000;
    let points = prices
        .iter()
        .enumerate()
        .map(|(i, &price)| PricePoint {
            timestamp: DateTime::from_timestamp_millis(i as i64 * DAY_MS).unwrap(),
            price,
        })
        .collect();
    PriceSeries::new(points)
}
