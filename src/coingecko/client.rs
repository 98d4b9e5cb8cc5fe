// =============================================================================
// CoinGecko REST API Client — public market-chart endpoint
// =============================================================================
//
// One unauthenticated GET per dashboard render:
//
//   {base}/coins/{id}/market_chart?vs_currency=usd&days={days}&interval=daily
//
// The response carries a `prices` array of `[timestamp_ms, price]` pairs in
// ascending time order.  No caching and no retry: any failure is reported to
// the caller, which ends the render cycle.
// =============================================================================

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{AcquisitionError, PriceSource};
use crate::market_data::{PricePoint, PriceSeries};
use crate::types::{Asset, ChartRequest};

/// Public CoinGecko v3 API root.
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko REST client.
#[derive(Clone)]
pub struct CoinGeckoClient {
    base_url: String,
    client: reqwest::Client,
}

/// Wire shape of the market-chart response. `market_caps` and
/// `total_volumes` are ignored.
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Vec<(f64, f64)>,
}

impl CoinGeckoClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a new `CoinGeckoClient`.
    ///
    /// # Arguments
    /// * `base_url` — API root, e.g. [`DEFAULT_BASE_URL`]. A trailing `/` is
    ///   stripped.
    /// * `timeout`  — overall request timeout; `None` keeps reqwest's default
    ///   of no timeout.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("failed to build reqwest client")?;

        debug!(base_url = %base_url, ?timeout, "CoinGeckoClient initialised");

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -------------------------------------------------------------------------
    // Market data
    // -------------------------------------------------------------------------

    /// GET /coins/{id}/market_chart (public).
    ///
    /// Returns the daily USD price series for `request.asset` over the last
    /// `request.days` days.
    #[instrument(
        skip(self, request),
        name = "coingecko::market_chart",
        fields(asset = %request.asset, days = request.days)
    )]
    pub async fn fetch_market_chart(
        &self,
        request: ChartRequest,
    ) -> Result<PriceSeries, AcquisitionError> {
        let asset = request.asset;
        let url = format!("{}/coins/{}/market_chart", self.base_url, asset.slug());
        let days = request.days.to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("vs_currency", "usd"),
                ("days", days.as_str()),
                ("interval", "daily"),
            ])
            .send()
            .await
            .map_err(|source| AcquisitionError::Transport { asset, source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AcquisitionError::Status { asset, status });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|source| AcquisitionError::Transport { asset, source })?;

        let series = parse_market_chart(asset, &body)?;
        debug!(count = series.len(), "market chart fetched");
        Ok(series)
    }
}

impl PriceSource for CoinGeckoClient {
    fn market_chart(
        &self,
        request: ChartRequest,
    ) -> impl Future<Output = Result<PriceSeries, AcquisitionError>> + Send {
        self.fetch_market_chart(request)
    }
}

// -------------------------------------------------------------------------
// Parsing helpers
// -------------------------------------------------------------------------

/// Parse a market-chart JSON body into a [`PriceSeries`].
///
/// Millisecond timestamps become UTC instants. Rejects timestamps chrono
/// cannot represent and prices that are negative or non-finite.
pub fn parse_market_chart(asset: Asset, body: &[u8]) -> Result<PriceSeries, AcquisitionError> {
    let decode = |reason: String| AcquisitionError::Decode { asset, reason };

    let parsed: MarketChartResponse =
        serde_json::from_slice(body).map_err(|e| decode(e.to_string()))?;

    let mut points = Vec::with_capacity(parsed.prices.len());
    for (i, (millis, price)) in parsed.prices.into_iter().enumerate() {
        let timestamp = DateTime::<Utc>::from_timestamp_millis(millis as i64)
            .ok_or_else(|| decode(format!("timestamp {millis} at index {i} is out of range")))?;

        if !price.is_finite() || price < 0.0 {
            return Err(decode(format!("invalid price {price} at index {i}")));
        }

        points.push(PricePoint { timestamp, price });
    }

    Ok(PriceSeries::new(points))
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        response::IntoResponse,
        routing::get,
        Router,
    };

    use super::*;

    const BODY: &str = r#"{
        "prices": [[1704067200000, 42280.23], [1704153600000, 44187.14], [1704240000000, 44961.6]],
        "market_caps": [[1704067200000, 827630000000.0]],
        "total_volumes": [[1704067200000, 14324000000.0]]
    }"#;

    /// Serve `router` on an ephemeral local port and return its base URL.
    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn market_chart_stub(
        Path(id): Path<String>,
        Query(q): Query<HashMap<String, String>>,
    ) -> impl IntoResponse {
        let params_ok = q.get("vs_currency").map(String::as_str) == Some("usd")
            && q.get("interval").map(String::as_str) == Some("daily")
            && q.get("days").map(String::as_str) == Some("30");
        if id != "bitcoin" || !params_ok {
            return (StatusCode::BAD_REQUEST, "unexpected request").into_response();
        }
        ([("content-type", "application/json")], BODY).into_response()
    }

    fn request(asset: Asset) -> ChartRequest {
        ChartRequest::new(asset, 30).unwrap()
    }

    // ---- fetch_market_chart ---------------------------------------------

    #[tokio::test]
    async fn fetch_parses_prices() {
        let base = spawn_stub(Router::new().route("/coins/:id/market_chart", get(market_chart_stub))).await;
        let client = CoinGeckoClient::new(format!("{base}/"), None).unwrap();
        assert_eq!(client.base_url(), base);

        let series = client.fetch_market_chart(request(Asset::Bitcoin)).await.unwrap();
        assert_eq!(series.prices(), vec![42280.23, 44187.14, 44961.6]);
        assert_eq!(
            series.points()[0].timestamp.format("%Y-%m-%d").to_string(),
            "2024-01-01"
        );
    }

    #[tokio::test]
    async fn fetch_reports_non_success_status() {
        let base = spawn_stub(Router::new().route(
            "/coins/:id/market_chart",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        ))
        .await;
        let client = CoinGeckoClient::new(base, None).unwrap();

        let err = client.fetch_market_chart(request(Asset::Ethereum)).await.unwrap_err();
        match &err {
            AcquisitionError::Status { asset, status } => {
                assert_eq!(*asset, Asset::Ethereum);
                assert_eq!(*status, StatusCode::INTERNAL_SERVER_ERROR);
            }
            other => panic!("expected Status error, got {other:?}"),
        }
        assert!(err.to_string().contains("ethereum"));
    }

    #[tokio::test]
    async fn fetch_reports_malformed_body() {
        let base = spawn_stub(Router::new().route(
            "/coins/:id/market_chart",
            get(|| async { "<html>not json</html>" }),
        ))
        .await;
        let client = CoinGeckoClient::new(base, None).unwrap();

        let err = client.fetch_market_chart(request(Asset::Dogecoin)).await.unwrap_err();
        assert!(matches!(err, AcquisitionError::Decode { asset: Asset::Dogecoin, .. }));
    }

    #[tokio::test]
    async fn fetch_reports_transport_failure() {
        // Bind then drop to get a local port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = CoinGeckoClient::new(format!("http://{addr}"), None).unwrap();
        let err = client.fetch_market_chart(request(Asset::Litecoin)).await.unwrap_err();
        assert!(matches!(err, AcquisitionError::Transport { asset: Asset::Litecoin, .. }));
        assert!(err.to_string().contains("litecoin"));
    }

    // ---- parse_market_chart ---------------------------------------------

    #[test]
    fn parse_keeps_upstream_order() {
        let body = br#"{"prices": [[1704153600000, 2.0], [1704067200000, 1.0]]}"#;
        let series = parse_market_chart(Asset::Ripple, body).unwrap();
        assert_eq!(series.prices(), vec![2.0, 1.0]);
    }

    #[test]
    fn parse_empty_prices() {
        let series = parse_market_chart(Asset::Ripple, br#"{"prices": []}"#).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn parse_rejects_missing_prices_field() {
        let err = parse_market_chart(Asset::Bitcoin, br#"{"error": "coin not found"}"#).unwrap_err();
        assert!(matches!(err, AcquisitionError::Decode { .. }));
        assert!(err.to_string().contains("prices"));
    }

    #[test]
    fn parse_rejects_negative_price() {
        let err = parse_market_chart(Asset::Bitcoin, br#"{"prices": [[1704067200000, -1.0]]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("invalid price"));
    }

    #[test]
    fn parse_rejects_out_of_range_timestamp() {
        let err = parse_market_chart(Asset::Bitcoin, br#"{"prices": [[1e30, 1.0]]}"#).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
