// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// `/` serves the dashboard page; JSON endpoints live under `/api/v1/`.  No
// authentication: every endpoint is public and read-only.
//
// CORS is configured permissively so the page can also be served elsewhere.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Json, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::analysis;
use crate::app_state::AppState;
use crate::presentation::DashboardView;
use crate::types::{Asset, MAX_DAYS, MIN_DAYS};

const DASHBOARD_HTML: &str = include_str!("dashboard.html");

// =============================================================================
// Router construction
// =============================================================================

/// Build the full router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/api/v1/health", get(health))
        .route("/api/v1/assets", get(assets))
        .route("/api/v1/chart", get(chart))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Dashboard page
// =============================================================================

async fn index() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Asset allow-list and slider bounds
// =============================================================================

#[derive(Serialize)]
struct AssetEntry {
    id: Asset,
    name: &'static str,
}

#[derive(Serialize)]
struct AssetsResponse {
    assets: Vec<AssetEntry>,
    min_days: u32,
    max_days: u32,
    default_days: u32,
    window: usize,
}

async fn assets(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let assets = Asset::ALL
        .into_iter()
        .map(|id| AssetEntry { id, name: id.display_name() })
        .collect();
    Json(AssetsResponse {
        assets,
        min_days: MIN_DAYS,
        max_days: MAX_DAYS,
        default_days: state.config.default_days,
        window: state.config.indicator_window,
    })
}

// =============================================================================
// Chart
// =============================================================================

#[derive(Deserialize)]
struct ChartQuery {
    asset: String,
    #[serde(default)]
    days: Option<u32>,
}

async fn chart(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ChartQuery>, QueryRejection>,
) -> Result<Json<DashboardView>, (StatusCode, Json<serde_json::Value>)> {
    let Query(query) = query.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "malformed chart query");
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": rejection.body_text() })),
        )
    })?;
    let days = query.days.unwrap_or(state.config.default_days);
    let config = &state.config;

    match analysis::run_raw(&state.client, &query.asset, days, config.indicator_window).await {
        Ok(result) => {
            info!(asset = %result.asset, days, "chart served");
            Ok(Json(DashboardView::build(&result, config.table_rows)))
        }
        Err(e) => {
            let status = if e.is_bad_request() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::BAD_GATEWAY
            };
            warn!(asset = %query.asset, days, status = %status, error = %e, "chart request failed");
            Err((status, Json(serde_json::json!({ "error": e.to_string() }))))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::runtime_config::RuntimeConfig;

    const SCENARIO_BODY: &str = r#"{"prices": [
        [0, 10.0], [86400000, 12.0], [172800000, 11.0], [259200000, 13.0],
        [345600000, 12.0], [432000000, 14.0], [518400000, 13.0], [604800000, 15.0],
        [691200000, 14.0], [777600000, 16.0], [864000000, 15.0], [950400000, 17.0],
        [1036800000, 16.0], [1123200000, 18.0], [1209600000, 17.0]
    ]}"#;

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn app(base_url: &str) -> Router {
        let config = RuntimeConfig {
            api_base_url: base_url.to_string(),
            ..RuntimeConfig::default()
        };
        router(Arc::new(AppState::new(config).unwrap()))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = get_json(app("http://127.0.0.1:1"), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn assets_lists_allow_list() {
        let (status, body) = get_json(app("http://127.0.0.1:1"), "/api/v1/assets").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["assets"].as_array().unwrap().len(), 5);
        assert_eq!(body["assets"][0]["id"], "bitcoin");
        assert_eq!(body["min_days"], 7);
        assert_eq!(body["max_days"], 365);
        assert_eq!(body["default_days"], 30);
    }

    #[tokio::test]
    async fn index_serves_dashboard_page() {
        let resp = app("http://127.0.0.1:1")
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/api/v1/chart"));
    }

    #[tokio::test]
    async fn unknown_asset_is_bad_request() {
        let (status, body) =
            get_json(app("http://127.0.0.1:1"), "/api/v1/chart?asset=solana&days=30").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("solana"));
    }

    #[tokio::test]
    async fn out_of_range_days_is_bad_request() {
        let (status, _) =
            get_json(app("http://127.0.0.1:1"), "/api/v1/chart?asset=bitcoin&days=400").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_query_is_json_bad_request() {
        for uri in [
            "/api/v1/chart?asset=bitcoin&days=abc",
            "/api/v1/chart?asset=bitcoin&days=99999999999",
            "/api/v1/chart?days=30",
        ] {
            let (status, body) = get_json(app("http://127.0.0.1:1"), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            let msg = body["error"].as_str().unwrap_or_default();
            assert!(msg.contains("query string"), "{uri}: {msg}");
        }
    }

    #[tokio::test]
    async fn chart_renders_scenario() {
        let base = spawn_stub(Router::new().route(
            "/coins/:id/market_chart",
            get(|| async { ([("content-type", "application/json")], SCENARIO_BODY) }),
        ))
        .await;

        let (status, body) = get_json(app(&base), "/api/v1/chart?asset=bitcoin&days=30").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["asset"], "bitcoin");
        assert_eq!(body["table"].as_array().unwrap().len(), 5);
        assert_eq!(body["figure"]["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["summary"]["rsi_text"], "The latest RSI for Bitcoin is: 66.67");
        assert_eq!(body["summary"]["price_text"], "The current price of Bitcoin is: $17.00");
    }

    #[tokio::test]
    async fn chart_uses_default_days() {
        let base = spawn_stub(Router::new().route(
            "/coins/:id/market_chart",
            get(|| async { ([("content-type", "application/json")], SCENARIO_BODY) }),
        ))
        .await;

        let (status, body) = get_json(app(&base), "/api/v1/chart?asset=ethereum").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["days"], 30);
    }

    #[tokio::test]
    async fn upstream_failure_is_bad_gateway() {
        let base = spawn_stub(Router::new().route(
            "/coins/:id/market_chart",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        ))
        .await;

        let (status, body) = get_json(app(&base), "/api/v1/chart?asset=ripple&days=90").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let msg = body["error"].as_str().unwrap();
        assert!(msg.contains("ripple"));
        assert!(msg.contains("429"));
    }
}
