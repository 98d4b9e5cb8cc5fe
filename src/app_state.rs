// =============================================================================
// Application State — shared by all request handlers
// =============================================================================
//
// Immutable after startup.  Each request fetches and analyses its own series,
// so handlers share nothing mutable and no locking is needed.
// =============================================================================

use anyhow::Result;

use crate::coingecko::CoinGeckoClient;
use crate::runtime_config::RuntimeConfig;

/// State shared across handlers via `Arc<AppState>`.
pub struct AppState {
    pub config: RuntimeConfig,
    pub client: CoinGeckoClient,
}

impl AppState {
    /// Build the state, constructing the upstream client from `config`.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let client = CoinGeckoClient::new(config.api_base_url.clone(), config.request_timeout())?;
        Ok(Self { config, client })
    }
}
