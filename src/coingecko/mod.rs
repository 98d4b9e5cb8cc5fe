pub mod client;
pub mod error;

use std::future::Future;

use crate::market_data::PriceSeries;
use crate::types::ChartRequest;

pub use client::CoinGeckoClient;
pub use error::AcquisitionError;

/// Anything that can produce a price history for a chart request.
pub trait PriceSource {
    fn market_chart(
        &self,
        request: ChartRequest,
    ) -> impl Future<Output = Result<PriceSeries, AcquisitionError>> + Send;
}
