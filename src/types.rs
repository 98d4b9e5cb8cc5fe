// =============================================================================
// Shared types used across the crypto dashboard
// =============================================================================

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coingecko::AcquisitionError;

/// Smallest day count the dashboard will request.
pub const MIN_DAYS: u32 = 7;
/// Largest day count the dashboard will request.
pub const MAX_DAYS: u32 = 365;

/// The closed allow-list of assets the dashboard can chart.
///
/// Serialises as the CoinGecko coin slug (`"bitcoin"`, `"ripple"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    Bitcoin,
    Ethereum,
    Dogecoin,
    Litecoin,
    Ripple,
}

impl Asset {
    pub const ALL: [Asset; 5] = [
        Asset::Bitcoin,
        Asset::Ethereum,
        Asset::Dogecoin,
        Asset::Litecoin,
        Asset::Ripple,
    ];

    /// CoinGecko coin id used in the `/coins/{id}/market_chart` path.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Bitcoin => "bitcoin",
            Self::Ethereum => "ethereum",
            Self::Dogecoin => "dogecoin",
            Self::Litecoin => "litecoin",
            Self::Ripple => "ripple",
        }
    }

    /// Human-readable name for the asset selector.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Bitcoin => "Bitcoin",
            Self::Ethereum => "Ethereum",
            Self::Dogecoin => "Dogecoin",
            Self::Litecoin => "Litecoin",
            Self::Ripple => "XRP",
        }
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Asset {
    type Err = AcquisitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.slug() == wanted)
            .ok_or_else(|| AcquisitionError::UnknownAsset { id: s.to_string() })
    }
}

/// Parameters for one dashboard render: which asset and how many days back.
///
/// Replaces the widget selections a UI would otherwise keep as ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartRequest {
    pub asset: Asset,
    pub days: u32,
}

impl ChartRequest {
    /// Build a request, rejecting day counts outside `[MIN_DAYS, MAX_DAYS]`.
    pub fn new(asset: Asset, days: u32) -> Result<Self, AcquisitionError> {
        if !(MIN_DAYS..=MAX_DAYS).contains(&days) {
            return Err(AcquisitionError::DaysOutOfRange { asset, days });
        }
        Ok(Self { asset, days })
    }

    /// Parse the raw slug first so unknown identifiers never reach the network.
    pub fn parse(asset: &str, days: u32) -> Result<Self, AcquisitionError> {
        let asset: Asset = asset.parse()?;
        Self::new(asset, days)
    }
}
