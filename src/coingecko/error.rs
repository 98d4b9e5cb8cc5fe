use reqwest::StatusCode;
use thiserror::Error;

use crate::types::{Asset, MAX_DAYS, MIN_DAYS};

/// Why a price history could not be acquired.
///
/// Every variant names the series identifier so the message can be shown to
/// the user as-is. Any of these ends the render cycle: no retry, no indicator
/// computation.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("unknown series identifier '{id}'")]
    UnknownAsset { id: String },

    #[error("cannot fetch {asset}: days must be between {} and {}, got {days}", MIN_DAYS, MAX_DAYS)]
    DaysOutOfRange { asset: Asset, days: u32 },

    #[error("failed to fetch price history for {asset}: {source}")]
    Transport {
        asset: Asset,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch price history for {asset}: upstream returned {status}")]
    Status { asset: Asset, status: StatusCode },

    #[error("failed to fetch price history for {asset}: malformed response ({reason})")]
    Decode { asset: Asset, reason: String },
}

impl AcquisitionError {
    /// True when the request itself was invalid, as opposed to an upstream
    /// failure.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::UnknownAsset { .. } | Self::DaysOutOfRange { .. })
    }
}
