// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators shown on the
// dashboard.  Every function returns a column aligned index-for-index with the
// input prices; `None` marks indices where the indicator is not yet defined.

pub mod rolling;
pub mod rsi;
pub mod sma;

/// Look-back window used when none is configured.
pub const DEFAULT_WINDOW: usize = 14;

pub use rsi::{relative_strength_index, RsiZone};
pub use sma::simple_moving_average;
