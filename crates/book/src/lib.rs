//! Argus Book Analysis
//!
//! Depth-snapshot analytics: bid/ask imbalance inside a narrow band
//! around the mid, wall detection over the near-touch levels, and a
//! coarse pressure label for the result.

mod analyzer;
mod depth;

pub use analyzer::{ImbalanceAnalyzer, ImbalanceConfig};
pub use depth::{band_volumes, detect_wall, imbalance_pct};
