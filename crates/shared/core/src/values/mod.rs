use chrono::{DateTime, Utc};

/// Price value in quote currency. f64 is deliberate: every downstream use
/// is statistical (means, ratios, percentages), never accounting.
/// Future: could become a newtype with validation (non-negative, finite)
pub type Price = f64;

/// Traded quantity in base currency
pub type Volume = f64;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Symbol identifier for a market, e.g. "BTC/USDT"
pub type Symbol = String;
