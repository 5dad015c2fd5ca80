//! Argus Ports
//!
//! Port definitions (traits) for the Argus market scanner.
//! These define the boundaries between the analysis core and infrastructure.

mod error;
mod market_data;
mod publisher;
mod repository;

pub use error::{MarketDataError, MarketDataResult, StoreError, StoreResult};
pub use market_data::MarketDataSource;
pub use publisher::SignalPublisher;
pub use repository::{SignalId, SignalRepository, SignalStats, StoredSignal};
