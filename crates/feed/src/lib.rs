//! Argus Feed Adapters
//!
//! Concrete [`argus_ports::MarketDataSource`] implementations: a seeded
//! synthetic feed for demos and integration tests, and a timeout
//! decorator that turns slow calls into throttling errors.

mod sim;
mod timeout;

pub use sim::{SimFeed, SimFeedConfig};
pub use timeout::TimeoutFeed;
