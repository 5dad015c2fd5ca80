//! Argus Runner - Scan Orchestration
//!
//! Wires the scan pipeline to its adapters and drives it:
//!
//! - **Config**: JSON file with per-component sections, every key defaulted
//! - **Store**: in-memory signal repository with id assignment at save
//! - **Publisher**: broadcast fan-out of each cycle's ordered batch
//! - **Engine**: the cycle itself, in single, continuous, and report modes
//!
//! ## Architecture
//!
//! ```text
//!                    ┌─────────────────────┐
//!                    │  MarketDataSource   │
//!                    │   (feed adapter)    │
//!                    └──────────┬──────────┘
//!                               │ candles / trades / depth
//!           ┌───────────────────┼───────────────────┐
//!           ▼                   ▼                   ▼
//! ┌──────────────────┐ ┌────────────────┐ ┌──────────────────┐
//! │  MarketScanner   │ │   OrderFlow    │ │    Imbalance     │
//! │  (volume pass)   │ │   Analyzer     │ │    Analyzer      │
//! └────────┬─────────┘ └────────┬───────┘ └────────┬─────────┘
//!          │ anomalies          │ flow             │ depth
//!          └────────────────────┼──────────────────┘
//!                               ▼
//!                    ┌─────────────────────┐
//!                    │    SignalScorer     │
//!                    └──────────┬──────────┘
//!                               │ ordered signals
//!                   ┌───────────┴───────────┐
//!                   ▼                       ▼
//!        ┌─────────────────────┐ ┌─────────────────────┐
//!        │  SignalRepository   │ │   SignalPublisher   │
//!        │  (in-memory store)  │ │  (broadcast fan-out)│
//!        └─────────────────────┘ └─────────────────────┘
//! ```

pub mod config;
pub mod engine;
pub mod publisher;
pub mod store;

// Re-export main types
pub use config::{AppConfig, ConfigError};
pub use engine::{EngineConfig, EngineError, RunMode, ScanEngine, SqueezeCandidate};
pub use publisher::BroadcastSignalPublisher;
pub use store::InMemorySignalStore;
