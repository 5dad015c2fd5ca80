//! Argus Core Domain
//!
//! Pure domain types for the Argus market scanner.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod analysis;
pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use analysis::{
    BookPressure,
    FlowStrength,
    IcebergLevel,
    ImbalanceReport,
    // Order flow results
    OrderFlowAnalysis,
    OrderFlowReport,
    // Scored output
    Signal,
    SignalIndicators,
    SignalTier,
    // Scanner output
    VolumeAnomaly,
    // Book analysis results
    Wall,
};
pub use entities::{
    BookLevel,
    BookSide,
    // Market data entities
    Candle,
    CandleInterval,
    OrderBookSnapshot,
    Side,
    TickerStats,
    Trade,
};
pub use values::{Price, Symbol, Timestamp, Volume};
