//! Argus Signal Scorer
//!
//! Folds the scanner, flow, and book readings for one symbol into a
//! single 0-100 score, a conviction tier, and a recommended action.
//! Everything here is pure: the observation time is an input, and the
//! same readings always produce the same signal.

mod scoring;

pub use scoring::{ScorerConfig, SignalScorer, classify, recommend_action};
