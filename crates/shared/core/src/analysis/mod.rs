mod anomaly;
mod flow;
mod imbalance;
mod signal;

pub use anomaly::VolumeAnomaly;
pub use flow::{FlowStrength, IcebergLevel, OrderFlowAnalysis, OrderFlowReport};
pub use imbalance::{BookPressure, ImbalanceReport, Wall};
pub use signal::{Signal, SignalIndicators, SignalTier};
