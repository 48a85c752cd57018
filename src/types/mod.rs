//! Type definitions for the FraudNet service

pub mod prediction;
pub mod transaction;

pub use prediction::{FraudLabel, FraudPrediction, HealthStatus, PhishingLabel, PhishingPrediction};
pub use transaction::TransactionRecord;
