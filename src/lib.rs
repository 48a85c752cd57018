//! FraudNet Service Library
//!
//! A small HTTP service exposing two pre-trained binary classifiers:
//! a phishing URL detector and a credit card fraud detector. Models are
//! loaded once at startup and served read-only for the process lifetime.

pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use error::ServiceError;
pub use feature_extractor::{UrlFeatureExtractor, UrlFeatures};
pub use models::inference::{BinaryClassifier, InferenceEngine};
pub use server::AppState;
pub use types::{prediction::HealthStatus, transaction::TransactionRecord};
