//! Prediction and health response payloads

use crate::feature_extractor::UrlFeatures;
use crate::types::transaction::TransactionRecord;
use serde::Serialize;

/// Verdict of the phishing URL classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PhishingLabel {
    Phishing,
    Legitimate,
}

impl PhishingLabel {
    /// Class 1 is the positive (phishing) class; anything else is legitimate.
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            Self::Phishing
        } else {
            Self::Legitimate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phishing => "Phishing",
            Self::Legitimate => "Legitimate",
        }
    }
}

/// Verdict of the credit card fraud classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FraudLabel {
    Fraudulent,
    Legitimate,
}

impl FraudLabel {
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            Self::Fraudulent
        } else {
            Self::Legitimate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fraudulent => "Fraudulent",
            Self::Legitimate => "Legitimate",
        }
    }
}

/// Successful phishing prediction: the verdict plus the extracted features,
/// returned for caller-side observability.
#[derive(Debug, Clone, Serialize)]
pub struct PhishingPrediction {
    pub prediction: PhishingLabel,
    pub features: UrlFeatures,
}

/// Successful fraud prediction: the verdict plus the coerced record the
/// model actually saw.
#[derive(Debug, Clone, Serialize)]
pub struct FraudPrediction {
    pub prediction: FraudLabel,
    pub transaction_data: TransactionRecord,
}

/// Health report. Always available; reflects in-process load state and
/// never re-attempts loading.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub phishing_model_loaded: bool,
    pub cc_fraud_model_loaded: bool,
}

impl HealthStatus {
    pub fn new(phishing_model_loaded: bool, cc_fraud_model_loaded: bool) -> Self {
        Self {
            status: "healthy",
            phishing_model_loaded,
            cc_fraud_model_loaded,
        }
    }
}
