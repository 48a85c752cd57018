//! Prediction gateways over black-box binary classifiers
//!
//! The gateways own input validation and shape adaptation only; the actual
//! inference is a single delegated call through [`BinaryClassifier`]. Any
//! concrete model (or a test stub) satisfies that capability.

use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::feature_extractor::UrlFeatureExtractor;
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::types::prediction::{FraudLabel, FraudPrediction, PhishingLabel, PhishingPrediction};
use crate::types::transaction::TransactionRecord;
use anyhow::Result;
use ort::memory::Allocator;
use ort::session::Session;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType};
use serde_json::{Map, Value};
use std::sync::RwLock;
use tracing::{debug, info, warn};

/// A classifier that accepts one record as an ordered numeric vector and
/// returns a binary class label (1 = positive class).
pub trait BinaryClassifier: Send + Sync {
    fn classify(&self, features: &[f32]) -> Result<i64>;
}

/// [`BinaryClassifier`] backed by an ONNX Runtime session.
pub struct OnnxClassifier {
    role: &'static str,
    input_name: String,
    /// Session::run requires a mutable borrow, hence the lock.
    session: RwLock<Session>,
}

impl OnnxClassifier {
    pub fn new(model: LoadedModel) -> Self {
        Self {
            role: model.role,
            input_name: model.input_name,
            session: RwLock::new(model.session),
        }
    }

    /// Extract the predicted class from model outputs.
    ///
    /// Handles the output layouts of sklearn-style ONNX exports: an int64
    /// "label" tensor, a probabilities tensor (argmax), or
    /// seq(map(int64, float)) as produced by CatBoost/LightGBM converters.
    fn extract_label(&self, outputs: &ort::session::SessionOutputs) -> Result<i64> {
        // Preferred path: the dedicated label output
        for (name, output) in outputs.iter() {
            if !name.contains("label") {
                continue;
            }
            if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
                if let Some(&label) = data.first() {
                    debug!(model = %self.role, label = label, "Extracted label tensor");
                    return Ok(label);
                }
            }
        }

        // Fallback: argmax over a probabilities tensor
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }

            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                let label = argmax_label(&shape, data);
                debug!(model = %self.role, output = %name, label = label, "Extracted from probability tensor");
                return Ok(label);
            }

            // seq(map(int64, float)) format
            if DynSequenceValueType::can_downcast(&output.dtype()) {
                if let Ok(label) = self.extract_from_sequence_map(&output) {
                    return Ok(label);
                }
            }
        }

        anyhow::bail!("no usable output in model response")
    }

    /// Extract the argmax class from seq(map(int64, float)) output.
    fn extract_from_sequence_map(&self, output: &ort::value::DynValue) -> Result<i64> {
        let allocator = Allocator::default();

        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| anyhow::anyhow!("Failed to downcast to sequence: {}", e))?;

        let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;
        if maps.is_empty() {
            return Err(anyhow::anyhow!("Empty sequence"));
        }

        // Batch size is always 1; take the first map
        let kv_pairs = maps[0].try_extract_key_values::<i64, f32>()?;

        let label = kv_pairs
            .iter()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(class_id, _)| *class_id)
            .ok_or_else(|| anyhow::anyhow!("No class probabilities in map"))?;

        debug!(model = %self.role, label = label, "Extracted from seq(map)");
        Ok(label)
    }
}

impl BinaryClassifier for OnnxClassifier {
    fn classify(&self, features: &[f32]) -> Result<i64> {
        use ort::value::Tensor;

        // Input tensor shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))?;

        let mut session = self
            .session
            .write()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let outputs = session.run(ort::inputs![&self.input_name => input_tensor])?;

        self.extract_label(&outputs)
    }
}

/// Argmax class index over a probability tensor, tolerating both
/// [batch, num_classes] and flat [num_classes] shapes.
fn argmax_label(shape: &ort::tensor::Shape, data: &[f32]) -> i64 {
    let dims: Vec<i64> = shape.iter().copied().collect();
    let num_classes = match dims.as_slice() {
        [_, n] => *n as usize,
        [n] => *n as usize,
        _ => data.len(),
    };

    if num_classes <= 1 {
        // Single-score output: positive class when score crosses 0.5
        return data.first().map(|&p| (p >= 0.5) as i64).unwrap_or(0);
    }

    data.iter()
        .take(num_classes)
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i as i64)
        .unwrap_or(0)
}

/// The two prediction gateways over injected model slots.
///
/// Slots are filled once at construction and never reloaded; an empty slot
/// answers `ModelUnavailable` for the process lifetime.
pub struct InferenceEngine {
    extractor: UrlFeatureExtractor,
    phishing: Option<Box<dyn BinaryClassifier>>,
    cc_fraud: Option<Box<dyn BinaryClassifier>>,
}

impl InferenceEngine {
    /// Load both model roles from the configured paths.
    ///
    /// Each role loads independently; a missing artifact leaves that slot
    /// empty without failing startup.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let loader = ModelLoader::with_threads(config.models.onnx_threads)?;

        let phishing = loader
            .load_slot(&config.models.phishing_path, "phishing")
            .map(|m| Box::new(OnnxClassifier::new(m)) as Box<dyn BinaryClassifier>);
        let cc_fraud = loader
            .load_slot(&config.models.cc_fraud_path, "credit card fraud")
            .map(|m| Box::new(OnnxClassifier::new(m)) as Box<dyn BinaryClassifier>);

        info!(
            phishing_loaded = phishing.is_some(),
            cc_fraud_loaded = cc_fraud.is_some(),
            "Inference engine initialized"
        );
        if phishing.is_none() {
            warn!("Phishing predictions will answer 503 until restart");
        }
        if cc_fraud.is_none() {
            warn!("Fraud predictions will answer 503 until restart");
        }

        Ok(Self {
            extractor: UrlFeatureExtractor::new(),
            phishing,
            cc_fraud,
        })
    }

    /// Build an engine from explicit classifier slots. Used by tests to
    /// substitute stub models.
    pub fn with_classifiers(
        phishing: Option<Box<dyn BinaryClassifier>>,
        cc_fraud: Option<Box<dyn BinaryClassifier>>,
    ) -> Self {
        Self {
            extractor: UrlFeatureExtractor::new(),
            phishing,
            cc_fraud,
        }
    }

    pub fn phishing_loaded(&self) -> bool {
        self.phishing.is_some()
    }

    pub fn cc_fraud_loaded(&self) -> bool {
        self.cc_fraud.is_some()
    }

    /// Classify a URL as phishing or legitimate.
    pub fn predict_phishing(&self, url: &str) -> Result<PhishingPrediction, ServiceError> {
        if url.is_empty() {
            return Err(ServiceError::invalid_input("URL is required"));
        }

        let model = self
            .phishing
            .as_deref()
            .ok_or(ServiceError::ModelUnavailable("phishing"))?;

        let features = self.extractor.extract(url);

        let class = model
            .classify(&features.to_vec())
            .map_err(|e| ServiceError::Internal(format!("Inference failed: {e}")))?;

        let prediction = PhishingLabel::from_class(class);
        debug!(prediction = ?prediction, url_length = features.url_length, "Phishing prediction");

        Ok(PhishingPrediction {
            prediction,
            features,
        })
    }

    /// Classify a credit card transaction as fraudulent or legitimate.
    ///
    /// Validation order: required-field presence first (fixed field order),
    /// then model availability, then numeric coercion.
    pub fn predict_fraud(
        &self,
        payload: &Map<String, Value>,
    ) -> Result<FraudPrediction, ServiceError> {
        if let Some(field) = TransactionRecord::first_missing_field(payload) {
            return Err(ServiceError::invalid_input(format!(
                "Missing required field: {field}"
            )));
        }

        let model = self
            .cc_fraud
            .as_deref()
            .ok_or(ServiceError::ModelUnavailable("credit card fraud"))?;

        let transaction_data = TransactionRecord::from_payload(payload)?;

        let class = model
            .classify(&transaction_data.to_vec())
            .map_err(|e| ServiceError::Internal(format!("Inference failed: {e}")))?;

        let prediction = FraudLabel::from_class(class);
        debug!(prediction = ?prediction, amount = transaction_data.amount, "Fraud prediction");

        Ok(FraudPrediction {
            prediction,
            transaction_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Stub classifier returning a fixed class.
    struct Fixed(i64);

    impl BinaryClassifier for Fixed {
        fn classify(&self, _features: &[f32]) -> Result<i64> {
            Ok(self.0)
        }
    }

    /// Stub classifier that always fails.
    struct Broken;

    impl BinaryClassifier for Broken {
        fn classify(&self, _features: &[f32]) -> Result<i64> {
            anyhow::bail!("tensor shape mismatch")
        }
    }

    fn engine(phishing: Option<i64>, fraud: Option<i64>) -> InferenceEngine {
        InferenceEngine::with_classifiers(
            phishing.map(|c| Box::new(Fixed(c)) as Box<dyn BinaryClassifier>),
            fraud.map(|c| Box::new(Fixed(c)) as Box<dyn BinaryClassifier>),
        )
    }

    fn full_record() -> Map<String, Value> {
        json!({
            "Time": 0, "V1": 0, "V2": 0, "V3": 0, "V4": 0, "V5": 0, "Amount": 0
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn test_phishing_empty_url_is_invalid() {
        let err = engine(Some(1), None).predict_phishing("").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn test_phishing_unloaded_model_wins_over_content() {
        let eng = engine(None, None);
        for url in ["https://secure-bank.com/login", "plain text", "a"] {
            let err = eng.predict_phishing(url).unwrap_err();
            assert!(matches!(err, ServiceError::ModelUnavailable("phishing")));
        }
    }

    #[test]
    fn test_phishing_label_mapping() {
        let result = engine(Some(1), None)
            .predict_phishing("https://secure-bank.com/login")
            .unwrap();
        assert_eq!(result.prediction, PhishingLabel::Phishing);
        assert_eq!(result.features.has_suspicious_words, 1);

        let result = engine(Some(0), None)
            .predict_phishing("https://example.com")
            .unwrap();
        assert_eq!(result.prediction, PhishingLabel::Legitimate);
    }

    #[test]
    fn test_phishing_classifier_failure_is_internal() {
        let eng = InferenceEngine::with_classifiers(Some(Box::new(Broken)), None);
        let err = eng.predict_phishing("https://example.com").unwrap_err();
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[test]
    fn test_fraud_missing_field_checked_before_model() {
        // No model loaded, but the missing field must be reported first
        let eng = engine(None, None);
        let payload = json!({ "Time": 0 }).as_object().unwrap().clone();

        let err = eng.predict_fraud(&payload).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert_eq!(err.to_string(), "Missing required field: V1");
    }

    #[test]
    fn test_fraud_unloaded_model() {
        let err = engine(None, None).predict_fraud(&full_record()).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::ModelUnavailable("credit card fraud")
        ));
    }

    #[test]
    fn test_fraud_label_mapping() {
        let result = engine(None, Some(1)).predict_fraud(&full_record()).unwrap();
        assert_eq!(result.prediction, FraudLabel::Fraudulent);

        let result = engine(None, Some(0)).predict_fraud(&full_record()).unwrap();
        assert_eq!(result.prediction, FraudLabel::Legitimate);
        assert_eq!(result.transaction_data.to_vec(), vec![0.0; 7]);
    }

    #[test]
    fn test_fraud_non_numeric_field() {
        let mut payload = full_record();
        payload.insert("V3".to_string(), json!({"nested": true}));

        let err = engine(None, Some(0)).predict_fraud(&payload).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert!(err.to_string().contains("V3"));
    }
}
