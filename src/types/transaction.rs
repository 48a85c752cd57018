//! Credit card transaction record for fraud detection

use crate::error::ServiceError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Required input fields, in the exact column order the fraud model was
/// trained on. Validation reports the first missing field in this order.
pub const REQUIRED_FIELDS: [&str; 7] = ["Time", "V1", "V2", "V3", "V4", "V5", "Amount"];

/// A validated transaction with the seven fields the fraud model expects.
///
/// Fields beyond these seven in the client payload are silently ignored;
/// the model's trained feature schema only includes these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "V1")]
    pub v1: f64,
    #[serde(rename = "V2")]
    pub v2: f64,
    #[serde(rename = "V3")]
    pub v3: f64,
    #[serde(rename = "V4")]
    pub v4: f64,
    #[serde(rename = "V5")]
    pub v5: f64,
    #[serde(rename = "Amount")]
    pub amount: f64,
}

impl TransactionRecord {
    /// Name of the first required field absent from the payload, if any.
    pub fn first_missing_field(payload: &Map<String, Value>) -> Option<&'static str> {
        REQUIRED_FIELDS
            .iter()
            .copied()
            .find(|field| !payload.contains_key(*field))
    }

    /// Coerce a validated payload into a record.
    ///
    /// Accepts JSON numbers and numeric strings; anything else fails with
    /// `InvalidInput` naming the offending field. Presence of all required
    /// fields should already have been checked via [`Self::first_missing_field`].
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, ServiceError> {
        let mut values = [0.0_f64; 7];

        for (slot, field) in values.iter_mut().zip(REQUIRED_FIELDS) {
            let value = payload.get(field).ok_or_else(|| {
                ServiceError::invalid_input(format!("Missing required field: {field}"))
            })?;
            *slot = coerce_f64(value).ok_or_else(|| {
                ServiceError::invalid_input(format!("Field {field} must be a number"))
            })?;
        }

        let [time, v1, v2, v3, v4, v5, amount] = values;
        Ok(Self {
            time,
            v1,
            v2,
            v3,
            v4,
            v5,
            amount,
        })
    }

    /// Field values in model column order.
    pub fn to_vec(&self) -> Vec<f32> {
        vec![
            self.time as f32,
            self.v1 as f32,
            self.v2 as f32,
            self.v3 as f32,
            self.v4 as f32,
            self.v5 as f32,
            self.amount as f32,
        ]
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_first_missing_field_in_fixed_order() {
        let p = payload(json!({ "Time": 0 }));
        assert_eq!(TransactionRecord::first_missing_field(&p), Some("V1"));

        let p = payload(json!({ "V1": 1, "V2": 2 }));
        assert_eq!(TransactionRecord::first_missing_field(&p), Some("Time"));

        let full = payload(json!({
            "Time": 0, "V1": 0, "V2": 0, "V3": 0, "V4": 0, "V5": 0, "Amount": 0
        }));
        assert_eq!(TransactionRecord::first_missing_field(&full), None);
    }

    #[test]
    fn test_coercion_from_numbers_and_strings() {
        let p = payload(json!({
            "Time": 100, "V1": "-1.36", "V2": 0.5, "V3": "2", "V4": 0, "V5": 0, "Amount": "149.62"
        }));
        let record = TransactionRecord::from_payload(&p).unwrap();

        assert_eq!(record.time, 100.0);
        assert_eq!(record.v1, -1.36);
        assert_eq!(record.amount, 149.62);
    }

    #[test]
    fn test_non_numeric_value_names_field() {
        let p = payload(json!({
            "Time": 0, "V1": "abc", "V2": 0, "V3": 0, "V4": 0, "V5": 0, "Amount": 0
        }));
        let err = TransactionRecord::from_payload(&p).unwrap_err();

        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert!(err.to_string().contains("V1"));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let p = payload(json!({
            "Time": 0, "V1": 0, "V2": 0, "V3": 0, "V4": 0, "V5": 0, "Amount": 0,
            "V6": 99, "note": "unused"
        }));
        let record = TransactionRecord::from_payload(&p).unwrap();

        assert_eq!(record.to_vec(), vec![0.0; 7]);
    }

    #[test]
    fn test_serialized_keys_use_model_names() {
        let record = TransactionRecord {
            time: 1.0,
            v1: 2.0,
            v2: 3.0,
            v3: 4.0,
            v4: 5.0,
            v5: 6.0,
            amount: 7.0,
        };
        let json = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();

        assert_eq!(keys, REQUIRED_FIELDS);
    }
}
