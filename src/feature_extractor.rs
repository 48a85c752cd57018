//! Lexical feature extraction for phishing URL detection.
//!
//! Features are computed from raw character content only; no URL parsing
//! is involved, so extraction succeeds for any string. The field order of
//! [`UrlFeatures`] is the exact column order the phishing model was
//! trained on and must not change.

use serde::Serialize;

/// Substrings flagged as suspicious, matched case-insensitively.
const SUSPICIOUS_WORDS: [&str; 6] = ["login", "secure", "bank", "account", "verify", "update"];

/// The fixed 11-feature vector for a URL, in model column order.
///
/// Note: `has_http` is 1 whenever `has_https` is 1 ("http" is a substring
/// of "https"). The models were trained with this redundancy; it is
/// preserved intentionally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlFeatures {
    pub url_length: u32,
    pub count_digits: u32,
    pub count_letters: u32,
    pub count_special_chars: u32,
    pub count_dots: u32,
    pub has_https: u8,
    pub has_http: u8,
    pub has_at: u8,
    pub has_hyphen: u8,
    pub has_double_slash: u8,
    pub has_suspicious_words: u8,
}

impl UrlFeatures {
    /// Feature values in declaration order, ready for model input.
    pub fn to_vec(&self) -> Vec<f32> {
        vec![
            self.url_length as f32,
            self.count_digits as f32,
            self.count_letters as f32,
            self.count_special_chars as f32,
            self.count_dots as f32,
            self.has_https as f32,
            self.has_http as f32,
            self.has_at as f32,
            self.has_hyphen as f32,
            self.has_double_slash as f32,
            self.has_suspicious_words as f32,
        ]
    }
}

/// Extractor that transforms a raw URL string into model input features.
///
/// Purely functional: same input, same output, no state.
pub struct UrlFeatureExtractor;

impl UrlFeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract features from a URL.
    ///
    /// Total over all strings: malformed or scheme-less URLs and non-ASCII
    /// input are all fine because only character counts and substring
    /// checks are performed. The substring flags are case-sensitive except
    /// `has_suspicious_words`.
    pub fn extract(&self, url: &str) -> UrlFeatures {
        let lower = url.to_lowercase();

        UrlFeatures {
            url_length: url.chars().count() as u32,
            count_digits: url.chars().filter(|c| c.to_digit(10).is_some()).count() as u32,
            count_letters: url.chars().filter(|c| c.is_alphabetic()).count() as u32,
            count_special_chars: url
                .chars()
                .filter(|c| !c.is_alphanumeric() && *c != '_')
                .count() as u32,
            count_dots: url.matches('.').count() as u32,
            has_https: url.contains("https") as u8,
            has_http: url.contains("http") as u8,
            has_at: url.contains('@') as u8,
            has_hyphen: url.contains('-') as u8,
            has_double_slash: url.contains("//") as u8,
            has_suspicious_words: SUSPICIOUS_WORDS.iter().any(|w| lower.contains(w)) as u8,
        }
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        11
    }

    /// Get feature names in model column order.
    pub fn feature_names(&self) -> Vec<&'static str> {
        vec![
            "url_length",
            "count_digits",
            "count_letters",
            "count_special_chars",
            "count_dots",
            "has_https",
            "has_http",
            "has_at",
            "has_hyphen",
            "has_double_slash",
            "has_suspicious_words",
        ]
    }
}

impl Default for UrlFeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}
