//! ML model loading and inference components

pub mod inference;
pub mod loader;

pub use inference::{BinaryClassifier, InferenceEngine, OnnxClassifier};
pub use loader::ModelLoader;
