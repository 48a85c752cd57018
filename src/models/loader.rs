//! ONNX model loader
//!
//! Each model role loads independently at startup. A missing or broken
//! artifact marks that role unavailable for the process lifetime; it never
//! prevents the service from starting.

use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::{info, warn};

/// Loaded ONNX model with metadata
pub struct LoadedModel {
    /// Role name used in logs and error messages
    /// ("phishing" or "credit card fraud")
    pub role: &'static str,
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the model
    pub input_name: String,
}

/// Loader for ONNX models
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Result<Self> {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        // Initialize ONNX Runtime
        ort::init().commit()?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load a single ONNX model from file
    pub fn load_model<P: AsRef<Path>>(&self, path: P, role: &'static str) -> Result<LoadedModel> {
        let path = path.as_ref();

        info!(model = %role, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let outputs: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();

        info!(
            model = %role,
            input = %input_name,
            outputs = ?outputs,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            role,
            session,
            input_name,
        })
    }

    /// Load one role's model slot, tolerating absence.
    ///
    /// Returns `None` when the file is missing or fails to load; the role
    /// is then reported unavailable until process restart.
    pub fn load_slot<P: AsRef<Path>>(&self, path: P, role: &'static str) -> Option<LoadedModel> {
        let path = path.as_ref();

        if !path.exists() {
            warn!(model = %role, path = %path.display(), "Model file not found");
            return None;
        }

        match self.load_model(path, role) {
            Ok(model) => Some(model),
            Err(e) => {
                warn!(model = %role, error = %e, "Failed to load model, role unavailable");
                None
            }
        }
    }
}
