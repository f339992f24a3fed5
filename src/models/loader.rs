//! ONNX model loader

use crate::error::ModelError;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

/// Loaded ONNX model with resolved input/output names
pub struct LoadedModel {
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the model
    pub input_name: String,
    /// Output name for the predicted price
    pub output_name: String,
}

/// Loader for the house price model artifact.
///
/// Loading is expensive relative to a single request, so it runs at
/// most once per process start; the resulting model is reused for the
/// process lifetime.
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Result<Self, ModelError> {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self, ModelError> {
        // Initialize ONNX Runtime
        ort::init().commit();
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load the model artifact from file.
    ///
    /// A missing file and an unreadable file are distinct failures so
    /// the caller can report them accordingly; neither crashes the
    /// process.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadedModel, ModelError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ModelError::NotFound {
                path: path.to_path_buf(),
            });
        }

        info!(path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(ort::Error::from)?
            .with_intra_threads(self.onnx_threads)
            .map_err(ort::Error::from)?
            .commit_from_file(path)
            .map_err(|source| ModelError::Load {
                path: path.to_path_buf(),
                source,
            })?;

        // Get input/output names
        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "float_input".to_string());

        let output_name = session
            .outputs()
            .iter()
            .find(|o| o.name().contains("variable") || o.name().contains("output"))
            .map(|o| o.name().to_string())
            .unwrap_or_else(|| {
                session
                    .outputs()
                    .last()
                    .map(|o| o.name().to_string())
                    .unwrap_or_else(|| "variable".to_string())
            });

        info!(
            path = %path.display(),
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            session,
            input_name,
            output_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifact_is_not_found() {
        // Construct directly so the test does not require an ONNX
        // runtime; the existence check runs before any session work
        let loader = ModelLoader { onnx_threads: 1 };

        let result = loader.load("models/does_not_exist.onnx");
        match result {
            Err(ModelError::NotFound { path }) => {
                assert!(path.ends_with("does_not_exist.onnx"));
            }
            other => panic!("expected NotFound, got {:?}", other.map(|_| "model")),
        }
    }
}
