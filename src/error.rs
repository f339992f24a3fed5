//! Error taxonomy for the prediction service.
//!
//! Model loading failures are blocking (the service starts degraded and
//! prediction stays disabled); validation and prediction failures are
//! per-request and answered inline so the caller can resubmit.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a model artifact path into a usable session.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The artifact path does not resolve to a file.
    #[error("model file not found at {path}")]
    NotFound { path: PathBuf },

    /// The artifact exists but could not be deserialized.
    #[error("failed to load model from {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: ort::Error,
    },

    /// ONNX Runtime itself failed to initialize.
    #[error("failed to initialize ONNX Runtime: {0}")]
    Runtime(#[from] ort::Error),
}

/// A request field outside its declared range. Raised before the
/// predictor is ever invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} must be between {min} and {max}, got {value}")]
pub struct ValidationError {
    pub field: &'static str,
    pub value: i64,
    pub min: i64,
    pub max: i64,
}

/// Failure during a single predict call. Never fatal to the process.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("inference failed: {0}")]
    Inference(#[from] ort::Error),

    #[error("model produced no usable output tensor")]
    EmptyOutput,

    #[error("model output {value} is not a finite number")]
    NonFinite { value: f64 },

    #[error("model session lock poisoned")]
    Poisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message() {
        let err = ValidationError {
            field: "area",
            value: 99,
            min: 100,
            max: 100_000,
        };
        assert_eq!(err.to_string(), "area must be between 100 and 100000, got 99");
    }

    #[test]
    fn test_model_not_found_message() {
        let err = ModelError::NotFound {
            path: PathBuf::from("models/missing.onnx"),
        };
        assert!(err.to_string().contains("models/missing.onnx"));
    }
}
