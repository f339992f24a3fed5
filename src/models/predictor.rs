//! Single-row price inference against the loaded ONNX model.

use crate::error::{ModelError, PredictionError};
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::types::request::PredictionRequest;
use std::path::Path;
use std::sync::RwLock;
use tracing::debug;

/// One-record prediction: a house in, a price out.
///
/// The trait is the seam between the request handler and the model
/// library, so tests can substitute a stub without an artifact on
/// disk.
pub trait Predictor: Send + Sync {
    /// Predict the price for one house. Any failure is returned, not
    /// propagated as a panic.
    fn predict(&self, request: &PredictionRequest) -> Result<f64, PredictionError>;
}

/// Predictor backed by an ONNX Runtime session.
pub struct OnnxPredictor {
    /// Loaded model (wrapped in RwLock; the session API needs &mut
    /// even though inference never mutates model state)
    model: RwLock<LoadedModel>,
}

impl OnnxPredictor {
    /// Wrap an already-loaded model.
    pub fn new(model: LoadedModel) -> Self {
        Self {
            model: RwLock::new(model),
        }
    }

    /// Load the artifact at `path` and build a predictor from it.
    pub fn from_path<P: AsRef<Path>>(path: P, onnx_threads: usize) -> Result<Self, ModelError> {
        let loader = ModelLoader::with_threads(onnx_threads)?;
        let model = loader.load(path)?;
        Ok(Self::new(model))
    }

    /// Extract the predicted scalar from the session outputs.
    ///
    /// Regression exports produce a single float tensor, usually shaped
    /// [1, 1]; the first element is the prediction either way.
    fn extract_scalar(
        outputs: &ort::session::SessionOutputs,
        output_name: &str,
    ) -> Result<f64, PredictionError> {
        if let Some(output) = outputs.get(output_name) {
            if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
                if let Some(&value) = data.first() {
                    return Ok(value as f64);
                }
            }
        }

        // Fallback: take the first float tensor among all outputs
        for (name, output) in outputs.iter() {
            if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
                if let Some(&value) = data.first() {
                    debug!(output = %name, "Extracted prediction from fallback output");
                    return Ok(value as f64);
                }
            }
        }

        Err(PredictionError::EmptyOutput)
    }
}

impl Predictor for OnnxPredictor {
    fn predict(&self, request: &PredictionRequest) -> Result<f64, PredictionError> {
        use ort::value::Tensor;

        let features = request.to_features();

        // Single-row input tensor - shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))?;

        let mut guard = self.model.write().map_err(|_| PredictionError::Poisoned)?;
        let model: &mut LoadedModel = &mut guard;

        let outputs = model
            .session
            .run(ort::inputs![&model.input_name => input_tensor])?;

        let value = Self::extract_scalar(&outputs, &model.output_name)?;

        if !value.is_finite() {
            return Err(PredictionError::NonFinite { value });
        }

        debug!(price = value, "Inference complete");
        Ok(value)
    }
}
