//! ML model inference components

pub mod loader;
pub mod predictor;

pub use loader::ModelLoader;
pub use predictor::{OnnxPredictor, Predictor};
