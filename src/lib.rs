//! House Price Prediction Service Library
//!
//! Loads a pre-trained ONNX regression model once at startup and
//! answers six-field house prediction requests with a
//! currency-formatted price.

pub mod config;
pub mod consumer;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod models;
pub mod producer;
pub mod types;

pub use config::AppConfig;
pub use consumer::RequestConsumer;
pub use error::{ModelError, PredictionError, ValidationError};
pub use handler::{PredictionHandler, Service};
pub use models::{OnnxPredictor, Predictor};
pub use producer::ResponseProducer;
pub use types::{PredictionRequest, PredictionResponse};
