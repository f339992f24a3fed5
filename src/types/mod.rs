//! Type definitions for the prediction service

pub mod request;
pub mod response;

pub use request::PredictionRequest;
pub use response::{ErrorKind, PredictionResponse, ResponseStatus};
