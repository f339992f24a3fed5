//! Prediction response data structures and price formatting.

use crate::error::{PredictionError, ValidationError};
use crate::types::request::PredictionRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// What went wrong, when something did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A field was outside its declared range
    Validation,
    /// The predict call itself failed
    Prediction,
    /// No model is loaded; prediction is disabled
    ModelUnavailable,
    /// The request payload could not be parsed
    Malformed,
}

/// Response returned to the form front end for one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Unique response identifier
    pub response_id: String,

    /// Identifier echoed from the request, if one was supplied
    pub request_id: Option<String>,

    /// Ok or Error
    pub status: ResponseStatus,

    /// Raw model output, present on success
    pub predicted_price: Option<f64>,

    /// Formatted price on success, human-readable failure otherwise
    pub message: String,

    /// Set only when status is Error
    pub error_kind: Option<ErrorKind>,

    /// Response generation timestamp
    pub timestamp: DateTime<Utc>,
}

impl PredictionResponse {
    fn base(request_id: Option<String>) -> Self {
        Self {
            response_id: uuid::Uuid::new_v4().to_string(),
            request_id,
            status: ResponseStatus::Ok,
            predicted_price: None,
            message: String::new(),
            error_kind: None,
            timestamp: Utc::now(),
        }
    }

    /// Successful prediction with the raw scalar and its rendering.
    pub fn success(request: &PredictionRequest, raw_price: f64) -> Self {
        let mut response = Self::base(request.request_id.clone());
        response.predicted_price = Some(raw_price);
        response.message = format_price(raw_price);
        response
    }

    /// Range-validation rejection; the predictor was never invoked.
    pub fn rejected(request: &PredictionRequest, error: &ValidationError) -> Self {
        let mut response = Self::base(request.request_id.clone());
        response.status = ResponseStatus::Error;
        response.error_kind = Some(ErrorKind::Validation);
        response.message = error.to_string();
        response
    }

    /// Failure raised by the predict call itself.
    pub fn failure(request: &PredictionRequest, error: &PredictionError) -> Self {
        let mut response = Self::base(request.request_id.clone());
        response.status = ResponseStatus::Error;
        response.error_kind = Some(ErrorKind::Prediction);
        response.message = format!("An error occurred during prediction: {error}");
        response
    }

    /// Blocking answer while no model is loaded.
    pub fn unavailable(request_id: Option<String>, reason: &str) -> Self {
        let mut response = Self::base(request_id);
        response.status = ResponseStatus::Error;
        response.error_kind = Some(ErrorKind::ModelUnavailable);
        response.message = format!("Prediction is disabled: {reason}");
        response
    }

    /// Unparseable request payload.
    pub fn malformed(error: &serde_json::Error) -> Self {
        let mut response = Self::base(None);
        response.status = ResponseStatus::Error;
        response.error_kind = Some(ErrorKind::Malformed);
        response.message = format!("Invalid request payload: {error}");
        response
    }

    /// Whether the prediction succeeded.
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Ok
    }
}

/// Render a raw prediction as a currency string.
///
/// Rounds to the nearest integer and inserts thousands separators:
/// `4523891.7` renders as `₹ 4,523,892`.
pub fn format_price(value: f64) -> String {
    let rounded = value.round() as i64;
    let sign = if rounded < 0 { "-" } else { "" };
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("₹ {sign}{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_rounds_and_groups() {
        assert_eq!(format_price(4_523_891.7), "₹ 4,523,892");
        assert_eq!(format_price(3_500_000.0), "₹ 3,500,000");
    }

    #[test]
    fn test_format_price_small_values() {
        assert_eq!(format_price(0.4), "₹ 0");
        assert_eq!(format_price(999.9), "₹ 1,000");
        assert_eq!(format_price(12.0), "₹ 12");
    }

    #[test]
    fn test_format_price_negative() {
        assert_eq!(format_price(-1234.5), "₹ -1,235");
    }

    #[test]
    fn test_success_response_carries_formatted_price() {
        let request = PredictionRequest::default().with_request_id("req_42");
        let response = PredictionResponse::success(&request, 3_500_000.0);

        assert!(response.is_success());
        assert_eq!(response.predicted_price, Some(3_500_000.0));
        assert_eq!(response.message, "₹ 3,500,000");
        assert_eq!(response.request_id.as_deref(), Some("req_42"));
        assert!(response.error_kind.is_none());
    }

    #[test]
    fn test_unavailable_response_is_blocking_error() {
        let response = PredictionResponse::unavailable(None, "model file not found");

        assert!(!response.is_success());
        assert_eq!(response.error_kind, Some(ErrorKind::ModelUnavailable));
        assert!(response.message.contains("disabled"));
    }

    #[test]
    fn test_response_serialization() {
        let request = PredictionRequest::default();
        let response = PredictionResponse::success(&request, 1_000_000.0);

        let json = serde_json::to_string(&response).unwrap();
        let deserialized: PredictionResponse = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.status, ResponseStatus::Ok);
        assert_eq!(deserialized.message, "₹ 1,000,000");
    }
}
