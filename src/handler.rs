//! Inference request handler.
//!
//! Drives one submission through the request lifecycle: validate the
//! fields, run the predict call, format the outcome. Every failure is
//! converted to a response at this boundary; nothing escapes to
//! terminate the process.

use crate::models::predictor::Predictor;
use crate::types::request::PredictionRequest;
use crate::types::response::PredictionResponse;
use std::sync::Arc;
use tracing::{debug, warn};

/// Lifecycle of a single prediction request.
///
/// `Idle → Collecting → Submitted → Predicting → {Succeeded, Failed} → Idle`
///
/// Collecting happens in the form front end; the handler picks up at
/// Submitted. A failed request ends the cycle the same as a successful
/// one: there is no retry, only a fresh submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Collecting,
    Submitted,
    Predicting,
    Succeeded,
    Failed,
}

/// Handles validated prediction requests against an injected predictor.
///
/// The predictor is constructed once at process start and shared; the
/// handler itself is stateless between submissions.
pub struct PredictionHandler {
    predictor: Arc<dyn Predictor>,
}

impl PredictionHandler {
    /// Create a handler around a loaded predictor.
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self { predictor }
    }

    /// Process one submitted request end to end.
    ///
    /// Out-of-range fields are rejected before the predictor is
    /// invoked. Predict failures become error responses with a
    /// human-readable message.
    pub fn handle(&self, request: &PredictionRequest) -> PredictionResponse {
        let mut state = RequestState::Submitted;
        debug!(request_id = ?request.request_id, ?state, "Request submitted");

        if let Err(error) = request.validate() {
            state = RequestState::Failed;
            warn!(
                request_id = ?request.request_id,
                field = error.field,
                value = error.value,
                ?state,
                "Request rejected by range validation"
            );
            return PredictionResponse::rejected(request, &error);
        }

        state = RequestState::Predicting;
        debug!(request_id = ?request.request_id, ?state, "Running inference");

        match self.predictor.predict(request) {
            Ok(raw_price) => {
                state = RequestState::Succeeded;
                debug!(
                    request_id = ?request.request_id,
                    price = raw_price,
                    ?state,
                    "Prediction complete"
                );
                PredictionResponse::success(request, raw_price)
            }
            Err(error) => {
                state = RequestState::Failed;
                warn!(
                    request_id = ?request.request_id,
                    error = %error,
                    ?state,
                    "Prediction failed"
                );
                PredictionResponse::failure(request, &error)
            }
        }
    }
}

/// The service either has a working handler or a reason it does not.
///
/// Built once at startup from the model load result; while no model is
/// loaded every request receives the blocking error and no predictor
/// is ever invoked.
pub enum Service {
    Ready(PredictionHandler),
    Disabled { reason: String },
}

impl Service {
    /// Answer one request according to the service state.
    pub fn respond(&self, request: &PredictionRequest) -> PredictionResponse {
        match self {
            Service::Ready(handler) => handler.handle(request),
            Service::Disabled { reason } => {
                PredictionResponse::unavailable(request.request_id.clone(), reason)
            }
        }
    }

    /// Whether prediction is currently possible.
    pub fn is_ready(&self) -> bool {
        matches!(self, Service::Ready(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PredictionError;
    use crate::types::response::ErrorKind;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Deterministic stub returning a fixed price.
    struct ConstantPredictor {
        price: f64,
        calls: AtomicU64,
    }

    impl ConstantPredictor {
        fn new(price: f64) -> Self {
            Self {
                price,
                calls: AtomicU64::new(0),
            }
        }
    }

    impl Predictor for ConstantPredictor {
        fn predict(&self, _request: &PredictionRequest) -> Result<f64, PredictionError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(self.price)
        }
    }

    /// Stub whose predict call always fails.
    struct FailingPredictor;

    impl Predictor for FailingPredictor {
        fn predict(&self, _request: &PredictionRequest) -> Result<f64, PredictionError> {
            Err(PredictionError::EmptyOutput)
        }
    }

    #[test]
    fn test_valid_request_succeeds_with_formatted_price() {
        let handler = PredictionHandler::new(Arc::new(ConstantPredictor::new(3_500_000.0)));
        let request = PredictionRequest::new(1500, 3, 2, 1, 1, 2);

        let response = handler.handle(&request);

        assert!(response.is_success());
        assert_eq!(response.message, "₹ 3,500,000");
        assert_eq!(response.predicted_price, Some(3_500_000.0));
    }

    #[test]
    fn test_out_of_range_request_never_reaches_predictor() {
        let predictor = Arc::new(ConstantPredictor::new(1.0));
        let handler = PredictionHandler::new(predictor.clone());

        let mut request = PredictionRequest::default();
        request.area = 99;
        let response = handler.handle(&request);

        assert!(!response.is_success());
        assert_eq!(response.error_kind, Some(ErrorKind::Validation));
        assert_eq!(predictor.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_failing_predictor_produces_error_message() {
        let handler = PredictionHandler::new(Arc::new(FailingPredictor));
        let request = PredictionRequest::default();

        let response = handler.handle(&request);

        assert!(!response.is_success());
        assert_eq!(response.error_kind, Some(ErrorKind::Prediction));
        assert!(!response.message.is_empty());
    }

    #[test]
    fn test_identical_requests_yield_identical_output() {
        let handler = PredictionHandler::new(Arc::new(ConstantPredictor::new(4_523_891.7)));
        let request = PredictionRequest::new(1500, 3, 2, 1, 1, 2);

        let first = handler.handle(&request);
        let second = handler.handle(&request);

        assert_eq!(first.message, second.message);
        assert_eq!(first.message, "₹ 4,523,892");
    }

    #[test]
    fn test_disabled_service_answers_with_blocking_error() {
        let service = Service::Disabled {
            reason: "model file not found at models/house_price.onnx".to_string(),
        };
        assert!(!service.is_ready());

        let response = service.respond(&PredictionRequest::default());

        assert!(!response.is_success());
        assert_eq!(response.error_kind, Some(ErrorKind::ModelUnavailable));
        assert!(response.message.contains("model file not found"));
    }
}
