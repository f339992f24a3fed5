//! Prediction request data structures for house price inference.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive range for a request field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRange {
    pub min: i64,
    pub max: i64,
}

impl FieldRange {
    const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Whether a value falls inside the range (bounds included).
    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const AREA_RANGE: FieldRange = FieldRange::new(100, 100_000);
pub const BEDROOMS_RANGE: FieldRange = FieldRange::new(1, 10);
pub const BATHROOMS_RANGE: FieldRange = FieldRange::new(1, 10);
pub const BINARY_RANGE: FieldRange = FieldRange::new(0, 1);
pub const PARKING_RANGE: FieldRange = FieldRange::new(0, 10);

/// Field names in the exact order the model was trained on.
///
/// Reordering these silently corrupts predictions; the model checks
/// shape and type only, not semantics.
pub const FIELD_NAMES: [&str; 6] = [
    "area",
    "bedrooms",
    "bathrooms",
    "mainroad",
    "basement",
    "parking",
];

/// Represents one house to be priced.
///
/// Created fresh per submission and discarded after the response is
/// rendered; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Optional caller-supplied identifier, echoed back in the response
    #[serde(default)]
    pub request_id: Option<String>,

    /// Living area in square feet
    pub area: i64,

    /// Number of bedrooms
    pub bedrooms: i64,

    /// Number of bathrooms
    pub bathrooms: i64,

    /// Mainroad access (1 = yes, 0 = no)
    pub mainroad: i64,

    /// Basement present (1 = yes, 0 = no)
    pub basement: i64,

    /// Number of parking spots
    pub parking: i64,

    /// Submission timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl PredictionRequest {
    /// Create a request with explicit field values.
    pub fn new(
        area: i64,
        bedrooms: i64,
        bathrooms: i64,
        mainroad: i64,
        basement: i64,
        parking: i64,
    ) -> Self {
        Self {
            request_id: None,
            area,
            bedrooms,
            bathrooms,
            mainroad,
            basement,
            parking,
            timestamp: Utc::now(),
        }
    }

    /// Attach a caller-supplied identifier.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Check every field against its declared range.
    ///
    /// Reports the first violation in schema order. Runs before the
    /// predictor is invoked, so out-of-range input never reaches the
    /// model.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let checks: [(&'static str, i64, FieldRange); 6] = [
            ("area", self.area, AREA_RANGE),
            ("bedrooms", self.bedrooms, BEDROOMS_RANGE),
            ("bathrooms", self.bathrooms, BATHROOMS_RANGE),
            ("mainroad", self.mainroad, BINARY_RANGE),
            ("basement", self.basement, BINARY_RANGE),
            ("parking", self.parking, PARKING_RANGE),
        ];

        for (field, value, range) in checks {
            if !range.contains(value) {
                return Err(ValidationError {
                    field,
                    value,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        Ok(())
    }

    /// Assemble the single-row feature vector for the model.
    ///
    /// Order matches [`FIELD_NAMES`] and the training schema; values
    /// are passed through unmodified.
    pub fn to_features(&self) -> [f32; 6] {
        [
            self.area as f32,
            self.bedrooms as f32,
            self.bathrooms as f32,
            self.mainroad as f32,
            self.basement as f32,
            self.parking as f32,
        ]
    }
}

impl Default for PredictionRequest {
    /// Canonical form defaults: a 1500 sqft house with 3 bedrooms,
    /// 2 bathrooms, mainroad access, a basement and 2 parking spots.
    fn default() -> Self {
        Self::new(1500, 3, 2, 1, 1, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request_is_valid() {
        let request = PredictionRequest::default();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_features_preserve_order_and_values() {
        let request = PredictionRequest::new(1500, 3, 2, 1, 1, 2);
        let features = request.to_features();

        assert_eq!(features.len(), FIELD_NAMES.len());
        assert_eq!(features, [1500.0, 3.0, 2.0, 1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_area_boundaries_inclusive() {
        let mut request = PredictionRequest::default();

        request.area = 100;
        assert!(request.validate().is_ok());

        request.area = 100_000;
        assert!(request.validate().is_ok());

        request.area = 99;
        let err = request.validate().unwrap_err();
        assert_eq!(err.field, "area");

        request.area = 100_001;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_binary_fields_reject_other_values() {
        let mut request = PredictionRequest::default();
        request.mainroad = 2;
        let err = request.validate().unwrap_err();
        assert_eq!(err.field, "mainroad");

        let mut request = PredictionRequest::default();
        request.basement = -1;
        assert_eq!(request.validate().unwrap_err().field, "basement");
    }

    #[test]
    fn test_parking_allows_zero() {
        let mut request = PredictionRequest::default();
        request.parking = 0;
        assert!(request.validate().is_ok());

        request.parking = 11;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_request_serialization() {
        let request = PredictionRequest::default().with_request_id("req_001");

        let json = serde_json::to_string(&request).unwrap();
        let deserialized: PredictionRequest = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.request_id.as_deref(), Some("req_001"));
        assert_eq!(deserialized.area, request.area);
        assert_eq!(deserialized.parking, request.parking);
    }

    #[test]
    fn test_request_without_optional_fields_deserializes() {
        let json = r#"{"area":1500,"bedrooms":3,"bathrooms":2,"mainroad":1,"basement":1,"parking":2}"#;
        let request: PredictionRequest = serde_json::from_str(json).unwrap();
        assert!(request.request_id.is_none());
        assert!(request.validate().is_ok());
    }
}
