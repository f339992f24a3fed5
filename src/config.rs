//! Configuration management for the house price prediction service

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nats: NatsConfig,
    pub model: ModelConfig,
    pub form: FormConfig,
    pub logging: LoggingConfig,
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject for incoming prediction requests
    pub request_subject: String,
    /// Subject for responses when a request carries no reply inbox
    pub response_subject: String,
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the pre-trained ONNX regression model
    pub path: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_onnx_threads() -> usize {
    1
}

/// Default values the form front end pre-populates its fields with.
/// All defaults must fall inside the declared ranges.
#[derive(Debug, Clone, Deserialize)]
pub struct FormConfig {
    #[serde(default = "default_area")]
    pub area: i64,
    #[serde(default = "default_bedrooms")]
    pub bedrooms: i64,
    #[serde(default = "default_bathrooms")]
    pub bathrooms: i64,
    #[serde(default = "default_binary")]
    pub mainroad: i64,
    #[serde(default = "default_binary")]
    pub basement: i64,
    #[serde(default = "default_parking")]
    pub parking: i64,
}

fn default_area() -> i64 {
    1500
}

fn default_bedrooms() -> i64 {
    3
}

fn default_bathrooms() -> i64 {
    2
}

fn default_binary() -> i64 {
    1
}

fn default_parking() -> i64 {
    2
}

impl FormConfig {
    /// Build a pre-populated request from the configured defaults.
    pub fn to_request(&self) -> crate::types::PredictionRequest {
        crate::types::PredictionRequest::new(
            self.area,
            self.bedrooms,
            self.bathrooms,
            self.mainroad,
            self.basement,
            self.parking,
        )
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            area: default_area(),
            bedrooms: default_bedrooms(),
            bathrooms: default_bathrooms(),
            mainroad: default_binary(),
            basement: default_binary(),
            parking: default_parking(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                request_subject: "house.predict".to_string(),
                response_subject: "house.predictions".to_string(),
            },
            model: ModelConfig {
                path: "models/house_price.onnx".to_string(),
                onnx_threads: 1,
            },
            form: FormConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.nats.url, "nats://localhost:4222");
        assert_eq!(config.nats.request_subject, "house.predict");
        assert_eq!(config.model.path, "models/house_price.onnx");
        assert_eq!(config.model.onnx_threads, 1);
    }

    #[test]
    fn test_form_defaults_are_within_ranges() {
        let config = AppConfig::default();
        let request = config.form.to_request();
        assert!(request.validate().is_ok());
        assert_eq!(request.area, 1500);
        assert_eq!(request.bedrooms, 3);
        assert_eq!(request.parking, 2);
    }
}
