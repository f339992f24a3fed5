//! Test Prediction Client
//!
//! Generates house prediction requests, sends them over NATS
//! request/reply, and prints the formatted replies.

use house_price_service::types::request::{
    PredictionRequest, AREA_RANGE, BATHROOMS_RANGE, BEDROOMS_RANGE, PARKING_RANGE,
};
use house_price_service::types::response::PredictionResponse;
use rand::Rng;
use std::time::Duration;
use tracing::{info, warn};

/// Request generator for testing
struct RequestGenerator {
    rng: rand::rngs::ThreadRng,
    request_counter: u64,
}

impl RequestGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            request_counter: 0,
        }
    }

    /// Generate a random request within the declared ranges
    fn generate_valid(&mut self) -> PredictionRequest {
        self.request_counter += 1;

        PredictionRequest::new(
            self.rng.gen_range(AREA_RANGE.min..=10_000),
            self.rng.gen_range(BEDROOMS_RANGE.min..=5),
            self.rng.gen_range(BATHROOMS_RANGE.min..=3),
            self.rng.gen_range(0..=1),
            self.rng.gen_range(0..=1),
            self.rng.gen_range(PARKING_RANGE.min..=3),
        )
        .with_request_id(format!("req_{:06}", self.request_counter))
    }

    /// Generate a request with an out-of-range area, which the
    /// service must reject before inference
    fn generate_invalid(&mut self) -> PredictionRequest {
        self.request_counter += 1;

        let mut request = self.generate_valid();
        request.area = if self.rng.gen_bool(0.5) {
            AREA_RANGE.min - 1
        } else {
            AREA_RANGE.max + 1
        };
        request
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("test_client=info".parse()?),
        )
        .init();

    info!("Starting Test Prediction Client");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let nats_url = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("nats://localhost:4222");
    let subject = args.get(2).map(|s| s.as_str()).unwrap_or("house.predict");
    let count: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(10);
    let invalid_rate: f64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(0.1);
    let delay_ms: u64 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(200);

    info!(
        nats_url = %nats_url,
        subject = %subject,
        count = count,
        invalid_rate = invalid_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    // Connect to NATS
    let client = match async_nats::connect(nats_url).await {
        Ok(c) => {
            info!("Connected to NATS");
            c
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to NATS. Running in dry-run mode.");
            return run_dry_mode(count, invalid_rate, delay_ms).await;
        }
    };

    let mut generator = RequestGenerator::new();
    let mut rng = rand::thread_rng();

    info!("Sending {} prediction requests...", count);

    let mut succeeded = 0;
    let mut failed = 0;

    for _ in 0..count {
        let request = if rng.gen_bool(invalid_rate) {
            generator.generate_invalid()
        } else {
            generator.generate_valid()
        };

        let payload = serde_json::to_vec(&request)?;

        match client.request(subject.to_string(), payload.into()).await {
            Ok(reply) => match serde_json::from_slice::<PredictionResponse>(&reply.payload) {
                Ok(response) => {
                    if response.is_success() {
                        succeeded += 1;
                    } else {
                        failed += 1;
                    }
                    info!(
                        request_id = ?response.request_id,
                        status = ?response.status,
                        "{}",
                        response.message
                    );
                }
                Err(e) => {
                    failed += 1;
                    warn!(error = %e, "Unparseable reply");
                }
            },
            Err(e) => {
                failed += 1;
                warn!(error = %e, "Request failed");
            }
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!(
        "Completed! {} requests ({} priced, {} errored)",
        count, succeeded, failed
    );

    Ok(())
}

async fn run_dry_mode(count: u64, invalid_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no NATS connection)");

    let mut generator = RequestGenerator::new();
    let mut rng = rand::thread_rng();

    for i in 0..count {
        let request = if rng.gen_bool(invalid_rate) {
            generator.generate_invalid()
        } else {
            generator.generate_valid()
        };

        let json = serde_json::to_string_pretty(&request)?;
        info!("Sample request {}:\n{}", i + 1, json);

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
