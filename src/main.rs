//! House Price Prediction Service - Main Entry Point
//!
//! Loads the pre-trained regression model once, subscribes to
//! prediction requests on NATS, and replies with currency-formatted
//! prices. If the model artifact is missing or corrupt the service
//! starts anyway and answers every request with the blocking error.

use anyhow::Result;
use futures::StreamExt;
use house_price_service::{
    config::{AppConfig, LoggingConfig},
    consumer::RequestConsumer,
    handler::{PredictionHandler, Service},
    metrics::{MetricsReporter, ServiceMetrics},
    models::OnnxPredictor,
    producer::ResponseProducer,
    types::response::ErrorKind,
    PredictionRequest, PredictionResponse,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("house_price_service={}", logging.level).parse()?);

    if logging.format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    init_tracing(&config.logging)?;

    info!("Starting House Price Prediction Service");
    info!(
        model_path = %config.model.path,
        request_subject = %config.nats.request_subject,
        "Configuration loaded successfully"
    );

    let defaults = config.form.to_request();
    if let Err(e) = defaults.validate() {
        warn!(error = %e, "Configured form defaults are outside the declared ranges");
    }
    info!(
        area = defaults.area,
        bedrooms = defaults.bedrooms,
        bathrooms = defaults.bathrooms,
        mainroad = defaults.mainroad,
        basement = defaults.basement,
        parking = defaults.parking,
        "Form defaults"
    );

    // Initialize metrics
    let metrics = Arc::new(ServiceMetrics::new());

    // Load the model exactly once; a failed load disables prediction
    // but does not take the process down
    let service = match OnnxPredictor::from_path(&config.model.path, config.model.onnx_threads) {
        Ok(predictor) => {
            info!("Prediction handler ready");
            Service::Ready(PredictionHandler::new(Arc::new(predictor)))
        }
        Err(e) => {
            error!(error = %e, "Model load failed; prediction disabled");
            Service::Disabled {
                reason: e.to_string(),
            }
        }
    };
    let service = Arc::new(service);

    // Connect to NATS
    let client = async_nats::connect(&config.nats.url).await?;
    info!("Connected to NATS at {}", config.nats.url);

    // Initialize consumer and producer
    let consumer = RequestConsumer::new(client.clone(), &config.nats.request_subject);
    let producer = Arc::new(ResponseProducer::new(
        client.clone(),
        &config.nats.response_subject,
    ));

    // Start metrics reporter (prints summary every 30 seconds)
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 30);
        reporter.start().await;
    });

    info!("Listening on subject: {}", config.nats.request_subject);

    let mut subscription = consumer.subscribe().await?;

    while let Some(message) = subscription.next().await {
        // Each request/response cycle is independent; the loaded model
        // is the only shared resource
        let service = service.clone();
        let producer = producer.clone();
        let metrics = metrics.clone();

        tokio::spawn(async move {
            let start_time = Instant::now();

            let response = match serde_json::from_slice::<PredictionRequest>(&message.payload) {
                Ok(request) => service.respond(&request),
                Err(e) => {
                    warn!(error = %e, "Failed to deserialize prediction request");
                    PredictionResponse::malformed(&e)
                }
            };

            metrics.record_request(start_time.elapsed());
            match response.error_kind {
                None => metrics.record_success(),
                Some(ErrorKind::Validation) => metrics.record_rejection(),
                Some(ErrorKind::Prediction) => metrics.record_failure(),
                Some(_) => {}
            }

            let delivery = match message.reply {
                Some(reply_to) => producer.reply(reply_to, &response).await,
                None => producer.publish(&response).await,
            };

            if let Err(e) = delivery {
                error!(
                    response_id = %response.response_id,
                    error = %e,
                    "Failed to deliver prediction response"
                );
            }
        });
    }

    info!("Service shutting down...");
    metrics.print_summary();

    Ok(())
}
