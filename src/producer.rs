//! NATS message producer for prediction responses

use crate::types::response::PredictionResponse;
use anyhow::Result;
use async_nats::{Client, Subject};
use tracing::debug;

/// Producer for delivering prediction responses over NATS
#[derive(Clone)]
pub struct ResponseProducer {
    client: Client,
    subject: String,
}

impl ResponseProducer {
    /// Create a new response producer
    pub fn new(client: Client, subject: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
        }
    }

    /// Reply directly to a request's inbox subject
    pub async fn reply(&self, reply_to: Subject, response: &PredictionResponse) -> Result<()> {
        let payload = serde_json::to_vec(response)?;

        self.client.publish(reply_to, payload.into()).await?;

        debug!(
            response_id = %response.response_id,
            request_id = ?response.request_id,
            status = ?response.status,
            "Replied with prediction response"
        );

        Ok(())
    }

    /// Publish a response on the configured response subject.
    /// Used when the request carried no reply inbox.
    pub async fn publish(&self, response: &PredictionResponse) -> Result<()> {
        let payload = serde_json::to_vec(response)?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await?;

        debug!(
            response_id = %response.response_id,
            request_id = ?response.request_id,
            status = ?response.status,
            "Published prediction response"
        );

        Ok(())
    }

    /// Get the subject name
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

#[cfg(test)]
mod tests {
    // Integration tests would require a running NATS server
}
