//! NATS message producer for prediction responses

use crate::types::prediction::PredictionResponse;
use anyhow::Result;
use async_nats::Client;
use tracing::debug;

/// Producer for publishing prediction responses to NATS
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

    /// Publish a prediction response
    pub async fn publish(&self, response: &PredictionResponse) -> Result<()> {
        let payload = serde_json::to_vec(response)?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await?;

        debug!(
            response_id = %response.response_id,
            request_id = %response.request_id,
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
