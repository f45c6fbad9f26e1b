//! NATS message consumer for incoming prediction requests

use anyhow::Result;
use async_nats::{Client, Subscriber};
use tracing::info;

/// Consumer for receiving indicator profiles from NATS
pub struct ProfileConsumer {
    client: Client,
    subject: String,
}

impl ProfileConsumer {
    /// Create a new profile consumer
    pub fn new(client: Client, subject: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
        }
    }

    /// Subscribe to the request subject
    pub async fn subscribe(&self) -> Result<Subscriber> {
        let subscriber = self.client.subscribe(self.subject.clone()).await?;
        info!(subject = %self.subject, "Subscribed to request subject");
        Ok(subscriber)
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
