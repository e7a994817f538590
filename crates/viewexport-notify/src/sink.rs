//! Notification sinks.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::Client;
use tracing::debug;

use viewexport_core::{Error, Result};

use crate::event::ExportEvent;

/// Somewhere export events can be delivered.
pub trait NotificationSink: Send + Sync + 'static {
    fn deliver(&self, event: ExportEvent) -> BoxFuture<'static, Result<()>>;
}

/// Upper bound on one webhook delivery, connect through response.
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts each event as JSON to a webhook URL.
#[derive(Clone)]
pub struct WebhookSink {
    client: Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, WEBHOOK_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Notify(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl NotificationSink for WebhookSink {
    fn deliver(&self, event: ExportEvent) -> BoxFuture<'static, Result<()>> {
        let client = self.client.clone();
        let url = self.url.clone();
        Box::pin(async move {
            let response = client
                .post(&url)
                .json(&event.payload())
                .send()
                .await
                .map_err(|e| Error::Notify(format!("Webhook request failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Notify(format!(
                    "Webhook returned {}: {}",
                    status, body
                )));
            }
            debug!("Delivered export event {}", event.correlation_id);
            Ok(())
        })
    }
}
