//! Export notifications.
//!
//! Delivery runs on a detached task. Whatever happens there is logged and
//! dropped; an export never waits on, or fails because of, its notification.

pub mod event;
pub mod sink;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use viewexport_core::NotifierConfig;

pub use event::ExportEvent;
pub use sink::{NotificationSink, WebhookSink, WEBHOOK_TIMEOUT};

#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
}

impl Notifier {
    /// Build from configuration; `None` when notifications are off or no
    /// sink address is configured.
    pub fn from_config(config: &NotifierConfig) -> Option<Self> {
        if !config.is_active() {
            return None;
        }
        let url = config.sink.as_deref()?.trim();
        match WebhookSink::new(url) {
            Ok(sink) => Some(Self::with_sink(sink)),
            Err(e) => {
                warn!("Notifications disabled: {}", e);
                None
            }
        }
    }

    pub fn with_sink(sink: impl NotificationSink) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Fire and forget. Must be called from within a Tokio runtime; outside
    /// one the event is dropped with a warning.
    pub fn notify(&self, event: ExportEvent) -> Option<JoinHandle<()>> {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(
                    "No async runtime; dropping notification for {}",
                    event.correlation_id
                );
                return None;
            }
        };

        let sink = Arc::clone(&self.sink);
        Some(handle.spawn(async move {
            let id = event.correlation_id.clone();
            match sink.deliver(event).await {
                Ok(()) => debug!("Notification sent for {}", id),
                Err(e) => warn!("Notification for {} failed: {}", id, e),
            }
        }))
    }
}
