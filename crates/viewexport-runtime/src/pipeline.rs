//! The export pipeline.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use viewexport_core::{iso_timestamp, ExportConfig, Result, TrackerMode};
use viewexport_notify::{ExportEvent, Notifier};
use viewexport_protocol::{append_tracker, mint_correlation_id, EmailAnonymizer, TrackerRow};
use viewexport_render::{FormatRenderer, RenderContext, Renderer};

use crate::types::{ExportOutput, ExportRequest};

/// Mixed into a fixed seed so correlation ids don't replay the email draws.
const CORRELATION_SEED_SALT: u64 = 0x5eed_c0de;

/// Runs parse → anonymize → tracker → render → notify for each request.
///
/// Holds no per-request state; every call builds its own table, its own
/// synthetic-email set and its own correlation id.
#[derive(Clone)]
pub struct ExportPipeline {
    tracker_mode: TrackerMode,
    anonymize_emails: bool,
    seed: Option<u64>,
    notifier: Option<Notifier>,
    renderer: Arc<dyn Renderer>,
}

impl Default for ExportPipeline {
    fn default() -> Self {
        Self::new(TrackerMode::default())
    }
}

impl ExportPipeline {
    pub fn new(tracker_mode: TrackerMode) -> Self {
        Self {
            tracker_mode,
            anonymize_emails: true,
            seed: None,
            notifier: None,
            renderer: Arc::new(FormatRenderer),
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            tracker_mode: config.tracker_mode,
            anonymize_emails: config.anonymize_emails,
            seed: config.anonymize_seed,
            notifier: Notifier::from_config(&config.notifier),
            renderer: Arc::new(FormatRenderer),
        }
    }

    pub fn with_anonymization(mut self, enabled: bool) -> Self {
        self.anonymize_emails = enabled;
        self
    }

    /// Fix the random source; identical requests then give identical output.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Replace the built-in format writers.
    pub fn with_renderer(mut self, renderer: impl Renderer) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    pub fn tracker_mode(&self) -> TrackerMode {
        self.tracker_mode
    }

    pub fn run(&self, request: &ExportRequest) -> Result<ExportOutput> {
        self.run_at(request, Utc::now())
    }

    /// Run with an explicit export time.
    pub fn run_at(&self, request: &ExportRequest, now: DateTime<Utc>) -> Result<ExportOutput> {
        let mut table = viewexport_ingest::parse(&request.csv);
        let row_count = table.len();
        debug!(
            "Parsed {} columns, {} rows for \"{}\"",
            table.headers().len(),
            row_count,
            request.dashboard
        );

        let anonymized = if self.anonymize_emails {
            EmailAnonymizer::from_seed(self.seed)
                .anonymize(&mut table)?
                .replaced
        } else {
            0
        };

        let mut id_rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ CORRELATION_SEED_SALT),
            None => StdRng::from_entropy(),
        };
        let correlation_id = mint_correlation_id(&mut id_rng, &now);

        append_tracker(
            &mut table,
            TrackerRow::new(
                self.tracker_mode,
                &correlation_id,
                &request.user,
                &request.dashboard,
                &now,
            ),
        );

        let ctx = RenderContext::new(request.dashboard.clone(), now);
        let rendered = self.renderer.render(&table, request.format, &ctx)?;
        let exported_at = iso_timestamp(&now);

        info!(
            "Export {} ready: {} {} rows as {} ({} bytes)",
            correlation_id,
            request.dashboard,
            row_count,
            request.format,
            rendered.bytes.len()
        );

        if let Some(notifier) = &self.notifier {
            notifier.notify(ExportEvent {
                user: request.user.clone(),
                dashboard: request.dashboard.clone(),
                row_count,
                format: request.format,
                correlation_id: correlation_id.clone(),
                timestamp: exported_at.clone(),
            });
        }

        Ok(ExportOutput {
            rendered,
            correlation_id,
            row_count,
            anonymized,
            exported_at,
        })
    }
}
