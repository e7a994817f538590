//! Configuration loaded from the environment.

use serde::{Deserialize, Serialize};

/// How the tracker row identifies itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerMode {
    /// Constant `TRACKER` literal in the first field.
    #[default]
    Marker,
    /// The per-export correlation id in the first field.
    Unique,
}

impl TrackerMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "marker" => Some(Self::Marker),
            "unique" | "unique-id" | "id" => Some(Self::Unique),
            _ => None,
        }
    }
}

/// Upstream dashboard server credentials (personal access token sign-in).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableauConfig {
    /// Base URL, e.g. `https://tableau.example.com`.
    pub server: String,
    /// REST API version segment (`3.13`).
    pub api_version: String,
    pub pat_name: String,
    #[serde(skip_serializing)]
    pub pat_secret: String,
    /// Site content URL; empty string selects the default site.
    pub site_content_url: String,
}

/// Export notification settings, injected into the notifier at construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifierConfig {
    pub enabled: bool,
    /// Webhook address events are posted to.
    pub sink: Option<String>,
}

impl NotifierConfig {
    /// Notifications only go out when switched on and a sink is known.
    pub fn is_active(&self) -> bool {
        self.enabled && self.sink.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}

/// Top-level ViewExport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// HTTP server port.
    pub port: u16,
    /// Upstream server, when configured.
    pub tableau: Option<TableauConfig>,
    pub tracker_mode: TrackerMode,
    /// Replace email-like column values with synthetic addresses.
    pub anonymize_emails: bool,
    /// Fixed seed for the synthetic email generator.
    pub anonymize_seed: Option<u64>,
    pub notifier: NotifierConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            port: 3003,
            tableau: None,
            tracker_mode: TrackerMode::Marker,
            anonymize_emails: true,
            anonymize_seed: None,
            notifier: NotifierConfig::default(),
        }
    }
}

impl ExportConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = non_empty("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(defaults.port);

        let tableau = match (
            non_empty("TABLEAU_SERVER"),
            non_empty("PAT_NAME"),
            non_empty("PAT_SECRET"),
        ) {
            (Some(server), Some(pat_name), Some(pat_secret)) => Some(TableauConfig {
                server: server.trim_end_matches('/').to_string(),
                api_version: non_empty("TABLEAU_API_VERSION").unwrap_or_else(|| "3.13".into()),
                pat_name,
                pat_secret,
                site_content_url: lookup("SITE_CONTENT_URL").unwrap_or_default(),
            }),
            _ => None,
        };

        let tracker_mode = non_empty("TRACKER_MODE")
            .and_then(|v| TrackerMode::parse(&v))
            .unwrap_or(defaults.tracker_mode);

        let anonymize_emails = non_empty("ANONYMIZE_EMAILS")
            .and_then(|v| parse_bool(&v))
            .unwrap_or(defaults.anonymize_emails);

        let anonymize_seed = non_empty("ANONYMIZE_SEED").and_then(|v| v.trim().parse().ok());

        let notifier = NotifierConfig {
            enabled: non_empty("NOTIFY_ENABLED")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(false),
            sink: non_empty("NOTIFY_WEBHOOK_URL"),
        };

        Self {
            port,
            tableau,
            tracker_mode,
            anonymize_emails,
            anonymize_seed,
            notifier,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
