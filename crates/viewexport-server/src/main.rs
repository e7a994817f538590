//! ViewExport: dashboard view export server.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod error;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the process environment still applies.
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "--help" | "-h" | "help" => {
                println!("ViewExport: dashboard view export server");
                println!();
                println!("Usage: viewexport");
                println!();
                println!("Configuration is read from the environment (and .env):");
                println!("  PORT, TABLEAU_SERVER, TABLEAU_API_VERSION, PAT_NAME, PAT_SECRET,");
                println!("  SITE_CONTENT_URL, TRACKER_MODE, ANONYMIZE_EMAILS, ANONYMIZE_SEED,");
                println!("  NOTIFY_ENABLED, NOTIFY_WEBHOOK_URL");
                return Ok(());
            }
            other => {
                eprintln!("Unknown command: {}. Use 'viewexport help' for usage.", other);
                std::process::exit(1);
            }
        }
    }

    let config = viewexport_core::ExportConfig::from_env();
    let port = config.port;

    match &config.tableau {
        Some(tableau) => info!("Upstream server: {}", tableau.server),
        None => warn!("No upstream server configured; only pushed exports are available"),
    }
    info!(
        "Tracker mode: {:?}, email anonymization: {}, notifications: {}",
        config.tracker_mode,
        config.anonymize_emails,
        config.notifier.is_active()
    );

    let state = Arc::new(AppState::new(config));
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("ViewExport server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
