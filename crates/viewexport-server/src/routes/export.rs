//! Export routes: pull a view from the upstream server, or accept CSV pushed
//! by the dashboard extension, and answer with the rendered file.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, warn};

use viewexport_core::{Error, ExportFormat};
use viewexport_runtime::{ExportOutput, ExportRequest};

use crate::error::ApiError;
use crate::state::AppState;

const EXPORT_ID_HEADER: &str = "x-export-id";
const UNKNOWN: &str = "unknown";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/export", get(export_view).post(export_pushed))
}

// ---------------------------------------------------------------
// Request types
// ---------------------------------------------------------------

#[derive(Deserialize)]
struct ExportQuery {
    #[serde(rename = "viewId")]
    view_id: Option<String>,
    dashboard: Option<String>,
    user: Option<String>,
    format: Option<String>,
}

#[derive(Deserialize)]
struct PushedExport {
    #[serde(rename = "csvData", default)]
    csv_data: Option<String>,
    user: Option<String>,
    dashboard: Option<String>,
    format: Option<String>,
}

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn parse_format(value: Option<&str>) -> ExportFormat {
    value.map(ExportFormat::parse).unwrap_or_default()
}

// ---------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------

/// GET /api/export?viewId=&dashboard=&user=&format=
async fn export_view(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let view_id = query
        .view_id
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::InvalidRequest("Missing viewId.".into()))?;
    let client = state
        .tableau
        .as_ref()
        .ok_or_else(|| Error::Config("No upstream server configured".into()))?;

    let session = client.sign_in().await?;
    let fetched = client.fetch_view_csv(&session, &view_id).await;
    if let Err(e) = client.sign_out(session).await {
        warn!("Sign-out after fetching view {} failed: {}", view_id, e);
    }
    let csv = fetched?;

    let request = ExportRequest::new(
        csv,
        or_unknown(query.user),
        or_unknown(query.dashboard),
        parse_format(query.format.as_deref()),
    );
    run_export(&state, request).await
}

/// POST /api/export with `{ csvData, user, dashboard, format }`.
async fn export_pushed(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PushedExport>,
) -> Result<Response, ApiError> {
    let csv = body
        .csv_data
        .filter(|csv| !csv.trim().is_empty())
        .ok_or_else(|| Error::InvalidRequest("No CSV data received.".into()))?;

    let request = ExportRequest::new(
        csv,
        or_unknown(body.user),
        or_unknown(body.dashboard),
        parse_format(body.format.as_deref()),
    );
    run_export(&state, request).await
}

async fn run_export(state: &Arc<AppState>, request: ExportRequest) -> Result<Response, ApiError> {
    let pipeline = state.pipeline.clone();
    let output = tokio::task::spawn_blocking(move || pipeline.run(&request))
        .await
        .map_err(|e| Error::Internal(format!("Export task failed: {}", e)))??;
    info!(
        "Served {} ({} data rows, export {})",
        output.rendered.filename, output.row_count, output.correlation_id
    );
    Ok(file_response(output))
}

fn file_response(output: ExportOutput) -> Response {
    let rendered = output.rendered;
    let headers = [
        (header::CONTENT_TYPE, rendered.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", rendered.filename),
        ),
        (
            header::HeaderName::from_static(EXPORT_ID_HEADER),
            output.correlation_id,
        ),
    ];
    (headers, rendered.bytes).into_response()
}
