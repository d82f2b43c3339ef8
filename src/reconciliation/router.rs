use std::io::Cursor;
use std::num::NonZeroUsize;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::domain::{CascadeMode, MatchResult, OrderRecord, RosterEntry};
use super::import::{self, ImportError};
use super::report::{batches, ReconciliationSummary};
use super::roster::RosterRepository;
use super::service::ReconciliationService;
use crate::error::AppError;

/// Roster upload: backend JSON objects or a raw CSV export.
#[derive(Debug, Default, Deserialize)]
pub struct RosterUpload {
    #[serde(default)]
    pub entries: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    pub csv: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReconcileRequest {
    #[serde(default)]
    pub records: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    pub records_csv: Option<String>,
    /// Overrides the stored roster for this request only.
    #[serde(default)]
    pub roster: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    pub roster_csv: Option<String>,
    #[serde(default)]
    pub batch_size: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub cascade: CascadeMode,
    pub roster_size: usize,
    pub summary: ReconciliationSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<MatchResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batches: Option<Vec<Vec<MatchResult>>>,
}

/// Router builder exposing roster upload and reconciliation endpoints.
pub fn reconciliation_router<R>(service: Arc<ReconciliationService<R>>) -> Router
where
    R: RosterRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/roster",
            get(roster_handler::<R>).put(upload_roster_handler::<R>),
        )
        .route("/api/v1/reconcile", post(reconcile_handler::<R>))
        .with_state(service)
}

pub(crate) async fn upload_roster_handler<R>(
    State(service): State<Arc<ReconciliationService<R>>>,
    axum::Json(upload): axum::Json<RosterUpload>,
) -> Result<Response, AppError>
where
    R: RosterRepository + 'static,
{
    let entries = roster_from_payload(upload.entries, upload.csv)?.unwrap_or_default();
    let loaded = service.load_roster(entries)?;
    Ok((StatusCode::ACCEPTED, axum::Json(json!({ "loaded": loaded }))).into_response())
}

pub(crate) async fn roster_handler<R>(
    State(service): State<Arc<ReconciliationService<R>>>,
) -> Result<Response, AppError>
where
    R: RosterRepository + 'static,
{
    let entries = service.roster()?;
    let payload = json!({ "count": entries.len(), "entries": entries });
    Ok((StatusCode::OK, axum::Json(payload)).into_response())
}

pub(crate) async fn reconcile_handler<R>(
    State(service): State<Arc<ReconciliationService<R>>>,
    axum::Json(request): axum::Json<ReconcileRequest>,
) -> Result<Response, AppError>
where
    R: RosterRepository + 'static,
{
    let batch_size = match request.batch_size {
        Some(size) => Some(NonZeroUsize::new(size).ok_or_else(|| {
            AppError::Validation("batch_size must be greater than zero".to_string())
        })?),
        None => None,
    };

    let records = records_from_payload(request.records, request.records_csv)?.ok_or_else(|| {
        AppError::Validation("request must carry records or records_csv".to_string())
    })?;
    let inline_roster = roster_from_payload(request.roster, request.roster_csv)?;

    let outcome = service.reconcile(&records, inline_roster)?;
    let (results, chunks) = match batch_size {
        Some(size) => {
            let chunks = batches(&outcome.results, size)
                .into_iter()
                .map(<[MatchResult]>::to_vec)
                .collect();
            (None, Some(chunks))
        }
        None => (Some(outcome.results), None),
    };

    let response = ReconcileResponse {
        generated_at: outcome.generated_at,
        cascade: outcome.cascade,
        roster_size: outcome.roster_size,
        summary: outcome.summary,
        results,
        batches: chunks,
    };
    Ok((StatusCode::OK, axum::Json(response)).into_response())
}

fn records_from_payload(
    objects: Option<Vec<Map<String, Value>>>,
    csv: Option<String>,
) -> Result<Option<Vec<OrderRecord>>, ImportError> {
    match (objects, csv) {
        (Some(objects), _) => Ok(Some(import::orders_from_json(&objects))),
        (None, Some(csv)) => import::orders_from_csv(Cursor::new(csv.into_bytes())).map(Some),
        (None, None) => Ok(None),
    }
}

fn roster_from_payload(
    objects: Option<Vec<Map<String, Value>>>,
    csv: Option<String>,
) -> Result<Option<Vec<RosterEntry>>, ImportError> {
    match (objects, csv) {
        (Some(objects), _) => Ok(Some(import::roster_from_json(&objects))),
        (None, Some(csv)) => import::roster_from_csv(Cursor::new(csv.into_bytes())).map(Some),
        (None, None) => Ok(None),
    }
}
