//! Handlers for saved analyses.
//!
//! Every handler requires an [`AuthUser`]; the authenticated user is the
//! owner filter for all repository calls, so another user's record yields
//! 404 exactly like a missing one.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use bugfinder_core::error::CoreError;
use bugfinder_core::history;
use bugfinder_core::types::DbId;
use bugfinder_db::models::history_record::{CreateHistoryRecord, UpdateHistoryRecord};
use bugfinder_db::repositories::HistoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{HistoryListResponse, HistoryRecordResponse, MessageResponse};
use crate::state::AppState;

const ENTITY: &str = "HistoryRecord";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

/// Parse the `{id}` path segment. Anything that is not an integer id cannot
/// name a stored record and is reported as not found.
fn parse_id(raw: &str) -> AppResult<DbId> {
    raw.parse().map_err(|_| AppError::MalformedId {
        entity: ENTITY,
        raw: raw.to_string(),
    })
}

/// Reject updates that would blank out a required field.
fn validate_update(input: &UpdateHistoryRecord) -> AppResult<()> {
    if input.original_code.as_deref().is_some_and(str::is_empty)
        || input
            .language
            .as_deref()
            .is_some_and(|l| l.trim().is_empty())
    {
        return Err(AppError::Core(CoreError::Validation(
            "Code and language cannot be empty".to_string(),
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// POST /history
// ---------------------------------------------------------------------------

/// Save an analysis for the authenticated user.
pub async fn create_record(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateHistoryRecord>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    history::validate_required(&input.original_code, &input.language)?;

    let record = HistoryRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(
        id = record.id,
        owner_id = auth.user_id,
        language = %record.language,
        "History record saved",
    );
    Ok((
        StatusCode::CREATED,
        Json(HistoryRecordResponse::from(record)),
    ))
}

// ---------------------------------------------------------------------------
// GET /history
// ---------------------------------------------------------------------------

/// List the authenticated user's records, most recently updated first.
pub async fn list_records(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<HistoryListResponse>> {
    let history_records = HistoryRepo::list_by_owner(&state.pool, auth.user_id).await?;
    tracing::debug!(
        owner_id = auth.user_id,
        count = history_records.len(),
        "Listed history records",
    );
    Ok(Json(HistoryListResponse {
        success: true,
        history_records,
    }))
}

// ---------------------------------------------------------------------------
// GET /history/{id}
// ---------------------------------------------------------------------------

pub async fn get_record(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<HistoryRecordResponse>> {
    let id = parse_id(&raw_id)?;
    let record = HistoryRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(HistoryRecordResponse::from(record)))
}

// ---------------------------------------------------------------------------
// PUT /history/{id}
// ---------------------------------------------------------------------------

/// Replace the provided fields of an owned record.
pub async fn update_record(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateHistoryRecord>, JsonRejection>,
) -> AppResult<Json<HistoryRecordResponse>> {
    let id = parse_id(&raw_id)?;
    let Json(input) = payload?;
    validate_update(&input)?;

    let record = HistoryRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(id, owner_id = auth.user_id, "History record updated");
    Ok(Json(HistoryRecordResponse::from(record)))
}

// ---------------------------------------------------------------------------
// DELETE /history/{id}
// ---------------------------------------------------------------------------

/// Permanently delete an owned record.
pub async fn delete_record(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&raw_id)?;
    if !HistoryRepo::delete(&state.pool, auth.user_id, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(id, owner_id = auth.user_id, "History record deleted");
    Ok(Json(MessageResponse {
        success: true,
        message: "Code history deleted successfully".to_string(),
    }))
}
