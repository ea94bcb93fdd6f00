//! Handler for the code analysis endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use bugfinder_core::analysis::AnalysisRequest;

use crate::error::AppResult;
use crate::response::AnalysisResponse;
use crate::state::AppState;

/// POST /analysis -- analyze a snippet and return findings plus improved code.
///
/// Public; quota enforcement happens in the route's rate-limit layer.
pub async fn analyze_code(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> AppResult<Json<AnalysisResponse>> {
    let Json(request) = payload?;
    let result = state.analyzer.analyze(&request).await?;
    Ok(Json(AnalysisResponse::from(result)))
}
