//! Route definitions for code analysis.

use axum::middleware::from_fn_with_state;
use axum::routing::post;
use axum::Router;

use crate::handlers::analysis;
use crate::middleware::rate_limit::limit_analysis;
use crate::state::AppState;

/// Analysis routes, each behind the per-client quota.
///
/// ```text
/// POST /analysis         -> analyze_code
/// POST /bugs/find-bugs   -> analyze_code (legacy path)
/// ```
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/analysis", post(analysis::analyze_code))
        .route("/bugs/find-bugs", post(analysis::analyze_code))
        .route_layer(from_fn_with_state(state, limit_analysis))
}
