pub mod analysis;
pub mod health;
pub mod history;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /analysis                  analyze code (public, rate-limited)
/// /bugs/find-bugs            legacy alias of /analysis
///
/// /history                   list, create (requires auth)
/// /history/save              legacy alias of POST /history
/// /history/all               legacy alias of GET /history
/// /history/{id}              get, update, delete (owner only)
/// ```
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(analysis::router(state))
        .nest("/history", history::router())
}
