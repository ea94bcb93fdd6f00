//! Route definitions for the `/history` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::history;
use crate::state::AppState;

/// Routes mounted at `/history`.
///
/// ```text
/// GET    /        -> list_records
/// POST   /        -> create_record
/// POST   /save    -> create_record (legacy path)
/// GET    /all     -> list_records  (legacy path)
/// GET    /{id}    -> get_record
/// PUT    /{id}    -> update_record
/// DELETE /{id}    -> delete_record
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(history::list_records).post(history::create_record))
        .route("/save", post(history::create_record))
        .route("/all", get(history::list_records))
        .route(
            "/{id}",
            get(history::get_record)
                .put(history::update_record)
                .delete(history::delete_record),
        )
}
