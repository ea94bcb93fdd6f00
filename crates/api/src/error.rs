use axum::extract::rejection::JsonRejection;
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bugfinder_core::analysis::AnalysisError;
use bugfinder_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`AnalysisError`] for domain errors and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce consistent
/// `{"error", "code", "message"}` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `bugfinder_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure of the analysis pipeline.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The client exhausted its analysis quota.
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// A path id that can never match a record (not an integer). Reported
    /// like any other missing record.
    #[error("{entity} with id {raw} not found")]
    MalformedId { entity: &'static str, raw: String },

    /// No route matched the request.
    #[error("No route for {method} {path}")]
    RouteNotFound { method: String, path: String },

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
            },

            // --- Analysis pipeline ---
            AppError::Analysis(analysis) => match analysis {
                AnalysisError::InvalidRequest(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                AnalysisError::ModelCallFailed(err) => {
                    tracing::error!(error = %err, "Model call failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "MODEL_CALL_FAILED",
                        err.message.clone(),
                    )
                }
                AnalysisError::UnparsableModelResponse(err) => {
                    tracing::error!(error = %err, "Model reply could not be parsed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "UNPARSABLE_MODEL_RESPONSE",
                        err.to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::RateLimited { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                "Too many analysis requests, please try again later".to_string(),
            ),
            AppError::MalformedId { entity, raw } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {raw} not found"),
            ),
            AppError::RouteNotFound { method, path } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("No route for {method} {path}"),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let body = json!({
            "error": error_label(code),
            "code": code,
            "message": message,
        });

        let mut response = (status, axum::Json(body)).into_response();

        if let AppError::RateLimited { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }

        response
    }
}

/// Short human label for an error code, stable across messages.
fn error_label(code: &str) -> &'static str {
    match code {
        "VALIDATION_ERROR" | "BAD_REQUEST" => "Bad request",
        "UNAUTHORIZED" => "Unauthorized",
        "NOT_FOUND" => "Not found",
        "RATE_LIMITED" => "Too many requests",
        "MODEL_CALL_FAILED" | "UNPARSABLE_MODEL_RESPONSE" => "OpenAI API error",
        _ => "Internal server error",
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}
