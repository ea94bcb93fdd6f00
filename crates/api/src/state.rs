use std::sync::Arc;

use bugfinder_core::analysis::Analyzer;

use crate::config::ServerConfig;
use crate::middleware::rate_limit::AnalysisRateLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: bugfinder_db::DbPool,
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// Analysis pipeline with its injected model client.
    pub analyzer: Analyzer,
    /// Per-client quota for the analysis routes.
    pub rate_limiter: Arc<AnalysisRateLimiter>,
}
