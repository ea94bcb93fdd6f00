//! Per-client rate limiting for the analysis endpoint.
//!
//! Each client gets `max_requests` per `window_secs`, replenished evenly
//! across the window. Requests over quota are rejected with 429 before the
//! handler runs, so they never reach the model.
//!
//! Clients are keyed by peer address. The first `X-Forwarded-For` address is
//! used instead only when `trust_forwarded_for` is set, i.e. when the server
//! sits behind a proxy that overwrites the header.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use crate::error::AppError;
use crate::state::AppState;

/// Default requests per window.
const DEFAULT_MAX_REQUESTS: u32 = 100;
/// Default window length: 15 minutes.
const DEFAULT_WINDOW_SECS: u64 = 15 * 60;

/// Bucket used when no client address can be determined.
const UNKNOWN_CLIENT: &str = "unknown";

/// Quota settings for the analysis endpoint.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
    /// Key clients on `X-Forwarded-For` instead of the peer address.
    pub trust_forwarded_for: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window_secs: DEFAULT_WINDOW_SECS,
            trust_forwarded_for: false,
        }
    }
}

impl RateLimitConfig {
    /// Load quota settings from environment variables.
    ///
    /// | Env Var                            | Default |
    /// |------------------------------------|---------|
    /// | `ANALYSIS_RATE_LIMIT_MAX`          | `100`   |
    /// | `ANALYSIS_RATE_LIMIT_WINDOW_SECS`  | `900`   |
    /// | `TRUST_FORWARDED_FOR`              | `false` |
    pub fn from_env() -> Self {
        let max_requests: u32 = std::env::var("ANALYSIS_RATE_LIMIT_MAX")
            .unwrap_or_else(|_| DEFAULT_MAX_REQUESTS.to_string())
            .parse()
            .expect("ANALYSIS_RATE_LIMIT_MAX must be a valid u32");

        let window_secs: u64 = std::env::var("ANALYSIS_RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| DEFAULT_WINDOW_SECS.to_string())
            .parse()
            .expect("ANALYSIS_RATE_LIMIT_WINDOW_SECS must be a valid u64");

        let trust_forwarded_for: bool = std::env::var("TRUST_FORWARDED_FOR")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("TRUST_FORWARDED_FOR must be true or false");

        Self {
            max_requests,
            window_secs,
            trust_forwarded_for,
        }
    }

    /// Convert to a governor quota: a burst of `max_requests`, refilled one
    /// cell every `window / max_requests`.
    fn quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.max_requests).unwrap_or(NonZeroU32::MIN);
        let window = Duration::from_secs(self.window_secs.max(1));
        let period = window / burst.get();
        Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst)
    }
}

/// Keyed limiter shared by every analysis route.
pub struct AnalysisRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
    trust_forwarded_for: bool,
}

impl AnalysisRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            limiter: RateLimiter::keyed(config.quota()),
            clock: DefaultClock::default(),
            trust_forwarded_for: config.trust_forwarded_for,
        }
    }

    /// Consume one cell for `key`. On rejection returns how long until the
    /// next request would be allowed.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.limiter
            .check_key(&key.to_string())
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Drop state for clients whose buckets are full again.
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Identify the client for rate-limiting purposes.
///
/// `X-Forwarded-For` is client-controlled unless a proxy rewrites it, so it
/// is only consulted when `trust_forwarded_for` is set.
fn client_key(request: &Request, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Middleware rejecting requests over the analysis quota.
pub async fn limit_analysis(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&request, state.rate_limiter.trust_forwarded_for);

    if let Err(wait) = state.rate_limiter.check(&key) {
        tracing::warn!(client = %key, retry_after_secs = wait.as_secs(), "Analysis rate limit exceeded");
        return Err(AppError::RateLimited {
            retry_after_secs: wait.as_secs().max(1),
        });
    }

    Ok(next.run(request).await)
}
