//! Request gates.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated owner from a JWT Bearer token.
//! - [`rate_limit`] -- Per-client request quota for the analysis endpoint.

pub mod auth;
pub mod rate_limit;
