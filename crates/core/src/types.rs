//! Primitive aliases shared across crates.

use chrono::{DateTime, Utc};

/// BIGSERIAL row id of a saved analysis; also the owner id carried in the
/// JWT `sub` claim.
pub type DbId = i64;

/// `created_at` / `updated_at` of saved analyses, always UTC.
pub type Timestamp = DateTime<Utc>;
