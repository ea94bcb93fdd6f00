//! Saved analysis entity model and DTOs.

use bugfinder_core::finding::Finding;
use bugfinder_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `history_records` table.
///
/// Serialized with the client's field names: `findings` goes out as
/// `errors`, the name the analysis endpoint uses.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: DbId,
    /// Never sent to clients; the caller already knows who they are.
    #[serde(skip_serializing)]
    pub owner_id: DbId,
    pub title: String,
    pub original_code: String,
    pub improved_code: String,
    pub language: String,
    pub preference: String,
    #[serde(rename = "errors")]
    pub findings: Json<Vec<Finding>>,
    pub explanation: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for saving a new record.
///
/// `original_code` and `language` default to empty so that a missing field
/// is reported by validation rather than by the JSON extractor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHistoryRecord {
    pub title: Option<String>,
    #[serde(default)]
    pub original_code: String,
    pub improved_code: Option<String>,
    #[serde(default)]
    pub language: String,
    #[serde(default, deserialize_with = "bugfinder_core::preference::deserialize_lenient")]
    pub preference: Option<String>,
    #[serde(rename = "errors", alias = "findings")]
    pub findings: Option<Vec<Finding>>,
    pub explanation: Option<String>,
}

/// DTO for updating a record. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHistoryRecord {
    pub title: Option<String>,
    pub original_code: Option<String>,
    pub improved_code: Option<String>,
    pub language: Option<String>,
    #[serde(default, deserialize_with = "bugfinder_core::preference::deserialize_lenient")]
    pub preference: Option<String>,
    #[serde(rename = "errors", alias = "findings")]
    pub findings: Option<Vec<Finding>>,
    pub explanation: Option<String>,
}
