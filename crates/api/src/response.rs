//! Response envelope types for API handlers.
//!
//! Every success body carries `"success": true` next to its payload, which is
//! the contract the browser client reads.

use bugfinder_core::analysis::AnalysisResult;
use bugfinder_db::models::history_record::HistoryRecord;
use serde::Serialize;

/// `{ success, errors, improvedCode, explanation }`
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

impl From<AnalysisResult> for AnalysisResponse {
    fn from(result: AnalysisResult) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

/// `{ success, historyRecord }`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecordResponse {
    pub success: bool,
    pub history_record: HistoryRecord,
}

impl From<HistoryRecord> for HistoryRecordResponse {
    fn from(history_record: HistoryRecord) -> Self {
        Self {
            success: true,
            history_record,
        }
    }
}

/// `{ success, historyRecords }`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryListResponse {
    pub success: bool,
    pub history_records: Vec<HistoryRecord>,
}

/// `{ success, message }`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}
