//! Repository for the `history_records` table.
//!
//! Every read, update and delete filters on both `id` and `owner_id` in the
//! same statement, so a record owned by someone else is indistinguishable
//! from one that does not exist.

use bugfinder_core::history::resolve_title;
use bugfinder_core::preference::Preference;
use bugfinder_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::history_record::{CreateHistoryRecord, HistoryRecord, UpdateHistoryRecord};

/// Column list for `history_records` queries.
const COLUMNS: &str = "\
    id, owner_id, title, original_code, improved_code, language, \
    preference, findings, explanation, created_at, updated_at";

/// Provides owner-scoped CRUD operations for saved analyses.
pub struct HistoryRepo;

impl HistoryRepo {
    /// Insert a new record for `owner_id`, applying field defaults.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateHistoryRecord,
    ) -> Result<HistoryRecord, sqlx::Error> {
        let title = resolve_title(input.title.as_deref());
        let preference = Preference::resolve(input.preference.as_deref());
        let findings = input.findings.clone().unwrap_or_default();

        let query = format!(
            "INSERT INTO history_records \
                (owner_id, title, original_code, improved_code, language, \
                 preference, findings, explanation) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HistoryRecord>(&query)
            .bind(owner_id)
            .bind(title)
            .bind(&input.original_code)
            .bind(input.improved_code.as_deref().unwrap_or_default())
            .bind(&input.language)
            .bind(preference.as_str())
            .bind(Json(findings))
            .bind(input.explanation.as_deref().unwrap_or_default())
            .fetch_one(pool)
            .await
    }

    /// List all records of `owner_id`, most recently updated first.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<HistoryRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM history_records \
             WHERE owner_id = $1 \
             ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, HistoryRecord>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Find a record by ID, only if it belongs to `owner_id`.
    pub async fn find_by_id(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
    ) -> Result<Option<HistoryRecord>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM history_records WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, HistoryRecord>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a record owned by `owner_id`. Only non-`None` fields are applied.
    ///
    /// `updated_at` is refreshed by trigger. Returns `None` if no owned
    /// record matched.
    pub async fn update(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
        input: &UpdateHistoryRecord,
    ) -> Result<Option<HistoryRecord>, sqlx::Error> {
        let title = input.title.as_deref().map(|t| resolve_title(Some(t)));
        let preference = input
            .preference
            .as_deref()
            .map(|p| Preference::resolve(Some(p)).as_str());

        let query = format!(
            "UPDATE history_records SET \
                title = COALESCE($3, title), \
                original_code = COALESCE($4, original_code), \
                improved_code = COALESCE($5, improved_code), \
                language = COALESCE($6, language), \
                preference = COALESCE($7, preference), \
                findings = COALESCE($8, findings), \
                explanation = COALESCE($9, explanation) \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HistoryRecord>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(title)
            .bind(&input.original_code)
            .bind(&input.improved_code)
            .bind(&input.language)
            .bind(preference)
            .bind(input.findings.as_ref().map(Json))
            .bind(&input.explanation)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a record owned by `owner_id`.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, owner_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM history_records WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
