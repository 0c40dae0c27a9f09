// src/db/review_repository.rs
// DOCUMENTATION: PostgreSQL adapter for the review store
// PURPOSE: Handle CRUD operations for reviews over a caller-supplied pool

use crate::config::Config;
use crate::db::ReviewStore;
use crate::errors::StoreError;
use crate::models::{Review, ReviewPatch, ValidatedReview, MAX_RATING, MIN_RATING};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

const REVIEW_COLUMNS: &str = "id, comment, rating, author, created_at, updated_at";

/// Review store backed by a PostgreSQL table
/// DOCUMENTATION: The pool is built and owned by the caller; this adapter only
/// issues statements against it
#[derive(Clone)]
pub struct PgReviewStore {
    pool: PgPool,
    table: String,
    record_timestamps: bool,
}

impl PgReviewStore {
    /// `table` must be a plain SQL identifier (see Config::validate)
    pub fn new(pool: PgPool, table: impl Into<String>, record_timestamps: bool) -> Self {
        Self {
            pool,
            table: table.into(),
            record_timestamps,
        }
    }

    pub fn from_config(pool: PgPool, config: &Config) -> Self {
        Self::new(pool, config.reviews_table.clone(), config.record_timestamps)
    }

    /// Create the reviews table if missing
    /// DOCUMENTATION: The CHECK constraint mirrors the 1..=5 rating rule so rows
    /// written around the validator are still rejected
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in schema_statements(&self.table) {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    log::error!("Failed to prepare table {}: {}", self.table, e);
                    StoreError::from(e)
                })?;
        }

        log::info!("Review table {} ready", self.table);
        Ok(())
    }
}

fn schema_statements(table: &str) -> [String; 2] {
    let create_table = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            id UUID PRIMARY KEY,
            comment TEXT,
            rating INTEGER CHECK (rating BETWEEN {min} AND {max}),
            author VARCHAR(24),
            created_at TIMESTAMPTZ,
            updated_at TIMESTAMPTZ
        )
        "#,
        table = table,
        min = MIN_RATING,
        max = MAX_RATING
    );
    let create_index = format!(
        "CREATE INDEX IF NOT EXISTS {table}_author_idx ON {table} (author)",
        table = table
    );
    [create_table, create_index]
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn create(&self, review: &ValidatedReview) -> Result<Review, StoreError> {
        let now = self.record_timestamps.then(Utc::now);
        let sql = format!(
            r#"
            INSERT INTO {table} (id, comment, rating, author, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {columns}
            "#,
            table = self.table,
            columns = REVIEW_COLUMNS
        );

        let created = sqlx::query_as::<_, Review>(&sql)
            .bind(Uuid::new_v4())
            .bind(review.comment())
            .bind(review.rating())
            .bind(review.author())
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to create review: {}", e);
                StoreError::from(e)
            })?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, StoreError> {
        let sql = format!(
            "SELECT {columns} FROM {table} WHERE id = $1",
            table = self.table,
            columns = REVIEW_COLUMNS
        );

        sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch review {}: {}", id, e);
                StoreError::from(e)
            })
    }

    async fn update_by_id(&self, id: Uuid, patch: &ReviewPatch) -> Result<Review, StoreError> {
        // Each field: flag says "touched", value is the new value (NULL clears)
        let sql = format!(
            r#"
            UPDATE {table}
            SET
                comment = CASE WHEN $2 THEN $3 ELSE comment END,
                rating = CASE WHEN $4 THEN $5 ELSE rating END,
                author = CASE WHEN $6 THEN $7 ELSE author END,
                updated_at = COALESCE($8, updated_at)
            WHERE id = $1
            RETURNING {columns}
            "#,
            table = self.table,
            columns = REVIEW_COLUMNS
        );

        let updated = sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .bind(!patch.comment().is_keep())
            .bind(patch.comment().value())
            .bind(!patch.rating().is_keep())
            .bind(patch.rating().value())
            .bind(!patch.author().is_keep())
            .bind(patch.author().value())
            .bind(self.record_timestamps.then(Utc::now))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to update review {}: {}", id, e);
                StoreError::from(e)
            })?;

        updated.ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {table} WHERE id = $1", table = self.table);

        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to delete review {}: {}", id, e);
                StoreError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::validation::{validate, validate_patch};
    use serde_json::json;
    use sqlx::postgres::PgPoolOptions;

    #[test]
    fn test_schema_checks_rating_bounds() {
        let [create_table, create_index] = schema_statements("reviews");

        assert!(create_table.contains("CREATE TABLE IF NOT EXISTS reviews"));
        assert!(create_table.contains(&format!(
            "CHECK (rating BETWEEN {} AND {})",
            MIN_RATING, MAX_RATING
        )));
        assert!(create_index.contains("reviews_author_idx ON reviews (author)"));
    }

    /// Needs a live PostgreSQL: DATABASE_URL=... cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn test_postgres_patch_and_check_constraint() {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            return;
        };
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .unwrap();
        let table = format!("reviews_test_{}", Uuid::new_v4().simple());
        let store = PgReviewStore::new(pool.clone(), table.clone(), true);
        store.ensure_schema().await.unwrap();

        let created = store
            .create(
                &validate(&json!({
                    "comment": "Great stay",
                    "rating": 5,
                    "author": "64f1a2b3c4d5e6f7a8b9c0d1"
                }))
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(store.find_by_id(created.id).await.unwrap(), Some(created.clone()));

        // keep comment, set rating, clear author
        let patch = validate_patch(&json!({ "rating": 2, "author": null })).unwrap();
        let updated = store.update_by_id(created.id, &patch).await.unwrap();
        assert_eq!(updated.comment.as_deref(), Some("Great stay"));
        assert_eq!(updated.rating, Some(2));
        assert_eq!(updated.author, None);
        assert_eq!(updated.created_at, created.created_at);

        let err = store.update_by_id(Uuid::new_v4(), &patch).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        // Writes that bypass the validator still hit the CHECK constraint
        let sql = format!("UPDATE {} SET rating = $1 WHERE id = $2", table);
        let err = sqlx::query(&sql)
            .bind(MAX_RATING + 1)
            .bind(created.id)
            .execute(&pool)
            .await
            .unwrap_err();
        assert!(matches!(StoreError::from(err), StoreError::Conflict(_)));

        store.delete_by_id(created.id).await.unwrap();
        assert_eq!(store.find_by_id(created.id).await.unwrap(), None);

        sqlx::query(&format!("DROP TABLE {}", table))
            .execute(&pool)
            .await
            .unwrap();
    }
}
