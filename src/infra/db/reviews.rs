use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{CreateReviewParams, RepoError, ReviewsRepo},
    domain::entities::ReviewRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

const REVIEW_COLUMNS: &str = "id, name, location, text, rating, is_approved, is_read, created_at";

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    name: String,
    location: String,
    text: String,
    rating: i16,
    is_approved: bool,
    is_read: bool,
    created_at: OffsetDateTime,
}

impl From<ReviewRow> for ReviewRecord {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            location: row.location,
            text: row.text,
            rating: row.rating,
            is_approved: row.is_approved,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ReviewsRepo for PostgresRepositories {
    async fn create_review(&self, params: CreateReviewParams) -> Result<ReviewRecord, RepoError> {
        let sql = format!(
            "INSERT INTO reviews (id, name, location, text, rating, is_approved) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {REVIEW_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&params.name)
            .bind(&params.location)
            .bind(&params.text)
            .bind(params.rating)
            .bind(params.is_approved)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn list_reviews(
        &self,
        approved: Option<bool>,
        limit: Option<u32>,
    ) -> Result<Vec<ReviewRecord>, RepoError> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews \
             WHERE ($1::BOOLEAN IS NULL OR is_approved = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2"
        );
        let rows = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(approved)
            .bind(limit.map(i64::from))
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ReviewRecord::from).collect())
    }

    async fn approve_review(&self, id: Uuid) -> Result<ReviewRecord, RepoError> {
        let sql = format!(
            "UPDATE reviews SET is_approved = TRUE WHERE id = $1 RETURNING {REVIEW_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(ReviewRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_review(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::ensure_affected(result.rows_affected())
    }

    async fn count_reviews(&self, approved: Option<bool>) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reviews WHERE ($1::BOOLEAN IS NULL OR is_approved = $1)",
        )
        .bind(approved)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }

    async fn list_unread_reviews(&self) -> Result<Vec<ReviewRecord>, RepoError> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE NOT is_read \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, ReviewRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ReviewRecord::from).collect())
    }

    async fn count_unread_reviews(&self) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE NOT is_read")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }

    async fn mark_review_read(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE reviews SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::ensure_affected(result.rows_affected())
    }

    async fn mark_all_reviews_read(&self) -> Result<u64, RepoError> {
        let result = sqlx::query("UPDATE reviews SET is_read = TRUE WHERE NOT is_read")
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
