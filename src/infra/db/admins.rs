use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{AdminsRepo, CreateAdminParams, RepoError},
    domain::entities::AdminRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct AdminRow {
    id: Uuid,
    username: String,
    password_hash: Vec<u8>,
    last_login: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
}

impl From<AdminRow> for AdminRecord {
    fn from(row: AdminRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            last_login: row.last_login,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AdminsRepo for PostgresRepositories {
    async fn find_admin(&self, username: &str) -> Result<Option<AdminRecord>, RepoError> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT id, username, password_hash, last_login, created_at \
             FROM admins WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(AdminRecord::from))
    }

    async fn count_admins(&self) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }

    async fn create_admin(&self, params: CreateAdminParams) -> Result<AdminRecord, RepoError> {
        let row = sqlx::query_as::<_, AdminRow>(
            "INSERT INTO admins (id, username, password_hash) VALUES ($1, $2, $3) \
             RETURNING id, username, password_hash, last_login, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&params.username)
        .bind(&params.password_hash)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn record_login(&self, id: Uuid, at: OffsetDateTime) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE admins SET last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::ensure_affected(result.rows_affected())
    }
}
