use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{RepoError, SliderParams, SlidersRepo},
    domain::entities::SliderRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

const SLIDER_COLUMNS: &str = "id, slide_number, title, subtitle, description, image_url, \
     is_local_image, badge_text, badge_color, price, original_price, is_active, created_at";

#[derive(sqlx::FromRow)]
struct SliderRow {
    id: Uuid,
    slide_number: i32,
    title: String,
    subtitle: String,
    description: String,
    image_url: String,
    is_local_image: bool,
    badge_text: Option<String>,
    badge_color: Option<String>,
    price: Option<i64>,
    original_price: Option<i64>,
    is_active: bool,
    created_at: OffsetDateTime,
}

impl From<SliderRow> for SliderRecord {
    fn from(row: SliderRow) -> Self {
        Self {
            id: row.id,
            slide_number: row.slide_number,
            title: row.title,
            subtitle: row.subtitle,
            description: row.description,
            image_url: row.image_url,
            is_local_image: row.is_local_image,
            badge_text: row.badge_text,
            badge_color: row.badge_color,
            price: row.price,
            original_price: row.original_price,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl SlidersRepo for PostgresRepositories {
    async fn list_sliders(&self, active_only: bool) -> Result<Vec<SliderRecord>, RepoError> {
        let sql = format!(
            "SELECT {SLIDER_COLUMNS} FROM sliders \
             WHERE ($1 = FALSE OR is_active) \
             ORDER BY slide_number ASC, created_at ASC"
        );
        let rows = sqlx::query_as::<_, SliderRow>(&sql)
            .bind(active_only)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(SliderRecord::from).collect())
    }

    async fn find_slider(&self, id: Uuid) -> Result<Option<SliderRecord>, RepoError> {
        let sql = format!("SELECT {SLIDER_COLUMNS} FROM sliders WHERE id = $1");
        let row = sqlx::query_as::<_, SliderRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(SliderRecord::from))
    }

    async fn create_slider(&self, params: SliderParams) -> Result<SliderRecord, RepoError> {
        let sql = format!(
            "INSERT INTO sliders (id, slide_number, title, subtitle, description, image_url, \
                 is_local_image, badge_text, badge_color, price, original_price, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {SLIDER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SliderRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(params.slide_number)
            .bind(&params.title)
            .bind(&params.subtitle)
            .bind(&params.description)
            .bind(&params.image_url)
            .bind(params.is_local_image)
            .bind(params.badge_text.as_deref())
            .bind(params.badge_color.as_deref())
            .bind(params.price)
            .bind(params.original_price)
            .bind(params.is_active)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_slider(
        &self,
        id: Uuid,
        params: SliderParams,
    ) -> Result<SliderRecord, RepoError> {
        let sql = format!(
            "UPDATE sliders SET slide_number = $2, title = $3, subtitle = $4, description = $5, \
                 image_url = $6, is_local_image = $7, badge_text = $8, badge_color = $9, \
                 price = $10, original_price = $11, is_active = $12 \
             WHERE id = $1 \
             RETURNING {SLIDER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SliderRow>(&sql)
            .bind(id)
            .bind(params.slide_number)
            .bind(&params.title)
            .bind(&params.subtitle)
            .bind(&params.description)
            .bind(&params.image_url)
            .bind(params.is_local_image)
            .bind(params.badge_text.as_deref())
            .bind(params.badge_color.as_deref())
            .bind(params.price)
            .bind(params.original_price)
            .bind(params.is_active)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(SliderRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_slider(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM sliders WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::ensure_affected(result.rows_affected())
    }

    async fn count_sliders(&self) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sliders")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }
}
