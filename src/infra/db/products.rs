use async_trait::async_trait;
use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{CreateProductParams, ProductsRepo, RepoError, UpdateProductParams},
    domain::entities::{ColorVariant, ProductRecord},
};

use super::{PostgresRepositories, map_sqlx_error};

const PRODUCT_COLUMNS: &str = "id, name, description, size, regular_price, offer_price, \
     offer_percentage, colors, is_active, created_at";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    size: String,
    regular_price: i64,
    offer_price: i64,
    offer_percentage: i32,
    colors: Json<Vec<ColorVariant>>,
    is_active: bool,
    created_at: OffsetDateTime,
}

impl From<ProductRow> for ProductRecord {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            size: row.size,
            regular_price: row.regular_price,
            offer_price: row.offer_price,
            offer_percentage: row.offer_percentage,
            colors: row.colors.0,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ProductsRepo for PostgresRepositories {
    async fn list_products(&self, active_only: bool) -> Result<Vec<ProductRecord>, RepoError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE ($1 = FALSE OR is_active) \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(active_only)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<ProductRecord>, RepoError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(ProductRecord::from))
    }

    async fn create_product(
        &self,
        params: CreateProductParams,
    ) -> Result<ProductRecord, RepoError> {
        let sql = format!(
            "INSERT INTO products (id, name, description, size, regular_price, offer_price, \
                 offer_percentage, colors, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {PRODUCT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&params.name)
            .bind(&params.description)
            .bind(&params.size)
            .bind(params.regular_price)
            .bind(params.offer_price)
            .bind(params.offer_percentage)
            .bind(Json(&params.colors))
            .bind(params.is_active)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_product(
        &self,
        params: UpdateProductParams,
    ) -> Result<ProductRecord, RepoError> {
        let sql = format!(
            "UPDATE products SET name = $2, description = $3, size = $4, regular_price = $5, \
                 offer_price = $6, offer_percentage = $7, colors = $8, is_active = $9 \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(params.id)
            .bind(&params.name)
            .bind(&params.description)
            .bind(&params.size)
            .bind(params.regular_price)
            .bind(params.offer_price)
            .bind(params.offer_percentage)
            .bind(Json(&params.colors))
            .bind(params.is_active)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(ProductRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::ensure_affected(result.rows_affected())
    }

    async fn count_products(&self) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }

    async fn product_names(&self, ids: &[Uuid]) -> Result<Vec<(Uuid, String)>, RepoError> {
        sqlx::query_as::<_, (Uuid, String)>("SELECT id, name FROM products WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)
    }
}
