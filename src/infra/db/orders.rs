use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::{
        pagination::PageRequest,
        repos::{CreateOrderParams, OrdersRepo, RepoError, UpdateOrderStatusParams},
    },
    domain::{entities::OrderRecord, types::OrderStatus},
};

use super::{PostgresRepositories, map_sqlx_error};

const ORDER_COLUMNS: &str = "id, order_id, customer_name, phone, address, product_id, \
     product_name, color, size, quantity, total_price, delivery_charge, payment_method, \
     status, notes, is_read, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    order_id: String,
    customer_name: String,
    phone: String,
    address: String,
    product_id: Option<Uuid>,
    product_name: String,
    color: String,
    size: String,
    quantity: i32,
    total_price: i64,
    delivery_charge: i64,
    payment_method: String,
    status: OrderStatus,
    notes: Option<String>,
    is_read: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<OrderRow> for OrderRecord {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            customer_name: row.customer_name,
            phone: row.phone,
            address: row.address,
            product_id: row.product_id,
            product_name: row.product_name,
            color: row.color,
            size: row.size,
            quantity: row.quantity,
            total_price: row.total_price,
            delivery_charge: row.delivery_charge,
            payment_method: row.payment_method,
            status: row.status,
            notes: row.notes,
            is_read: row.is_read,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl OrdersRepo for PostgresRepositories {
    async fn create_order(&self, params: CreateOrderParams) -> Result<OrderRecord, RepoError> {
        let sql = format!(
            "INSERT INTO orders (id, order_id, customer_name, phone, address, product_id, \
                 product_name, color, size, quantity, total_price, delivery_charge, \
                 payment_method, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {ORDER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&params.order_id)
            .bind(&params.customer_name)
            .bind(&params.phone)
            .bind(&params.address)
            .bind(params.product_id)
            .bind(&params.product_name)
            .bind(&params.color)
            .bind(&params.size)
            .bind(params.quantity)
            .bind(params.total_price)
            .bind(params.delivery_charge)
            .bind(&params.payment_method)
            .bind(params.notes.as_deref())
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<OrderRecord>, RepoError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(OrderRecord::from))
    }

    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Vec<OrderRecord>, RepoError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE ($1::order_status IS NULL OR status = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        let offset = i64::try_from(page.offset())
            .map_err(|_| RepoError::from_persistence("page offset exceeds supported range"))?;
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(status)
            .bind(i64::from(page.limit))
            .bind(offset)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(OrderRecord::from).collect())
    }

    async fn count_orders(&self, status: Option<OrderStatus>) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders WHERE ($1::order_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }

    async fn sum_total_price(&self, status: OrderStatus) -> Result<i64, RepoError> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_price), 0)::BIGINT FROM orders WHERE status = $1",
        )
        .bind(status)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn recent_orders(&self, limit: u32) -> Result<Vec<OrderRecord>, RepoError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC LIMIT $1"
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(i64::from(limit))
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(OrderRecord::from).collect())
    }

    async fn update_order_status(
        &self,
        params: UpdateOrderStatusParams,
    ) -> Result<OrderRecord, RepoError> {
        let sql = format!(
            "UPDATE orders SET status = $2, notes = $3, updated_at = $4 \
             WHERE id = $1 \
             RETURNING {ORDER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(params.id)
            .bind(params.status)
            .bind(params.notes.as_deref())
            .bind(params.updated_at)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(OrderRecord::from).ok_or(RepoError::NotFound)
    }

    async fn list_unread_orders(&self) -> Result<Vec<OrderRecord>, RepoError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE NOT is_read \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(OrderRecord::from).collect())
    }

    async fn count_unread_orders(&self) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE NOT is_read")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }

    async fn mark_order_read(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE orders SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::ensure_affected(result.rows_affected())
    }

    async fn mark_all_orders_read(&self) -> Result<u64, RepoError> {
        let result = sqlx::query("UPDATE orders SET is_read = TRUE WHERE NOT is_read")
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
