//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::pagination::PageRequest;
use crate::domain::entities::{
    AdminRecord, ColorVariant, OrderRecord, ProductRecord, ReviewRecord, SiteSettingsRecord,
    SliderRecord,
};
use crate::domain::types::OrderStatus;

/// Unique constraint guarding public order identifiers.
pub const ORDER_ID_CONSTRAINT: &str = "orders_order_id_key";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreateProductParams {
    pub name: String,
    pub description: String,
    pub size: String,
    pub regular_price: i64,
    pub offer_price: i64,
    pub offer_percentage: i32,
    pub colors: Vec<ColorVariant>,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct UpdateProductParams {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub size: String,
    pub regular_price: i64,
    pub offer_price: i64,
    pub offer_percentage: i32,
    pub colors: Vec<ColorVariant>,
    pub is_active: bool,
}

#[async_trait]
pub trait ProductsRepo: Send + Sync {
    /// Newest first; `active_only` restricts to storefront-visible products.
    async fn list_products(&self, active_only: bool) -> Result<Vec<ProductRecord>, RepoError>;

    async fn find_product(&self, id: Uuid) -> Result<Option<ProductRecord>, RepoError>;

    async fn create_product(&self, params: CreateProductParams)
    -> Result<ProductRecord, RepoError>;

    async fn update_product(&self, params: UpdateProductParams)
    -> Result<ProductRecord, RepoError>;

    async fn delete_product(&self, id: Uuid) -> Result<(), RepoError>;

    async fn count_products(&self) -> Result<u64, RepoError>;

    /// Current names for the supplied ids; unknown ids are omitted.
    async fn product_names(&self, ids: &[Uuid]) -> Result<Vec<(Uuid, String)>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateOrderParams {
    pub order_id: String,
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub color: String,
    pub size: String,
    pub quantity: i32,
    pub total_price: i64,
    pub delivery_charge: i64,
    pub payment_method: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateOrderStatusParams {
    pub id: Uuid,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub updated_at: OffsetDateTime,
}

#[async_trait]
pub trait OrdersRepo: Send + Sync {
    /// Fails with `RepoError::Duplicate` on `ORDER_ID_CONSTRAINT` when the identifier is taken.
    async fn create_order(&self, params: CreateOrderParams) -> Result<OrderRecord, RepoError>;

    async fn find_order(&self, id: Uuid) -> Result<Option<OrderRecord>, RepoError>;

    /// Newest first.
    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Vec<OrderRecord>, RepoError>;

    async fn count_orders(&self, status: Option<OrderStatus>) -> Result<u64, RepoError>;

    /// Sum of `total_price` across orders in `status`.
    async fn sum_total_price(&self, status: OrderStatus) -> Result<i64, RepoError>;

    async fn recent_orders(&self, limit: u32) -> Result<Vec<OrderRecord>, RepoError>;

    async fn update_order_status(
        &self,
        params: UpdateOrderStatusParams,
    ) -> Result<OrderRecord, RepoError>;

    async fn list_unread_orders(&self) -> Result<Vec<OrderRecord>, RepoError>;

    async fn count_unread_orders(&self) -> Result<u64, RepoError>;

    async fn mark_order_read(&self, id: Uuid) -> Result<(), RepoError>;

    /// Returns the number of orders flipped to read.
    async fn mark_all_orders_read(&self) -> Result<u64, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateReviewParams {
    pub name: String,
    pub location: String,
    pub text: String,
    pub rating: i16,
    pub is_approved: bool,
}

#[async_trait]
pub trait ReviewsRepo: Send + Sync {
    async fn create_review(&self, params: CreateReviewParams) -> Result<ReviewRecord, RepoError>;

    /// Newest first, optionally filtered by approval and capped at `limit`.
    async fn list_reviews(
        &self,
        approved: Option<bool>,
        limit: Option<u32>,
    ) -> Result<Vec<ReviewRecord>, RepoError>;

    async fn approve_review(&self, id: Uuid) -> Result<ReviewRecord, RepoError>;

    async fn delete_review(&self, id: Uuid) -> Result<(), RepoError>;

    async fn count_reviews(&self, approved: Option<bool>) -> Result<u64, RepoError>;

    async fn list_unread_reviews(&self) -> Result<Vec<ReviewRecord>, RepoError>;

    async fn count_unread_reviews(&self) -> Result<u64, RepoError>;

    async fn mark_review_read(&self, id: Uuid) -> Result<(), RepoError>;

    async fn mark_all_reviews_read(&self) -> Result<u64, RepoError>;
}

#[derive(Debug, Clone)]
pub struct SliderParams {
    pub slide_number: i32,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub image_url: String,
    pub is_local_image: bool,
    pub badge_text: Option<String>,
    pub badge_color: Option<String>,
    pub price: Option<i64>,
    pub original_price: Option<i64>,
    pub is_active: bool,
}

#[async_trait]
pub trait SlidersRepo: Send + Sync {
    /// Ordered by `slide_number` ascending.
    async fn list_sliders(&self, active_only: bool) -> Result<Vec<SliderRecord>, RepoError>;

    async fn find_slider(&self, id: Uuid) -> Result<Option<SliderRecord>, RepoError>;

    async fn create_slider(&self, params: SliderParams) -> Result<SliderRecord, RepoError>;

    async fn update_slider(&self, id: Uuid, params: SliderParams)
    -> Result<SliderRecord, RepoError>;

    async fn delete_slider(&self, id: Uuid) -> Result<(), RepoError>;

    async fn count_sliders(&self) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait SettingsRepo: Send + Sync {
    async fn load_site_settings(&self) -> Result<Option<SiteSettingsRecord>, RepoError>;

    /// Insert `defaults` only when no settings row exists, then return the stored row.
    async fn ensure_site_settings(
        &self,
        defaults: SiteSettingsRecord,
    ) -> Result<SiteSettingsRecord, RepoError>;

    async fn upsert_site_settings(
        &self,
        settings: SiteSettingsRecord,
    ) -> Result<SiteSettingsRecord, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateAdminParams {
    pub username: String,
    pub password_hash: Vec<u8>,
}

#[async_trait]
pub trait AdminsRepo: Send + Sync {
    async fn find_admin(&self, username: &str) -> Result<Option<AdminRecord>, RepoError>;

    async fn count_admins(&self) -> Result<u64, RepoError>;

    async fn create_admin(&self, params: CreateAdminParams) -> Result<AdminRecord, RepoError>;

    async fn record_login(&self, id: Uuid, at: OffsetDateTime) -> Result<(), RepoError>;
}

/// Connectivity probe backing the health endpoint.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
