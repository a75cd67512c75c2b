//! Domain entities mirrored from persistent storage.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::types::OrderStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorVariant {
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub image: String,
    /// Set when `image` points into the local object store rather than a remote URL.
    #[serde(default)]
    pub is_local_image: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub size: String,
    pub regular_price: i64,
    pub offer_price: i64,
    pub offer_percentage: i32,
    pub colors: Vec<ColorVariant>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// An order with a denormalised snapshot of the product as it was when ordered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: Uuid,
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
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub is_read: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub text: String,
    pub rating: i16,
    pub is_approved: bool,
    pub is_read: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderRecord {
    pub id: Uuid,
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
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Storefront-wide contact details, delivery charges and headings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettingsRecord {
    pub whatsapp_number: String,
    pub phone_number: String,
    pub footer_text: String,
    pub delivery_charge_inside_dhaka: i64,
    pub delivery_charge_outside_dhaka: i64,
    pub service_hours: String,
    pub home_page_title: String,
    pub order_form_title: String,
    pub email: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub youtube_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminRecord {
    pub id: Uuid,
    pub username: String,
    /// SHA-256 digest of the admin secret.
    pub password_hash: Vec<u8>,
    pub last_login: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}
