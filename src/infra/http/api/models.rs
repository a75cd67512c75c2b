use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::catalog::{ColorInput, CreateProductCommand, UpdateProductCommand};
use crate::application::error::FieldViolation;
use crate::application::notifications::ReadTarget;
use crate::application::orders::{CreateOrderCommand, UpdateOrderStatusCommand};
use crate::application::reviews::SubmitReviewCommand;
use crate::application::settings::SettingsPatch;
use crate::application::sliders::SliderCommand;
use crate::domain::entities::OrderRecord;
use crate::domain::types::OrderStatus;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
    pub image: Option<String>,
    pub image_file: Option<String>,
}

impl From<ColorRequest> for ColorInput {
    fn from(request: ColorRequest) -> Self {
        Self {
            name: request.name,
            code: request.code,
            image: request.image,
            image_file: request.image_file,
        }
    }
}

/// Shared by product create and update; create requires `regular_price`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub size: Option<String>,
    pub regular_price: Option<i64>,
    pub offer_price: Option<i64>,
    pub offer_percentage: Option<i32>,
    pub colors: Option<Vec<ColorRequest>>,
    pub is_active: Option<bool>,
}

impl ProductRequest {
    pub fn into_create(self) -> Result<CreateProductCommand, FieldViolation> {
        let regular_price = self
            .regular_price
            .ok_or_else(|| FieldViolation::required("regularPrice"))?;

        Ok(CreateProductCommand {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            size: self.size.unwrap_or_default(),
            regular_price,
            offer_price: self.offer_price,
            offer_percentage: self.offer_percentage,
            colors: self
                .colors
                .unwrap_or_default()
                .into_iter()
                .map(ColorInput::from)
                .collect(),
            is_active: self.is_active,
        })
    }

    pub fn into_update(self) -> UpdateProductCommand {
        UpdateProductCommand {
            name: self.name,
            description: self.description,
            size: self.size,
            regular_price: self.regular_price,
            offer_price: self.offer_price,
            offer_percentage: self.offer_percentage,
            colors: self
                .colors
                .map(|colors| colors.into_iter().map(ColorInput::from).collect()),
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: Option<i32>,
    pub total_price: Option<i64>,
    pub delivery_charge: Option<i64>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<OrderRequest> for CreateOrderCommand {
    type Error = FieldViolation;

    fn try_from(request: OrderRequest) -> Result<Self, Self::Error> {
        let product_id = match request.product_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                Uuid::parse_str(raw)
                    .map_err(|_| FieldViolation::invalid("productId", "is not a valid id"))?,
            ),
        };

        Ok(Self {
            customer_name: request.customer_name,
            phone: request.phone,
            address: request.address,
            product_id,
            product_name: request.product_name,
            color: request.color,
            size: request.size,
            quantity: request.quantity,
            total_price: request.total_price,
            delivery_charge: request.delivery_charge,
            payment_method: request.payment_method,
            notes: request.notes,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacedResponse {
    pub id: Uuid,
    pub order_id: String,
    pub status: OrderStatus,
}

impl From<&OrderRecord> for OrderPlacedResponse {
    fn from(order: &OrderRecord) -> Self {
        Self {
            id: order.id,
            order_id: order.order_id.clone(),
            status: order.status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OrderStatusRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<OrderStatusRequest> for UpdateOrderStatusCommand {
    type Error = FieldViolation;

    fn try_from(request: OrderStatusRequest) -> Result<Self, Self::Error> {
        let raw = request
            .status
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| FieldViolation::required("status"))?;
        let status = raw
            .parse::<OrderStatus>()
            .map_err(|_| FieldViolation::invalid("status", format!("`{raw}` is not a known status")))?;

        Ok(Self {
            status,
            notes: request.notes,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub text: Option<String>,
    pub rating: Option<i64>,
    /// Honoured only on the admin create route.
    pub is_approved: Option<bool>,
}

impl ReviewRequest {
    pub fn into_command(self) -> (SubmitReviewCommand, bool) {
        let approved = self.is_approved.unwrap_or(false);
        (
            SubmitReviewCommand {
                name: self.name,
                location: self.location,
                text: self.text,
                rating: self.rating,
            },
            approved,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
    pub approved: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderRequest {
    pub slide_number: Option<i32>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_file: Option<String>,
    pub badge_text: Option<String>,
    pub badge_color: Option<String>,
    pub price: Option<i64>,
    pub original_price: Option<i64>,
    pub is_active: Option<bool>,
}

impl From<SliderRequest> for SliderCommand {
    fn from(request: SliderRequest) -> Self {
        Self {
            slide_number: request.slide_number,
            title: request.title,
            subtitle: request.subtitle,
            description: request.description,
            image_url: request.image_url,
            image_file: request.image_file,
            badge_text: request.badge_text,
            badge_color: request.badge_color,
            price: request.price,
            original_price: request.original_price,
            is_active: request.is_active,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRequest {
    pub whatsapp_number: Option<String>,
    pub phone_number: Option<String>,
    pub footer_text: Option<String>,
    pub delivery_charge_inside_dhaka: Option<i64>,
    pub delivery_charge_outside_dhaka: Option<i64>,
    pub service_hours: Option<String>,
    pub home_page_title: Option<String>,
    pub order_form_title: Option<String>,
    pub email: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub youtube_url: Option<String>,
}

impl From<SettingsRequest> for SettingsPatch {
    fn from(request: SettingsRequest) -> Self {
        Self {
            whatsapp_number: request.whatsapp_number,
            phone_number: request.phone_number,
            footer_text: request.footer_text,
            delivery_charge_inside_dhaka: request.delivery_charge_inside_dhaka,
            delivery_charge_outside_dhaka: request.delivery_charge_outside_dhaka,
            service_hours: request.service_hours,
            home_page_title: request.home_page_title,
            order_form_title: request.order_form_title,
            email: request.email,
            facebook_url: request.facebook_url,
            instagram_url: request.instagram_url,
            youtube_url: request.youtube_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReadRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub id: Option<Uuid>,
}

impl TryFrom<ReadRequest> for ReadTarget {
    type Error = FieldViolation;

    fn try_from(request: ReadRequest) -> Result<Self, Self::Error> {
        let kind = request
            .kind
            .map(|kind| kind.trim().to_ascii_lowercase())
            .ok_or_else(|| FieldViolation::required("type"))?;

        match kind.as_str() {
            "all" => Ok(ReadTarget::All),
            "order" => request
                .id
                .map(ReadTarget::Order)
                .ok_or_else(|| FieldViolation::required("id")),
            "review" => request
                .id
                .map(ReadTarget::Review)
                .ok_or_else(|| FieldViolation::required("id")),
            _ => Err(FieldViolation::invalid(
                "type",
                "must be one of order, review or all",
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Base64UploadRequest {
    pub base64: Option<String>,
    pub folder: Option<String>,
}
