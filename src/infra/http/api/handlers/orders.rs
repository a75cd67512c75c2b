//! Order handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use uuid::Uuid;

use super::{order_to_api, violation_to_api};
use crate::application::error::FieldViolation;
use crate::application::orders::{CreateOrderCommand, UpdateOrderStatusCommand};
use crate::application::pagination::PageRequest;
use crate::domain::types::OrderStatus;
use crate::infra::http::api::error::{ApiError, ApiResponse};
use crate::infra::http::api::models::{
    OrderListQuery, OrderPlacedResponse, OrderRequest, OrderStatusRequest,
};
use crate::infra::http::api::state::ApiState;

pub async fn list_orders(
    State(state): State<ApiState>,
    Query(query): Query<OrderListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(raw.parse::<OrderStatus>().map_err(|_| {
            violation_to_api(FieldViolation::invalid(
                "status",
                format!("`{raw}` is not a known status"),
            ))
        })?),
    };

    let page = state
        .orders
        .list(status, PageRequest::new(query.page, query.limit))
        .await
        .map_err(order_to_api)?;

    Ok(ApiResponse::ok(page))
}

pub async fn get_order(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state.orders.find(id).await.map_err(order_to_api)?;
    Ok(ApiResponse::ok(order))
}

pub async fn update_order_status(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<OrderStatusRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let command = UpdateOrderStatusCommand::try_from(payload).map_err(violation_to_api)?;

    let order = state
        .orders
        .update_status(id, command)
        .await
        .map_err(order_to_api)?;

    Ok(ApiResponse::ok(order))
}

pub async fn place_order(
    State(state): State<ApiState>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let command = CreateOrderCommand::try_from(payload).map_err(violation_to_api)?;

    let order = state
        .orders
        .place_order(command)
        .await
        .map_err(order_to_api)?;

    Ok(ApiResponse::created(OrderPlacedResponse::from(&order)))
}
