//! Product handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use uuid::Uuid;

use super::{catalog_to_api, violation_to_api};
use crate::infra::http::api::error::{ApiError, ApiResponse};
use crate::infra::http::api::models::ProductRequest;
use crate::infra::http::api::state::ApiState;

pub async fn list_products(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let products = state.catalog.list_all().await.map_err(catalog_to_api)?;
    Ok(ApiResponse::ok(products))
}

pub async fn list_active_products(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let products = state.catalog.list_active().await.map_err(catalog_to_api)?;
    Ok(ApiResponse::ok(products))
}

pub async fn create_product(
    State(state): State<ApiState>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let command = payload.into_create().map_err(violation_to_api)?;

    let product = state
        .catalog
        .create(command)
        .await
        .map_err(catalog_to_api)?;

    Ok(ApiResponse::created(product))
}

pub async fn update_product(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;

    let product = state
        .catalog
        .update(id, payload.into_update())
        .await
        .map_err(catalog_to_api)?;

    Ok(ApiResponse::ok(product))
}

pub async fn delete_product(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.catalog.delete(id).await.map_err(catalog_to_api)?;
    Ok(ApiResponse::ok(serde_json::json!({ "id": id })))
}
