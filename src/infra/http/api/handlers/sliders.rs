//! Slider handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use uuid::Uuid;

use super::slider_to_api;
use crate::infra::http::api::error::{ApiError, ApiResponse};
use crate::infra::http::api::models::SliderRequest;
use crate::infra::http::api::state::ApiState;

pub async fn list_sliders(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let sliders = state.sliders.list_all().await.map_err(slider_to_api)?;
    Ok(ApiResponse::ok(sliders))
}

pub async fn list_active_sliders(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let sliders = state.sliders.list_active().await.map_err(slider_to_api)?;
    Ok(ApiResponse::ok(sliders))
}

pub async fn create_slider(
    State(state): State<ApiState>,
    payload: Result<Json<SliderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;

    let slider = state
        .sliders
        .create(payload.into())
        .await
        .map_err(slider_to_api)?;

    Ok(ApiResponse::created(slider))
}

pub async fn update_slider(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<SliderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;

    let slider = state
        .sliders
        .update(id, payload.into())
        .await
        .map_err(slider_to_api)?;

    Ok(ApiResponse::ok(slider))
}

pub async fn delete_slider(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.sliders.delete(id).await.map_err(slider_to_api)?;
    Ok(ApiResponse::ok(serde_json::json!({ "id": id })))
}
