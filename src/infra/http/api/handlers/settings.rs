//! Settings handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;

use super::settings_to_api;
use crate::infra::http::api::error::{ApiError, ApiResponse};
use crate::infra::http::api::models::SettingsRequest;
use crate::infra::http::api::state::ApiState;

/// Served on both the admin and the public route.
pub async fn get_settings(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let settings = state.settings.load().await.map_err(settings_to_api)?;
    Ok(ApiResponse::ok(settings))
}

pub async fn update_settings(
    State(state): State<ApiState>,
    payload: Result<Json<SettingsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;

    let settings = state
        .settings
        .update(payload.into())
        .await
        .map_err(settings_to_api)?;

    Ok(ApiResponse::ok(settings))
}
