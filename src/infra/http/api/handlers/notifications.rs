//! Admin inbox handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;

use super::{inbox_to_api, violation_to_api};
use crate::application::notifications::ReadTarget;
use crate::infra::http::api::error::{ApiError, ApiResponse};
use crate::infra::http::api::models::ReadRequest;
use crate::infra::http::api::state::ApiState;

pub async fn list_notifications(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let unread = state.inbox.list_unread().await.map_err(inbox_to_api)?;
    Ok(ApiResponse::ok(unread))
}

pub async fn mark_notifications_read(
    State(state): State<ApiState>,
    payload: Result<Json<ReadRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let target = ReadTarget::try_from(payload).map_err(violation_to_api)?;

    state.inbox.mark_read(target).await.map_err(inbox_to_api)?;
    Ok(ApiResponse::ok(serde_json::json!({ "marked": true })))
}
