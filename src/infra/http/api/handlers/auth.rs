//! Admin login

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;

use super::auth_to_api;
use crate::infra::http::api::error::{ApiError, ApiResponse};
use crate::infra::http::api::models::LoginRequest;
use crate::infra::http::api::state::ApiState;

pub async fn login(
    State(state): State<ApiState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;

    let outcome = state
        .auth
        .login(payload.username.as_deref(), payload.password.as_deref())
        .await
        .map_err(auth_to_api)?;

    Ok(ApiResponse::ok(outcome))
}
