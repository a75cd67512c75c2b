//! Review handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use uuid::Uuid;

use super::review_to_api;
use crate::infra::http::api::error::{ApiError, ApiResponse};
use crate::infra::http::api::models::{ReviewListQuery, ReviewRequest};
use crate::infra::http::api::state::ApiState;

pub async fn list_reviews(
    State(state): State<ApiState>,
    Query(query): Query<ReviewListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let reviews = state
        .reviews
        .list(query.approved)
        .await
        .map_err(review_to_api)?;
    Ok(ApiResponse::ok(reviews))
}

pub async fn create_review(
    State(state): State<ApiState>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let (command, approved) = payload.into_command();

    let review = state
        .reviews
        .create(command, approved)
        .await
        .map_err(review_to_api)?;

    Ok(ApiResponse::created(review))
}

pub async fn approve_review(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state.reviews.approve(id).await.map_err(review_to_api)?;
    Ok(ApiResponse::ok(review))
}

pub async fn delete_review(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.reviews.delete(id).await.map_err(review_to_api)?;
    Ok(ApiResponse::ok(serde_json::json!({ "id": id })))
}

/// Customer submission; any `is_approved` in the body is ignored.
pub async fn submit_review(
    State(state): State<ApiState>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let (command, _) = payload.into_command();

    let review = state.reviews.submit(command).await.map_err(review_to_api)?;
    Ok(ApiResponse::created(review))
}

pub async fn list_public_reviews(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let reviews = state.reviews.list_public().await.map_err(review_to_api)?;
    Ok(ApiResponse::ok(reviews))
}
