//! Image upload handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::response::IntoResponse;

use super::image_to_api;
use crate::infra::http::api::error::{ApiError, ApiResponse, codes};
use crate::infra::http::api::models::Base64UploadRequest;
use crate::infra::http::api::state::ApiState;

pub async fn upload_image(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut folder = None;
    let mut content_type = None;
    let mut data: Option<bytes::Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        ApiError::new(err.status(), codes::IMAGE, "Invalid multipart payload")
            .with_detail(err.body_text())
    })? {
        match field.name() {
            Some("file") => {
                content_type = field.content_type().map(|value| value.to_string());
                data = Some(field.bytes().await.map_err(|err| {
                    ApiError::new(err.status(), codes::IMAGE, "Failed to read upload")
                        .with_detail(err.body_text())
                })?);
            }
            Some("folder") => {
                folder = Some(field.text().await.map_err(|err| {
                    ApiError::validation(Some("folder"), "Invalid folder")
                        .with_detail(err.body_text())
                })?);
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| ApiError::validation(Some("file"), "No file was uploaded"))?;

    let stored = state
        .images
        .ingest_bytes(folder.as_deref(), content_type.as_deref(), data)
        .await
        .map_err(image_to_api)?;

    Ok(ApiResponse::created(stored))
}

pub async fn upload_base64_image(
    State(state): State<ApiState>,
    payload: Result<Json<Base64UploadRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let data_uri = payload
        .base64
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ApiError::validation(Some("base64"), "No base64 data provided"))?;

    let stored = state
        .images
        .ingest_data_uri(payload.folder.as_deref(), &data_uri)
        .await
        .map_err(image_to_api)?;

    Ok(ApiResponse::created(stored))
}
