use std::{sync::Arc, time::Instant};

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{
        HeaderValue, StatusCode,
        header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE},
    },
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::error;

use crate::application::images::{ObjectStore, ObjectStoreError};
use crate::application::repos::StoreHealth;

use super::{
    RouterState,
    api::{
        build_api_router,
        error::{ApiError, ApiResponse},
    },
    middleware::{log_responses, set_request_context},
};

#[derive(Clone)]
pub struct HttpState {
    pub store: Arc<dyn StoreHealth>,
    pub objects: Arc<dyn ObjectStore>,
    pub started_at: Instant,
}

pub fn build_router(state: RouterState) -> Router {
    let api_routes = build_api_router(&state);

    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .route("/uploads/{*path}", get(serve_upload))
        .merge(api_routes)
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Serialize)]
struct ServiceInfo {
    name: &'static str,
    version: &'static str,
    status: &'static str,
}

async fn service_info() -> impl IntoResponse {
    ApiResponse::ok(ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthReport {
    status: &'static str,
    database: &'static str,
    uptime_seconds: u64,
}

async fn health(State(state): State<HttpState>) -> Result<impl IntoResponse, ApiError> {
    state.store.ping().await.map_err(|err| {
        ApiError::storage(
            StatusCode::SERVICE_UNAVAILABLE,
            "Database unavailable",
            err.to_string(),
        )
        .with_source("infra::http::public::health")
    })?;

    Ok(ApiResponse::ok(HealthReport {
        status: "ok",
        database: "connected",
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

async fn serve_upload(State(state): State<HttpState>, Path(path): Path<String>) -> Response {
    const SOURCE: &str = "infra::http::public::serve_upload";

    match state.objects.get(&path).await {
        Ok(bytes) => build_upload_response(&path, bytes),
        Err(ObjectStoreError::InvalidKey | ObjectStoreError::NotFound) => {
            ApiError::not_found("Upload not found")
                .with_source(SOURCE)
                .into_response()
        }
        Err(err) => {
            error!(
                target = SOURCE,
                path = %path,
                error = %err,
                "failed to read stored upload"
            );
            ApiError::storage(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read uploaded file",
                err.to_string(),
            )
            .with_source(SOURCE)
            .into_response()
        }
    }
}

fn build_upload_response(path: &str, bytes: Bytes) -> Response {
    let length = bytes.len();
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(CONTENT_TYPE, value);
    }
    headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
    // Keys embed a random uuid, so a stored object never changes.
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=31536000, immutable"),
    );

    response
}

async fn fallback() -> ApiError {
    ApiError::not_found("Route not found").with_source("infra::http::public::fallback")
}
