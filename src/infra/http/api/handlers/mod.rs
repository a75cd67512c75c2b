//! API handlers organized by resource type.
//!
//! Each submodule holds the handlers for one resource. Service errors are
//! converted to `ApiError` by the helpers defined here.

mod auth;
mod dashboard;
mod notifications;
mod orders;
mod products;
mod reviews;
mod settings;
mod sliders;
mod uploads;

pub use auth::*;
pub use dashboard::*;
pub use notifications::*;
pub use orders::*;
pub use products::*;
pub use reviews::*;
pub use settings::*;
pub use sliders::*;
pub use uploads::*;

// ----- Shared error conversions -----

use axum::http::StatusCode;

use crate::application::auth::AuthError;
use crate::application::catalog::CatalogError;
use crate::application::dashboard::DashboardError;
use crate::application::error::FieldViolation;
use crate::application::images::{ImageError, ObjectStoreError};
use crate::application::notifications::InboxError;
use crate::application::orders::OrderError;
use crate::application::repos::RepoError;
use crate::application::reviews::ReviewError;
use crate::application::settings::SettingsError;
use crate::application::sliders::SliderError;
use crate::domain::error::DomainError;

use super::error::{ApiError, codes};

pub(crate) fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::Duplicate { constraint } => {
            ApiError::conflict("Duplicate record").with_detail(constraint)
        }
        RepoError::NotFound => ApiError::not_found("Resource not found"),
        RepoError::InvalidInput { message } => ApiError::validation(None, message),
        RepoError::Timeout => ApiError::storage(
            StatusCode::SERVICE_UNAVAILABLE,
            "Database timeout",
            "database timeout",
        ),
        RepoError::Persistence(message) => ApiError::storage(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Persistence error",
            message,
        ),
    }
}

pub(crate) fn violation_to_api(violation: FieldViolation) -> ApiError {
    ApiError::validation(Some(violation.field), violation.message)
}

pub(crate) fn image_to_api(err: ImageError) -> ApiError {
    let message = err.to_string();
    match err {
        ImageError::UnsupportedType { .. } | ImageError::Decode(_) | ImageError::Empty => {
            ApiError::new(StatusCode::BAD_REQUEST, codes::IMAGE, message)
        }
        ImageError::TooLarge { .. } => {
            ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, codes::IMAGE, message)
        }
        ImageError::Store(ObjectStoreError::InvalidKey) => {
            ApiError::new(StatusCode::BAD_REQUEST, codes::IMAGE, "Invalid upload folder")
        }
        ImageError::Store(inner) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::IMAGE,
            "Failed to store image",
        )
        .with_detail(inner.to_string()),
    }
}

pub(crate) fn auth_to_api(err: AuthError) -> ApiError {
    match err {
        AuthError::Missing => ApiError::new(
            StatusCode::UNAUTHORIZED,
            codes::AUTH_REQUIRED,
            "Auth required",
        ),
        AuthError::Invalid => ApiError::new(
            StatusCode::UNAUTHORIZED,
            codes::INVALID_CREDENTIALS,
            "Invalid credentials",
        ),
        AuthError::Repo(repo) => repo_to_api(repo),
    }
    .with_source("infra::http::api::auth")
}

pub(crate) fn catalog_to_api(err: CatalogError) -> ApiError {
    match err {
        CatalogError::Validation(violation) => violation_to_api(violation),
        CatalogError::NotFound => ApiError::not_found("Product not found"),
        CatalogError::Image(image) => image_to_api(image),
        CatalogError::Repo(repo) => repo_to_api(repo),
    }
    .with_source("infra::http::api::products")
}

pub(crate) fn order_to_api(err: OrderError) -> ApiError {
    match err {
        OrderError::Validation(violation) => violation_to_api(violation),
        OrderError::Transition(DomainError::InvalidTransition { from, to }) => {
            ApiError::validation(
                Some("status"),
                format!("Order status cannot change from {from} to {to}"),
            )
        }
        OrderError::Transition(DomainError::Validation { message }) => {
            ApiError::validation(None, message)
        }
        OrderError::NotFound => ApiError::not_found("Order not found"),
        OrderError::Conflict { attempts } => ApiError::conflict(
            "Could not allocate an order id, please retry",
        )
        .with_detail(format!("order id collided {attempts} times")),
        OrderError::Repo(repo) => repo_to_api(repo),
    }
    .with_source("infra::http::api::orders")
}

pub(crate) fn review_to_api(err: ReviewError) -> ApiError {
    match err {
        ReviewError::Validation(violation) => violation_to_api(violation),
        ReviewError::NotFound => ApiError::not_found("Review not found"),
        ReviewError::Repo(repo) => repo_to_api(repo),
    }
    .with_source("infra::http::api::reviews")
}

pub(crate) fn slider_to_api(err: SliderError) -> ApiError {
    match err {
        SliderError::Validation(violation) => violation_to_api(violation),
        SliderError::NotFound => ApiError::not_found("Slider not found"),
        SliderError::Image(image) => image_to_api(image),
        SliderError::Repo(repo) => repo_to_api(repo),
    }
    .with_source("infra::http::api::sliders")
}

pub(crate) fn settings_to_api(err: SettingsError) -> ApiError {
    match err {
        SettingsError::Validation(violation) => violation_to_api(violation),
        SettingsError::Repo(repo) => repo_to_api(repo),
    }
    .with_source("infra::http::api::settings")
}

pub(crate) fn dashboard_to_api(err: DashboardError) -> ApiError {
    let detail = format!("metric `{}` failed: {}", err.metric, err.source);
    repo_to_api(err.source)
        .with_detail(detail)
        .with_source("infra::http::api::dashboard")
}

pub(crate) fn inbox_to_api(err: InboxError) -> ApiError {
    match err {
        InboxError::NotFound => ApiError::not_found("Notification target not found"),
        InboxError::Repo(repo) => repo_to_api(repo),
    }
    .with_source("infra::http::api::notifications")
}
