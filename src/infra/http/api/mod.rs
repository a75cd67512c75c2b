pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};

use crate::infra::http::RouterState;

/// Request bodies may carry an image as multipart bytes or as base64 text.
/// Product payloads can inline several colour images, so leave room for a few.
const INLINE_IMAGE_ALLOWANCE: usize = 4;

pub fn build_api_router(state: &RouterState) -> Router<RouterState> {
    let auth_state = state.api.clone();
    let body_limit = state
        .api
        .images
        .max_bytes()
        .saturating_mul(INLINE_IMAGE_ALLOWANCE);

    let admin = Router::new()
        .route(
            "/api/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/api/products/{id}",
            put(handlers::update_product).delete(handlers::delete_product),
        )
        .route("/api/orders", get(handlers::list_orders))
        .route("/api/orders/{id}", get(handlers::get_order))
        .route(
            "/api/orders/{id}/status",
            put(handlers::update_order_status),
        )
        .route(
            "/api/reviews",
            get(handlers::list_reviews).post(handlers::create_review),
        )
        .route("/api/reviews/{id}", delete(handlers::delete_review))
        .route("/api/reviews/{id}/approve", put(handlers::approve_review))
        .route(
            "/api/sliders",
            get(handlers::list_sliders).post(handlers::create_slider),
        )
        .route(
            "/api/sliders/{id}",
            put(handlers::update_slider).delete(handlers::delete_slider),
        )
        .route(
            "/api/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .route("/api/dashboard/stats", get(handlers::dashboard_stats))
        .route(
            "/api/admin/notifications",
            get(handlers::list_notifications),
        )
        .route(
            "/api/admin/notifications/read",
            post(handlers::mark_notifications_read),
        )
        .route("/api/upload", post(handlers::upload_image))
        .route("/api/upload/base64", post(handlers::upload_base64_image))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            middleware::admin_auth,
        ));

    let storefront = Router::new()
        .route("/api/admin/login", post(handlers::login))
        .route(
            "/api/frontend/products",
            get(handlers::list_active_products),
        )
        .route("/api/frontend/order", post(handlers::place_order))
        .route("/api/frontend/review", post(handlers::submit_review))
        .route("/api/frontend/reviews", get(handlers::list_public_reviews))
        .route("/api/frontend/sliders", get(handlers::list_active_sliders))
        .route("/api/frontend/settings", get(handlers::get_settings));

    admin
        .merge(storefront)
        .layer(DefaultBodyLimit::max(body_limit))
}
