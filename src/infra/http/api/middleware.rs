use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::handlers::auth_to_api;
use super::state::ApiState;

pub const USERNAME_HEADER: &str = "username";
pub const PASSWORD_HEADER: &str = "password";

pub async fn admin_auth(
    State(state): State<ApiState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let (username, password) = credential_headers(request.headers());

    let principal = match state
        .auth
        .authenticate(username.as_deref(), password.as_deref())
        .await
    {
        Ok(principal) => principal,
        Err(err) => return auth_to_api(err).into_response(),
    };

    state.auth.record_activity(&principal);
    request.extensions_mut().insert(principal.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(principal);
    response
}

fn credential_headers(headers: &HeaderMap) -> (Option<String>, Option<String>) {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string())
    };
    (read(USERNAME_HEADER), read(PASSWORD_HEADER))
}
