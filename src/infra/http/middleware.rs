use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Method, Request, StatusCode, Uri},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};
use uuid::Uuid;

use crate::application::{auth::AdminPrincipal, error::ErrorReport};

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
const RESPONSE_TARGET: &str = "storefront::http::response";

#[derive(Clone)]
pub struct RequestContext {
    pub request_id: String,
}

/// Tag each request with an id, reusing a well-formed inbound `x-request-id`.
pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty() && value.len() <= 64)
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let ctx = RequestContext { request_id };
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&ctx.request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response.extensions_mut().insert(ctx);
    response
}

struct FailedRequest {
    status: StatusCode,
    method: Method,
    uri: Uri,
    elapsed_ms: u128,
    request_id: String,
    admin: String,
    report: Option<ErrorReport>,
}

impl FailedRequest {
    fn emit(self) {
        let (source, chain) = match self.report {
            Some(report) => (report.source, report.messages),
            None => ("unknown", Vec::new()),
        };
        let detail = chain
            .first()
            .map(String::as_str)
            .unwrap_or("no diagnostic available");
        let path = self.uri.path();
        let query = self.uri.query().unwrap_or("");

        if self.status.is_server_error() {
            error!(
                target = RESPONSE_TARGET,
                status = self.status.as_u16(),
                method = %self.method,
                path,
                query,
                elapsed_ms = self.elapsed_ms,
                source,
                detail,
                chain = ?chain,
                request_id = %self.request_id,
                admin = %self.admin,
                "request failed",
            );
        } else {
            warn!(
                target = RESPONSE_TARGET,
                status = self.status.as_u16(),
                method = %self.method,
                path,
                query,
                elapsed_ms = self.elapsed_ms,
                source,
                detail,
                request_id = %self.request_id,
                admin = %self.admin,
                "request rejected",
            );
        }
    }
}

/// Log every 4xx/5xx with the `ErrorReport` the handler attached.
pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();
    let start = Instant::now();

    let mut response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    // The admin gate copies the principal onto the response.
    let admin = response
        .extensions()
        .get::<AdminPrincipal>()
        .map(|principal| principal.username.clone())
        .unwrap_or_default();

    FailedRequest {
        status,
        method,
        uri,
        elapsed_ms: start.elapsed().as_millis(),
        request_id,
        admin,
        report: response.extensions_mut().remove::<ErrorReport>(),
    }
    .emit();

    response
}
