use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

pub const SECRET_HEADER: &str = "x-rapport-secret";

/// Gates the trigger endpoints behind a shared secret. The secret is
/// accepted from the `x-rapport-secret` header or a `?secret=` query
/// param (for schedulers that cannot set headers). A missing or wrong
/// secret is rejected before any handler runs, so an unauthenticated
/// request never touches the store.
///
/// When no secret is configured every request is refused; running the
/// trigger surface open is never the silent default.
pub async fn require_secret(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(ref expected) = state.trigger_secret else {
        return unauthorized("trigger secret is not configured");
    };

    if let Some(provided) = req.headers().get(SECRET_HEADER).and_then(|v| v.to_str().ok()) {
        if provided == expected.as_ref() {
            return next.run(req).await;
        }
    }

    if let Some(query) = req.uri().query() {
        if let Some(provided) = extract_secret_param(query) {
            if provided == expected.as_ref() {
                return next.run(req).await;
            }
        }
    }

    unauthorized("invalid or missing trigger secret")
}

fn extract_secret_param(query: &str) -> Option<&str> {
    query.split('&').find_map(|kv| kv.strip_prefix("secret="))
}

fn unauthorized(message: &str) -> Response {
    let body = serde_json::json!({ "error": message });
    Response::builder()
        .status(401)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}
