use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::usecase::error::InternalErrorDetail;

const BEARER_PREFIX: &str = "bearer ";

/// Rejects requests whose `Authorization` header does not carry the
/// configured API token. The scheme is matched case-insensitively.
pub async fn bearer_auth(
    State(api_token): State<Arc<str>>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();

    let credentials = match auth_header.get(..BEARER_PREFIX.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(BEARER_PREFIX) => {
            &auth_header[BEARER_PREFIX.len()..]
        }
        _ => {
            tracing::warn!("missing or malformed authorization header");
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "No valid bearer token provided" })),
            ));
        }
    };

    let token = credentials.split(' ').next().unwrap_or_default();
    if token != &*api_token {
        tracing::warn!("invalid api token");
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid credentials" })),
        ));
    }

    Ok(next.run(request).await)
}

/// Replaces the opaque 500 body with the failure detail. Only installed
/// outside production.
pub async fn expose_internal_error_detail(mut response: Response) -> Response {
    match response.extensions_mut().remove::<InternalErrorDetail>() {
        Some(InternalErrorDetail(detail)) => (
            response.status(),
            Json(json!({ "message": detail, "error": { "message": detail } })),
        )
            .into_response(),
        None => response,
    }
}
