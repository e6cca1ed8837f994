//! Bearer-token shared-secret check for the administrative cron endpoints.

use axum::extract::{Extension, Request};
use axum::http::{header::AUTHORIZATION, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::server::app::AppState;

/// Reject the request unless it carries `Authorization: Bearer <CRON_SECRET>`.
pub async fn require_cron_secret(
    Extension(state): Extension<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let expected = format!("Bearer {}", state.cron_secret);
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value == expected)
        .unwrap_or(false);

    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized" })),
        )
            .into_response();
    }

    next.run(request).await
}
