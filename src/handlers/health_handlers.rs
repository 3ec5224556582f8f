//! Liveness handler.

use axum::{Json, http::StatusCode, response::IntoResponse};
use tracing::debug;

use crate::models::responses::LivenessResponse;

/// `GET /`
///
/// Cheap liveness probe — always 200, never performs I/O, requires no
/// authentication.
pub async fn root() -> impl IntoResponse {
    debug!("root requested");
    (
        StatusCode::OK,
        Json(LivenessResponse {
            message: "OK".into(),
        }),
    )
}
