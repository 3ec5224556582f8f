//! Route table for the ingress gateway.
//!
//! ## Structure
//! - `GET  /`                        — liveness probe, no auth
//! - `POST /{guid}`                  — binary upload into the current time partition
//! - `POST /{guid}/json`             — JSON upload, `?schema_validate=<bool>`
//! - `POST /{guid}/save_state`       — write `state.json` at the dataset root
//! - `GET  /{guid}/retrieve_state`   — stream `state.json` back
//!
//! Everything below `/` requires an `Authorization` header. The request
//! timing layer wraps the whole router.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    handlers::{
        health_handlers::root,
        upload_handlers::{retrieve_state, save_state, upload_file, upload_json_file},
    },
    metrics,
    services::ingest_service::IngestService,
};

/// Build the router. Carries the shared [`IngestService`] as state.
pub fn routes() -> Router<IngestService> {
    Router::new()
        .route("/", get(root))
        .route("/{guid}", post(upload_file))
        .route("/{guid}/json", post(upload_json_file))
        .route("/{guid}/save_state", post(save_state))
        .route("/{guid}/retrieve_state", get(retrieve_state))
        .layer(middleware::from_fn(metrics::track_request))
}
