//! The failure taxonomy for the gateway and its single translation point
//! into wire responses.
//!
//! Every component raises a typed [`GatewayError`]; the `IntoResponse`
//! impl is the only place a failure becomes an HTTP status and a
//! `{"detail": …}` body. Each failure is logged with its kind before
//! translation — nothing is dropped silently.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The dataset root directory does not exist in the backing store.
    #[error("the given dataset doesn't exist: {0}")]
    DatasetNotFound(String),

    /// The uploaded body is not valid JSON.
    #[error("JSON validation error: {0}")]
    MalformedPayload(String),

    /// `schema.json` is absent from the dataset root.
    #[error("the expected JSON schema does not exist in the dataset")]
    SchemaMissing,

    /// `schema.json` exists but is not valid JSON. Operator error, not a
    /// caller error.
    #[error("malformed schema JSON: {0}")]
    MalformedSchema(String),

    /// The schema document is well-formed JSON but not a usable schema.
    #[error("invalid schema definition: {0}")]
    InvalidSchemaDefinition(String),

    /// The payload parsed but violates the dataset schema. Carries the
    /// structured fields client tooling parses for actionable feedback.
    #[error("JSON schema validation error: {message}")]
    SchemaViolation {
        message: String,
        name: String,
        rule: String,
        rule_definition: String,
    },

    /// Any transport or service failure reported by the backing store.
    #[error("{message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// `Authorization` header missing. Raised by the extractor, not the core.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Multipart body missing or unreadable `file` part. Transport-layer
    /// validation, not core logic.
    #[error("{0}")]
    InvalidFilePart(String),
}

impl GatewayError {
    /// Classify a raw store failure on a write or download path, keeping
    /// the remote-reported status code when the store gave one.
    pub fn upstream(action: &str, err: StoreError) -> Self {
        let status = match &err {
            StoreError::NotFound(_) => Some(404),
            StoreError::Http { status, .. } => Some(*status),
            StoreError::Io(_) => None,
        };
        GatewayError::Upstream {
            status,
            message: format!("{action}: {err}"),
        }
    }

    /// Short kind tag used in logging and detail prefixes.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::DatasetNotFound(_) => "DatasetNotFound",
            GatewayError::MalformedPayload(_) => "MalformedPayload",
            GatewayError::SchemaMissing => "SchemaMissing",
            GatewayError::MalformedSchema(_) => "MalformedSchema",
            GatewayError::InvalidSchemaDefinition(_) => "InvalidSchemaDefinition",
            GatewayError::SchemaViolation { .. } => "SchemaViolation",
            GatewayError::Upstream { .. } => "UpstreamError",
            GatewayError::NotAuthenticated => "NotAuthenticated",
            GatewayError::InvalidFilePart(_) => "RequestValidation",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::DatasetNotFound(_) | GatewayError::SchemaMissing => {
                StatusCode::NOT_FOUND
            }
            GatewayError::MalformedPayload(_) | GatewayError::SchemaViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::MalformedSchema(_) | GatewayError::InvalidSchemaDefinition(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::Upstream { status, .. } => status
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            GatewayError::NotAuthenticated => StatusCode::FORBIDDEN,
            GatewayError::InvalidFilePart(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        tracing::error!("({}) {}", self.kind(), self);

        let detail = match &self {
            GatewayError::NotAuthenticated => json!("Not authenticated"),
            GatewayError::SchemaViolation {
                message,
                name,
                rule,
                rule_definition,
            } => json!({
                "message": message,
                "name": name,
                "rule": rule,
                "rule_definition": rule_definition,
            }),
            other => json!(format!("({}) {}", other.kind(), other)),
        };

        (self.status(), Json(json!({ "detail": detail }))).into_response()
    }
}
