//! HTTP handlers for the upload and state endpoints.
//!
//! Handlers stay thin: pull the token and the multipart `file` part out of
//! the request, call into [`IngestService`], and shape the 201/200 body.
//! All failure classification lives in `errors`.

use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::debug;

use crate::{
    auth::AccessToken,
    errors::GatewayError,
    models::responses::{JsonUploadResponse, UploadResponse},
    services::ingest_service::IngestService,
};

#[derive(Debug, Deserialize)]
pub struct JsonUploadQuery {
    /// Opt-in flag for the schema gate. Defaults to off.
    #[serde(default)]
    pub schema_validate: bool,
}

/// `POST /{guid}` — upload an arbitrary file into the dataset's current
/// time partition.
pub async fn upload_file(
    State(service): State<IngestService>,
    Path(guid): Path<String>,
    AccessToken(token): AccessToken,
    multipart: Multipart,
) -> Result<impl IntoResponse, GatewayError> {
    debug!("upload file requested");

    let (filename, data) = file_part(multipart).await?;
    service.upload_file(&token, &guid, &filename, data).await?;

    Ok((StatusCode::CREATED, Json(UploadResponse { filename })))
}

/// `POST /{guid}/json?schema_validate=<bool>` — upload a JSON file with
/// optional schema validation.
pub async fn upload_json_file(
    State(service): State<IngestService>,
    Path(guid): Path<String>,
    Query(query): Query<JsonUploadQuery>,
    AccessToken(token): AccessToken,
    multipart: Multipart,
) -> Result<impl IntoResponse, GatewayError> {
    debug!("upload json requested");

    let (filename, data) = file_part(multipart).await?;
    service
        .upload_json(&token, &guid, &filename, data, query.schema_validate)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(JsonUploadResponse {
            filename,
            schema_validated: query.schema_validate,
        }),
    ))
}

/// `POST /{guid}/save_state` — store the body as `state.json` at the
/// dataset root. The response echoes the uploaded part's original name.
pub async fn save_state(
    State(service): State<IngestService>,
    Path(guid): Path<String>,
    AccessToken(token): AccessToken,
    multipart: Multipart,
) -> Result<impl IntoResponse, GatewayError> {
    debug!("save state requested");

    let (filename, data) = file_part(multipart).await?;
    service.save_state(&token, &guid, data).await?;

    Ok((StatusCode::CREATED, Json(UploadResponse { filename })))
}

/// `GET /{guid}/retrieve_state` — stream `state.json` back as an octet
/// stream without buffering it.
pub async fn retrieve_state(
    State(service): State<IngestService>,
    Path(guid): Path<String>,
    AccessToken(token): AccessToken,
) -> Result<Response, GatewayError> {
    debug!("retrieve state requested");

    let stream = service.retrieve_state(&token, &guid).await?;

    let mut response = Response::new(Body::from_stream(stream));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/octet-stream"),
    );
    Ok(response)
}

/// Pull the `file` part out of a multipart body.
///
/// A request without one is a body-validation failure (422), enforced
/// here at the transport layer rather than in the core.
async fn file_part(mut multipart: Multipart) -> Result<(String, Bytes), GatewayError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| GatewayError::InvalidFilePart(format!("unreadable multipart body: {err}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let data = field.bytes().await.map_err(|err| {
                GatewayError::InvalidFilePart(format!("unreadable `file` part: {err}"))
            })?;
            return Ok((filename, data));
        }
    }

    Err(GatewayError::InvalidFilePart(
        "field `file` is required".into(),
    ))
}
