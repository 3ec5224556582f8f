//! Response bodies for the upload and liveness endpoints.

use serde::Serialize;

/// `201` body for the plain-upload and save-state endpoints.
#[derive(Serialize, Debug)]
pub struct UploadResponse {
    /// The uploaded part's original filename.
    pub filename: String,
}

/// `201` body for the JSON-upload endpoint.
#[derive(Serialize, Debug)]
pub struct JsonUploadResponse {
    pub filename: String,
    /// Whether the schema gate ran for this upload.
    pub schema_validated: bool,
}

/// `200` body for the liveness probe.
#[derive(Serialize, Debug)]
pub struct LivenessResponse {
    pub message: String,
}
