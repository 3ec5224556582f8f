//! IngestService — the upload orchestration core.
//!
//! One instance is built at startup and shared read-only across requests;
//! everything per-request (credential, directory handles) is constructed
//! inside the operation and dropped on every exit path. Steps within an
//! operation are strictly sequential: existence check, partition routing,
//! schema gate, then the write. Nothing here retries — a single upstream
//! failure surfaces immediately to the caller.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Datelike, Timelike, Utc};
use tracing::debug;

use crate::{
    errors::GatewayError,
    services::schema,
    store::{ByteStream, Credential, DirectoryHandle, ObjectStore, StoreError},
};

/// Well-known object name for dataset state, stored at the dataset root.
pub const STATE_OBJECT: &str = "state.json";

#[derive(Clone)]
pub struct IngestService {
    store: Arc<dyn ObjectStore>,
}

impl IngestService {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Bind a handle to the dataset root and verify it exists.
    ///
    /// The gateway never creates dataset roots; a missing one is the
    /// caller's 404. Any other probe failure keeps the remote status.
    async fn resolve_dataset(
        &self,
        token: &str,
        guid: &str,
    ) -> Result<DirectoryHandle, GatewayError> {
        let handle = DirectoryHandle::new(
            Arc::clone(&self.store),
            Credential::new(token),
            guid.to_string(),
        );
        match handle.exists().await {
            Ok(()) => Ok(handle),
            Err(StoreError::NotFound(_)) => Err(GatewayError::DatasetNotFound(guid.to_string())),
            Err(err) => Err(GatewayError::upstream(
                "an error occurred while checking if the dataset exists",
                err,
            )),
        }
    }

    /// Upload an arbitrary file into the dataset's current time partition.
    pub async fn upload_file(
        &self,
        token: &str,
        guid: &str,
        filename: &str,
        data: Bytes,
    ) -> Result<(), GatewayError> {
        let dataset = self.resolve_dataset(token, guid).await?;
        let destination = dataset.sub_path(&partition_path(Utc::now()));
        write_file(&destination, filename, data).await
    }

    /// Upload a JSON file, optionally gated on the dataset schema.
    ///
    /// The body must parse as JSON whether or not validation was requested.
    /// Validation, when requested, fully precedes the write: a payload
    /// that fails the gate never reaches storage.
    pub async fn upload_json(
        &self,
        token: &str,
        guid: &str,
        filename: &str,
        data: Bytes,
        schema_validate: bool,
    ) -> Result<(), GatewayError> {
        let dataset = self.resolve_dataset(token, guid).await?;

        let instance: serde_json::Value = serde_json::from_slice(&data)
            .map_err(|err| GatewayError::MalformedPayload(err.to_string()))?;
        if schema_validate {
            schema::validate_against_schema(&dataset, &instance).await?;
        }

        let destination = dataset.sub_path(&partition_path(Utc::now()));
        write_file(&destination, filename, data).await
    }

    /// Write the dataset state object. Always stored as `state.json` at
    /// the dataset root, bypassing time partitioning.
    pub async fn save_state(
        &self,
        token: &str,
        guid: &str,
        data: Bytes,
    ) -> Result<(), GatewayError> {
        let dataset = self.resolve_dataset(token, guid).await?;
        write_file(&dataset, STATE_OBJECT, data).await
    }

    /// Stream the dataset state object back without buffering it.
    pub async fn retrieve_state(
        &self,
        token: &str,
        guid: &str,
    ) -> Result<ByteStream, GatewayError> {
        let dataset = self.resolve_dataset(token, guid).await?;
        dataset
            .download(STATE_OBJECT)
            .await
            .map_err(|err| GatewayError::upstream("file could not be downloaded", err))
    }
}

/// Overwrite-write one object under `directory`, classifying any store
/// failure as upstream.
async fn write_file(
    directory: &DirectoryHandle,
    filename: &str,
    data: Bytes,
) -> Result<(), GatewayError> {
    debug!("uploading `{}` to `{}`", filename, directory.path());
    directory
        .upload(filename, data)
        .await
        .map_err(|err| GatewayError::upstream("an error occurred while uploading file", err))
}

/// Deterministic UTC time-partition sub-path for ordinary uploads.
///
/// Two uploads in the same clock hour land in the same sub-directory;
/// filenames differentiate the objects.
pub fn partition_path(now: DateTime<Utc>) -> String {
    format!(
        "year={:04}/month={:02}/day={:02}/hour={:02}",
        now.year(),
        now.month(),
        now.day(),
        now.hour()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn partition_path_is_deterministic_within_an_hour() {
        let first = Utc.with_ymd_and_hms(2021, 3, 5, 7, 0, 1).unwrap();
        let second = Utc.with_ymd_and_hms(2021, 3, 5, 7, 59, 59).unwrap();
        assert_eq!(partition_path(first), partition_path(second));
        assert_eq!(partition_path(first), "year=2021/month=03/day=05/hour=07");
    }

    #[test]
    fn partition_path_changes_on_the_hour() {
        let before = Utc.with_ymd_and_hms(2021, 12, 31, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        assert_ne!(partition_path(before), partition_path(after));
        assert_eq!(partition_path(after), "year=2022/month=01/day=01/hour=00");
    }
}
