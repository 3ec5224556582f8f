//! The object-store capability the gateway depends on.
//!
//! The core never talks to a concrete backend directly; it goes through
//! [`ObjectStore`], a minimal capability set of {existence probe, upload,
//! download}, and through [`DirectoryHandle`], a request-scoped value
//! binding a backend, a credential, and a directory path. Handles are
//! plain owned values, so release-on-every-exit-path falls out of drop
//! semantics.

pub mod credential;
pub mod fs;

use std::{io, pin::Pin, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use thiserror::Error;

pub use credential::Credential;
pub use fs::FsDataLake;

/// Chunked object payload, streamed out without whole-object buffering.
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("`{0}` not found")]
    NotFound(String),
    #[error("upstream returned status {status}: {message}")]
    Http { status: u16, message: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Minimal backend capability set. One implementation per target store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Probe whether `path` exists as a directory. `Ok(())` means it does;
    /// `NotFound` means it doesn't; anything else is a transport failure.
    async fn directory_exists(&self, credential: &Credential, path: &str) -> StoreResult<()>;

    /// Write `data` to `path/name`, overwriting any existing object.
    /// Intermediate directories are created implicitly by the store.
    async fn upload(
        &self,
        credential: &Credential,
        path: &str,
        name: &str,
        data: Bytes,
    ) -> StoreResult<()>;

    /// Open `path/name` for reading as a chunked byte stream.
    async fn download(
        &self,
        credential: &Credential,
        path: &str,
        name: &str,
    ) -> StoreResult<ByteStream>;
}

/// A directory in the backing store, bound to one request's credential.
///
/// Cheap to derive sub-handles from; dropped (released) when the request
/// scope ends, on every exit path.
pub struct DirectoryHandle {
    store: Arc<dyn ObjectStore>,
    credential: Credential,
    path: String,
}

impl DirectoryHandle {
    pub fn new(store: Arc<dyn ObjectStore>, credential: Credential, path: String) -> Self {
        Self {
            store,
            credential,
            path,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Probe the directory's existence in the store.
    pub async fn exists(&self) -> StoreResult<()> {
        self.store
            .directory_exists(&self.credential, &self.path)
            .await
    }

    /// Derive a handle for a sub-directory beneath this one.
    pub fn sub_path(&self, relative: &str) -> DirectoryHandle {
        DirectoryHandle {
            store: Arc::clone(&self.store),
            credential: self.credential.clone(),
            path: format!("{}/{}", self.path, relative),
        }
    }

    /// Overwrite-write `data` under this directory.
    pub async fn upload(&self, name: &str, data: Bytes) -> StoreResult<()> {
        self.store
            .upload(&self.credential, &self.path, name, data)
            .await
    }

    /// Open an object under this directory as a byte stream.
    pub async fn download(&self, name: &str) -> StoreResult<ByteStream> {
        self.store
            .download(&self.credential, &self.path, name)
            .await
    }
}

/// Drain a download stream into memory. Used where the caller needs the
/// whole object (schema documents), never on the retrieval path.
pub async fn read_to_end(mut stream: ByteStream) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    while let Some(chunk) = stream.next().await {
        buf.extend_from_slice(&chunk?);
    }
    Ok(buf)
}
