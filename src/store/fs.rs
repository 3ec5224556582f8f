//! Filesystem-backed [`ObjectStore`] implementation.
//!
//! Lays datasets out as plain directories beneath a root path. Writes go
//! through a temp file and an overwriting rename; reads stream out through
//! a `ReaderStream`. Local disk needs no credential, so the per-request
//! token is accepted and ignored.

use std::{
    io::{self, ErrorKind},
    path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tokio_util::io::ReaderStream;
use tracing::debug;
use uuid::Uuid;

use super::{ByteStream, Credential, ObjectStore, StoreError, StoreResult};

pub struct FsDataLake {
    root: PathBuf,
}

impl FsDataLake {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Join a store path onto the root, refusing segments that would
    /// escape it. A traversal attempt reads as a missing resource.
    fn resolve(&self, path: &str) -> StoreResult<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative.components().any(|component| {
            !matches!(component, Component::Normal(_) | Component::CurDir)
        });
        if path.is_empty() || escapes {
            return Err(StoreError::NotFound(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

/// Object names must be a single plain path segment. Anything else —
/// empty, absolute, multi-segment, or traversing — would bypass the
/// directory resolution above, so it reads as a missing resource.
fn checked_name(name: &str) -> StoreResult<&str> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(name),
        _ => Err(StoreError::NotFound(name.to_string())),
    }
}

#[async_trait]
impl ObjectStore for FsDataLake {
    async fn directory_exists(&self, _credential: &Credential, path: &str) -> StoreResult<()> {
        let dir = self.resolve(path)?;
        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StoreError::NotFound(path.to_string())),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(path.to_string()))
            }
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    async fn upload(
        &self,
        _credential: &Credential,
        path: &str,
        name: &str,
        data: Bytes,
    ) -> StoreResult<()> {
        let dir = self.resolve(path)?;
        let file_path = dir.join(checked_name(name)?);

        // Intermediate partition directories are created implicitly, the
        // way a hierarchical store materializes paths on write.
        fs::create_dir_all(&dir).await?;

        let tmp_path = dir.join(format!(".tmp-{}", Uuid::new_v4()));
        let mut file = File::create(&tmp_path).await?;
        if let Err(err) = file.write_all(&data).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StoreError::Io(err));
        }
        if let Err(err) = file.sync_all().await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StoreError::Io(err));
        }
        drop(file);

        if let Err(err) = fs::rename(&tmp_path, &file_path).await {
            if err.kind() == ErrorKind::AlreadyExists {
                if let Err(err) = fs::remove_file(&file_path).await {
                    let _ = fs::remove_file(&tmp_path).await;
                    return Err(StoreError::Io(err));
                }
                if let Err(err) = fs::rename(&tmp_path, &file_path).await {
                    let _ = fs::remove_file(&tmp_path).await;
                    return Err(StoreError::Io(err));
                }
            } else {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(StoreError::Io(err));
            }
        }

        debug!("wrote {} bytes to {}", data.len(), file_path.display());
        Ok(())
    }

    async fn download(
        &self,
        _credential: &Credential,
        path: &str,
        name: &str,
    ) -> StoreResult<ByteStream> {
        let file_path = self.resolve(path)?.join(checked_name(name)?);
        let file = File::open(&file_path).await.map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound(format!("{path}/{name}"))
            } else {
                StoreError::Io(err)
            }
        })?;

        Ok(Box::pin(ReaderStream::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::read_to_end;

    fn lake() -> (tempfile::TempDir, FsDataLake) {
        let dir = tempfile::tempdir().unwrap();
        let lake = FsDataLake::new(dir.path());
        (dir, lake)
    }

    #[tokio::test]
    async fn probe_distinguishes_missing_directories() {
        let (dir, lake) = lake();
        let credential = Credential::new("t");

        assert!(matches!(
            lake.directory_exists(&credential, "nope").await,
            Err(StoreError::NotFound(_))
        ));

        std::fs::create_dir(dir.path().join("dataset")).unwrap();
        lake.directory_exists(&credential, "dataset").await.unwrap();
    }

    #[tokio::test]
    async fn upload_overwrites_and_download_streams_back() {
        let (dir, lake) = lake();
        let credential = Credential::new("t");
        std::fs::create_dir(dir.path().join("dataset")).unwrap();

        lake.upload(&credential, "dataset", "a.bin", Bytes::from_static(b"first"))
            .await
            .unwrap();
        lake.upload(&credential, "dataset", "a.bin", Bytes::from_static(b"second"))
            .await
            .unwrap();

        let stream = lake.download(&credential, "dataset", "a.bin").await.unwrap();
        assert_eq!(read_to_end(stream).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn object_names_must_be_single_path_segments() {
        let (dir, lake) = lake();
        let credential = Credential::new("t");
        std::fs::create_dir(dir.path().join("dataset")).unwrap();

        for name in ["../escaped.bin", "/etc/escaped.bin", "a/b.bin", ""] {
            assert!(
                matches!(
                    lake.upload(&credential, "dataset", name, Bytes::from_static(b"x"))
                        .await,
                    Err(StoreError::NotFound(_))
                ),
                "name was accepted: {name:?}"
            );
        }
        assert!(matches!(
            lake.download(&credential, "dataset", "../escaped.bin").await,
            Err(StoreError::NotFound(_))
        ));

        // Nothing reached the dataset, and nothing escaped it.
        assert_eq!(
            std::fs::read_dir(dir.path().join("dataset")).unwrap().count(),
            0
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn traversal_segments_read_as_not_found() {
        let (_dir, lake) = lake();
        let credential = Credential::new("t");

        assert!(matches!(
            lake.directory_exists(&credential, "../outside").await,
            Err(StoreError::NotFound(_))
        ));
    }
}
