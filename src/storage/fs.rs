//! Filesystem backing store for local development.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use axum::body::Bytes;
use tracing::debug;

use super::{BackingStore, Result, StoreError};

// == Filesystem Store ==
/// Serves objects stored as regular files under `root`.
#[derive(Debug, Clone)]
pub struct FsBackingStore {
    root: PathBuf,
}

impl FsBackingStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a key to a file under the root.
    ///
    /// Keys made of anything other than plain path segments are refused.
    fn object_path(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if key.is_empty() || !plain {
            return Err(StoreError::AccessDenied(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

// == Error Mapping ==
fn map_io_error(key: &str, err: std::io::Error) -> StoreError {
    match err.kind() {
        ErrorKind::NotFound => StoreError::NotFound(key.to_string()),
        ErrorKind::PermissionDenied => StoreError::AccessDenied(key.to_string()),
        _ => StoreError::Transport(format!("{}: {}", key, err)),
    }
}

// == BackingStore Implementation ==
#[async_trait]
impl BackingStore for FsBackingStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        let path = self.object_path(key)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(map_io_error(key, err)),
        }
    }

    async fn download_bytes(&self, key: &str) -> Result<Bytes> {
        let path = self.object_path(key)?;
        let data = tokio::fs::read(&path)
            .await
            .map_err(|err| map_io_error(key, err))?;
        debug!(key, size = data.len(), "Read object from disk");
        Ok(Bytes::from(data))
    }

    fn name(&self) -> &'static str {
        "filesystem"
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_fs_store_reads_files() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("hero")).unwrap();
        std::fs::write(dir.path().join("hero/sunset.jpg"), b"jpeg").unwrap();
        let store = FsBackingStore::new(dir.path());

        assert!(store.exists("hero/sunset.jpg").await.unwrap());
        assert_eq!(
            store.download_bytes("hero/sunset.jpg").await.unwrap(),
            Bytes::from_static(b"jpeg")
        );
    }

    #[tokio::test]
    async fn test_fs_store_missing_and_directories() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("hero")).unwrap();
        let store = FsBackingStore::new(dir.path());

        assert!(!store.exists("hero/missing.jpg").await.unwrap());
        // A directory is not an object
        assert!(!store.exists("hero").await.unwrap());
        assert!(matches!(
            store.download_bytes("hero/missing.jpg").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_fs_store_refuses_escaping_keys() {
        let dir = tempdir().unwrap();
        let store = FsBackingStore::new(dir.path());

        for key in ["../secret.jpg", "/etc/passwd", "hero/../../x.jpg", ""] {
            assert!(
                matches!(store.exists(key).await, Err(StoreError::AccessDenied(_))),
                "key {:?} should be refused",
                key
            );
        }
    }
}
