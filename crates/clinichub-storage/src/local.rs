//! Local filesystem file store.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use clinichub_core::error::{AppError, ErrorKind};
use clinichub_core::result::AppResult;

use crate::FileStore;

/// Files stored flat under one root directory.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    /// Open (creating if needed) a store rooted at `root_path`.
    pub async fn new(root_path: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root_path.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Root directory.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn resolve(&self, name: &str) -> AppResult<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(AppError::invalid_input(format!("Invalid file name: {name}")));
        }
        Ok(self.root.join(name))
    }

    fn partial_path(&self, name: &str) -> PathBuf {
        self.root.join(format!(".{name}.part"))
    }

    async fn finish(&self, name: &str, partial: PathBuf, bytes: u64) -> AppResult<u64> {
        let target = self.resolve(name)?;
        if let Err(e) = fs::rename(&partial, &target).await {
            let _ = fs::remove_file(&partial).await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to finalize file: {name}"),
                e,
            ));
        }
        debug!(name, bytes, root = %self.root.display(), "Stored file");
        Ok(bytes)
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn write(&self, name: &str, data: Bytes) -> AppResult<u64> {
        self.resolve(name)?;
        let partial = self.partial_path(name);

        if let Err(e) = fs::write(&partial, &data).await {
            let _ = fs::remove_file(&partial).await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write file: {name}"),
                e,
            ));
        }
        self.finish(name, partial, data.len() as u64).await
    }

    async fn read_bytes(&self, name: &str) -> AppResult<Bytes> {
        let path = self.resolve(name)?;
        let data = fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("File not found: {name}"))
            } else {
                AppError::with_source(ErrorKind::Storage, format!("Failed to read file: {name}"), e)
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn exists(&self, name: &str) -> AppResult<bool> {
        let path = self.resolve(name)?;
        fs::try_exists(&path).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to stat file: {name}"), e)
        })
    }

    async fn delete(&self, name: &str) -> AppResult<()> {
        let path = self.resolve(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {name}"),
                e,
            )),
        }
    }

    fn display_path(&self, name: &str) -> String {
        self.root.join(name).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path().join("uploads")).await.unwrap();

        let written = store
            .write("a.txt", Bytes::from_static(b"hello"))
            .await
            .unwrap();
        assert_eq!(written, 5);
        assert_eq!(store.read_bytes("a.txt").await.unwrap(), Bytes::from_static(b"hello"));
        assert!(store.exists("a.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_overwrite_leaves_no_partial_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path()).await.unwrap();

        store.write("doc.pdf", Bytes::from_static(b"v1")).await.unwrap();
        store.write("doc.pdf", Bytes::from_static(b"v2")).await.unwrap();
        assert_eq!(store.read_bytes("doc.pdf").await.unwrap(), Bytes::from_static(b"v2"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_rejects_path_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path()).await.unwrap();
        assert!(store.write("../x", Bytes::new()).await.is_err());
        assert!(store.write("a/b", Bytes::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path()).await.unwrap();
        store.delete("ghost.txt").await.unwrap();
    }
}
