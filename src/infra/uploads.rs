//! Filesystem object store backing `/uploads`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::{fs, io::AsyncWriteExt};
use tracing::warn;

use crate::application::images::{ObjectStore, ObjectStoreError};

/// Filesystem-backed upload storage.
#[derive(Debug)]
pub struct UploadStorage {
    root: PathBuf,
}

impl UploadStorage {
    /// Initialise storage rooted at the provided directory, creating it if necessary.
    pub fn new(root: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key below the root, refusing absolute paths and `..` segments.
    fn resolve(&self, key: &str) -> Result<PathBuf, ObjectStoreError> {
        let relative = Path::new(key);
        if key.is_empty()
            || relative.is_absolute()
            || relative.components().any(|component| {
                matches!(
                    component,
                    Component::ParentDir | Component::Prefix(_) | Component::RootDir
                )
            })
        {
            return Err(ObjectStoreError::InvalidKey);
        }

        Ok(self.root.join(relative))
    }

    async fn write_file(path: &Path, data: &[u8]) -> Result<(), std::io::Error> {
        let mut file = fs::File::create(path).await?;
        file.write_all(data).await?;
        file.flush().await?;
        file.sync_all().await
    }
}

#[async_trait]
impl ObjectStore for UploadStorage {
    async fn put(&self, key: &str, data: Bytes) -> Result<(), ObjectStoreError> {
        let absolute = self.resolve(key)?;
        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Readers only ever see complete files: write aside, then rename into place.
        let staging = absolute.with_extension("part");
        let written = match Self::write_file(&staging, &data).await {
            Ok(()) => fs::rename(&staging, &absolute).await,
            Err(err) => Err(err),
        };

        if let Err(err) = written {
            if let Err(cleanup) = fs::remove_file(&staging).await {
                warn!(
                    target = "storefront::uploads",
                    key,
                    error = %cleanup,
                    "Failed to remove partial upload"
                );
            }
            return Err(err.into());
        }

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, ObjectStoreError> {
        let absolute = self.resolve(key)?;
        match fs::read(&absolute).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(ObjectStoreError::NotFound)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        let absolute = self.resolve(key)?;
        match fs::remove_file(&absolute).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
