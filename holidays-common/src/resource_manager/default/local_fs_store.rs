use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::{
    error::Error,
    holiday::{StagedObjectKey, StorageClass},
    resource_manager::{ObjectStore, object_not_found},
};

/// Keeps staged objects as plain files under a root directory.
/// Storage classes have no meaning on a local disk and are ignored.
pub struct LocalFileSystemObjectStore {
    root: PathBuf,
}

impl LocalFileSystemObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    fn object_path(&self, key: &StagedObjectKey) -> PathBuf {
        self.root.join(key.year.to_string()).join(format!("{}.csv", key.country))
    }
}

#[async_trait]
impl ObjectStore for LocalFileSystemObjectStore {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    async fn put(
        &self,
        key: &StagedObjectKey,
        data: &[u8],
        storage_class: StorageClass,
    ) -> Result<(), Error> {
        let file_path = self.object_path(key);

        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|io_err| {
                Error::Storage(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    io_err
                ))
            })?;
        }

        debug!(path = %file_path.display(), %storage_class, "Writing staged object");

        match tokio::fs::write(&file_path, data).await {
            Ok(()) => Ok(()),
            Err(io_err) => Err(Error::Storage(format!(
                "Failed to write file at path {}: {}",
                file_path.display(),
                io_err
            ))),
        }
    }

    async fn get(&self, key: &StagedObjectKey) -> Result<Vec<u8>, Error> {
        let file_path = self.object_path(key);

        match tokio::fs::read(&file_path).await {
            Ok(data) => Ok(data),
            Err(io_err) if io_err.kind() == ErrorKind::NotFound => {
                Err(object_not_found(&self.location(), key))
            }
            Err(io_err) => Err(Error::Storage(format!(
                "Failed to read file at path {}: {}",
                file_path.display(),
                io_err
            ))),
        }
    }
}
