use async_trait::async_trait;

use crate::{
    error::Error,
    holiday::{StagedObjectKey, StorageClass},
};

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket (or root) objects are kept in, for logging.
    fn location(&self) -> String;

    /// Write a staged object.
    /// ---
    /// The input slice should contain the full contents of the object.
    /// Writing an existing key replaces its contents.
    async fn put(
        &self,
        key: &StagedObjectKey,
        data: &[u8],
        storage_class: StorageClass,
    ) -> Result<(), Error>;

    /// Read a staged object.
    /// ---
    /// The returned vector contains the full contents of the object.
    /// A missing key is reported as [`Error::NotFound`].
    async fn get(&self, key: &StagedObjectKey) -> Result<Vec<u8>, Error>;
}

/// Builds the [`Error::NotFound`] reported for a missing staged object.
pub fn object_not_found(location: &str, key: &StagedObjectKey) -> Error {
    Error::NotFound {
        resource_type: "StagedObject".to_string(),
        resource_id: format!("{}/{}", location, key.object_key()),
    }
}
