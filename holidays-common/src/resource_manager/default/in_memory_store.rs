use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::Error,
    holiday::{StagedObjectKey, StorageClass},
    resource_manager::{ObjectStore, object_not_found},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub storage_class: StorageClass,
}

/// Process-local store, used for dry runs and tests.
#[derive(Debug)]
pub struct InMemoryObjectStore {
    bucket: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl InMemoryObjectStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn object(&self, key: &StagedObjectKey) -> Option<StoredObject> {
        self.objects.read().await.get(&key.object_key()).cloned()
    }

    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    fn location(&self) -> String {
        self.bucket.clone()
    }

    async fn put(
        &self,
        key: &StagedObjectKey,
        data: &[u8],
        storage_class: StorageClass,
    ) -> Result<(), Error> {
        self.objects.write().await.insert(
            key.object_key(),
            StoredObject {
                data: data.to_vec(),
                storage_class,
            },
        );

        Ok(())
    }

    async fn get(&self, key: &StagedObjectKey) -> Result<Vec<u8>, Error> {
        self.objects
            .read()
            .await
            .get(&key.object_key())
            .map(|object| object.data.clone())
            .ok_or_else(|| object_not_found(&self.bucket, key))
    }
}
