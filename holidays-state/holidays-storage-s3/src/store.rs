use std::fmt;

use async_trait::async_trait;
use aws_sdk_s3::{
    Client,
    config::{BehaviorVersion, Credentials, Region},
    error::DisplayErrorContext,
    operation::get_object::GetObjectError,
    primitives::ByteStream,
    types::StorageClass as S3StorageClass,
};
use holidays_common::{
    error::Error,
    holiday::{StagedObjectKey, StorageClass},
    resource_manager::{ObjectStore, object_not_found},
};
use tracing::{debug, info};

const CREDENTIALS_PROVIDER_NAME: &str = "holidays-static";

#[derive(Clone)]
pub struct S3StoreConfig {
    pub endpoint_url: String,
    pub region: String,
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for S3StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3StoreConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("access_key_id", &"<redacted>")
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Staged objects in an S3-compatible bucket.
pub struct S3ObjectStore {
    bucket: String,
    client: Client,
}

impl S3ObjectStore {
    /// Builds a client against a custom endpoint with static credentials.
    /// No request is made until the first put/get.
    pub fn new(config: &S3StoreConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        );

        let sdk_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint_url)
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        info!(
            endpoint = %config.endpoint_url,
            bucket = %config.bucket,
            "Initialized S3 object store"
        );

        Self {
            bucket: config.bucket.clone(),
            client: Client::from_conf(sdk_config),
        }
    }
}

pub(crate) fn to_s3_storage_class(storage_class: StorageClass) -> S3StorageClass {
    S3StorageClass::from(storage_class.to_string().as_str())
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn location(&self) -> String {
        self.bucket.clone()
    }

    async fn put(
        &self,
        key: &StagedObjectKey,
        data: &[u8],
        storage_class: StorageClass,
    ) -> Result<(), Error> {
        let object_key = key.object_key();

        debug!(bucket = %self.bucket, key = %object_key, bytes = data.len(), "PutObject");

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .body(ByteStream::from(data.to_vec()))
            .storage_class(to_s3_storage_class(storage_class))
            .send()
            .await
            .map_err(|e| {
                Error::Storage(format!(
                    "Failed to put object {}/{}: {}",
                    self.bucket,
                    object_key,
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(())
    }

    async fn get(&self, key: &StagedObjectKey) -> Result<Vec<u8>, Error> {
        let object_key = key.object_key();

        debug!(bucket = %self.bucket, key = %object_key, "GetObject");

        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                let missing = e
                    .as_service_error()
                    .is_some_and(GetObjectError::is_no_such_key)
                    || e.raw_response().map(|r| r.status().as_u16()) == Some(404);

                if missing {
                    return Err(object_not_found(&self.bucket, key));
                }

                return Err(Error::Storage(format!(
                    "Failed to get object {}/{}: {}",
                    self.bucket,
                    object_key,
                    DisplayErrorContext(&e)
                )));
            }
        };

        let body = output.body.collect().await.map_err(|e| {
            Error::Storage(format!(
                "Failed to read body of {}/{}: {}",
                self.bucket, object_key, e
            ))
        })?;

        Ok(body.into_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> S3StoreConfig {
        S3StoreConfig {
            endpoint_url: "http://127.0.0.1:9000".to_string(),
            region: "us-east-1".to_string(),
            bucket: "yi-otus-holidays".to_string(),
            access_key_id: "key-id".to_string(),
            secret_access_key: "very-secret".to_string(),
        }
    }

    #[test]
    fn test_cold_maps_to_cold_storage_class() {
        assert_eq!(to_s3_storage_class(StorageClass::Cold).as_str(), "COLD");
        assert_eq!(
            to_s3_storage_class(StorageClass::Standard),
            S3StorageClass::Standard
        );
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("yi-otus-holidays"));
    }

    #[tokio::test]
    async fn test_store_reports_bucket_as_location() {
        let store = S3ObjectStore::new(&config());
        assert_eq!(store.location(), "yi-otus-holidays");
    }
}
