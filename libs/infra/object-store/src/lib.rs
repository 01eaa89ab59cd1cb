// [libs/infra/object-store/src/lib.rs]
/*!
 * APARATO: OBJECT STORE ADAPTER
 * RESPONSABILIDAD: Persistencia de media binaria en un bucket S3-compatible.
 */

use async_trait::async_trait;
use attention_domain_pipeline::{CapabilityError, ObjectStore};
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Error, Debug)]
pub enum ObjectStoreError {
    #[error("object store upload failed: {0}")]
    Upload(String),

    #[error("object store bucket provisioning failed: {0}")]
    BucketProvisioning(String),
}

/// Connection parameters for the S3-compatible (MinIO-compatible) endpoint,
/// read from the environment keys listed in the deployment configuration.
#[derive(Debug, Clone)]
pub struct ObjectStoreConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub use_tls: bool,
}

/// Uploads/retrieves binary media to an S3-compatible blob store, returning
/// stable URLs keyed by event id (Object Store Adapter). The bucket is
/// auto-created on first use if absent, matching the source's
/// `ensure_bucket` behavior.
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3ObjectStore {
    pub async fn connect(config: ObjectStoreConfig) -> Result<Self, ObjectStoreError> {
        let credentials = aws_sdk_s3::config::Credentials::new(
            config.access_key,
            config.secret_key,
            None,
            None,
            "attention-map-object-store",
        );

        let scheme = if config.use_tls { "https" } else { "http" };
        let endpoint_url = format!("{scheme}://{}", config.endpoint);

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new("auto"))
            .endpoint_url(endpoint_url.clone())
            .credentials_provider(credentials)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        let client = Client::from_conf(s3_config);

        let store = Self {
            client,
            bucket: config.bucket.clone(),
            public_base_url: format!("{endpoint_url}/{}", config.bucket),
        };
        store.ensure_bucket().await?;
        Ok(store)
    }

    #[instrument(skip(self))]
    async fn ensure_bucket(&self) -> Result<(), ObjectStoreError> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => Ok(()),
            Err(_) => {
                info!(bucket = %self.bucket, "bucket absent, creating");
                self.client
                    .create_bucket()
                    .bucket(&self.bucket)
                    .send()
                    .await
                    .map(|_| ())
                    .or_else(|err| {
                        // A concurrent creator winning the race is not a failure.
                        let message = err.to_string();
                        if message.contains("BucketAlreadyOwnedByYou") || message.contains("BucketAlreadyExists") {
                            Ok(())
                        } else {
                            Err(ObjectStoreError::BucketProvisioning(message))
                        }
                    })
            }
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self, bytes), fields(key = %key, bytes = bytes.len()))]
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, CapabilityError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|err| CapabilityError::new(format!("object store upload failed: {err}")))?;

        Ok(format!("{}/{key}", self.public_base_url))
    }
}

/// Selected when `OBJECT_STORE_ENDPOINT`/credentials are absent --
/// every call fails, so
/// `store_media` records an error and the keyframe/transcribe stages that
/// depend on the media still being in hand are skipped.
pub struct NoopObjectStore;

#[async_trait]
impl ObjectStore for NoopObjectStore {
    async fn put(&self, _key: &str, _bytes: Vec<u8>, _content_type: &str) -> Result<String, CapabilityError> {
        warn!("object store not configured, upload skipped");
        Err(CapabilityError::new("object store not configured"))
    }
}
