use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use lambda_runtime::tracing;

use crate::error::ResizeError;

/// Blob storage addressed by `(bucket, key)`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, ResizeError>;

    /// Single put of the full body, replacing any existing object at `key`.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), ResizeError>;
}

pub struct S3ObjectStore {
    client: S3Client,
}

impl S3ObjectStore {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, ResizeError> {
        tracing::debug!(bucket, key, "Downloading object");
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                if matches!(err.as_service_error(), Some(GetObjectError::NoSuchKey(_))) {
                    ResizeError::ObjectNotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else {
                    ResizeError::ObjectRead {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                        reason: DisplayErrorContext(&err).to_string(),
                    }
                }
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|err| ResizeError::ObjectRead {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: err.to_string(),
            })?
            .into_bytes();
        Ok(data)
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), ResizeError> {
        tracing::debug!(bucket, key, size = data.len(), "Uploading object");
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|err| ResizeError::ObjectWrite {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: DisplayErrorContext(&err).to_string(),
            })?;
        Ok(())
    }
}
