use lambda_runtime::tracing;

use crate::error::ResizeError;
use crate::storage::ObjectStore;
use crate::transform::ResizedImage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedObject {
    pub bucket: String,
    pub key: String,
    pub size: usize,
}

/// Write the resized image to `destination_key`, overwriting whatever is there.
pub async fn publish<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &str,
    destination_key: &str,
    resized: ResizedImage,
) -> Result<PublishedObject, ResizeError> {
    let size = resized.data.len();
    let content_type = resized.content_type();
    store
        .put(bucket, destination_key, resized.data, content_type)
        .await?;

    tracing::info!(
        bucket,
        key = destination_key,
        size,
        width = resized.width,
        height = resized.height,
        content_type,
        "Resized image saved"
    );
    Ok(PublishedObject {
        bucket: bucket.to_string(),
        key: destination_key.to_string(),
        size,
    })
}
