use aws_lambda_events::event::s3::S3Event;
use image::GenericImageView;
use lambda_runtime::{tracing, Error, LambdaEvent};
use serde::Serialize;

use crate::config::ResizeConfig;
use crate::error::{ResizeError, Stage};
use crate::event::{eligibility, source_objects, Eligibility, SourceObject};
use crate::publish::{publish, PublishedObject};
use crate::storage::ObjectStore;
use crate::transform::ImageTransformer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Published(PublishedObject),
    Skipped(Eligibility),
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResizeResponse {
    pub status_code: u16,
    pub body: String,
}

pub struct ResizeHandler<S> {
    store: S,
    config: ResizeConfig,
    transformer: ImageTransformer,
}

impl<S: ObjectStore> ResizeHandler<S> {
    pub fn new(store: S, config: ResizeConfig) -> Self {
        let transformer = ImageTransformer::new(&config);
        Self {
            store,
            config,
            transformer,
        }
    }

    /// Run one object through fetch, decode, resize and publish.
    pub async fn process(&self, source: &SourceObject) -> Result<Outcome, ResizeError> {
        let bucket = source.bucket.as_str();
        let key = source.key.as_str();
        tracing::debug!(stage = %Stage::Received, bucket, key);

        let destination_key = match eligibility(key, &self.config) {
            Eligibility::Eligible { destination_key } => destination_key,
            skipped => {
                tracing::info!(bucket, key, reason = ?skipped, "Skipping object");
                return Ok(Outcome::Skipped(skipped));
            }
        };
        tracing::debug!(stage = %Stage::Validated, key, destination_key = %destination_key);

        let data = self.store.get(bucket, key).await?;
        tracing::debug!(stage = %Stage::Fetched, key, size = data.len());

        let decoded = self.transformer.decode(key, &data)?;
        drop(data);
        tracing::debug!(stage = %Stage::Decoded, key, format = ?decoded.format);

        let resized = self.transformer.resize(decoded.image);
        let (width, height) = resized.dimensions();
        tracing::debug!(stage = %Stage::Resized, key, width, height);

        let encoded = self.transformer.encode(key, &resized, decoded.format)?;
        let published = publish(&self.store, bucket, &destination_key, encoded).await?;
        tracing::debug!(stage = %Stage::Published, key = %destination_key);

        tracing::info!(
            stage = %Stage::Done,
            bucket = %published.bucket,
            source = key,
            destination = %published.key,
            size = published.size
        );
        Ok(Outcome::Published(published))
    }
}

fn report_failure(source: Option<&SourceObject>, err: ResizeError) -> Error {
    tracing::error!(
        bucket = source.map(|s| s.bucket.as_str()),
        key = source.map(|s| s.key.as_str()),
        stage = %err.stage(),
        retryable = err.is_retryable(),
        error = %err,
        "Image resize failed"
    );
    err.into()
}

pub(crate) async fn function_handler<S: ObjectStore>(
    event: LambdaEvent<S3Event>,
    handler: &ResizeHandler<S>,
) -> Result<Option<ResizeResponse>, Error> {
    let sources = source_objects(&event.payload).map_err(|err| report_failure(None, err))?;

    let mut saved = Vec::new();
    for source in &sources {
        match handler.process(source).await {
            Ok(Outcome::Published(published)) => saved.push(published.key),
            Ok(Outcome::Skipped(_)) => {}
            Err(err) => return Err(report_failure(Some(source), err)),
        }
    }

    if saved.is_empty() {
        return Ok(None);
    }
    let body = format!("Image resized and saved as {}", saved.join(", "));
    tracing::info!("{}", body);
    Ok(Some(ResizeResponse {
        status_code: 200,
        body,
    }))
}
