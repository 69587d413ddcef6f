use aws_config::BehaviorVersion;
use aws_sdk_s3::Client as S3Client;
use lambda_runtime::{run, service_fn, tracing, Error};
mod config;
mod error;
mod event;
mod event_handler;
mod publish;
mod storage;
#[cfg(test)]
mod test_support;
mod transform;
use config::ResizeConfig;
use event_handler::{function_handler, ResizeHandler};
use storage::S3ObjectStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::subscriber::fmt().json().init();
    let config = ResizeConfig::from_env()?;
    tracing::info!(
        source_prefix = %config.source_prefix,
        dest_prefix = %config.dest_prefix,
        max_width = config.max_width,
        max_height = config.max_height,
        mode = ?config.mode,
        "Loaded resize configuration"
    );
    let shared_config = aws_config::load_defaults(BehaviorVersion::v2025_01_17()).await;
    let handler = ResizeHandler::new(S3ObjectStore::new(S3Client::new(&shared_config)), config);
    run(service_fn(|event| function_handler(event, &handler))).await
}
