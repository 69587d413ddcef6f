use aws_lambda_events::event::s3::{S3Event, S3EventRecord};
use percent_encoding::percent_decode_str;

use crate::config::ResizeConfig;
use crate::error::ResizeError;

/// An object named by one record of an S3 notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceObject {
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    Eligible { destination_key: String },
    AlreadyResized,
    OutsideSource,
    FolderMarker,
}

/// Extract every `(bucket, key)` pair carried by the event.
pub fn source_objects(event: &S3Event) -> Result<Vec<SourceObject>, ResizeError> {
    if event.records.is_empty() {
        return Err(ResizeError::MalformedEvent(
            "no records found in S3 event".to_string(),
        ));
    }
    event.records.iter().map(source_object).collect()
}

fn source_object(record: &S3EventRecord) -> Result<SourceObject, ResizeError> {
    let bucket = record
        .s3
        .bucket
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ResizeError::MalformedEvent("record has no bucket name".to_string()))?;
    let raw_key = record
        .s3
        .object
        .key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| ResizeError::MalformedEvent("record has no object key".to_string()))?;

    Ok(SourceObject {
        bucket: bucket.to_string(),
        key: decode_key(raw_key)?,
    })
}

/// S3 URL-encodes keys in notifications, with spaces sent as '+'.
fn decode_key(raw: &str) -> Result<String, ResizeError> {
    let plus_decoded = raw.replace('+', " ");
    percent_decode_str(&plus_decoded)
        .decode_utf8()
        .map(|key| key.into_owned())
        .map_err(|e| ResizeError::MalformedEvent(format!("object key {raw:?} is not UTF-8: {e}")))
}

pub fn destination_key(key: &str, config: &ResizeConfig) -> Option<String> {
    key.strip_prefix(config.source_prefix.as_str())
        .map(|rest| format!("{}{}", config.dest_prefix, rest))
}

pub fn eligibility(key: &str, config: &ResizeConfig) -> Eligibility {
    if key.starts_with(config.dest_prefix.as_str()) {
        return Eligibility::AlreadyResized;
    }
    match destination_key(key, config) {
        None => Eligibility::OutsideSource,
        Some(_) if key.ends_with('/') => Eligibility::FolderMarker,
        Some(destination_key) => Eligibility::Eligible { destination_key },
    }
}
