use std::fmt;
use thiserror::Error;

/// Steps of a single invocation, in order. A failure at any step is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Validated,
    Fetched,
    Decoded,
    Resized,
    Published,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Validated => "validated",
            Stage::Fetched => "fetched",
            Stage::Decoded => "decoded",
            Stage::Resized => "resized",
            Stage::Published => "published",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("malformed S3 event: {0}")]
    MalformedEvent(String),
    #[error("object not found: {bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },
    #[error("failed to read {bucket}/{key}: {reason}")]
    ObjectRead {
        bucket: String,
        key: String,
        reason: String,
    },
    #[error("unsupported image format for {key}: {reason}")]
    UnsupportedImageFormat {
        key: String,
        reason: String,
        /// `Decoded` when reading the source failed, `Published` when encoding the output did.
        stage: Stage,
    },
    #[error("failed to write {bucket}/{key}: {reason}")]
    ObjectWrite {
        bucket: String,
        key: String,
        reason: String,
    },
}

impl ResizeError {
    /// Store failures may succeed on a later attempt; bad input never will.
    pub fn is_retryable(&self) -> bool {
        match self {
            ResizeError::MalformedEvent(_) | ResizeError::UnsupportedImageFormat { .. } => false,
            ResizeError::ObjectNotFound { .. }
            | ResizeError::ObjectRead { .. }
            | ResizeError::ObjectWrite { .. } => true,
        }
    }

    /// The stage the invocation was trying to reach when it failed. Resizing
    /// itself cannot fail, so encoding counts towards `Published`.
    pub fn stage(&self) -> Stage {
        match self {
            ResizeError::MalformedEvent(_) => Stage::Validated,
            ResizeError::ObjectNotFound { .. } | ResizeError::ObjectRead { .. } => Stage::Fetched,
            ResizeError::UnsupportedImageFormat { stage, .. } => *stage,
            ResizeError::ObjectWrite { .. } => Stage::Published,
        }
    }
}
