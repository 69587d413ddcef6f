//! Decoding, resizing and re-encoding of source images.
//!
//! The output is always written in the format the source was decoded from. A
//! source whose format cannot be detected, or cannot be encoded again by this
//! build, is rejected instead of being converted to another format.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat, ImageReader};
use lambda_runtime::tracing;

use crate::config::{ResizeConfig, ResizeMode};
use crate::error::{ResizeError, Stage};

#[derive(Debug)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub format: ImageFormat,
}

#[derive(Debug)]
pub struct ResizedImage {
    pub data: Bytes,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ResizedImage {
    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

#[derive(Debug, Clone)]
pub struct ImageTransformer {
    max_width: u32,
    max_height: u32,
    mode: ResizeMode,
    jpeg_quality: u8,
}

impl ImageTransformer {
    pub fn new(config: &ResizeConfig) -> Self {
        Self {
            max_width: config.max_width,
            max_height: config.max_height,
            mode: config.mode,
            jpeg_quality: config.jpeg_quality,
        }
    }

    /// Decode `data`, detecting the format from its content.
    pub fn decode(&self, key: &str, data: &[u8]) -> Result<DecodedImage, ResizeError> {
        let unsupported = |reason: String| ResizeError::UnsupportedImageFormat {
            key: key.to_string(),
            reason,
            stage: Stage::Decoded,
        };

        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| unsupported(e.to_string()))?;
        let format = reader
            .format()
            .ok_or_else(|| unsupported("could not detect image format".to_string()))?;
        if !format.writing_enabled() {
            return Err(unsupported(format!("{format:?} cannot be re-encoded")));
        }

        let image = reader.decode().map_err(|e| unsupported(e.to_string()))?;
        let (width, height) = image.dimensions();
        tracing::debug!(?format, width, height, "Decoded source image");

        Ok(DecodedImage { image, format })
    }

    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        match self.mode {
            ResizeMode::Exact => (self.max_width, self.max_height),
            ResizeMode::Contain => {
                if width <= self.max_width && height <= self.max_height {
                    return (width, height);
                }
                let scale = f64::min(
                    self.max_width as f64 / width as f64,
                    self.max_height as f64 / height as f64,
                );
                let new_width = ((width as f64 * scale).round() as u32).clamp(1, self.max_width);
                let new_height = ((height as f64 * scale).round() as u32).clamp(1, self.max_height);
                (new_width, new_height)
            }
        }
    }

    pub fn resize(&self, image: DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        let (new_width, new_height) = self.target_dimensions(width, height);
        if (new_width, new_height) == (width, height) {
            return image;
        }
        image.resize_exact(new_width, new_height, FilterType::Lanczos3)
    }

    /// Encode `image` as `format`.
    pub fn encode(
        &self,
        key: &str,
        image: &DynamicImage,
        format: ImageFormat,
    ) -> Result<ResizedImage, ResizeError> {
        let mut buf = Cursor::new(Vec::new());
        let written = match format {
            ImageFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut buf, self.jpeg_quality);
                match image.color() {
                    ColorType::L8 | ColorType::Rgb8 => image.write_with_encoder(encoder),
                    _ => DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder),
                }
            }
            _ => image.write_to(&mut buf, format),
        };
        written.map_err(|e| ResizeError::UnsupportedImageFormat {
            key: key.to_string(),
            reason: format!("failed to encode {format:?}: {e}"),
            stage: Stage::Published,
        })?;

        let (width, height) = image.dimensions();
        Ok(ResizedImage {
            data: Bytes::from(buf.into_inner()),
            format,
            width,
            height,
        })
    }
}
