use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::error::ResizeError;
use crate::storage::ObjectStore;

type ObjectId = (String, String);

/// In-memory `ObjectStore` that records every write.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<ObjectId, (Bytes, String)>>,
    puts: AtomicUsize,
    reject_writes: bool,
}

impl MemoryStore {
    pub fn with_object(self, bucket: &str, key: &str, data: Vec<u8>) -> Self {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            (Bytes::from(data), "application/octet-stream".to_string()),
        );
        self
    }

    pub fn rejecting_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<(Bytes, String)> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, ResizeError> {
        self.object(bucket, key)
            .map(|(data, _)| data)
            .ok_or_else(|| ResizeError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), ResizeError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.reject_writes {
            return Err(ResizeError::ObjectWrite {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: "AccessDenied".to_string(),
            });
        }
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            (data, content_type.to_string()),
        );
        Ok(())
    }
}

/// A `width` x `height` test pattern encoded as `format`.
pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 200])
    }));
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}
