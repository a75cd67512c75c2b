//! Image ingestion: validation of uploaded or inline images before they reach the object store.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use imagesize::ImageType;
use serde::Serialize;
use slug::slugify;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::counters::IMAGES_STORED_TOTAL;

pub const DEFAULT_FOLDER: &str = "general";
pub const PUBLIC_PREFIX: &str = "/uploads";

const DATA_URI_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Image formats accepted by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageFormat {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Identify the format from the payload's magic number.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        match imagesize::image_type(data).ok()? {
            ImageType::Jpeg => Some(Self::Jpeg),
            ImageType::Png => Some(Self::Png),
            ImageType::Gif => Some(Self::Gif),
            ImageType::Webp => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("invalid object key")]
    InvalidKey,
    #[error("object not found")]
    NotFound,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Binary object storage addressed by relative keys such as `products/<file>`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Persist `data` under `key`. Implementations must not leave partial objects on failure.
    async fn put(&self, key: &str, data: Bytes) -> Result<(), ObjectStoreError>;

    async fn get(&self, key: &str) -> Result<Bytes, ObjectStoreError>;

    /// Remove the object under `key`. A missing object is not an error.
    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError>;
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("unsupported image type `{content_type}`")]
    UnsupportedType { content_type: String },
    #[error("image is {size} bytes, above the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
    #[error("image payload could not be decoded: {0}")]
    Decode(String),
    #[error("image payload is empty")]
    Empty,
    #[error("failed to store image")]
    Store(#[from] ObjectStoreError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    /// Public reference, e.g. `/uploads/products/<uuid>.jpg`.
    pub url: String,
    pub key: String,
    pub format: ImageFormat,
    pub size_bytes: usize,
    pub width: Option<usize>,
    pub height: Option<usize>,
}

#[derive(Clone)]
pub struct ImageIngestService {
    store: Arc<dyn ObjectStore>,
    max_bytes: usize,
}

impl ImageIngestService {
    pub fn new(store: Arc<dyn ObjectStore>, max_bytes: usize) -> Self {
        Self { store, max_bytes }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Validate and store a binary upload. `declared_type` is the client-supplied MIME type.
    pub async fn ingest_bytes(
        &self,
        folder: Option<&str>,
        declared_type: Option<&str>,
        data: Bytes,
    ) -> Result<StoredImage, ImageError> {
        if let Some(content_type) = declared_type {
            if ImageFormat::from_content_type(content_type).is_none() {
                return Err(ImageError::UnsupportedType {
                    content_type: content_type.to_string(),
                });
            }
        }
        self.ensure_within_limit(data.len())?;
        if data.is_empty() {
            return Err(ImageError::Empty);
        }

        let format = ImageFormat::sniff(&data).ok_or_else(|| {
            ImageError::Decode("payload is not a jpeg, png, gif or webp image".to_string())
        })?;
        let dimensions = imagesize::blob_size(&data).ok();

        let folder = normalize_folder(folder);
        let key = format!("{folder}/{}.{}", Uuid::new_v4(), format.extension());
        let size_bytes = data.len();
        self.store.put(&key, data).await?;
        metrics::counter!(IMAGES_STORED_TOTAL).increment(1);

        info!(
            target = "storefront::images",
            key = %key,
            size_bytes,
            format = format.content_type(),
            "Image stored"
        );

        Ok(StoredImage {
            url: format!("{PUBLIC_PREFIX}/{key}"),
            key,
            format,
            size_bytes,
            width: dimensions.map(|size| size.width),
            height: dimensions.map(|size| size.height),
        })
    }

    /// Decode and store a `data:image/<type>;base64,<payload>` string.
    pub async fn ingest_data_uri(
        &self,
        folder: Option<&str>,
        data_uri: &str,
    ) -> Result<StoredImage, ImageError> {
        let (content_type, payload) = split_data_uri(data_uri)?;
        if ImageFormat::from_content_type(content_type).is_none() {
            return Err(ImageError::UnsupportedType {
                content_type: content_type.to_string(),
            });
        }

        // Reject before decoding when the encoded length already implies an oversize payload.
        let estimated = payload.len() / 4 * 3;
        self.ensure_within_limit(estimated.saturating_sub(2))?;

        let decoded = STANDARD
            .decode(payload.trim())
            .map_err(|err| ImageError::Decode(err.to_string()))?;

        self.ingest_bytes(folder, Some(content_type), Bytes::from(decoded))
            .await
    }

    /// Remove images stored by a write that failed afterwards. Removal errors are logged only.
    pub async fn discard(&self, images: &[StoredImage]) {
        for image in images {
            if let Err(err) = self.store.delete(&image.key).await {
                warn!(
                    target = "storefront::images",
                    key = %image.key,
                    error = %err,
                    "Failed to remove orphaned image"
                );
            }
        }
    }

    fn ensure_within_limit(&self, size: usize) -> Result<(), ImageError> {
        if size > self.max_bytes {
            return Err(ImageError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

pub fn is_data_uri(value: &str) -> bool {
    value.trim_start().starts_with(DATA_URI_SCHEME)
}

fn split_data_uri(value: &str) -> Result<(&str, &str), ImageError> {
    let rest = value
        .trim()
        .strip_prefix(DATA_URI_SCHEME)
        .ok_or_else(|| ImageError::Decode("expected a data uri".to_string()))?;
    let marker = rest
        .find(BASE64_MARKER)
        .ok_or_else(|| ImageError::Decode("data uri is not base64 encoded".to_string()))?;
    let content_type = &rest[..marker];
    let payload = &rest[marker + BASE64_MARKER.len()..];
    Ok((content_type, payload))
}

fn normalize_folder(folder: Option<&str>) -> String {
    let slug = folder.map(slugify).unwrap_or_default();
    if slug.is_empty() {
        DEFAULT_FOLDER.to_string()
    } else {
        slug
    }
}
