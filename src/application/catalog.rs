use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::error::{FieldViolation, ensure_non_empty, ensure_non_negative};
use crate::application::images::{
    ImageError, ImageIngestService, PUBLIC_PREFIX, StoredImage, is_data_uri,
};
use crate::application::repos::{
    CreateProductParams, ProductsRepo, RepoError, UpdateProductParams,
};
use crate::domain::entities::{ColorVariant, ProductRecord};
use crate::domain::pricing;

const PRODUCT_IMAGE_FOLDER: &str = "products";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] FieldViolation),
    #[error("product not found")]
    NotFound,
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for CatalogError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound,
            other => Self::Repo(other),
        }
    }
}

/// Colour entry as submitted by the admin client; `image_file` carries an inline data URI.
#[derive(Debug, Clone, Default)]
pub struct ColorInput {
    pub name: String,
    pub code: String,
    pub image: Option<String>,
    pub image_file: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateProductCommand {
    pub name: String,
    pub description: String,
    pub size: String,
    pub regular_price: i64,
    pub offer_price: Option<i64>,
    pub offer_percentage: Option<i32>,
    pub colors: Vec<ColorInput>,
    pub is_active: Option<bool>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductCommand {
    pub name: Option<String>,
    pub description: Option<String>,
    pub size: Option<String>,
    pub regular_price: Option<i64>,
    pub offer_price: Option<i64>,
    pub offer_percentage: Option<i32>,
    pub colors: Option<Vec<ColorInput>>,
    pub is_active: Option<bool>,
}

/// Colours ready for storage plus the images ingested while resolving them.
struct ResolvedColors {
    colors: Vec<ColorVariant>,
    stored: Vec<StoredImage>,
}

#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn ProductsRepo>,
    images: ImageIngestService,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn ProductsRepo>, images: ImageIngestService) -> Self {
        Self { repo, images }
    }

    pub async fn list_active(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        self.repo.list_products(true).await.map_err(CatalogError::from)
    }

    pub async fn list_all(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        self.repo
            .list_products(false)
            .await
            .map_err(CatalogError::from)
    }

    pub async fn create(
        &self,
        command: CreateProductCommand,
    ) -> Result<ProductRecord, CatalogError> {
        ensure_non_empty(&command.name, "name")?;
        ensure_non_negative(command.regular_price, "regularPrice")?;

        let offer_price = command.offer_price.unwrap_or(command.regular_price);
        ensure_non_negative(offer_price, "offerPrice")?;

        let offer_percentage = command
            .offer_percentage
            .or_else(|| pricing::offer_percentage(command.regular_price, offer_price))
            .unwrap_or(0);

        let ResolvedColors { colors, stored } = self.resolve_colors(command.colors).await?;

        let created = self
            .repo
            .create_product(CreateProductParams {
                name: command.name.trim().to_string(),
                description: command.description,
                size: command.size,
                regular_price: command.regular_price,
                offer_price,
                offer_percentage,
                colors,
                is_active: command.is_active.unwrap_or(true),
            })
            .await;

        self.keep_images_if_written(created, &stored).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        command: UpdateProductCommand,
    ) -> Result<ProductRecord, CatalogError> {
        let current = self
            .repo
            .find_product(id)
            .await?
            .ok_or(CatalogError::NotFound)?;

        if let Some(name) = command.name.as_deref() {
            ensure_non_empty(name, "name")?;
        }

        let regular_price = command.regular_price.unwrap_or(current.regular_price);
        let offer_price = command.offer_price.unwrap_or(current.offer_price);
        ensure_non_negative(regular_price, "regularPrice")?;
        ensure_non_negative(offer_price, "offerPrice")?;

        let prices_changed = command.regular_price.is_some() || command.offer_price.is_some();
        let offer_percentage = match command.offer_percentage {
            Some(value) => value,
            None if prices_changed => {
                pricing::offer_percentage(regular_price, offer_price)
                    .unwrap_or(current.offer_percentage)
            }
            None => current.offer_percentage,
        };

        let ResolvedColors { colors, stored } = match command.colors {
            Some(colors) => self.resolve_colors(colors).await?,
            None => ResolvedColors {
                colors: current.colors,
                stored: Vec::new(),
            },
        };

        let updated = self
            .repo
            .update_product(UpdateProductParams {
                id,
                name: command
                    .name
                    .map(|name| name.trim().to_string())
                    .unwrap_or(current.name),
                description: command.description.unwrap_or(current.description),
                size: command.size.unwrap_or(current.size),
                regular_price,
                offer_price,
                offer_percentage,
                colors,
                is_active: command.is_active.unwrap_or(current.is_active),
            })
            .await;

        self.keep_images_if_written(updated, &stored).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), CatalogError> {
        self.repo.delete_product(id).await.map_err(CatalogError::from)
    }

    async fn keep_images_if_written(
        &self,
        written: Result<ProductRecord, RepoError>,
        stored: &[StoredImage],
    ) -> Result<ProductRecord, CatalogError> {
        match written {
            Ok(record) => Ok(record),
            Err(err) => {
                self.images.discard(stored).await;
                Err(err.into())
            }
        }
    }

    /// Every colour is validated before the first image is stored.
    async fn resolve_colors(
        &self,
        colors: Vec<ColorInput>,
    ) -> Result<ResolvedColors, CatalogError> {
        for color in &colors {
            ensure_non_empty(&color.name, "colors.name")?;
        }

        let mut resolved = ResolvedColors {
            colors: Vec::with_capacity(colors.len()),
            stored: Vec::new(),
        };
        for color in colors {
            let inline = color
                .image_file
                .filter(|value| is_data_uri(value))
                .or_else(|| color.image.clone().filter(|value| is_data_uri(value)));

            let (image, is_local_image) = match inline {
                Some(data_uri) => {
                    let ingested = self
                        .images
                        .ingest_data_uri(Some(PRODUCT_IMAGE_FOLDER), &data_uri)
                        .await;
                    match ingested {
                        Ok(stored) => {
                            let url = stored.url.clone();
                            resolved.stored.push(stored);
                            (url, true)
                        }
                        Err(err) => {
                            self.images.discard(&resolved.stored).await;
                            return Err(err.into());
                        }
                    }
                }
                None => {
                    let image = color.image.unwrap_or_default();
                    let is_local = image.starts_with(PUBLIC_PREFIX);
                    (image, is_local)
                }
            };

            resolved.colors.push(ColorVariant {
                name: color.name.trim().to_string(),
                code: color.code,
                image,
                is_local_image,
            });
        }
        Ok(resolved)
    }
}
