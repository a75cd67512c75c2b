use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::error::{FieldViolation, ensure_non_empty};
use crate::application::images::{
    ImageError, ImageIngestService, PUBLIC_PREFIX, StoredImage, is_data_uri,
};
use crate::application::repos::{RepoError, SliderParams, SlidersRepo};
use crate::domain::entities::SliderRecord;

const SLIDER_IMAGE_FOLDER: &str = "sliders";

#[derive(Debug, Error)]
pub enum SliderError {
    #[error(transparent)]
    Validation(#[from] FieldViolation),
    #[error("slider not found")]
    NotFound,
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for SliderError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound,
            other => Self::Repo(other),
        }
    }
}

/// Create or partially update a slide. On create, `title` and an image are required.
#[derive(Debug, Clone, Default)]
pub struct SliderCommand {
    pub slide_number: Option<i32>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_file: Option<String>,
    pub badge_text: Option<String>,
    pub badge_color: Option<String>,
    pub price: Option<i64>,
    pub original_price: Option<i64>,
    pub is_active: Option<bool>,
}

struct SlideImage {
    url: String,
    is_local: bool,
    /// Set when the image was ingested by this request.
    stored: Option<StoredImage>,
}

#[derive(Clone)]
pub struct SliderService {
    repo: Arc<dyn SlidersRepo>,
    images: ImageIngestService,
}

impl SliderService {
    pub fn new(repo: Arc<dyn SlidersRepo>, images: ImageIngestService) -> Self {
        Self { repo, images }
    }

    pub async fn list_active(&self) -> Result<Vec<SliderRecord>, SliderError> {
        self.repo.list_sliders(true).await.map_err(SliderError::from)
    }

    pub async fn list_all(&self) -> Result<Vec<SliderRecord>, SliderError> {
        self.repo.list_sliders(false).await.map_err(SliderError::from)
    }

    pub async fn create(&self, command: SliderCommand) -> Result<SliderRecord, SliderError> {
        let title = command.title.clone().unwrap_or_default();
        ensure_non_empty(&title, "title")?;

        if !has_image(command.image_file.as_deref(), command.image_url.as_deref()) {
            return Err(FieldViolation::required("imageUrl").into());
        }

        let slide_number = match command.slide_number {
            Some(number) => number,
            None => self.next_slide_number().await?,
        };

        let image = self
            .resolve_image(command.image_file, command.image_url)
            .await?
            .ok_or_else(|| FieldViolation::required("imageUrl"))?;

        let created = self
            .repo
            .create_slider(SliderParams {
                slide_number,
                title: title.trim().to_string(),
                subtitle: command.subtitle.unwrap_or_default(),
                description: command.description.unwrap_or_default(),
                image_url: image.url,
                is_local_image: image.is_local,
                badge_text: non_blank(command.badge_text),
                badge_color: non_blank(command.badge_color),
                price: command.price,
                original_price: command.original_price,
                is_active: command.is_active.unwrap_or(true),
            })
            .await;

        self.keep_image_if_written(created, image.stored).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        command: SliderCommand,
    ) -> Result<SliderRecord, SliderError> {
        let current = self
            .repo
            .find_slider(id)
            .await?
            .ok_or(SliderError::NotFound)?;

        if let Some(title) = command.title.as_deref() {
            ensure_non_empty(title, "title")?;
        }

        let image = self
            .resolve_image(command.image_file, command.image_url)
            .await?
            .unwrap_or(SlideImage {
                url: current.image_url,
                is_local: current.is_local_image,
                stored: None,
            });

        let updated = self
            .repo
            .update_slider(
                id,
                SliderParams {
                    slide_number: command.slide_number.unwrap_or(current.slide_number),
                    title: command
                        .title
                        .map(|title| title.trim().to_string())
                        .unwrap_or(current.title),
                    subtitle: command.subtitle.unwrap_or(current.subtitle),
                    description: command.description.unwrap_or(current.description),
                    image_url: image.url,
                    is_local_image: image.is_local,
                    badge_text: command.badge_text.map_or(current.badge_text, |value| {
                        non_blank(Some(value))
                    }),
                    badge_color: command.badge_color.map_or(current.badge_color, |value| {
                        non_blank(Some(value))
                    }),
                    price: command.price.or(current.price),
                    original_price: command.original_price.or(current.original_price),
                    is_active: command.is_active.unwrap_or(current.is_active),
                },
            )
            .await;

        self.keep_image_if_written(updated, image.stored).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), SliderError> {
        self.repo.delete_slider(id).await.map_err(SliderError::from)
    }

    async fn next_slide_number(&self) -> Result<i32, SliderError> {
        let existing = self.repo.list_sliders(false).await?;
        Ok(existing
            .iter()
            .map(|slide| slide.slide_number)
            .max()
            .map_or(1, |max| max.saturating_add(1)))
    }

    async fn keep_image_if_written(
        &self,
        written: Result<SliderRecord, RepoError>,
        stored: Option<StoredImage>,
    ) -> Result<SliderRecord, SliderError> {
        match written {
            Ok(record) => Ok(record),
            Err(err) => {
                if let Some(image) = stored {
                    self.images.discard(&[image]).await;
                }
                Err(err.into())
            }
        }
    }

    /// Inline data URIs are ingested; plain URLs are kept as given.
    async fn resolve_image(
        &self,
        image_file: Option<String>,
        image_url: Option<String>,
    ) -> Result<Option<SlideImage>, SliderError> {
        let inline = image_file
            .filter(|value| is_data_uri(value))
            .or_else(|| image_url.clone().filter(|value| is_data_uri(value)));

        if let Some(data_uri) = inline {
            let stored = self
                .images
                .ingest_data_uri(Some(SLIDER_IMAGE_FOLDER), &data_uri)
                .await?;
            return Ok(Some(SlideImage {
                url: stored.url.clone(),
                is_local: true,
                stored: Some(stored),
            }));
        }

        Ok(non_blank(image_url).map(|url| SlideImage {
            is_local: url.starts_with(PUBLIC_PREFIX),
            url,
            stored: None,
        }))
    }
}

fn has_image(image_file: Option<&str>, image_url: Option<&str>) -> bool {
    image_file.is_some_and(is_data_uri) || image_url.is_some_and(|url| !url.trim().is_empty())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
