use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::counters::REVIEWS_SUBMITTED_TOTAL;
use crate::application::error::FieldViolation;
use crate::application::notify::{Notification, NotificationDispatcher};
use crate::application::repos::{CreateReviewParams, RepoError, ReviewsRepo};
use crate::domain::entities::ReviewRecord;

pub const PUBLIC_REVIEW_LIMIT: u32 = 20;
pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error(transparent)]
    Validation(#[from] FieldViolation),
    #[error("review not found")]
    NotFound,
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for ReviewError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound,
            other => Self::Repo(other),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubmitReviewCommand {
    pub name: Option<String>,
    pub location: Option<String>,
    pub text: Option<String>,
    pub rating: Option<i64>,
}

#[derive(Clone)]
pub struct ReviewService {
    repo: Arc<dyn ReviewsRepo>,
    notifications: NotificationDispatcher,
}

impl ReviewService {
    pub fn new(repo: Arc<dyn ReviewsRepo>, notifications: NotificationDispatcher) -> Self {
        Self {
            repo,
            notifications,
        }
    }

    /// Customer submission; always lands unapproved.
    pub async fn submit(&self, command: SubmitReviewCommand) -> Result<ReviewRecord, ReviewError> {
        let params = validate(command, false)?;
        let review = self.repo.create_review(params).await?;
        metrics::counter!(REVIEWS_SUBMITTED_TOTAL).increment(1);

        info!(
            target = "storefront::reviews",
            review_id = %review.id,
            rating = review.rating,
            "Review submitted"
        );
        self.notifications
            .dispatch(Notification::new_review(&review));

        Ok(review)
    }

    /// Admin-authored review; approval is taken from the request.
    pub async fn create(
        &self,
        command: SubmitReviewCommand,
        approved: bool,
    ) -> Result<ReviewRecord, ReviewError> {
        let params = validate(command, approved)?;
        self.repo
            .create_review(params)
            .await
            .map_err(ReviewError::from)
    }

    pub async fn approve(&self, id: Uuid) -> Result<ReviewRecord, ReviewError> {
        self.repo.approve_review(id).await.map_err(ReviewError::from)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ReviewError> {
        self.repo.delete_review(id).await.map_err(ReviewError::from)
    }

    pub async fn list(&self, approved: Option<bool>) -> Result<Vec<ReviewRecord>, ReviewError> {
        self.repo
            .list_reviews(approved, None)
            .await
            .map_err(ReviewError::from)
    }

    pub async fn list_public(&self) -> Result<Vec<ReviewRecord>, ReviewError> {
        self.repo
            .list_reviews(Some(true), Some(PUBLIC_REVIEW_LIMIT))
            .await
            .map_err(ReviewError::from)
    }
}

fn validate(
    command: SubmitReviewCommand,
    is_approved: bool,
) -> Result<CreateReviewParams, FieldViolation> {
    let name = command
        .name
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| FieldViolation::required("name"))?;
    let text = command
        .text
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| FieldViolation::required("text"))?;
    let rating = command
        .rating
        .ok_or_else(|| FieldViolation::required("rating"))?;

    let rating = i16::try_from(rating)
        .ok()
        .filter(|value| (MIN_RATING..=MAX_RATING).contains(value))
        .ok_or_else(|| {
            FieldViolation::invalid(
                "rating",
                format!("must be between {MIN_RATING} and {MAX_RATING}"),
            )
        })?;

    Ok(CreateReviewParams {
        name,
        location: command
            .location
            .map(|value| value.trim().to_string())
            .unwrap_or_default(),
        text,
        rating,
        is_approved,
    })
}
