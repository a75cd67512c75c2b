//! Admin inbox over unread orders and reviews.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::application::repos::{OrdersRepo, RepoError, ReviewsRepo};
use crate::domain::entities::{OrderRecord, ReviewRecord};

#[derive(Debug, Error)]
pub enum InboxError {
    #[error("notification target not found")]
    NotFound,
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for InboxError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound,
            other => Self::Repo(other),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnreadItems {
    pub orders: Vec<OrderRecord>,
    pub reviews: Vec<ReviewRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadTarget {
    Order(Uuid),
    Review(Uuid),
    All,
}

#[derive(Clone)]
pub struct InboxService {
    orders: Arc<dyn OrdersRepo>,
    reviews: Arc<dyn ReviewsRepo>,
}

impl InboxService {
    pub fn new(orders: Arc<dyn OrdersRepo>, reviews: Arc<dyn ReviewsRepo>) -> Self {
        Self { orders, reviews }
    }

    pub async fn list_unread(&self) -> Result<UnreadItems, InboxError> {
        let (orders, reviews) = tokio::try_join!(
            self.orders.list_unread_orders(),
            self.reviews.list_unread_reviews()
        )?;
        Ok(UnreadItems { orders, reviews })
    }

    /// Marking an already-read item is a no-op; unknown ids are `NotFound`.
    pub async fn mark_read(&self, target: ReadTarget) -> Result<(), InboxError> {
        match target {
            ReadTarget::Order(id) => self.orders.mark_order_read(id).await?,
            ReadTarget::Review(id) => self.reviews.mark_review_read(id).await?,
            ReadTarget::All => {
                let (orders, reviews) = tokio::try_join!(
                    self.orders.mark_all_orders_read(),
                    self.reviews.mark_all_reviews_read()
                )?;
                debug!(
                    target = "storefront::notifications",
                    orders, reviews, "Marked inbox as read"
                );
            }
        }
        Ok(())
    }
}
