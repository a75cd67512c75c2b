//! Best-effort outbound notifications about new orders and reviews.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::counters::NOTIFICATIONS_FAILED_TOTAL;
use crate::domain::entities::{OrderRecord, ReviewRecord};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport failed: {0}")]
    Transport(String),
    #[error("notification relay rejected message with status {status}")]
    Rejected { status: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub html: String,
}

impl Notification {
    pub fn new_order(order: &OrderRecord) -> Self {
        let rows = [
            ("Order ID", order.order_id.clone()),
            ("Customer", order.customer_name.clone()),
            ("Phone", order.phone.clone()),
            ("Address", order.address.clone()),
            ("Product", order.product_name.clone()),
            ("Color", order.color.clone()),
            ("Size", order.size.clone()),
            ("Quantity", order.quantity.to_string()),
            ("Total", format!("৳{}", order.total_price)),
        ];
        Self {
            subject: format!("New order {}", order.order_id),
            html: render_table("New order received", &rows),
        }
    }

    pub fn new_review(review: &ReviewRecord) -> Self {
        let rows = [
            ("Name", review.name.clone()),
            ("Location", review.location.clone()),
            ("Rating", format!("{}/5", review.rating)),
            ("Review", review.text.clone()),
        ];
        Self {
            subject: format!("New review from {}", review.name),
            html: render_table("New review awaiting approval", &rows),
        }
    }
}

fn render_table(heading: &str, rows: &[(&str, String)]) -> String {
    let mut html = format!("<h2>{}</h2><table>", ammonia::clean_text(heading));
    for (label, value) in rows {
        html.push_str(&format!(
            "<tr><th align=\"left\">{}</th><td>{}</td></tr>",
            ammonia::clean_text(label),
            ammonia::clean_text(value)
        ));
    }
    html.push_str("</table>");
    html
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Used when no mail relay is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        debug!(
            target = "storefront::notify",
            subject = %notification.subject,
            "Notifications disabled; message dropped"
        );
        Ok(())
    }
}

/// Fire-and-forget front for a [`Notifier`]; failures are logged and counted, never returned.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
    enabled: bool,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            enabled: true,
        }
    }

    pub fn disabled() -> Self {
        Self {
            notifier: Arc::new(DisabledNotifier),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn dispatch(&self, notification: Notification) {
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            if let Err(err) = notifier.send(&notification).await {
                metrics::counter!(NOTIFICATIONS_FAILED_TOTAL).increment(1);
                warn!(
                    target = "storefront::notify",
                    subject = %notification.subject,
                    error = %err,
                    "Failed to deliver notification"
                );
            }
        });
    }
}
