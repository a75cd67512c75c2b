use thiserror::Error;

use crate::domain::types::OrderStatus;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("domain validation failed: {message}")]
    Validation { message: String },
    #[error("order status cannot change from `{from}` to `{to}`")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
