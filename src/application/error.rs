use axum::{http::StatusCode, response::Response};
use thiserror::Error;

use crate::{config::LoadError, infra::error::InfraError};

#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            messages: vec![message.into()],
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            message: format!("{field} is required"),
        }
    }

    pub fn invalid(field: &'static str, reason: impl AsRef<str>) -> Self {
        Self {
            field,
            message: format!("{field} {}", reason.as_ref()),
        }
    }
}

pub fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), FieldViolation> {
    if value.trim().is_empty() {
        return Err(FieldViolation::required(field));
    }
    Ok(())
}

pub fn ensure_non_negative(value: i64, field: &'static str) -> Result<(), FieldViolation> {
    if value < 0 {
        return Err(FieldViolation::invalid(field, "must not be negative"));
    }
    Ok(())
}

/// Process-level failure surfaced by `main`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_field_names_the_field() {
        let err = ensure_non_empty("   ", "phone").expect_err("blank");
        assert_eq!(err.field, "phone");
        assert_eq!(err.to_string(), "phone is required");
    }
}
