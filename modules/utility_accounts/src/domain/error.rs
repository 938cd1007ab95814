use thiserror::Error;

use crate::contract::model::ServiceKind;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Invalid email format: '{email}'")]
    InvalidEmail { email: String },

    #[error("Invalid amount: '{amount}'")]
    InvalidAmount { amount: String },

    #[error("Invalid interface rating {value} (expected 1..=5)")]
    InvalidRating { value: u8 },

    #[error("Meter number '{given}' is not your registered {kind} meter")]
    MeterMismatch { kind: ServiceKind, given: String },

    #[error("User with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("No active session")]
    NotAuthenticated,

    #[error("Admin access required")]
    AccessDenied,

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub fn invalid_email(email: impl Into<String>) -> Self {
        Self::InvalidEmail {
            email: email.into(),
        }
    }

    pub fn invalid_amount(amount: impl Into<String>) -> Self {
        Self::InvalidAmount {
            amount: amount.into(),
        }
    }

    pub fn invalid_rating(value: u8) -> Self {
        Self::InvalidRating { value }
    }

    pub fn meter_mismatch(kind: ServiceKind, given: impl Into<String>) -> Self {
        Self::MeterMismatch {
            kind,
            given: given.into(),
        }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn not_authenticated() -> Self {
        Self::NotAuthenticated
    }

    pub fn access_denied() -> Self {
        Self::AccessDenied
    }

    /// Keeps the whole context chain, e.g.
    /// `prepend to userActivities: Quota exceeded: ...`.
    pub fn storage(err: anyhow::Error) -> Self {
        Self::Storage {
            message: format!("{err:#}"),
        }
    }
}

/// Require a non-blank value.
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::missing_field(field));
    }
    Ok(())
}
