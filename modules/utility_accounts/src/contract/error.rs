use thiserror::Error;

/// Errors that are safe to expose to other crates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountsError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("User with email '{email}' already exists")]
    Conflict { email: String },

    #[error("Not logged in")]
    Unauthenticated,

    #[error("Admin access required")]
    Forbidden,

    #[error("Internal error")]
    Internal,
}

impl AccountsError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(email: impl Into<String>) -> Self {
        Self::Conflict {
            email: email.into(),
        }
    }

    pub fn unauthenticated() -> Self {
        Self::Unauthenticated
    }

    pub fn forbidden() -> Self {
        Self::Forbidden
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}
