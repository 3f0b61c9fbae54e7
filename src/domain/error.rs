use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Conventional transport status code for this error kind.
    ///
    /// The boundary layer forwards these as HTTP status codes: validation
    /// failures and uniqueness conflicts are client errors (400), a missing
    /// target record is 404, and anything raised by the store is 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } | Self::Conflict { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::Storage { .. } | Self::Internal { .. } => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("User '42' not found");
        assert_eq!(error.to_string(), "Not found: User '42' not found");
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Passwords do not match");
        assert_eq!(error.to_string(), "Validation error: Passwords do not match");
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("Email 'a@x.com' already registered");
        assert_eq!(
            error.to_string(),
            "Conflict: Email 'a@x.com' already registered"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(DomainError::validation("bad input").status_code(), 400);
        assert_eq!(DomainError::conflict("duplicate").status_code(), 400);
        assert_eq!(DomainError::not_found("missing").status_code(), 404);
        assert_eq!(DomainError::storage("db down").status_code(), 500);
        assert_eq!(DomainError::internal("bug").status_code(), 500);
    }
}
