//! User business-rule validation

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Password and confirmation do not match")]
    PasswordMismatch,
}

/// Validate that a password matches its confirmation
///
/// Registration supplies the password twice; the pair must be identical
/// before anything is hashed or written.
pub fn validate_password_confirmation(
    password: &str,
    confirmation: &str,
) -> Result<(), UserValidationError> {
    if password != confirmation {
        return Err(UserValidationError::PasswordMismatch);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_passwords() {
        assert!(validate_password_confirmation("secret123", "secret123").is_ok());
    }

    #[test]
    fn test_mismatched_passwords() {
        assert_eq!(
            validate_password_confirmation("secret123", "secret124"),
            Err(UserValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn test_confirmation_is_case_sensitive() {
        assert_eq!(
            validate_password_confirmation("Secret", "secret"),
            Err(UserValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn test_empty_pair_matches() {
        assert!(validate_password_confirmation("", "").is_ok());
    }
}
