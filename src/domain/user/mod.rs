//! User domain
//!
//! This module provides the domain types and traits for user account
//! management: the user entity, soft-delete status, validation rules and the
//! repository trait the storage layer implements.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUserRecord, User, UserId, UserStatus};
pub use repository::{UserChanges, UserFilter, UserRepository};
pub use validation::{validate_password_confirmation, UserValidationError};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
