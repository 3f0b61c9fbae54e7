//! User Accounts Core
//!
//! Business-logic core behind a user-account CRUD surface:
//! - Single and bulk account creation with duplicate-email protection
//! - Active-record lookup and unfiltered administrative listing
//! - Filtered search (status, name substring, creation-date range)
//! - Partial update with field-level merge and password re-hashing
//! - Soft deletion (accounts are deactivated, never physically removed)
//!
//! Transport, authentication and request-shape validation are owned by the
//! calling layer; this crate exposes the service, repositories and the error
//! taxonomy the boundary maps onto its wire format.

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::DomainError;
pub use domain::user::{User, UserFilter, UserId, UserRepository, UserStatus};
pub use infrastructure::user::{
    Argon2Hasher, BulkCreateOutcome, InMemoryUserRepository, NewUser, PasswordHasher,
    PostgresUserRepository, UserPatch, UserSearchQuery, UserService,
};
