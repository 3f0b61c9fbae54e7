//! User infrastructure module
//!
//! Implementations behind the user domain: Argon2 password hashing, the
//! in-memory and PostgreSQL repositories, and the user service carrying the
//! business rules.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{BulkCreateOutcome, NewUser, UserPatch, UserSearchQuery, UserService};
