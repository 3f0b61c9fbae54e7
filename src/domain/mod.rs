//! Domain types and traits

mod error;
pub mod user;

pub use error::DomainError;
