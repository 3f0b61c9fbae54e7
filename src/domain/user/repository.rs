//! User repository trait and query types

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

use super::entity::{NewUserRecord, User, UserId, UserStatus};
use crate::domain::DomainError;

/// Filter criteria for repository lookups
///
/// Every field is optional; an unset field places no constraint on the
/// matching records. The creation-date range is inclusive on both ends.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Match a specific record id
    pub id: Option<UserId>,
    /// Match the exact email
    pub email: Option<String>,
    /// Match the exact status
    pub status: Option<UserStatus>,
    /// Match names containing this substring (case-sensitive)
    pub name_contains: Option<String>,
    /// Match records created at or before this instant
    pub created_before: Option<DateTime<Utc>>,
    /// Match records created at or after this instant
    pub created_after: Option<DateTime<Utc>>,
}

impl UserFilter {
    /// Create an empty filter matching every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain to a record id
    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    /// Constrain to an exact email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Constrain to a status
    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Constrain to names containing a substring
    pub fn with_name_contains(mut self, fragment: impl Into<String>) -> Self {
        self.name_contains = Some(fragment.into());
        self
    }

    /// Constrain to records created at or before an instant
    pub fn with_created_before(mut self, instant: DateTime<Utc>) -> Self {
        self.created_before = Some(instant);
        self
    }

    /// Constrain to records created at or after an instant
    pub fn with_created_after(mut self, instant: DateTime<Utc>) -> Self {
        self.created_after = Some(instant);
        self
    }

    /// Evaluate the filter against a user record
    ///
    /// In-memory implementations reuse this predicate so that every store
    /// agrees on the filter semantics.
    pub fn matches(&self, user: &User) -> bool {
        if let Some(id) = self.id {
            if user.id() != id {
                return false;
            }
        }

        if let Some(email) = &self.email {
            if user.email() != email {
                return false;
            }
        }

        if let Some(status) = self.status {
            if user.status() != status {
                return false;
            }
        }

        if let Some(fragment) = &self.name_contains {
            if !user.name().contains(fragment.as_str()) {
                return false;
            }
        }

        if let Some(before) = self.created_before {
            if user.created_at() > before {
                return false;
            }
        }

        if let Some(after) = self.created_after {
            if user.created_at() < after {
                return false;
            }
        }

        true
    }
}

/// Partial update applied to matching records
///
/// `None` marks a field as absent: the stored value is left unchanged. This
/// is distinct from setting a field to a new (possibly empty) value.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub cellphone: Option<String>,
    pub status: Option<UserStatus>,
}

impl UserChanges {
    /// Create an empty change set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the password hash
    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    /// Set the contact number
    pub fn with_cellphone(mut self, cellphone: impl Into<String>) -> Self {
        self.cellphone = Some(cellphone.into());
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.password_hash.is_none()
            && self.cellphone.is_none()
            && self.status.is_none()
    }

    /// Apply the set fields to a record, leaving absent fields untouched
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.set_name(name.clone());
        }
        if let Some(hash) = &self.password_hash {
            user.set_password_hash(hash.clone());
        }
        if let Some(cellphone) = &self.cellphone {
            user.set_cellphone(cellphone.clone());
        }
        if let Some(status) = self.status {
            user.set_status(status);
        }
    }
}

/// Repository trait for user storage
///
/// The core stays correct against any implementation of this contract. Email
/// uniqueness is enforced here, at the storage boundary: `create` must reject
/// a duplicate email with [`DomainError::Conflict`] atomically under the
/// store's own synchronization, so the service-level pre-check is only an
/// early exit.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Find the first record matching the filter
    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, DomainError>;

    /// Find all records matching the filter
    async fn find_all(&self, filter: &UserFilter) -> Result<Vec<User>, DomainError>;

    /// Create a new record; the store assigns the id and timestamps
    async fn create(&self, record: NewUserRecord) -> Result<User, DomainError>;

    /// Apply changes to every record matching the filter, returning the
    /// number of affected records
    async fn update(&self, changes: &UserChanges, filter: &UserFilter)
        -> Result<u64, DomainError>;

    /// Check whether any record matches the filter
    async fn exists(&self, filter: &UserFilter) -> Result<bool, DomainError> {
        Ok(self.find_one(filter).await?.is_some())
    }
}
