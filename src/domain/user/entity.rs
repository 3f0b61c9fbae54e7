//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identifier, assigned by the store on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a store-assigned identifier
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner numeric value
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Account is active
    #[default]
    Active,
    /// Account has been soft-deleted; the record stays in the store
    Inactive,
}

impl UserStatus {
    /// Check whether this status marks a live account
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Stored boolean form: `true` = active, `false` = soft-deleted
    pub fn as_bool(&self) -> bool {
        self.is_active()
    }

    /// From the stored boolean form
    pub fn from_bool(active: bool) -> Self {
        if active { Self::Active } else { Self::Inactive }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    /// Parse a boolean-like query value ("true"/"false"/"1"/"0", any case)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Self::Active),
            "false" | "0" => Ok(Self::Inactive),
            other => Err(format!("'{}' is not a boolean-like status value", other)),
        }
    }
}

/// User account entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier
    id: UserId,
    /// Display name
    name: String,
    /// Login identifier; unique across all records, soft-deleted included
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    /// Contact number
    cellphone: String,
    /// Active or soft-deleted
    status: UserStatus,
    /// Creation timestamp, set by the store
    created_at: DateTime<Utc>,
    /// Last update timestamp, set by the store
    updated_at: DateTime<Utc>,
}

impl User {
    /// Assemble a user from stored parts; only repositories construct users
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        cellphone: impl Into<String>,
        status: UserStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            cellphone: cellphone.into(),
            status,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn cellphone(&self) -> &str {
        &self.cellphone
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Check if the account is active (not soft-deleted)
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    // Mutators, used by repository implementations when applying changes

    /// Update the display name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    /// Update the password hash
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.touch();
    }

    /// Update the contact number
    pub fn set_cellphone(&mut self, cellphone: impl Into<String>) {
        self.cellphone = cellphone.into();
        self.touch();
    }

    /// Update the status
    pub fn set_status(&mut self, status: UserStatus) {
        self.status = status;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Attributes for a record the store has not assigned an id to yet
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub cellphone: String,
    pub status: UserStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User::from_parts(
            UserId::new(1),
            "Ada Lovelace",
            "ada@example.com",
            "$argon2id$fake-hash",
            "555-0100",
            UserStatus::Active,
            now,
            now,
        )
    }

    #[test]
    fn test_status_boolean_mapping() {
        assert!(UserStatus::Active.as_bool());
        assert!(!UserStatus::Inactive.as_bool());
        assert_eq!(UserStatus::from_bool(true), UserStatus::Active);
        assert_eq!(UserStatus::from_bool(false), UserStatus::Inactive);
    }

    #[test]
    fn test_status_parses_boolean_like_values() {
        assert_eq!("true".parse::<UserStatus>().unwrap(), UserStatus::Active);
        assert_eq!("TRUE".parse::<UserStatus>().unwrap(), UserStatus::Active);
        assert_eq!("1".parse::<UserStatus>().unwrap(), UserStatus::Active);
        assert_eq!("false".parse::<UserStatus>().unwrap(), UserStatus::Inactive);
        assert_eq!("0".parse::<UserStatus>().unwrap(), UserStatus::Inactive);
        assert!("yes".parse::<UserStatus>().is_err());
        assert!("".parse::<UserStatus>().is_err());
    }

    #[test]
    fn test_user_getters() {
        let user = sample_user();
        assert_eq!(user.id().as_i64(), 1);
        assert_eq!(user.name(), "Ada Lovelace");
        assert_eq!(user.email(), "ada@example.com");
        assert_eq!(user.cellphone(), "555-0100");
        assert!(user.is_active());
    }

    #[test]
    fn test_mutators_touch_updated_at() {
        let mut user = sample_user();
        let before = user.updated_at();

        user.set_cellphone("555-0199");
        assert_eq!(user.cellphone(), "555-0199");
        // Clock may not tick between construction and mutation, so only a
        // monotonic bound holds
        assert!(user.updated_at() >= before);
        assert!(user.updated_at() >= user.created_at());
    }

    #[test]
    fn test_soft_delete_flips_status_only() {
        let mut user = sample_user();
        user.set_status(UserStatus::Inactive);

        assert!(!user.is_active());
        assert_eq!(user.email(), "ada@example.com");
        assert_eq!(user.name(), "Ada Lovelace");
    }

    #[test]
    fn test_serialization_excludes_password_hash() {
        let user = sample_user();

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("fake-hash"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("ada@example.com"));
    }
}
