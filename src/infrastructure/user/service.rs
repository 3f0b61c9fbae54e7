//! User service carrying the account-management business rules

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::{debug, info};

use crate::domain::user::{
    validate_password_confirmation, NewUserRecord, User, UserChanges, UserFilter, UserId,
    UserRepository, UserStatus,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for creating a new user account
///
/// The password arrives twice; the pair must match before anything is
/// hashed or written.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub cellphone: String,
}

/// Partial update for an existing account
///
/// `None` marks a field as absent; absent fields keep their stored value.
/// A provided password is re-hashed before it is persisted.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub password: Option<String>,
    pub cellphone: Option<String>,
}

impl UserPatch {
    /// Merge the patch against the loaded record into a full replacement
    /// payload: each field takes the provided value or falls back to the
    /// stored one. `password_hash` must already be hashed when provided.
    fn merge_into(&self, current: &User, password_hash: Option<String>) -> UserChanges {
        UserChanges::new()
            .with_name(self.name.clone().unwrap_or_else(|| current.name().to_string()))
            .with_password_hash(
                password_hash.unwrap_or_else(|| current.password_hash().to_string()),
            )
            .with_cellphone(
                self.cellphone
                    .clone()
                    .unwrap_or_else(|| current.cellphone().to_string()),
            )
    }
}

/// Aggregate result of a bulk creation
///
/// Individual failures are counted, not described; the batch itself always
/// completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkCreateOutcome {
    pub successful: usize,
    pub failed: usize,
}

/// Search criteria for `find_users`
///
/// The date range on the creation timestamp is inclusive on both ends.
#[derive(Debug, Clone, Default)]
pub struct UserSearchQuery {
    pub status: Option<UserStatus>,
    pub name: Option<String>,
    pub before: Option<DateTime<Utc>>,
    pub after: Option<DateTime<Utc>>,
}

impl UserSearchQuery {
    /// Parse the recognized string query parameters: `status` (boolean-like),
    /// `name` (substring), `Before`/`After` (RFC 3339 timestamp or
    /// `YYYY-MM-DD` date, read as midnight UTC).
    pub fn from_params(
        status: Option<&str>,
        name: Option<&str>,
        before: Option<&str>,
        after: Option<&str>,
    ) -> Result<Self, DomainError> {
        let status = status
            .map(|s| s.parse::<UserStatus>().map_err(DomainError::validation))
            .transpose()?;

        Ok(Self {
            status,
            name: name.map(str::to_string),
            before: before.map(parse_timestamp).transpose()?,
            after: after.map(parse_timestamp).transpose()?,
        })
    }

    /// Translate the criteria into the repository's filter form
    pub fn into_filter(self) -> UserFilter {
        let mut filter = UserFilter::new();

        if let Some(status) = self.status {
            filter = filter.with_status(status);
        }
        if let Some(name) = self.name {
            filter = filter.with_name_contains(name);
        }
        if let Some(before) = self.before {
            filter = filter.with_created_before(before);
        }
        if let Some(after) = self.after {
            filter = filter.with_created_after(after);
        }

        filter
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DomainError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(DomainError::validation(format!(
        "'{}' is not a parseable date",
        value
    )))
}

/// User service for account management
///
/// All operations are stateless async calls against the repository; the
/// service holds no mutable state of its own.
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Create a new user account
    ///
    /// Fails with `Validation` on a mismatched password confirmation and
    /// with `Conflict` when any record holds the email, soft-deleted
    /// records included: a deactivated account still blocks re-registration
    /// with its email. The lookup here is only an early exit; the
    /// repository enforces uniqueness atomically on create, which closes
    /// the check-then-act window between concurrent registrations.
    pub async fn create_user(&self, request: NewUser) -> Result<User, DomainError> {
        debug!(email = %request.email, "Creating user");

        validate_password_confirmation(&request.password, &request.password_confirmation)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let email_taken = UserFilter::new().with_email(request.email.as_str());
        if self.repository.exists(&email_taken).await? {
            return Err(DomainError::conflict(format!(
                "Email '{}' already registered",
                request.email
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let user = self
            .repository
            .create(NewUserRecord {
                name: request.name,
                email: request.email,
                password_hash,
                cellphone: request.cellphone,
                status: UserStatus::Active,
            })
            .await?;

        info!(id = %user.id(), "User created");
        Ok(user)
    }

    /// Create many user accounts, one entry at a time
    ///
    /// Entries are processed sequentially so the counts are deterministic
    /// and store load stays bounded. Each entry passes the same rules as
    /// [`create_user`]; a failing entry (validation, conflict or store
    /// error) is counted and never aborts the batch or affects its
    /// siblings.
    pub async fn bulk_create_users(&self, requests: Vec<NewUser>) -> BulkCreateOutcome {
        let total = requests.len();
        let mut outcome = BulkCreateOutcome::default();

        for request in requests {
            match self.create_user(request).await {
                Ok(_) => outcome.successful += 1,
                Err(e) => {
                    debug!(error = %e, "Bulk entry rejected");
                    outcome.failed += 1;
                }
            }
        }

        info!(
            total = total,
            successful = outcome.successful,
            failed = outcome.failed,
            "Bulk user creation completed"
        );
        outcome
    }

    /// Get an active user by id
    ///
    /// A missing record and a soft-deleted one both come back as `None`
    /// through the same lookup; callers cannot tell the cases apart.
    pub async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let filter = UserFilter::new().with_id(id).with_status(UserStatus::Active);
        self.repository.find_one(&filter).await
    }

    /// Apply a partial update to an active user
    ///
    /// Loads the active record and merges the patch against it: provided
    /// fields replace stored values, absent fields keep them, and a
    /// provided password is re-hashed while an absent one leaves the stored
    /// hash untouched. Fails with `NotFound` when no active record has the
    /// id. Returns the updated record.
    pub async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, DomainError> {
        info!(id = %id, "Updating user");

        let active = UserFilter::new().with_id(id).with_status(UserStatus::Active);
        let current = self
            .repository
            .find_one(&active)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        let password_hash = match &patch.password {
            Some(password) => Some(self.hasher.hash(password)?),
            None => None,
        };

        let changes = patch.merge_into(&current, password_hash);
        let by_id = UserFilter::new().with_id(id);
        let affected = self.repository.update(&changes, &by_id).await?;

        // The record can vanish between the load and the write
        if affected == 0 {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        }

        self.repository
            .find_one(&by_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }

    /// Soft-delete a user
    ///
    /// Sets the status to inactive regardless of the current status, so a
    /// repeated call is a successful no-op. Fails with `NotFound` only when
    /// no record at all carries the id.
    pub async fn delete_user(&self, id: UserId) -> Result<(), DomainError> {
        info!(id = %id, "Deactivating user");

        let by_id = UserFilter::new().with_id(id);
        if !self.repository.exists(&by_id).await? {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        }

        let changes = UserChanges::new().with_status(UserStatus::Inactive);
        self.repository.update(&changes, &by_id).await?;

        Ok(())
    }

    /// List every record, soft-deleted ones included
    ///
    /// This is the administrative full listing and deliberately skips the
    /// active-only scoping of [`get_user_by_id`].
    pub async fn get_all_users(&self) -> Result<Vec<User>, DomainError> {
        self.repository.find_all(&UserFilter::new()).await
    }

    /// Search users by status, name substring and creation-date range
    pub async fn find_users(&self, query: UserSearchQuery) -> Result<Vec<User>, DomainError> {
        self.repository.find_all(&query.into_filter()).await
    }
}
