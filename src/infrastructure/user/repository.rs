//! In-memory user repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NewUserRecord, User, UserChanges, UserFilter, UserId, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
///
/// Email uniqueness is enforced under the write lock, making this store an
/// atomic enforcement point just like the SQL unique index.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<i64, User>>>,
    /// Index for email -> user id lookup
    email_index: Arc<RwLock<HashMap<String, i64>>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            email_index: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI64::new(0),
        }
    }

    /// Create a repository seeded with existing records
    pub fn with_users(users: Vec<User>) -> Self {
        let mut users_map = HashMap::new();
        let mut email_map = HashMap::new();
        let mut max_id = 0;

        for user in users {
            let id = user.id().as_i64();
            max_id = max_id.max(id);
            email_map.insert(user.email().to_string(), id);
            users_map.insert(id, user);
        }

        Self {
            users: Arc::new(RwLock::new(users_map)),
            email_index: Arc::new(RwLock::new(email_map)),
            next_id: AtomicI64::new(max_id),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;

        // Direct hits avoid the scan
        if let Some(id) = filter.id {
            return Ok(users.get(&id.as_i64()).filter(|u| filter.matches(u)).cloned());
        }

        if let Some(email) = &filter.email {
            let email_index = self.email_index.read().await;
            if let Some(id) = email_index.get(email) {
                return Ok(users.get(id).filter(|u| filter.matches(u)).cloned());
            }
            return Ok(None);
        }

        let mut matched: Vec<&User> = users.values().filter(|u| filter.matches(u)).collect();
        matched.sort_by_key(|u| u.id());
        Ok(matched.first().map(|u| (*u).clone()))
    }

    async fn find_all(&self, filter: &UserFilter) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;

        let mut matched: Vec<User> =
            users.values().filter(|u| filter.matches(u)).cloned().collect();
        matched.sort_by_key(|u| u.id());

        Ok(matched)
    }

    async fn create(&self, record: NewUserRecord) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let mut email_index = self.email_index.write().await;

        if email_index.contains_key(&record.email) {
            return Err(DomainError::conflict(format!(
                "Email '{}' already registered",
                record.email
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();

        let user = User::from_parts(
            UserId::new(id),
            record.name,
            record.email.clone(),
            record.password_hash,
            record.cellphone,
            record.status,
            now,
            now,
        );

        email_index.insert(record.email, id);
        users.insert(id, user.clone());

        Ok(user)
    }

    async fn update(
        &self,
        changes: &UserChanges,
        filter: &UserFilter,
    ) -> Result<u64, DomainError> {
        let mut users = self.users.write().await;

        let mut affected = 0;
        for user in users.values_mut().filter(|u| filter.matches(u)) {
            changes.apply_to(user);
            affected += 1;
        }

        Ok(affected)
    }
}
