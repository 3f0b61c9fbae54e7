//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::config::DatabaseConfig;
use crate::domain::user::{
    NewUserRecord, User, UserChanges, UserFilter, UserId, UserRepository, UserStatus,
};
use crate::domain::DomainError;

const SELECT_COLUMNS: &str =
    "SELECT id, name, email, password_hash, cellphone, status, created_at, updated_at FROM users";

/// PostgreSQL implementation of UserRepository
///
/// The `users` table carries a unique index on `email`; a duplicate insert
/// surfaces as [`DomainError::Conflict`], making the database the atomic
/// enforcement point for email uniqueness.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool from configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to database: {}", e)))?;

        Ok(Self::new(pool))
    }
}

/// Append the filter as a WHERE clause with bound parameters
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    let mut prefix = " WHERE ";

    if let Some(id) = filter.id {
        builder.push(prefix).push("id = ").push_bind(id.as_i64());
        prefix = " AND ";
    }

    if let Some(email) = &filter.email {
        builder.push(prefix).push("email = ").push_bind(email.clone());
        prefix = " AND ";
    }

    if let Some(status) = filter.status {
        builder.push(prefix).push("status = ").push_bind(status.as_bool());
        prefix = " AND ";
    }

    if let Some(fragment) = &filter.name_contains {
        builder
            .push(prefix)
            .push("name LIKE ")
            .push_bind(format!("%{}%", fragment));
        prefix = " AND ";
    }

    if let Some(before) = filter.created_before {
        builder.push(prefix).push("created_at <= ").push_bind(before);
        prefix = " AND ";
    }

    if let Some(after) = filter.created_after {
        builder.push(prefix).push("created_at >= ").push_bind(after);
    }
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let map_err = |e: sqlx::Error| DomainError::storage(format!("Malformed user row: {}", e));

    Ok(User::from_parts(
        UserId::new(row.try_get("id").map_err(map_err)?),
        row.try_get::<String, _>("name").map_err(map_err)?,
        row.try_get::<String, _>("email").map_err(map_err)?,
        row.try_get::<String, _>("password_hash").map_err(map_err)?,
        row.try_get::<String, _>("cellphone").map_err(map_err)?,
        UserStatus::from_bool(row.try_get("status").map_err(map_err)?),
        row.try_get("created_at").map_err(map_err)?,
        row.try_get("updated_at").map_err(map_err)?,
    ))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, DomainError> {
        let mut builder = QueryBuilder::new(SELECT_COLUMNS);
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY id LIMIT 1");

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find user: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self, filter: &UserFilter) -> Result<Vec<User>, DomainError> {
        let mut builder = QueryBuilder::new(SELECT_COLUMNS);
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY id");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn create(&self, record: NewUserRecord) -> Result<User, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, cellphone, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, now(), now())
            RETURNING id, name, email, password_hash, cellphone, status, created_at, updated_at
            "#,
        )
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(&record.cellphone)
        .bind(record.status.as_bool())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!("Email '{}' already registered", record.email))
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        row_to_user(&row)
    }

    async fn update(
        &self,
        changes: &UserChanges,
        filter: &UserFilter,
    ) -> Result<u64, DomainError> {
        if changes.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::new("UPDATE users SET ");
        let mut separated = builder.separated(", ");

        if let Some(name) = &changes.name {
            separated.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(hash) = &changes.password_hash {
            separated
                .push("password_hash = ")
                .push_bind_unseparated(hash.clone());
        }
        if let Some(cellphone) = &changes.cellphone {
            separated
                .push("cellphone = ")
                .push_bind_unseparated(cellphone.clone());
        }
        if let Some(status) = changes.status {
            separated
                .push("status = ")
                .push_bind_unseparated(status.as_bool());
        }
        separated.push("updated_at = now()");

        push_filter(&mut builder, filter);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to update users: {}", e)))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_push_filter_empty() {
        let mut builder = QueryBuilder::new(SELECT_COLUMNS);
        push_filter(&mut builder, &UserFilter::new());

        assert_eq!(builder.sql(), SELECT_COLUMNS);
    }

    #[test]
    fn test_push_filter_single_condition() {
        let mut builder = QueryBuilder::new(SELECT_COLUMNS);
        push_filter(&mut builder, &UserFilter::new().with_id(UserId::new(7)));

        assert!(builder.sql().ends_with(" WHERE id = $1"));
    }

    #[test]
    fn test_push_filter_combines_conditions_with_and() {
        let after = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let filter = UserFilter::new()
            .with_status(UserStatus::Active)
            .with_name_contains("Ada")
            .with_created_before(before)
            .with_created_after(after);

        let mut builder = QueryBuilder::new(SELECT_COLUMNS);
        push_filter(&mut builder, &filter);

        let sql = builder.sql();
        assert!(sql.contains(" WHERE status = $1"));
        assert!(sql.contains(" AND name LIKE $2"));
        assert!(sql.contains(" AND created_at <= $3"));
        assert!(sql.contains(" AND created_at >= $4"));
    }
}
