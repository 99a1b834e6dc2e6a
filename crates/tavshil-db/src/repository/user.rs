//! # User Repository
//!
//! Database operations for user profiles.
//!
//! Authentication lives with the external auth collaborator; these rows
//! carry the marketplace-side profile (role, activation) keyed by email.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use tavshil_core::{User, UserRole};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    full_name: String,
    phone: Option<String>,
    role: UserRole,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            phone: row.phone,
            role: row.role,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_USER: &str = r#"
    SELECT id, email, full_name, phone, role, is_active, created_at, updated_at
    FROM users
"#;

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user profile.
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(id = %user.id, email = %user.email, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, email, full_name, phone, role, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.phone)
        .bind(user.role)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a user by email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE email = ?1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(User::from))
    }

    /// Lists users, newest first (admin view).
    pub async fn list(&self, limit: u32) -> DbResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "{SELECT_USER} ORDER BY created_at DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Changes a user's role, e.g. promotion to cook on approval.
    pub async fn set_role(&self, email: &str, role: UserRole) -> DbResult<()> {
        debug!(email = %email, ?role, "Setting user role");
        let now = Utc::now();

        let result = sqlx::query("UPDATE users SET role = ?2, updated_at = ?3 WHERE email = ?1")
            .bind(email)
            .bind(role)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", email));
        }

        Ok(())
    }

    /// Activates or deactivates an account.
    pub async fn set_active(&self, email: &str, is_active: bool) -> DbResult<()> {
        let now = Utc::now();

        let result =
            sqlx::query("UPDATE users SET is_active = ?2, updated_at = ?3 WHERE email = ?1")
                .bind(email)
                .bind(is_active)
                .bind(now)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", email));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn user(email: &str) -> User {
        let now = Utc::now();
        User {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            full_name: "Dana Levi".to_string(),
            phone: Some("050-0000000".to_string()),
            role: UserRole::Customer,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_get_and_promote() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users().insert(&user("dana@example.com")).await.unwrap();

        let loaded = db
            .users()
            .get_by_email("dana@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.role, UserRole::Customer);

        db.users()
            .set_role("dana@example.com", UserRole::Cook)
            .await
            .unwrap();

        let promoted = db
            .users()
            .get_by_email("dana@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(promoted.role, UserRole::Cook);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users().insert(&user("dana@example.com")).await.unwrap();

        let err = db.users().insert(&user("dana@example.com")).await;
        assert!(matches!(err, Err(DbError::UniqueViolation { .. })));
    }

    #[tokio::test]
    async fn test_deactivate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users().insert(&user("dana@example.com")).await.unwrap();

        db.users()
            .set_active("dana@example.com", false)
            .await
            .unwrap();

        let loaded = db
            .users()
            .get_by_email("dana@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(!loaded.is_active);
    }
}
