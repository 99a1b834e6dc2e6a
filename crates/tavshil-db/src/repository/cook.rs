//! # Cook Repository
//!
//! Database operations for cook storefronts.
//!
//! ## Moderation Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Cook Moderation Lifecycle                           │
//! │                                                                         │
//! │  1. APPLY                                                              │
//! │     └── insert() → Cook { approval_status: Pending, inactive }         │
//! │                                                                         │
//! │  2. REVIEW (admin)                                                     │
//! │     ├── approve() → Approved, active, open, approval_date stamped      │
//! │     └── reject()  → Rejected, inactive, reason recorded                │
//! │                                                                         │
//! │  3. OPERATE                                                            │
//! │     ├── update_settings() → profile + hours + derived is_open          │
//! │     ├── set_open()        → manual open/close toggle                   │
//! │     └── total_orders increments inside each checkout transaction       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{decode_json, encode_json};
use tavshil_core::{ApprovalStatus, Cook, WeeklySchedule};

/// Row shape for the `cooks` table; JSON columns still encoded.
#[derive(Debug, sqlx::FromRow)]
struct CookRow {
    id: String,
    user_email: String,
    display_name: String,
    bio: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    city: Option<String>,
    profile_image: Option<String>,
    cover_image: Option<String>,
    approval_status: ApprovalStatus,
    rejection_reason: Option<String>,
    approval_date: Option<DateTime<Utc>>,
    is_active: bool,
    is_open: bool,
    min_order_agorot: i64,
    estimated_prep_minutes: i64,
    total_orders: i64,
    tags: String,
    open_hours: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CookRow {
    fn into_cook(self) -> DbResult<Cook> {
        let tags: Vec<String> = decode_json("Cook", &self.id, &self.tags)?;
        let open_hours: WeeklySchedule = decode_json("Cook", &self.id, &self.open_hours)?;
        Ok(Cook {
            id: self.id,
            user_email: self.user_email,
            display_name: self.display_name,
            bio: self.bio,
            phone: self.phone,
            address: self.address,
            city: self.city,
            profile_image: self.profile_image,
            cover_image: self.cover_image,
            approval_status: self.approval_status,
            rejection_reason: self.rejection_reason,
            approval_date: self.approval_date,
            is_active: self.is_active,
            is_open: self.is_open,
            min_order_agorot: self.min_order_agorot,
            estimated_prep_minutes: self.estimated_prep_minutes,
            total_orders: self.total_orders,
            tags,
            open_hours,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COOK: &str = r#"
    SELECT id, user_email, display_name, bio, phone, address, city,
           profile_image, cover_image, approval_status, rejection_reason,
           approval_date, is_active, is_open, min_order_agorot,
           estimated_prep_minutes, total_orders, tags, open_hours,
           created_at, updated_at
    FROM cooks
"#;

/// Repository for cook database operations.
#[derive(Debug, Clone)]
pub struct CookRepository {
    pool: SqlitePool,
}

impl CookRepository {
    /// Creates a new CookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CookRepository { pool }
    }

    /// Inserts a new cook application.
    pub async fn insert(&self, cook: &Cook) -> DbResult<()> {
        debug!(id = %cook.id, display_name = %cook.display_name, "Inserting cook");

        let tags = encode_json("Cook", &cook.id, &cook.tags)?;
        let open_hours = encode_json("Cook", &cook.id, &cook.open_hours)?;

        sqlx::query(
            r#"
            INSERT INTO cooks (
                id, user_email, display_name, bio, phone, address, city,
                profile_image, cover_image, approval_status, rejection_reason,
                approval_date, is_active, is_open, min_order_agorot,
                estimated_prep_minutes, total_orders, tags, open_hours,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                      ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)
            "#,
        )
        .bind(&cook.id)
        .bind(&cook.user_email)
        .bind(&cook.display_name)
        .bind(&cook.bio)
        .bind(&cook.phone)
        .bind(&cook.address)
        .bind(&cook.city)
        .bind(&cook.profile_image)
        .bind(&cook.cover_image)
        .bind(cook.approval_status)
        .bind(&cook.rejection_reason)
        .bind(cook.approval_date)
        .bind(cook.is_active)
        .bind(cook.is_open)
        .bind(cook.min_order_agorot)
        .bind(cook.estimated_prep_minutes)
        .bind(cook.total_orders)
        .bind(tags)
        .bind(open_hours)
        .bind(cook.created_at)
        .bind(cook.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a cook by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Cook>> {
        let row: Option<CookRow> =
            sqlx::query_as(&format!("{SELECT_COOK} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(CookRow::into_cook).transpose()
    }

    /// Gets the cook owned by a user account.
    pub async fn get_by_user_email(&self, email: &str) -> DbResult<Option<Cook>> {
        let row: Option<CookRow> =
            sqlx::query_as(&format!("{SELECT_COOK} WHERE user_email = ?1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        row.map(CookRow::into_cook).transpose()
    }

    /// Lists approved, active storefronts for browsing.
    pub async fn list_approved(&self, limit: u32) -> DbResult<Vec<Cook>> {
        let rows: Vec<CookRow> = sqlx::query_as(&format!(
            "{SELECT_COOK} WHERE approval_status = 'approved' AND is_active = 1
             ORDER BY total_orders DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CookRow::into_cook).collect()
    }

    /// Lists applications awaiting review, newest first.
    pub async fn list_pending(&self) -> DbResult<Vec<Cook>> {
        let rows: Vec<CookRow> = sqlx::query_as(&format!(
            "{SELECT_COOK} WHERE approval_status = 'pending' ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CookRow::into_cook).collect()
    }

    /// Lists every cook regardless of state (admin view).
    pub async fn list_all(&self, limit: u32) -> DbResult<Vec<Cook>> {
        let rows: Vec<CookRow> = sqlx::query_as(&format!(
            "{SELECT_COOK} ORDER BY created_at DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CookRow::into_cook).collect()
    }

    /// Writes the profile/settings columns of a cook, including the
    /// schedule and the `is_open` flag the caller derived from it.
    pub async fn update_settings(&self, cook: &Cook) -> DbResult<()> {
        debug!(id = %cook.id, "Updating cook settings");

        let tags = encode_json("Cook", &cook.id, &cook.tags)?;
        let open_hours = encode_json("Cook", &cook.id, &cook.open_hours)?;

        let result = sqlx::query(
            r#"
            UPDATE cooks SET
                display_name = ?2,
                bio = ?3,
                phone = ?4,
                address = ?5,
                city = ?6,
                profile_image = ?7,
                cover_image = ?8,
                min_order_agorot = ?9,
                estimated_prep_minutes = ?10,
                tags = ?11,
                open_hours = ?12,
                is_open = ?13,
                updated_at = ?14
            WHERE id = ?1
            "#,
        )
        .bind(&cook.id)
        .bind(&cook.display_name)
        .bind(&cook.bio)
        .bind(&cook.phone)
        .bind(&cook.address)
        .bind(&cook.city)
        .bind(&cook.profile_image)
        .bind(&cook.cover_image)
        .bind(cook.min_order_agorot)
        .bind(cook.estimated_prep_minutes)
        .bind(tags)
        .bind(open_hours)
        .bind(cook.is_open)
        .bind(cook.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cook", &cook.id));
        }

        Ok(())
    }

    /// Manual open/close toggle.
    pub async fn set_open(&self, id: &str, is_open: bool) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query("UPDATE cooks SET is_open = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(is_open)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cook", id));
        }

        Ok(())
    }

    /// Approves a pending application: storefront goes live and opens.
    ///
    /// Guarded on `pending` so a double review doesn't overwrite the
    /// first decision.
    pub async fn approve(&self, id: &str, at: DateTime<Utc>) -> DbResult<()> {
        debug!(id = %id, "Approving cook");

        let result = sqlx::query(
            r#"
            UPDATE cooks SET
                approval_status = 'approved',
                approval_date = ?2,
                rejection_reason = NULL,
                is_active = 1,
                is_open = 1,
                updated_at = ?2
            WHERE id = ?1 AND approval_status = 'pending'
            "#,
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cook (pending)", id));
        }

        Ok(())
    }

    /// Rejects a pending application with a recorded reason.
    pub async fn reject(&self, id: &str, reason: &str, at: DateTime<Utc>) -> DbResult<()> {
        debug!(id = %id, "Rejecting cook");

        let result = sqlx::query(
            r#"
            UPDATE cooks SET
                approval_status = 'rejected',
                approval_date = ?2,
                rejection_reason = ?3,
                is_active = 0,
                updated_at = ?2
            WHERE id = ?1 AND approval_status = 'pending'
            "#,
        )
        .bind(id)
        .bind(at)
        .bind(reason)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cook (pending)", id));
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
    use tavshil_core::hours::DayHours;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn pending_cook(id: &str) -> Cook {
        let now = Utc::now();
        Cook {
            id: id.to_string(),
            user_email: format!("{id}@example.com"),
            display_name: format!("Cook {id}"),
            bio: None,
            phone: None,
            address: None,
            city: Some("Haifa".to_string()),
            profile_image: None,
            cover_image: None,
            approval_status: ApprovalStatus::Pending,
            rejection_reason: None,
            approval_date: None,
            is_active: false,
            is_open: false,
            min_order_agorot: 0,
            estimated_prep_minutes: 30,
            total_orders: 0,
            tags: vec!["kosher".to_string()],
            open_hours: WeeklySchedule::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_roundtrip() {
        let db = test_db().await;
        let cook = pending_cook("c-1");

        db.cooks().insert(&cook).await.unwrap();

        let loaded = db.cooks().get_by_id("c-1").await.unwrap().unwrap();
        assert_eq!(loaded.display_name, "Cook c-1");
        assert_eq!(loaded.approval_status, ApprovalStatus::Pending);
        assert_eq!(loaded.tags, vec!["kosher".to_string()]);
    }

    #[tokio::test]
    async fn test_approve_activates_and_opens() {
        let db = test_db().await;
        db.cooks().insert(&pending_cook("c-1")).await.unwrap();

        db.cooks().approve("c-1", Utc::now()).await.unwrap();

        let cook = db.cooks().get_by_id("c-1").await.unwrap().unwrap();
        assert_eq!(cook.approval_status, ApprovalStatus::Approved);
        assert!(cook.is_active);
        assert!(cook.is_open);
        assert!(cook.approval_date.is_some());

        // second review attempt finds no pending row
        assert!(db.cooks().approve("c-1", Utc::now()).await.is_err());
    }

    #[tokio::test]
    async fn test_reject_records_reason() {
        let db = test_db().await;
        db.cooks().insert(&pending_cook("c-1")).await.unwrap();

        db.cooks()
            .reject("c-1", "kitchen photos missing", Utc::now())
            .await
            .unwrap();

        let cook = db.cooks().get_by_id("c-1").await.unwrap().unwrap();
        assert_eq!(cook.approval_status, ApprovalStatus::Rejected);
        assert_eq!(
            cook.rejection_reason.as_deref(),
            Some("kitchen photos missing")
        );
        assert!(!cook.is_active);
    }

    #[tokio::test]
    async fn test_update_settings_persists_schedule() {
        let db = test_db().await;
        let mut cook = pending_cook("c-1");
        db.cooks().insert(&cook).await.unwrap();

        cook.min_order_agorot = 5000;
        cook.open_hours.sunday = Some(DayHours {
            is_open: true,
            open: Some("09:00".to_string()),
            close: Some("21:00".to_string()),
        });
        cook.is_open = true;
        cook.updated_at = Utc::now();
        db.cooks().update_settings(&cook).await.unwrap();

        let loaded = db.cooks().get_by_id("c-1").await.unwrap().unwrap();
        assert_eq!(loaded.min_order_agorot, 5000);
        assert!(loaded.open_hours.sunday.as_ref().unwrap().is_open);
        assert!(loaded.is_open);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = test_db().await;
        assert!(db.cooks().get_by_id("nope").await.unwrap().is_none());
    }
}
