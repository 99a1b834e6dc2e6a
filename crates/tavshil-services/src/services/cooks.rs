//! # Cook Service
//!
//! Storefront settings, the derived open flag, and admin moderation.
//!
//! ## Settings Save and is_open
//! Saving settings re-evaluates the weekly schedule against the local
//! clock and writes the result to `is_open` — that is the ONLY automatic
//! evaluation; no scheduler re-checks between saves, so the flag can go
//! stale until the next save or manual toggle. Accepted by design.

use chrono::{NaiveDateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use tavshil_core::{
    validation, ApprovalStatus, Cook, CoreError, User, UserRole, WeeklySchedule,
};
use tavshil_db::{Database, DbError};

/// The settings page payload.
#[derive(Debug, Clone)]
pub struct CookSettings {
    pub display_name: String,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub profile_image: Option<String>,
    pub cover_image: Option<String>,
    pub min_order_agorot: i64,
    pub estimated_prep_minutes: i64,
    pub tags: Vec<String>,
    pub open_hours: WeeklySchedule,
}

/// Cook profile and moderation service.
#[derive(Debug, Clone)]
pub struct CookService {
    db: Database,
}

impl CookService {
    /// Creates a new CookService.
    pub fn new(db: Database) -> Self {
        CookService { db }
    }

    /// Gets a storefront by id.
    pub async fn get(&self, cook_id: &str) -> ServiceResult<Cook> {
        self.db
            .cooks()
            .get_by_id(cook_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cook", cook_id))
    }

    /// The storefront belonging to a user account, if any.
    pub async fn for_user(&self, user_email: &str) -> ServiceResult<Option<Cook>> {
        Ok(self.db.cooks().get_by_user_email(user_email).await?)
    }

    /// Approved, active storefronts for browsing.
    pub async fn browse(&self, limit: u32) -> ServiceResult<Vec<Cook>> {
        Ok(self.db.cooks().list_approved(limit).await?)
    }

    /// Submits a new seller application (pending, inactive, closed).
    pub async fn apply(
        &self,
        user_email: &str,
        display_name: &str,
        city: Option<String>,
        bio: Option<String>,
        phone: Option<String>,
    ) -> ServiceResult<Cook> {
        validation::validate_email(user_email).map_err(CoreError::from)?;
        validation::validate_title("display_name", display_name).map_err(CoreError::from)?;

        if self.db.cooks().get_by_user_email(user_email).await?.is_some() {
            return Err(ServiceError::validation(
                "This account already has a storefront application",
            ));
        }

        let now = Utc::now();
        let cook = Cook {
            id: Uuid::new_v4().to_string(),
            user_email: user_email.to_string(),
            display_name: display_name.to_string(),
            bio,
            phone,
            address: None,
            city,
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
            tags: Vec::new(),
            open_hours: WeeklySchedule::default(),
            created_at: now,
            updated_at: now,
        };
        self.db.cooks().insert(&cook).await?;

        info!(cook = %cook.display_name, "Seller application submitted");
        Ok(cook)
    }

    /// Saves the settings page, deriving `is_open` from the schedule at
    /// the given local time.
    pub async fn save_settings(
        &self,
        cook_id: &str,
        settings: CookSettings,
        local_now: NaiveDateTime,
    ) -> ServiceResult<Cook> {
        validation::validate_title("display_name", &settings.display_name)
            .map_err(CoreError::from)?;
        validation::validate_price_agorot("min_order_amount", settings.min_order_agorot)
            .map_err(CoreError::from)?;
        validation::validate_prep_minutes(settings.estimated_prep_minutes)
            .map_err(CoreError::from)?;
        for day in [
            &settings.open_hours.sunday,
            &settings.open_hours.monday,
            &settings.open_hours.tuesday,
            &settings.open_hours.wednesday,
            &settings.open_hours.thursday,
            &settings.open_hours.friday,
            &settings.open_hours.saturday,
        ]
        .into_iter()
        .flatten()
        {
            if let Some(open) = &day.open {
                validation::validate_time_hhmm("open", open).map_err(CoreError::from)?;
            }
            if let Some(close) = &day.close {
                validation::validate_time_hhmm("close", close).map_err(CoreError::from)?;
            }
        }

        let mut cook = self.get(cook_id).await?;

        cook.display_name = settings.display_name;
        cook.bio = settings.bio;
        cook.phone = settings.phone;
        cook.address = settings.address;
        cook.city = settings.city;
        cook.profile_image = settings.profile_image;
        cook.cover_image = settings.cover_image;
        cook.min_order_agorot = settings.min_order_agorot;
        cook.estimated_prep_minutes = settings.estimated_prep_minutes;
        cook.tags = settings.tags;
        cook.open_hours = settings.open_hours;
        cook.is_open = cook.open_hours.is_open_at(local_now);
        cook.updated_at = Utc::now();

        self.db.cooks().update_settings(&cook).await?;

        info!(cook = %cook.display_name, is_open = cook.is_open, "Settings saved");
        Ok(cook)
    }

    /// Manual open/close toggle, independent of the schedule.
    pub async fn set_open(&self, cook_id: &str, is_open: bool) -> ServiceResult<()> {
        self.db.cooks().set_open(cook_id, is_open).await?;
        Ok(())
    }

    // =========================================================================
    // Moderation (admin)
    // =========================================================================

    /// Applications awaiting review.
    pub async fn pending(&self) -> ServiceResult<Vec<Cook>> {
        Ok(self.db.cooks().list_pending().await?)
    }

    /// Approves an application: the storefront goes live and open, and
    /// the owning user account is promoted to the cook role.
    ///
    /// A missing user profile is tolerated — the promotion is skipped,
    /// matching the platform's best-effort posture on secondary writes.
    pub async fn approve(&self, cook_id: &str) -> ServiceResult<Cook> {
        let cook = self.get(cook_id).await?;

        self.db.cooks().approve(cook_id, Utc::now()).await?;

        match self
            .db
            .users()
            .set_role(&cook.user_email, UserRole::Cook)
            .await
        {
            Ok(()) => {}
            Err(DbError::NotFound { .. }) => {
                tracing::warn!(email = %cook.user_email, "No user profile to promote");
            }
            Err(e) => return Err(e.into()),
        }

        info!(cook = %cook.display_name, "Cook approved");
        self.get(cook_id).await
    }

    /// Rejects an application with a reason shown to the applicant.
    pub async fn reject(&self, cook_id: &str, reason: &str) -> ServiceResult<Cook> {
        validation::validate_title("reason", reason).map_err(CoreError::from)?;

        self.db.cooks().reject(cook_id, reason, Utc::now()).await?;

        info!(cook_id = %cook_id, "Cook rejected");
        self.get(cook_id).await
    }

    /// Admin user management: activate/deactivate an account.
    pub async fn set_user_active(&self, email: &str, is_active: bool) -> ServiceResult<()> {
        self.db.users().set_active(email, is_active).await?;
        Ok(())
    }

    /// Users listing for the admin console.
    pub async fn users(&self, limit: u32) -> ServiceResult<Vec<User>> {
        Ok(self.db.users().list(limit).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
