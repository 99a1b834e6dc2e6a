//! # Dish Repository
//!
//! Database operations for menu items.
//!
//! ## Daily Special Invariant
//! At most one dish per cook carries `is_daily_special`. The invariant is
//! not a schema constraint; [`DishRepository::save`] enforces it by
//! clearing the previous holder inside the same transaction that writes
//! the new one.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{decode_json, encode_json};
use tavshil_core::{CustomizationOptions, Dish, DishCategory};

/// Row shape for the `dishes` table; JSON columns still encoded.
#[derive(Debug, sqlx::FromRow)]
struct DishRow {
    id: String,
    cook_id: String,
    title: String,
    description: Option<String>,
    price_agorot: i64,
    category: DishCategory,
    photo_url: Option<String>,
    tags: String,
    allergens: String,
    is_available: bool,
    is_daily_special: bool,
    daily_special_note: Option<String>,
    customization_options: String,
    sort_order: i64,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl DishRow {
    fn into_dish(self) -> DbResult<Dish> {
        let tags: Vec<String> = decode_json("Dish", &self.id, &self.tags)?;
        let allergens: Vec<String> = decode_json("Dish", &self.id, &self.allergens)?;
        let customization_options: CustomizationOptions =
            decode_json("Dish", &self.id, &self.customization_options)?;
        Ok(Dish {
            id: self.id,
            cook_id: self.cook_id,
            title: self.title,
            description: self.description,
            price_agorot: self.price_agorot,
            category: self.category,
            photo_url: self.photo_url,
            tags,
            allergens,
            is_available: self.is_available,
            is_daily_special: self.is_daily_special,
            daily_special_note: self.daily_special_note,
            customization_options,
            sort_order: self.sort_order,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_DISH: &str = r#"
    SELECT id, cook_id, title, description, price_agorot, category,
           photo_url, tags, allergens, is_available, is_daily_special,
           daily_special_note, customization_options, sort_order,
           created_at, updated_at
    FROM dishes
"#;

/// Repository for dish database operations.
#[derive(Debug, Clone)]
pub struct DishRepository {
    pool: SqlitePool,
}

impl DishRepository {
    /// Creates a new DishRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DishRepository { pool }
    }

    /// Gets a dish by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Dish>> {
        let row: Option<DishRow> = sqlx::query_as(&format!("{SELECT_DISH} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(DishRow::into_dish).transpose()
    }

    /// Lists a cook's full menu in manual order.
    pub async fn list_by_cook(&self, cook_id: &str) -> DbResult<Vec<Dish>> {
        let rows: Vec<DishRow> = sqlx::query_as(&format!(
            "{SELECT_DISH} WHERE cook_id = ?1 ORDER BY sort_order, created_at"
        ))
        .bind(cook_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(DishRow::into_dish).collect()
    }

    /// The cook's current daily special, if one is flagged and available.
    pub async fn daily_special(&self, cook_id: &str) -> DbResult<Option<Dish>> {
        let row: Option<DishRow> = sqlx::query_as(&format!(
            "{SELECT_DISH} WHERE cook_id = ?1 AND is_daily_special = 1 AND is_available = 1"
        ))
        .bind(cook_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(DishRow::into_dish).transpose()
    }

    /// Upserts a dish, enforcing the daily-special invariant.
    ///
    /// When the incoming dish is flagged as the special, every other dish
    /// of the same cook loses the flag (and its note) in the same
    /// transaction — the handover is atomic.
    pub async fn save(&self, dish: &Dish) -> DbResult<()> {
        debug!(id = %dish.id, cook_id = %dish.cook_id, title = %dish.title, "Saving dish");

        let tags = encode_json("Dish", &dish.id, &dish.tags)?;
        let allergens = encode_json("Dish", &dish.id, &dish.allergens)?;
        let customization_options =
            encode_json("Dish", &dish.id, &dish.customization_options)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        if dish.is_daily_special {
            sqlx::query(
                r#"
                UPDATE dishes SET is_daily_special = 0, daily_special_note = NULL
                WHERE cook_id = ?1 AND is_daily_special = 1 AND id != ?2
                "#,
            )
            .bind(&dish.cook_id)
            .bind(&dish.id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO dishes (
                id, cook_id, title, description, price_agorot, category,
                photo_url, tags, allergens, is_available, is_daily_special,
                daily_special_note, customization_options, sort_order,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                      ?13, ?14, ?15, ?16)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                price_agorot = excluded.price_agorot,
                category = excluded.category,
                photo_url = excluded.photo_url,
                tags = excluded.tags,
                allergens = excluded.allergens,
                is_available = excluded.is_available,
                is_daily_special = excluded.is_daily_special,
                daily_special_note = excluded.daily_special_note,
                customization_options = excluded.customization_options,
                sort_order = excluded.sort_order,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&dish.id)
        .bind(&dish.cook_id)
        .bind(&dish.title)
        .bind(&dish.description)
        .bind(dish.price_agorot)
        .bind(dish.category)
        .bind(&dish.photo_url)
        .bind(tags)
        .bind(allergens)
        .bind(dish.is_available)
        .bind(dish.is_daily_special)
        .bind(&dish.daily_special_note)
        .bind(customization_options)
        .bind(dish.sort_order)
        .bind(dish.created_at)
        .bind(dish.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Pauses or resumes a dish without touching anything else.
    pub async fn set_available(&self, id: &str, is_available: bool) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE dishes SET is_available = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(is_available)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Dish", id));
        }

        Ok(())
    }

    /// Removes a dish from the menu permanently.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting dish");

        let result = sqlx::query("DELETE FROM dishes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Dish", id));
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
    use tavshil_core::{ApprovalStatus, Cook, Topping, WeeklySchedule};

    async fn test_db_with_cook() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        db.cooks()
            .insert(&Cook {
                id: "cook-1".to_string(),
                user_email: "rachel@example.com".to_string(),
                display_name: "Savta Rachel".to_string(),
                bio: None,
                phone: None,
                address: None,
                city: None,
                profile_image: None,
                cover_image: None,
                approval_status: ApprovalStatus::Approved,
                rejection_reason: None,
                approval_date: None,
                is_active: true,
                is_open: true,
                min_order_agorot: 0,
                estimated_prep_minutes: 30,
                total_orders: 0,
                tags: vec![],
                open_hours: WeeklySchedule::default(),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        db
    }

    fn dish(id: &str, title: &str) -> Dish {
        let now = Utc::now();
        Dish {
            id: id.to_string(),
            cook_id: "cook-1".to_string(),
            title: title.to_string(),
            description: None,
            price_agorot: 4500,
            category: DishCategory::Main,
            photo_url: None,
            tags: vec![],
            allergens: vec!["sesame".to_string()],
            is_available: true,
            is_daily_special: false,
            daily_special_note: None,
            customization_options: CustomizationOptions {
                removable_items: vec!["onion".to_string()],
                extra_toppings: vec![Topping {
                    name: "tahini".to_string(),
                    price_agorot: 300,
                }],
            },
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let db = test_db_with_cook().await;

        db.dishes().save(&dish("d-1", "Kubbeh soup")).await.unwrap();

        let loaded = db.dishes().get_by_id("d-1").await.unwrap().unwrap();
        assert_eq!(loaded.title, "Kubbeh soup");
        assert_eq!(loaded.customization_options.extra_toppings.len(), 1);
        assert_eq!(loaded.allergens, vec!["sesame".to_string()]);
    }

    #[tokio::test]
    async fn test_save_updates_existing() {
        let db = test_db_with_cook().await;
        let mut d = dish("d-1", "Kubbeh soup");
        db.dishes().save(&d).await.unwrap();

        d.price_agorot = 5200;
        d.updated_at = Utc::now();
        db.dishes().save(&d).await.unwrap();

        let loaded = db.dishes().get_by_id("d-1").await.unwrap().unwrap();
        assert_eq!(loaded.price_agorot, 5200);
        assert_eq!(db.dishes().list_by_cook("cook-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_daily_special_handover_clears_previous() {
        let db = test_db_with_cook().await;

        let mut a = dish("d-a", "Shakshuka");
        a.is_daily_special = true;
        a.daily_special_note = Some("Friday only".to_string());
        db.dishes().save(&a).await.unwrap();

        let mut b = dish("d-b", "Sabich");
        b.is_daily_special = true;
        db.dishes().save(&b).await.unwrap();

        let a = db.dishes().get_by_id("d-a").await.unwrap().unwrap();
        let b = db.dishes().get_by_id("d-b").await.unwrap().unwrap();
        assert!(!a.is_daily_special);
        assert!(a.daily_special_note.is_none());
        assert!(b.is_daily_special);

        let special = db.dishes().daily_special("cook-1").await.unwrap().unwrap();
        assert_eq!(special.id, "d-b");
    }

    #[tokio::test]
    async fn test_daily_special_hidden_when_unavailable() {
        let db = test_db_with_cook().await;
        let mut a = dish("d-a", "Shakshuka");
        a.is_daily_special = true;
        db.dishes().save(&a).await.unwrap();

        db.dishes().set_available("d-a", false).await.unwrap();

        assert!(db.dishes().daily_special("cook-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db_with_cook().await;
        db.dishes().save(&dish("d-1", "Kubbeh soup")).await.unwrap();

        db.dishes().delete("d-1").await.unwrap();
        assert!(db.dishes().get_by_id("d-1").await.unwrap().is_none());
        assert!(db.dishes().delete("d-1").await.is_err());
    }
}
