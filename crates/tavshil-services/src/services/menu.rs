//! # Menu Service
//!
//! Dish management for cook storefronts, including the daily-special
//! handover: flagging a dish as the special clears the previous holder in
//! the same operation.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use tavshil_core::{
    validation, CoreError, CustomizationOptions, Dish, DishCategory,
};
use tavshil_db::Database;

/// Create/edit payload for a dish.
///
/// `id` absent means create; present means edit (ownership checked).
#[derive(Debug, Clone)]
pub struct DishForm {
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub price_agorot: i64,
    pub category: DishCategory,
    pub photo_url: Option<String>,
    pub tags: Vec<String>,
    pub allergens: Vec<String>,
    pub is_available: bool,
    pub is_daily_special: bool,
    pub daily_special_note: Option<String>,
    pub customization_options: CustomizationOptions,
    pub sort_order: i64,
}

/// Menu management service.
#[derive(Debug, Clone)]
pub struct MenuService {
    db: Database,
}

impl MenuService {
    /// Creates a new MenuService.
    pub fn new(db: Database) -> Self {
        MenuService { db }
    }

    /// A cook's full menu in manual order.
    pub async fn menu(&self, cook_id: &str) -> ServiceResult<Vec<Dish>> {
        Ok(self.db.dishes().list_by_cook(cook_id).await?)
    }

    /// The cook's featured dish, if one is flagged and available.
    pub async fn daily_special(&self, cook_id: &str) -> ServiceResult<Option<Dish>> {
        Ok(self.db.dishes().daily_special(cook_id).await?)
    }

    /// Creates or updates a dish for a cook.
    ///
    /// When the form flags the dish as the daily special, the previous
    /// holder (if any) loses the flag and its note atomically with this
    /// save.
    pub async fn save_dish(&self, cook_id: &str, form: DishForm) -> ServiceResult<Dish> {
        validation::validate_title("title", &form.title).map_err(CoreError::from)?;
        validation::validate_price_agorot("price", form.price_agorot).map_err(CoreError::from)?;
        for topping in &form.customization_options.extra_toppings {
            validation::validate_title("topping name", &topping.name).map_err(CoreError::from)?;
            validation::validate_price_agorot("topping price", topping.price_agorot)
                .map_err(CoreError::from)?;
        }

        let now = Utc::now();
        let dish = match &form.id {
            Some(id) => {
                let existing = self
                    .db
                    .dishes()
                    .get_by_id(id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Dish", id))?;
                if existing.cook_id != cook_id {
                    return Err(ServiceError::not_found("Dish", id));
                }

                Dish {
                    id: existing.id,
                    cook_id: existing.cook_id,
                    created_at: existing.created_at,
                    updated_at: now,
                    title: form.title,
                    description: form.description,
                    price_agorot: form.price_agorot,
                    category: form.category,
                    photo_url: form.photo_url,
                    tags: form.tags,
                    allergens: form.allergens,
                    is_available: form.is_available,
                    is_daily_special: form.is_daily_special,
                    daily_special_note: form.daily_special_note,
                    customization_options: form.customization_options,
                    sort_order: form.sort_order,
                }
            }
            None => Dish {
                id: Uuid::new_v4().to_string(),
                cook_id: cook_id.to_string(),
                created_at: now,
                updated_at: now,
                title: form.title,
                description: form.description,
                price_agorot: form.price_agorot,
                category: form.category,
                photo_url: form.photo_url,
                tags: form.tags,
                allergens: form.allergens,
                is_available: form.is_available,
                is_daily_special: form.is_daily_special,
                daily_special_note: form.daily_special_note,
                customization_options: form.customization_options,
                sort_order: form.sort_order,
            },
        };

        self.db.dishes().save(&dish).await?;

        info!(cook_id = %cook_id, dish = %dish.title, special = dish.is_daily_special, "Dish saved");
        Ok(dish)
    }

    /// Pauses or resumes a dish.
    pub async fn set_available(
        &self,
        cook_id: &str,
        dish_id: &str,
        is_available: bool,
    ) -> ServiceResult<()> {
        self.owned_dish(cook_id, dish_id).await?;
        self.db.dishes().set_available(dish_id, is_available).await?;
        Ok(())
    }

    /// Deletes a dish from the menu.
    pub async fn delete_dish(&self, cook_id: &str, dish_id: &str) -> ServiceResult<()> {
        self.owned_dish(cook_id, dish_id).await?;
        self.db.dishes().delete(dish_id).await?;
        info!(cook_id = %cook_id, dish_id = %dish_id, "Dish deleted");
        Ok(())
    }

    async fn owned_dish(&self, cook_id: &str, dish_id: &str) -> ServiceResult<Dish> {
        let dish = self
            .db
            .dishes()
            .get_by_id(dish_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Dish", dish_id))?;
        if dish.cook_id != cook_id {
            return Err(ServiceError::not_found("Dish", dish_id));
        }
        Ok(dish)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
