//! # Services
//!
//! One service per workflow. Each holds a cheap `Database` clone and any
//! configuration it prices with, and translates every failure into
//! [`crate::ServiceError`].

pub mod cart;
pub mod checkout;
pub mod cooks;
pub mod menu;
pub mod orders;
pub mod reports;
pub mod support;

/// Shared fixtures for service tests.
#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use tavshil_core::{
        ApprovalStatus, Cook, CustomizationOptions, Dish, DishCategory, Topping, WeeklySchedule,
    };
    use tavshil_db::{Database, DbConfig};

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// An approved, open storefront with the given minimum order.
    pub fn approved_cook(id: &str, min_order_agorot: i64) -> Cook {
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
            approval_status: ApprovalStatus::Approved,
            rejection_reason: None,
            approval_date: Some(now),
            is_active: true,
            is_open: true,
            min_order_agorot,
            estimated_prep_minutes: 30,
            total_orders: 0,
            tags: vec![],
            open_hours: WeeklySchedule::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// An available main dish with one removable item and one topping.
    pub fn dish(id: &str, cook_id: &str, price_agorot: i64) -> Dish {
        let now = Utc::now();
        Dish {
            id: id.to_string(),
            cook_id: cook_id.to_string(),
            title: format!("Dish {id}"),
            description: None,
            price_agorot,
            category: DishCategory::Main,
            photo_url: None,
            tags: vec![],
            allergens: vec![],
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
}
