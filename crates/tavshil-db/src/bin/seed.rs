//! # Seed Data Generator
//!
//! Populates the database with approved cooks and menus for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p tavshil-db --bin seed
//! cargo run -p tavshil-db --bin seed -- --db ./data/tavshil.db
//! ```

use chrono::Utc;
use std::env;
use tracing::{info, warn};
use uuid::Uuid;

use tavshil_core::hours::{DayHours, WeeklySchedule};
use tavshil_core::{
    ApprovalStatus, Cook, CustomizationOptions, Dish, DishCategory, Topping,
};
use tavshil_db::{Database, DbConfig};

/// Storefronts to seed: (display name, city, minimum order in shekels, tags).
const COOKS: &[(&str, &str, i64, &[&str])] = &[
    ("Savta Rachel", "Haifa", 50, &["kosher", "homestyle"]),
    ("Mama Fatima", "Jaffa", 0, &["vegetarian", "moroccan"]),
    ("Beit Tzipora", "Jerusalem", 80, &["kosher", "iraqi"]),
    ("HaMitbach shel Noa", "Tel Aviv", 40, &["vegan", "gluten-free"]),
];

/// Menu per storefront: (title, category, price in shekels).
const MENU: &[(&str, DishCategory, i64)] = &[
    ("Shakshuka", DishCategory::Main, 45),
    ("Kubbeh soup", DishCategory::Main, 52),
    ("Majadra", DishCategory::Main, 38),
    ("Stuffed peppers", DishCategory::Main, 48),
    ("Hummus plate", DishCategory::Appetizer, 24),
    ("Matbucha", DishCategory::Appetizer, 18),
    ("Rice with almonds", DishCategory::Side, 16),
    ("Roasted vegetables", DishCategory::Side, 20),
    ("Malabi", DishCategory::Dessert, 18),
    ("Basbousa", DishCategory::Dessert, 22),
    ("Fresh lemonade", DishCategory::Drink, 12),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./tavshil_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tavshil Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./tavshil_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(db = %db_path, "Seeding development data");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing = db.cooks().list_all(1).await?;
    if !existing.is_empty() {
        warn!("Database already has cooks; skipping seed to avoid duplicates");
        return Ok(());
    }

    let mut dish_count = 0usize;
    for (index, (name, city, min_order_shekels, tags)) in COOKS.iter().enumerate() {
        let cook = seed_cook(name, city, *min_order_shekels, tags);
        db.cooks().insert(&cook).await?;

        // Stagger the menus so storefronts don't all look alike
        for (offset, (title, category, price_shekels)) in
            MENU.iter().cycle().skip(index * 3).take(7).enumerate()
        {
            let dish = seed_dish(&cook.id, title, *category, *price_shekels, offset as i64);
            db.dishes().save(&dish).await?;
            dish_count += 1;
        }

        info!(cook = %cook.display_name, "Seeded storefront");
    }

    info!(cooks = COOKS.len(), dishes = dish_count, "Seed complete");
    Ok(())
}

/// Builds an approved, open storefront with weekday hours 09:00-21:00.
fn seed_cook(name: &str, city: &str, min_order_shekels: i64, tags: &[&str]) -> Cook {
    let now = Utc::now();

    let weekday = DayHours {
        is_open: true,
        open: Some("09:00".to_string()),
        close: Some("21:00".to_string()),
    };
    let open_hours = WeeklySchedule {
        sunday: Some(weekday.clone()),
        monday: Some(weekday.clone()),
        tuesday: Some(weekday.clone()),
        wednesday: Some(weekday.clone()),
        thursday: Some(weekday),
        friday: Some(DayHours {
            is_open: true,
            open: Some("08:00".to_string()),
            close: Some("14:00".to_string()),
        }),
        saturday: None,
    };

    Cook {
        id: Uuid::new_v4().to_string(),
        user_email: format!(
            "{}@seed.tavshil.dev",
            name.to_lowercase().replace(' ', ".")
        ),
        display_name: name.to_string(),
        bio: Some(format!("Home cooking from {city}")),
        phone: Some("050-0000000".to_string()),
        address: None,
        city: Some(city.to_string()),
        profile_image: None,
        cover_image: None,
        approval_status: ApprovalStatus::Approved,
        rejection_reason: None,
        approval_date: Some(now),
        is_active: true,
        is_open: true,
        min_order_agorot: min_order_shekels * 100,
        estimated_prep_minutes: 30,
        total_orders: 0,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        open_hours,
        created_at: now,
        updated_at: now,
    }
}

/// Builds a dish; the first of each menu becomes the daily special.
fn seed_dish(
    cook_id: &str,
    title: &str,
    category: DishCategory,
    price_shekels: i64,
    sort_order: i64,
) -> Dish {
    let now = Utc::now();

    let customization_options = if matches!(category, DishCategory::Main) {
        CustomizationOptions {
            removable_items: vec!["onion".to_string(), "cilantro".to_string()],
            extra_toppings: vec![
                Topping {
                    name: "tahini".to_string(),
                    price_agorot: 300,
                },
                Topping {
                    name: "egg".to_string(),
                    price_agorot: 500,
                },
            ],
        }
    } else {
        CustomizationOptions::default()
    };

    Dish {
        id: Uuid::new_v4().to_string(),
        cook_id: cook_id.to_string(),
        title: title.to_string(),
        description: Some(format!("{title}, made fresh daily")),
        price_agorot: price_shekels * 100,
        category,
        photo_url: None,
        tags: vec![],
        allergens: vec![],
        is_available: true,
        is_daily_special: sort_order == 0,
        daily_special_note: (sort_order == 0).then(|| "Today's special".to_string()),
        customization_options,
        sort_order,
        created_at: now,
        updated_at: now,
    }
}
