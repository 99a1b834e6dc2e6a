//! # Validation Module
//!
//! Input validation utilities for Tavshil.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                     │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Services (Rust)                                              │
//! │  └── THIS MODULE: business rule validation at the boundary             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::hours::parse_hhmm;
use crate::types::{CustomizationOptions, ItemCustomizations};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a dish title or storefront display name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_title(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an email address shape.
///
/// Deliverability is the auth collaborator's problem; this only rejects
/// values that cannot possibly be an address.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };
    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        });
    }

    Ok(())
}

/// Validates an "HH:MM" schedule time.
pub fn validate_time_hhmm(field: &str, value: &str) -> ValidationResult<()> {
    if parse_hhmm(value).is_none() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be HH:MM in 24-hour time".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in agorot.
///
/// ## Rules
/// - Must be non-negative (>= 0); zero is allowed (free item / no minimum)
pub fn validate_price_agorot(field: &str, agorot: i64) -> ValidationResult<()> {
    if agorot < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates an estimated preparation time in minutes.
pub fn validate_prep_minutes(minutes: i64) -> ValidationResult<()> {
    if minutes < 1 || minutes > 24 * 60 {
        return Err(ValidationError::OutOfRange {
            field: "estimated_prep_minutes".to_string(),
            min: 1,
            max: 24 * 60,
        });
    }

    Ok(())
}

// =============================================================================
// Customization Boundary Validation
// =============================================================================

/// Validates a cart line's customizations against the dish's options.
///
/// The customization payload arrives from the client as a loose option
/// bag; this is the single place that pins it to what the dish actually
/// offers:
/// - every removed ingredient must be in `removable_items`
/// - every extra must name a defined topping, with a positive count
/// - the extra's frozen price must match the menu price
pub fn validate_customizations(
    chosen: &ItemCustomizations,
    options: &CustomizationOptions,
) -> ValidationResult<()> {
    for removed in &chosen.removed {
        if !options.removable_items.iter().any(|r| r == removed) {
            return Err(ValidationError::NotAllowed {
                field: format!("removed item '{removed}'"),
                allowed: options.removable_items.clone(),
            });
        }
    }

    for extra in &chosen.extra {
        let Some(topping) = options.topping(&extra.name) else {
            return Err(ValidationError::NotAllowed {
                field: format!("topping '{}'", extra.name),
                allowed: options
                    .extra_toppings
                    .iter()
                    .map(|t| t.name.clone())
                    .collect(),
            });
        };

        if extra.count <= 0 {
            return Err(ValidationError::MustBePositive {
                field: format!("topping '{}' count", extra.name),
            });
        }

        if extra.price_agorot != topping.price_agorot {
            return Err(ValidationError::InvalidFormat {
                field: format!("topping '{}' price", extra.name),
                reason: "does not match the menu price".to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExtraTopping, Topping};

    fn dish_options() -> CustomizationOptions {
        CustomizationOptions {
            removable_items: vec!["onion".to_string(), "pickles".to_string()],
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
    }

    #[test]
    fn test_validate_title() {
        assert!(validate_title("title", "Kubbeh soup").is_ok());
        assert!(validate_title("title", "").is_err());
        assert!(validate_title("title", "   ").is_err());
        assert!(validate_title("title", &"א".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("dana@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("dana").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("dana@localhost").is_err());
    }

    #[test]
    fn test_validate_time_hhmm() {
        assert!(validate_time_hhmm("open", "09:00").is_ok());
        assert!(validate_time_hhmm("open", "23:59").is_ok());
        assert!(validate_time_hhmm("open", "25:00").is_err());
        assert!(validate_time_hhmm("open", "soon").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(99).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(100).is_err());
    }

    #[test]
    fn test_validate_price_agorot() {
        assert!(validate_price_agorot("price", 0).is_ok());
        assert!(validate_price_agorot("price", 4500).is_ok());
        assert!(validate_price_agorot("price", -100).is_err());
    }

    #[test]
    fn test_customizations_accept_valid_payload() {
        let chosen = ItemCustomizations {
            removed: vec!["onion".to_string()],
            extra: vec![ExtraTopping {
                name: "tahini".to_string(),
                count: 2,
                price_agorot: 300,
            }],
        };
        assert!(validate_customizations(&chosen, &dish_options()).is_ok());
    }

    #[test]
    fn test_customizations_reject_unknown_removal() {
        let chosen = ItemCustomizations {
            removed: vec!["cilantro".to_string()],
            extra: vec![],
        };
        assert!(validate_customizations(&chosen, &dish_options()).is_err());
    }

    #[test]
    fn test_customizations_reject_unknown_topping() {
        let chosen = ItemCustomizations {
            removed: vec![],
            extra: vec![ExtraTopping {
                name: "truffle".to_string(),
                count: 1,
                price_agorot: 300,
            }],
        };
        assert!(validate_customizations(&chosen, &dish_options()).is_err());
    }

    #[test]
    fn test_customizations_reject_price_mismatch() {
        let chosen = ItemCustomizations {
            removed: vec![],
            extra: vec![ExtraTopping {
                name: "tahini".to_string(),
                count: 1,
                price_agorot: 100, // menu says 300
            }],
        };
        assert!(validate_customizations(&chosen, &dish_options()).is_err());
    }

    #[test]
    fn test_customizations_reject_zero_count() {
        let chosen = ItemCustomizations {
            removed: vec![],
            extra: vec![ExtraTopping {
                name: "egg".to_string(),
                count: 0,
                price_agorot: 500,
            }],
        };
        assert!(validate_customizations(&chosen, &dish_options()).is_err());
    }
}
