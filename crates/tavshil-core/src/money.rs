//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Agorot                                           │
//! │    ₪10.00 is stored as 1000 agorot (i64)                               │
//! │    Commission, totals and line math never touch a float                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tavshil_core::money::Money;
//!
//! // Create from agorot (preferred)
//! let price = Money::from_agorot(4500); // ₪45.00
//!
//! // Arithmetic operations
//! let doubled = price * 2;                      // ₪90.00
//! let total = price + Money::from_agorot(500);  // ₪50.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in agorot (the smallest shekel unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and ledger math
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from agorot (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tavshil_core::money::Money;
    ///
    /// let price = Money::from_agorot(4590); // Represents ₪45.90
    /// assert_eq!(price.agorot(), 4590);
    /// ```
    #[inline]
    pub const fn from_agorot(agorot: i64) -> Self {
        Money(agorot)
    }

    /// Creates a Money value from whole shekels.
    ///
    /// Dish prices and minimum-order amounts are entered in whole shekels,
    /// so this is the common construction path at the input boundary.
    #[inline]
    pub const fn from_shekels(shekels: i64) -> Self {
        Money(shekels * 100)
    }

    /// Returns the value in agorot (smallest currency unit).
    #[inline]
    pub const fn agorot(&self) -> i64 {
        self.0
    }

    /// Returns the whole-shekel portion.
    #[inline]
    pub const fn shekels(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the agorot portion (always 0-99).
    #[inline]
    pub const fn agorot_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Applies a basis-point percentage, rounding half up to the agora.
    ///
    /// This is the commission primitive: the platform's cut is
    /// `products_total.percentage(500)` (5%), which matches the ledger rule
    /// "round to 2 decimal places, half up" exactly.
    ///
    /// ## Implementation
    /// Integer math: `(amount × bps + 5000) / 10000`.
    /// The +5000 provides the half-up rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use tavshil_core::money::Money;
    ///
    /// let total = Money::from_agorot(3700); // ₪37.00
    /// // ₪37.00 × 5% = ₪1.85
    /// assert_eq!(total.percentage(500).agorot(), 185);
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        // i128 to prevent overflow on large amounts
        let part = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_agorot(part as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use tavshil_core::money::Money;
    ///
    /// let unit_price = Money::from_agorot(2500); // ₪25.00
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.agorot(), 7500); // ₪75.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. Use frontend formatting for actual UI
/// display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}₪{}.{:02}",
            sign,
            self.shekels().abs(),
            self.agorot_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation of an iterator of Money values.
impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_agorot() {
        let money = Money::from_agorot(4590);
        assert_eq!(money.agorot(), 4590);
        assert_eq!(money.shekels(), 45);
        assert_eq!(money.agorot_part(), 90);
    }

    #[test]
    fn test_from_shekels() {
        assert_eq!(Money::from_shekels(25).agorot(), 2500);
        assert_eq!(Money::from_shekels(-5).agorot(), -500);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_agorot(4590)), "₪45.90");
        assert_eq!(format!("{}", Money::from_agorot(500)), "₪5.00");
        assert_eq!(format!("{}", Money::from_agorot(-550)), "-₪5.50");
        assert_eq!(format!("{}", Money::from_agorot(0)), "₪0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_agorot(1000);
        let b = Money::from_agorot(500);

        assert_eq!((a + b).agorot(), 1500);
        assert_eq!((a - b).agorot(), 500);
        let result: Money = a * 3;
        assert_eq!(result.agorot(), 3000);
    }

    #[test]
    fn test_percentage_exact() {
        // ₪100.00 at 5% = ₪5.00, no rounding needed
        let amount = Money::from_agorot(10000);
        assert_eq!(amount.percentage(500).agorot(), 500);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        // ₪37.00 × 5% = ₪1.85 exactly
        assert_eq!(Money::from_agorot(3700).percentage(500).agorot(), 185);

        // ₪0.10 × 5% = 0.5 agorot → rounds up to 1
        assert_eq!(Money::from_agorot(10).percentage(500).agorot(), 1);

        // ₪0.09 × 5% = 0.45 agorot → rounds down to 0
        assert_eq!(Money::from_agorot(9).percentage(500).agorot(), 0);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_agorot(2990);
        let line_total = unit_price.multiply_quantity(3);
        assert_eq!(line_total.agorot(), 8970);
    }

    #[test]
    fn test_sum() {
        let total: Money = [1000, 2500, 45]
            .iter()
            .map(|a| Money::from_agorot(*a))
            .sum();
        assert_eq!(total.agorot(), 3545);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_agorot(100);
        assert!(positive.is_positive());

        let negative = Money::from_agorot(-100);
        assert!(negative.is_negative());
    }
}
