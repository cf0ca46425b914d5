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
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    Every price, line total, tax and shipping charge is an i64 count    │
//! │    of paise. Only display formatting divides by 100.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use jewelar_core::money::Money;
//!
//! let price = Money::from_paise(1_234_567);
//! assert_eq!(price.to_string(), "₹12,345.67");
//!
//! let doubled = price * 2;
//! assert_eq!(doubled.paise(), 2_469_134);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

/// Symbol used by [`Money`]'s `Display` impl.
pub const RUPEE_SYMBOL: &str = "₹";

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (1/100 rupee).
///
/// ## Where Money is Used
/// ```text
/// Product.price ──┬──► CartLine.unit_price ──► CartLine.line_total
///                 │
///                 └──► Displayed as "₹150" on product cards
///
/// Cart subtotal ──► OrderSummary (shipping + GST) ──► Order total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// ## Example
    /// ```rust
    /// use jewelar_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees_paise(150, 50).paise(), 15050);
    /// assert_eq!(Money::from_rupees_paise(-5, 50).paise(), -550);
    /// ```
    #[inline]
    pub const fn from_rupees_paise(rupees: i64, paise: i64) -> Self {
        if rupees < 0 {
            Money(rupees * 100 - paise)
        } else {
            Money(rupees * 100 + paise)
        }
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
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

    /// Calculates tax, rounding half away from zero to the nearest paisa.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. For the non-negative
    /// amounts a cart produces this matches rounding `amount * rate`.
    ///
    /// ## Example
    /// ```rust
    /// use jewelar_core::money::Money;
    /// use jewelar_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_paise(12345);
    /// // 12345 × 18% = 2222.1 → 2222
    /// assert_eq!(subtotal.calculate_tax(TaxRate::from_bps(1800)).paise(), 2222);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large carts from overflowing the intermediate product
        let tax = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_paise(tax as i64)
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Formats the amount with a currency symbol and Indian digit grouping.
    ///
    /// Trailing zero paise are dropped, so whole-rupee prices read as
    /// `₹150` and `₹1,50,000`.
    ///
    /// ## Example
    /// ```rust
    /// use jewelar_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(15000).format_with("₹"), "₹150");
    /// assert_eq!(Money::from_paise(15_000_000).format_with("Rs "), "Rs 1,50,000");
    /// assert_eq!(Money::from_paise(15050).format_with("₹"), "₹150.5");
    /// ```
    pub fn format_with(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = group_indian(self.rupees().unsigned_abs());
        let fraction = match self.paise_part() {
            0 => String::new(),
            p if p % 10 == 0 => format!(".{}", p / 10),
            p => format!(".{:02}", p),
        };
        format!("{}{}{}{}", sign, symbol, whole, fraction)
    }
}

/// Groups digits the en-IN way: last three, then pairs (12,34,567).
fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with(RUPEE_SYMBOL))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
