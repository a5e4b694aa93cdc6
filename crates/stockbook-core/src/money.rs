//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floats:                                                    │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    50.5 × 3 × 1.05 = 159.07500000000002                                 │
//! │                                                                         │
//! │  Voucher lines carry fractional rates AND fractional quantities, so    │
//! │  integer cents alone cannot hold an unrounded line total.              │
//! │                                                                         │
//! │  OUR SOLUTION: Base-10 Decimal                                          │
//! │    50.5 × 3 × 1.05 = 159.075 exactly                                   │
//! │    Rounded to 159.08 ONLY when displayed                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use stockbook_core::money::Money;
//!
//! let rate = Money::new(Decimal::new(25050, 2));  // 250.50
//! let line = rate.checked_mul_quantity(Decimal::from(4)).unwrap();
//! assert_eq!(line.to_string(), "1002.00");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

/// Decimal places shown wherever money is displayed.
pub const DISPLAY_DECIMALS: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in major currency units (rupees, dollars).
///
/// ## Design Decisions
/// - **Decimal (signed)**: intermediate values like `afterDiscount` may go
///   negative before the pricing rule clamps them
/// - **Unrounded storage**: a line total keeps every digit the arithmetic
///   produced; [`Money::rounded`] is for display only
/// - **Serialization**: transparent over `Decimal`, so JSON carries the
///   exact value as a string (payloads switch to numbers explicitly)
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.rate ──► subtotal ──► discounts ──► GST ──► LinePricing.total│
/// │                                                              │          │
/// │                                   VoucherTotals.grand_total ◄┘          │
/// │                                                              │          │
/// │                                 EntryPayload.debit / credit ◄┘          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Creates Money from a decimal amount in major units.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns the amount rounded to display precision (half away from zero).
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use stockbook_core::money::Money;
    ///
    /// let total = Money::new(Decimal::new(159075, 3)); // 159.075
    /// assert_eq!(total.rounded().amount(), Decimal::new(15908, 2));
    /// ```
    pub fn rounded(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Returns the amount rounded to whole minor units.
    ///
    /// Returns `None` when the amount does not fit in an `i64`.
    pub fn to_minor(&self) -> Option<i64> {
        use rust_decimal::prelude::ToPrimitive;
        self.rounded()
            .0
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|minor| minor.to_i64())
    }

    /// Multiplies money by a (possibly fractional) quantity.
    ///
    /// Returns `None` on decimal overflow.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use stockbook_core::money::Money;
    ///
    /// let rate = Money::new(Decimal::from(10));
    /// let line = rate.checked_mul_quantity(Decimal::from(12)).unwrap();
    /// assert_eq!(line, Money::new(Decimal::from(120)));
    /// ```
    #[inline]
    pub fn checked_mul_quantity(&self, qty: Decimal) -> Option<Money> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Checked addition, `None` on decimal overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Checked subtraction, `None` on decimal overflow.
    #[inline]
    pub fn checked_sub(&self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Clamps negative amounts to zero.
    #[inline]
    pub fn non_negative(&self) -> Money {
        if self.is_negative() {
            Money::zero()
        } else {
            *self
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount at display precision, without a currency symbol.
///
/// The client's config adds the symbol (`₹1180.00`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded().0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

/// Addition saturates at the decimal bounds instead of panicking.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// Subtraction saturates at the decimal bounds instead of panicking.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
