//! # Domain Types
//!
//! Core domain types used throughout Stockbook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │   StockItem     │   │  VoucherKind    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  Purchase       │       │
//! │  │  name           │◄──│  category_id    │   │  Sales          │       │
//! │  │  description    │   │  rate, gst      │   │  PurchaseReturn │       │
//! │  └─────────────────┘   │  unit           │   │  SalesReturn    │       │
//! │                        └─────────────────┘   │  GatePass       │       │
//! │                                              └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Percent      │   │  EntryStatus    │   │   LedgerSide    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Decimal 0-100  │   │  Active         │   │  Debit          │       │
//! │  │  18 = 18%       │   │  Voided         │   │  Credit / None  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Percent
// =============================================================================

/// A percentage such as a GST rate or a discount, `18` meaning 18%.
///
/// Valid rates lie in `[0, 100]`; the type itself accepts any decimal so
/// that out-of-range form input can be reported by validation instead of
/// being rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Percent(#[ts(type = "string")] Decimal);

impl Percent {
    /// Creates a percentage from its decimal value (`18` = 18%).
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Percent(value)
    }

    /// Returns the percentage value.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percent(Decimal::ZERO)
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the percentage lies in `[0, 100]`.
    pub fn is_within_bounds(&self) -> bool {
        self.0 >= Decimal::ZERO && self.0 <= Decimal::ONE_HUNDRED
    }

    /// Applies the percentage to an amount: `amount * pct / 100`.
    ///
    /// Returns `None` on decimal overflow.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use stockbook_core::{Money, Percent};
    ///
    /// let gst = Percent::new(Decimal::from(18));
    /// let amount = Money::new(Decimal::from(1000));
    /// assert_eq!(gst.of(amount), Some(Money::new(Decimal::from(180))));
    /// ```
    pub fn of(&self, amount: Money) -> Option<Money> {
        amount
            .amount()
            .checked_mul(self.0)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
            .map(Money::new)
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

impl From<Decimal> for Percent {
    fn from(value: Decimal) -> Self {
        Percent(value)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

// =============================================================================
// Category
// =============================================================================

/// A stock category ("Shirts", "Hosiery").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    /// Backend identifier; `None` until the category is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name, unique per database.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Category {
    /// Creates a category that has not been saved yet.
    pub fn new(name: impl Into<String>) -> Self {
        Category {
            id: None,
            name: name.into(),
            description: None,
        }
    }
}

// =============================================================================
// Stock Item
// =============================================================================

/// How a stock item is counted on vouchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StockUnit {
    /// Counted in single pieces.
    #[default]
    Pieces,
    /// Counted in dozens plus loose pieces.
    Dozens,
}

/// An inventory item that voucher lines reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Category this item belongs to.
    pub category_id: String,

    pub name: String,

    /// HSN/SAC code printed on GST bills.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsn_code: Option<String>,

    /// Default rate used when the item is added to a voucher.
    pub rate: Money,

    /// Default GST rate used when the item is added to a voucher.
    #[serde(default)]
    pub gst_percent: Percent,

    #[serde(default)]
    pub unit: StockUnit,

    /// Opening stock in units.
    #[serde(default)]
    #[ts(type = "string")]
    pub opening_stock: Decimal,
}

// =============================================================================
// Voucher Kind
// =============================================================================

/// The kind of voucher being entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum VoucherKind {
    /// Goods bought from a supplier.
    Purchase,
    /// Goods sold to a customer.
    Sales,
    /// Goods sent back to a supplier.
    PurchaseReturn,
    /// Goods received back from a customer.
    SalesReturn,
    /// Goods moved out of the premises without a sale.
    GatePass,
}

impl VoucherKind {
    /// All kinds, in menu order.
    pub const ALL: [VoucherKind; 5] = [
        VoucherKind::Purchase,
        VoucherKind::Sales,
        VoucherKind::PurchaseReturn,
        VoucherKind::SalesReturn,
        VoucherKind::GatePass,
    ];

    /// The ledger side entry totals post to.
    pub const fn ledger_side(&self) -> LedgerSide {
        match self {
            VoucherKind::Purchase | VoucherKind::SalesReturn => LedgerSide::Debit,
            VoucherKind::Sales | VoucherKind::PurchaseReturn => LedgerSide::Credit,
            VoucherKind::GatePass => LedgerSide::None,
        }
    }

    /// Path segment used by the backend for this kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            VoucherKind::Purchase => "purchase",
            VoucherKind::Sales => "sales",
            VoucherKind::PurchaseReturn => "purchase_return",
            VoucherKind::SalesReturn => "sales_return",
            VoucherKind::GatePass => "gate_pass",
        }
    }
}

impl fmt::Display for VoucherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VoucherKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "purchase" => Ok(VoucherKind::Purchase),
            "sales" | "sale" => Ok(VoucherKind::Sales),
            "purchase_return" => Ok(VoucherKind::PurchaseReturn),
            "sales_return" | "sale_return" => Ok(VoucherKind::SalesReturn),
            "gate_pass" | "gatepass" => Ok(VoucherKind::GatePass),
            other => Err(format!(
                "Unknown voucher kind: '{}'. Valid options: purchase, sales, purchase_return, sales_return, gate_pass",
                other
            )),
        }
    }
}

/// Which side of the ledger a voucher's entries post to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerSide {
    Debit,
    Credit,
    /// Movement only, no accounting effect (gate passes).
    None,
}

// =============================================================================
// Entry Status
// =============================================================================

/// Whether a voucher entry counts towards the voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EntryStatus {
    /// Entry counts towards totals.
    #[default]
    Active,
    /// Entry is kept for audit but excluded from totals.
    Voided,
}

impl EntryStatus {
    #[inline]
    pub const fn is_voided(&self) -> bool {
        matches!(self, EntryStatus::Voided)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryStatus::Active => write!(f, "active"),
            EntryStatus::Voided => write!(f, "voided"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
