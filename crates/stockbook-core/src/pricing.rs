//! # Line Item Pricing
//!
//! The one shared pricing rule for every voucher screen. Each voucher kind
//! switches stages on or off through [`PricingRules`] instead of carrying
//! its own copy of the arithmetic.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  units         = dozens × 12 + pieces      (or plain units)             │
//! │  subtotal      = units × rate                                           │
//! │                                                                         │
//! │  [discount]    discount      = amount + subtotal × discount% / 100      │
//! │                afterDiscount = subtotal − discount                      │
//! │                                                                         │
//! │  [extra]       extra         = afterDiscount × extra% / 100             │
//! │                afterExtra    = afterDiscount − extra                    │
//! │                                                                         │
//! │  [gst]         gst           = afterExtra × gst% / 100                  │
//! │                                                                         │
//! │  total         = afterExtra + gst          (clamped at zero)            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Disabled stages contribute exactly zero. The extra discount is always
//! taken from the already-discounted amount, never from the subtotal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::form::lenient;
use crate::money::Money;
use crate::types::{Percent, StockItem, StockUnit, VoucherKind};

/// Pieces in one dozen.
pub const PIECES_PER_DOZEN: i64 = 12;

// =============================================================================
// Pricing Rules
// =============================================================================

/// Which stages of the pricing pipeline apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricingRules {
    pub has_gst: bool,
    pub has_discount: bool,
    pub has_extra_discount: bool,
}

impl PricingRules {
    /// Rate × quantity plus GST, no discounts.
    pub const PURCHASE: PricingRules = PricingRules {
        has_gst: true,
        has_discount: false,
        has_extra_discount: false,
    };

    /// Flat + percent discount, then extra discount, no GST.
    pub const SALES: PricingRules = PricingRules {
        has_gst: false,
        has_discount: true,
        has_extra_discount: true,
    };

    /// Rate × quantity only.
    pub const PLAIN: PricingRules = PricingRules {
        has_gst: false,
        has_discount: false,
        has_extra_discount: false,
    };

    /// Every stage enabled.
    pub const ALL: PricingRules = PricingRules {
        has_gst: true,
        has_discount: true,
        has_extra_discount: true,
    };

    /// Default rules for a voucher kind.
    ///
    /// Purchases carry GST without discounts and sales carry discounts
    /// without GST. Returns mirror the voucher they reverse.
    pub const fn for_kind(kind: VoucherKind) -> PricingRules {
        match kind {
            VoucherKind::Purchase | VoucherKind::PurchaseReturn => PricingRules::PURCHASE,
            VoucherKind::Sales | VoucherKind::SalesReturn => PricingRules::SALES,
            VoucherKind::GatePass => PricingRules::PLAIN,
        }
    }
}

// =============================================================================
// Quantity
// =============================================================================

/// Quantity of a line, either plain units or dozens plus loose pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "mode", rename_all = "snake_case")]
#[ts(export)]
pub enum Quantity {
    Units {
        #[serde(deserialize_with = "lenient", default)]
        #[ts(type = "string")]
        units: Decimal,
    },
    DozensPieces {
        #[serde(deserialize_with = "lenient", default)]
        #[ts(type = "string")]
        dozens: Decimal,
        #[serde(deserialize_with = "lenient", default)]
        #[ts(type = "string")]
        pieces: Decimal,
    },
}

impl Quantity {
    /// Plain unit quantity.
    pub fn units(units: impl Into<Decimal>) -> Self {
        Quantity::Units {
            units: units.into(),
        }
    }

    /// Dozens plus loose pieces.
    pub fn dozens_pieces(dozens: impl Into<Decimal>, pieces: impl Into<Decimal>) -> Self {
        Quantity::DozensPieces {
            dozens: dozens.into(),
            pieces: pieces.into(),
        }
    }

    /// Total units: `dozens × 12 + pieces` for the composed form.
    ///
    /// Returns `None` on decimal overflow.
    pub fn total_units(&self) -> Option<Decimal> {
        match *self {
            Quantity::Units { units } => Some(units),
            Quantity::DozensPieces { dozens, pieces } => dozens
                .checked_mul(Decimal::from(PIECES_PER_DOZEN))
                .and_then(|d| d.checked_add(pieces)),
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::Units {
            units: Decimal::ZERO,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// The editable fields of one voucher line.
///
/// There is no stored `total`: it is derived from these fields every time
/// [`price_line`] runs, so an edit is reflected immediately.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    #[serde(deserialize_with = "lenient", default)]
    pub rate: Money,

    #[serde(default)]
    pub quantity: Quantity,

    #[serde(deserialize_with = "lenient", default)]
    pub gst_percent: Percent,

    /// Flat deduction in currency.
    #[serde(deserialize_with = "lenient", default)]
    pub discount_amount: Money,

    #[serde(deserialize_with = "lenient", default)]
    pub discount_percent: Percent,

    /// Second-stage deduction, taken from the already-discounted amount.
    #[serde(deserialize_with = "lenient", default)]
    pub extra_discount_percent: Percent,
}

impl LineItem {
    /// A line with a rate and quantity and nothing else.
    pub fn new(rate: Money, quantity: Quantity) -> Self {
        LineItem {
            rate,
            quantity,
            ..LineItem::default()
        }
    }

    /// Seeds a line from a stock item's default rate and GST.
    pub fn from_stock_item(item: &StockItem) -> Self {
        let quantity = match item.unit {
            StockUnit::Pieces => Quantity::units(Decimal::ZERO),
            StockUnit::Dozens => Quantity::dozens_pieces(Decimal::ZERO, Decimal::ZERO),
        };
        LineItem {
            rate: item.rate,
            quantity,
            gst_percent: item.gst_percent,
            ..LineItem::default()
        }
    }

    pub fn with_gst(mut self, gst_percent: Percent) -> Self {
        self.gst_percent = gst_percent;
        self
    }

    pub fn with_discount(mut self, amount: Money, percent: Percent) -> Self {
        self.discount_amount = amount;
        self.discount_percent = percent;
        self
    }

    pub fn with_extra_discount(mut self, percent: Percent) -> Self {
        self.extra_discount_percent = percent;
        self
    }

    /// Total for this line under the given rules.
    pub fn total(&self, rules: PricingRules) -> Money {
        price_line(self, rules).total
    }
}

// =============================================================================
// Line Pricing
// =============================================================================

/// Breakdown of one priced line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LinePricing {
    #[ts(type = "string")]
    pub units: Decimal,
    pub subtotal: Money,
    /// Flat + percent discount (first stage).
    pub discount: Money,
    /// Extra discount (second stage).
    pub extra_discount: Money,
    pub gst: Money,
    pub total: Money,
    /// The computed total was negative and has been clamped to zero.
    pub negative_clamped: bool,
    /// Decimal overflow; every amount is reported as zero.
    pub overflow: bool,
}

impl LinePricing {
    fn overflowed() -> Self {
        LinePricing {
            overflow: true,
            ..LinePricing::default()
        }
    }

    /// True when the line priced cleanly.
    pub fn is_clean(&self) -> bool {
        !self.negative_clamped && !self.overflow
    }
}

/// Prices one line. Deterministic, side-effect free, never fails.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use stockbook_core::pricing::{price_line, LineItem, PricingRules, Quantity};
/// use stockbook_core::{Money, Percent};
///
/// let line = LineItem::new(Money::new(Decimal::from(250)), Quantity::units(4))
///     .with_gst(Percent::new(Decimal::from(18)));
///
/// let priced = price_line(&line, PricingRules::PURCHASE);
/// assert_eq!(priced.gst, Money::new(Decimal::from(180)));
/// assert_eq!(priced.total, Money::new(Decimal::from(1180)));
/// ```
pub fn price_line(line: &LineItem, rules: PricingRules) -> LinePricing {
    compute(line, rules).unwrap_or_else(LinePricing::overflowed)
}

fn compute(line: &LineItem, rules: PricingRules) -> Option<LinePricing> {
    let units = line.quantity.total_units()?;
    let subtotal = line.rate.checked_mul_quantity(units)?;

    let discount = if rules.has_discount {
        line.discount_amount
            .checked_add(line.discount_percent.of(subtotal)?)?
    } else {
        Money::zero()
    };
    let after_discount = subtotal.checked_sub(discount)?;

    let extra_discount = if rules.has_extra_discount {
        line.extra_discount_percent.of(after_discount)?
    } else {
        Money::zero()
    };
    let after_extra = after_discount.checked_sub(extra_discount)?;

    let gst = if rules.has_gst {
        line.gst_percent.of(after_extra)?
    } else {
        Money::zero()
    };
    let total = after_extra.checked_add(gst)?;

    Some(LinePricing {
        units,
        subtotal,
        discount,
        extra_discount,
        gst,
        total: total.non_negative(),
        negative_clamped: total.is_negative(),
        overflow: false,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
