//! # Submission Payload
//!
//! The JSON body sent to the backend when a voucher is saved.
//!
//! ```json
//! {
//!   "voucherType": "purchase",
//!   "date": "2024-04-01",
//!   "party": "Sharma Hosiery",
//!   "grandTotal": 1180.0,
//!   "entries": [{
//!     "id": "7d1c…",
//!     "debit": 1180.0,
//!     "credit": 0.0,
//!     "isVoid": false,
//!     "metadata": { "rate": 250.0, "quantity": 4.0, "gstPercent": 18.0, "total": 1180.0, … }
//!   }]
//! }
//! ```
//!
//! Amounts are JSON numbers and carry the unrounded line total. The entry's
//! total goes to `debit` or `credit` by the voucher kind's ledger side;
//! voided entries are still sent, with both sides zero.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{LinePricing, Quantity};
use crate::types::{LedgerSide, VoucherKind};
use crate::voucher::{VoucherDraft, VoucherEntry};

/// Outbound voucher body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherPayload {
    pub voucher_type: VoucherKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voucher_id: Option<String>,

    pub date: Option<NaiveDate>,

    pub party: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,

    #[serde(with = "rust_decimal::serde::float")]
    pub grand_total: Decimal,

    pub entries: Vec<EntryPayload>,
}

/// One entry of the outbound body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPayload {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,

    pub description: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub debit: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub credit: Decimal,

    pub is_void: bool,

    pub metadata: EntryMetadata,
}

/// The raw line inputs alongside the derived total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMetadata {
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,

    /// Total units (dozens already folded in).
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,

    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub dozens: Option<Decimal>,

    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub pieces: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float")]
    pub gst_percent: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percent: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub extra_discount_percent: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl EntryPayload {
    fn build(entry: &VoucherEntry, priced: &LinePricing, side: LedgerSide) -> Self {
        let line = &entry.line;
        let (dozens, pieces) = match line.quantity {
            Quantity::DozensPieces { dozens, pieces } => (Some(dozens), Some(pieces)),
            Quantity::Units { .. } => (None, None),
        };

        let total = priced.total.amount();
        let posted = if entry.is_active() { total } else { Decimal::ZERO };
        let (debit, credit) = match side {
            LedgerSide::Debit => (posted, Decimal::ZERO),
            LedgerSide::Credit => (Decimal::ZERO, posted),
            LedgerSide::None => (Decimal::ZERO, Decimal::ZERO),
        };

        EntryPayload {
            id: entry.id.clone(),
            item_id: entry.item_id.clone(),
            description: entry.description.clone(),
            debit,
            credit,
            is_void: !entry.is_active(),
            metadata: EntryMetadata {
                rate: line.rate.amount(),
                quantity: priced.units,
                dozens,
                pieces,
                gst_percent: line.gst_percent.value(),
                discount_amount: line.discount_amount.amount(),
                discount_percent: line.discount_percent.value(),
                extra_discount_percent: line.extra_discount_percent.value(),
                total,
            },
        }
    }
}

impl From<&VoucherDraft> for VoucherPayload {
    fn from(draft: &VoucherDraft) -> Self {
        let side = draft.kind.ledger_side();
        let entries = draft
            .priced_entries()
            .map(|(entry, priced)| EntryPayload::build(entry, &priced, side))
            .collect();

        VoucherPayload {
            voucher_type: draft.kind,
            voucher_id: draft.voucher_id.clone(),
            date: draft.date,
            party: draft.party.trim().to_string(),
            reference: draft.reference.clone(),
            narration: draft.narration.clone(),
            grand_total: draft.totals().grand_total.amount(),
            entries,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
