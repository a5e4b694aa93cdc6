//! # Voucher Drafts
//!
//! The voucher form being edited: its header fields and the ordered list
//! of line entries. Totals are never stored; they are derived from the
//! entries on every read.
//!
//! ## Draft Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Voucher Draft Operations                             │
//! │                                                                         │
//! │  Form Action              Draft Method            Effect                │
//! │  ───────────              ────────────            ──────                │
//! │                                                                         │
//! │  Add line ───────────────► add_entry() ─────────► entries.push(entry)  │
//! │                                                                         │
//! │  Edit rate/qty/GST ──────► update_entry() ──────► entry.line = line    │
//! │                                                                         │
//! │  Delete line ────────────► remove_entry() ──────► entries.remove(i)    │
//! │                                                                         │
//! │  Void / Unvoid ──────────► void_entry() ────────► Active → Voided      │
//! │                            unvoid_entry() ──────► Voided → Active      │
//! │                                                                         │
//! │  Saved ──────────────────► reset() ─────────────► blank form           │
//! │                                                                         │
//! │  NOTE: Voided entries stay in the list but never count in totals.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{price_line, LineItem, LinePricing, PricingRules, Quantity};
use crate::types::{EntryStatus, StockItem, VoucherKind};
use crate::MAX_VOUCHER_ENTRIES;

fn new_entry_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Voucher Entry
// =============================================================================

/// One line of a voucher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VoucherEntry {
    /// Client-generated id (UUID v4); kept by the backend on save.
    #[serde(default = "new_entry_id")]
    pub id: String,

    /// Stock item this line moves, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,

    #[serde(default)]
    pub description: String,

    pub line: LineItem,

    #[serde(default)]
    pub status: EntryStatus,
}

impl VoucherEntry {
    /// Creates an active entry with a fresh id.
    pub fn new(line: LineItem) -> Self {
        VoucherEntry {
            id: new_entry_id(),
            item_id: None,
            description: String::new(),
            line,
            status: EntryStatus::Active,
        }
    }

    /// Creates an entry for a stock item, seeded with its default rate and GST.
    pub fn for_item(item: &StockItem, quantity: Quantity) -> Self {
        let mut line = LineItem::from_stock_item(item);
        line.quantity = quantity;
        VoucherEntry {
            id: new_entry_id(),
            item_id: item.id.clone(),
            description: item.name.clone(),
            line,
            status: EntryStatus::Active,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !self.status.is_voided()
    }

    /// Prices this entry. Voided entries are priced too (for display).
    pub fn pricing(&self, rules: PricingRules) -> LinePricing {
        price_line(&self.line, rules)
    }
}

// =============================================================================
// Voucher Draft
// =============================================================================

/// A voucher being entered or edited.
///
/// ## Invariants
/// - At most [`MAX_VOUCHER_ENTRIES`] entries
/// - Entry ids are unique within the draft
/// - Voided entries cannot be edited until unvoided
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VoucherDraft {
    pub kind: VoucherKind,

    /// Explicit pricing override; `None` uses the kind's defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingRules>,

    /// Set when this draft edits a voucher that already exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voucher_id: Option<String>,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,

    /// Supplier or customer account.
    #[serde(default)]
    pub party: String,

    /// Bill / challan number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,

    #[serde(default)]
    entries: Vec<VoucherEntry>,
}

impl VoucherDraft {
    /// Creates a blank draft for a new voucher.
    pub fn new(kind: VoucherKind) -> Self {
        VoucherDraft {
            kind,
            pricing: None,
            voucher_id: None,
            date: None,
            party: String::new(),
            reference: None,
            narration: None,
            entries: Vec::new(),
        }
    }

    /// Creates a draft that edits an existing voucher.
    pub fn editing(kind: VoucherKind, voucher_id: impl Into<String>) -> Self {
        VoucherDraft {
            voucher_id: Some(voucher_id.into()),
            ..VoucherDraft::new(kind)
        }
    }

    /// Overrides the kind's default pricing rules.
    pub fn with_pricing(mut self, rules: PricingRules) -> Self {
        self.pricing = Some(rules);
        self
    }

    /// Pricing rules in effect for this draft.
    pub fn rules(&self) -> PricingRules {
        self.pricing
            .unwrap_or_else(|| PricingRules::for_kind(self.kind))
    }

    pub fn is_edit(&self) -> bool {
        self.voucher_id.is_some()
    }

    // -------------------------------------------------------------------------
    // Entries
    // -------------------------------------------------------------------------

    pub fn entries(&self) -> &[VoucherEntry] {
        &self.entries
    }

    pub fn active_entries(&self) -> impl Iterator<Item = &VoucherEntry> {
        self.entries.iter().filter(|e| e.is_active())
    }

    pub fn entry(&self, entry_id: &str) -> CoreResult<&VoucherEntry> {
        self.entries
            .iter()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| CoreError::EntryNotFound(entry_id.to_string()))
    }

    fn entry_mut(&mut self, entry_id: &str) -> CoreResult<&mut VoucherEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| CoreError::EntryNotFound(entry_id.to_string()))
    }

    /// Adds a line and returns its entry id.
    pub fn add_entry(&mut self, line: LineItem) -> CoreResult<String> {
        self.push_entry(VoucherEntry::new(line))
    }

    /// Adds a prepared entry (e.g. from [`VoucherEntry::for_item`]).
    ///
    /// An entry whose id is already present gets a fresh one.
    pub fn push_entry(&mut self, mut entry: VoucherEntry) -> CoreResult<String> {
        if self.entries.len() >= MAX_VOUCHER_ENTRIES {
            return Err(CoreError::VoucherTooLarge {
                max: MAX_VOUCHER_ENTRIES,
            });
        }

        if self.entries.iter().any(|e| e.id == entry.id) {
            entry.id = new_entry_id();
        }

        let id = entry.id.clone();
        self.entries.push(entry);
        Ok(id)
    }

    /// Replaces the editable fields of a line.
    ///
    /// Voided entries must be unvoided before they can be edited.
    pub fn update_entry(&mut self, entry_id: &str, line: LineItem) -> CoreResult<()> {
        let entry = self.entry_mut(entry_id)?;
        if entry.status.is_voided() {
            return Err(CoreError::InvalidEntryStatus {
                entry_id: entry_id.to_string(),
                status: entry.status,
                operation: "edit",
            });
        }
        entry.line = line;
        Ok(())
    }

    /// Removes a line from the draft.
    pub fn remove_entry(&mut self, entry_id: &str) -> CoreResult<VoucherEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or_else(|| CoreError::EntryNotFound(entry_id.to_string()))?;
        Ok(self.entries.remove(index))
    }

    /// Marks an active entry as voided.
    pub fn void_entry(&mut self, entry_id: &str) -> CoreResult<()> {
        self.transition(entry_id, EntryStatus::Active, EntryStatus::Voided, "void")
    }

    /// Restores a voided entry.
    pub fn unvoid_entry(&mut self, entry_id: &str) -> CoreResult<()> {
        self.transition(entry_id, EntryStatus::Voided, EntryStatus::Active, "unvoid")
    }

    fn transition(
        &mut self,
        entry_id: &str,
        from: EntryStatus,
        to: EntryStatus,
        operation: &'static str,
    ) -> CoreResult<()> {
        let entry = self.entry_mut(entry_id)?;
        if entry.status != from {
            return Err(CoreError::InvalidEntryStatus {
                entry_id: entry_id.to_string(),
                status: entry.status,
                operation,
            });
        }
        entry.status = to;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Pricing
    // -------------------------------------------------------------------------

    /// Pricing breakdown of one entry under the draft's rules.
    pub fn entry_pricing(&self, entry_id: &str) -> CoreResult<LinePricing> {
        Ok(self.entry(entry_id)?.pricing(self.rules()))
    }

    /// Every entry with its pricing, in order.
    pub fn priced_entries(&self) -> impl Iterator<Item = (&VoucherEntry, LinePricing)> {
        let rules = self.rules();
        self.entries.iter().map(move |e| (e, e.pricing(rules)))
    }

    /// Voucher-level totals over active entries.
    pub fn totals(&self) -> VoucherTotals {
        VoucherTotals::from(self)
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Clears the form after a successful save.
    ///
    /// Kind and pricing override survive so the next voucher of the same
    /// kind can be entered straight away.
    pub fn reset(&mut self) {
        *self = VoucherDraft {
            pricing: self.pricing,
            ..VoucherDraft::new(self.kind)
        };
    }
}

// =============================================================================
// Voucher Totals
// =============================================================================

/// Totals summary for display and submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VoucherTotals {
    pub entry_count: usize,
    pub active_count: usize,
    #[ts(type = "string")]
    pub total_units: Decimal,
    pub subtotal: Money,
    /// Both discount stages combined.
    pub discount: Money,
    pub gst: Money,
    /// Sum of active line totals.
    pub grand_total: Money,
    /// The sums could not be represented. Amounts are zero when set.
    pub overflow: bool,
}

impl VoucherTotals {
    fn add_line(mut self, priced: &LinePricing) -> Option<Self> {
        self.active_count += 1;
        self.total_units = self.total_units.checked_add(priced.units)?;
        self.subtotal = self.subtotal.checked_add(priced.subtotal)?;
        self.discount = self
            .discount
            .checked_add(priced.discount.checked_add(priced.extra_discount)?)?;
        self.gst = self.gst.checked_add(priced.gst)?;
        self.grand_total = self.grand_total.checked_add(priced.total)?;
        Some(self)
    }
}

impl From<&VoucherDraft> for VoucherTotals {
    fn from(draft: &VoucherDraft) -> Self {
        let rules = draft.rules();
        let mut totals = VoucherTotals {
            entry_count: draft.len(),
            ..VoucherTotals::default()
        };

        for entry in draft.active_entries() {
            match totals.add_line(&entry.pricing(rules)) {
                Some(next) => totals = next,
                None => {
                    return VoucherTotals {
                        entry_count: draft.len(),
                        active_count: draft.active_entries().count(),
                        overflow: true,
                        ..VoucherTotals::default()
                    }
                }
            }
        }

        totals
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Percent;
    use rust_decimal_macros::dec;

    fn purchase_line(rate: Decimal, qty: Decimal, gst: Decimal) -> LineItem {
        LineItem::new(Money::new(rate), Quantity::units(qty)).with_gst(Percent::new(gst))
    }

    #[test]
    fn test_add_entry_and_totals() {
        let mut draft = VoucherDraft::new(VoucherKind::Purchase);
        draft.add_entry(purchase_line(dec!(250), dec!(4), dec!(18))).unwrap();
        draft.add_entry(purchase_line(dec!(100), dec!(2), dec!(0))).unwrap();

        let totals = draft.totals();
        assert_eq!(totals.entry_count, 2);
        assert_eq!(totals.active_count, 2);
        assert_eq!(totals.total_units, dec!(6));
        assert_eq!(totals.subtotal, Money::new(dec!(1200)));
        assert_eq!(totals.gst, Money::new(dec!(180)));
        assert_eq!(totals.grand_total, Money::new(dec!(1380)));
    }

    #[test]
    fn test_update_entry_recomputes_total() {
        let mut draft = VoucherDraft::new(VoucherKind::Purchase);
        let id = draft.add_entry(purchase_line(dec!(250), dec!(4), dec!(18))).unwrap();
        assert_eq!(draft.entry_pricing(&id).unwrap().total, Money::new(dec!(1180)));

        draft
            .update_entry(&id, purchase_line(dec!(250), dec!(5), dec!(18)))
            .unwrap();
        assert_eq!(draft.entry_pricing(&id).unwrap().total, Money::new(dec!(1475)));
        assert_eq!(draft.totals().grand_total, Money::new(dec!(1475)));
    }

    #[test]
    fn test_voided_entries_excluded_from_totals() {
        let mut draft = VoucherDraft::new(VoucherKind::Purchase);
        let keep = draft.add_entry(purchase_line(dec!(100), dec!(1), dec!(0))).unwrap();
        let void = draft.add_entry(purchase_line(dec!(50), dec!(2), dec!(0))).unwrap();

        draft.void_entry(&void).unwrap();
        let totals = draft.totals();
        assert_eq!(totals.entry_count, 2);
        assert_eq!(totals.active_count, 1);
        assert_eq!(totals.grand_total, Money::new(dec!(100)));

        draft.unvoid_entry(&void).unwrap();
        assert_eq!(draft.totals().grand_total, Money::new(dec!(200)));
        assert!(draft.entry(&keep).unwrap().is_active());
    }

    #[test]
    fn test_totals_overflow_is_flagged_not_clamped() {
        let mut draft = VoucherDraft::new(VoucherKind::Purchase);
        let first = draft.add_entry(purchase_line(Decimal::MAX, dec!(1), dec!(0))).unwrap();
        draft.add_entry(purchase_line(Decimal::MAX, dec!(1), dec!(0))).unwrap();

        // each line prices on its own
        assert!(draft.entry_pricing(&first).unwrap().is_clean());

        let totals = draft.totals();
        assert!(totals.overflow);
        assert_eq!(totals.entry_count, 2);
        assert_eq!(totals.active_count, 2);
        assert_eq!(totals.grand_total, Money::zero());

        draft.void_entry(&first).unwrap();
        let totals = draft.totals();
        assert!(!totals.overflow);
        assert_eq!(totals.grand_total, Money::new(Decimal::MAX));
    }

    #[test]
    fn test_void_transitions_are_guarded() {
        let mut draft = VoucherDraft::new(VoucherKind::Sales);
        let id = draft.add_entry(LineItem::default()).unwrap();

        assert!(matches!(
            draft.unvoid_entry(&id),
            Err(CoreError::InvalidEntryStatus { operation: "unvoid", .. })
        ));

        draft.void_entry(&id).unwrap();
        assert!(matches!(
            draft.void_entry(&id),
            Err(CoreError::InvalidEntryStatus {
                status: EntryStatus::Voided,
                ..
            })
        ));
        assert!(matches!(
            draft.update_entry(&id, LineItem::default()),
            Err(CoreError::InvalidEntryStatus { operation: "edit", .. })
        ));
    }

    #[test]
    fn test_unknown_entry() {
        let mut draft = VoucherDraft::new(VoucherKind::Sales);
        assert!(matches!(
            draft.void_entry("missing"),
            Err(CoreError::EntryNotFound(_))
        ));
        assert!(draft.remove_entry("missing").is_err());
    }

    #[test]
    fn test_remove_entry() {
        let mut draft = VoucherDraft::new(VoucherKind::Sales);
        let id = draft.add_entry(LineItem::default()).unwrap();
        let removed = draft.remove_entry(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(draft.is_empty());
    }

    #[test]
    fn test_entry_cap() {
        let mut draft = VoucherDraft::new(VoucherKind::GatePass);
        for _ in 0..MAX_VOUCHER_ENTRIES {
            draft.add_entry(LineItem::default()).unwrap();
        }
        assert!(matches!(
            draft.add_entry(LineItem::default()),
            Err(CoreError::VoucherTooLarge { .. })
        ));
    }

    #[test]
    fn test_push_entry_reassigns_duplicate_id() {
        let mut draft = VoucherDraft::new(VoucherKind::Sales);
        let entry = VoucherEntry::new(LineItem::default());
        let first = draft.push_entry(entry.clone()).unwrap();
        let second = draft.push_entry(entry).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_sales_totals_combine_discount_stages() {
        let mut draft = VoucherDraft::new(VoucherKind::Sales);
        draft
            .add_entry(
                LineItem::new(Money::new(dec!(10)), Quantity::dozens_pieces(dec!(1), dec!(0)))
                    .with_discount(Money::zero(), Percent::new(dec!(10)))
                    .with_extra_discount(Percent::new(dec!(10))),
            )
            .unwrap();

        let totals = draft.totals();
        assert_eq!(totals.subtotal, Money::new(dec!(120)));
        assert_eq!(totals.discount, Money::new(dec!(22.8)));
        assert_eq!(totals.grand_total, Money::new(dec!(97.2)));
    }

    #[test]
    fn test_pricing_override() {
        let mut draft =
            VoucherDraft::new(VoucherKind::Sales).with_pricing(PricingRules::ALL);
        draft
            .add_entry(purchase_line(dec!(100), dec!(1), dec!(10)))
            .unwrap();
        assert_eq!(draft.totals().grand_total, Money::new(dec!(110)));
    }

    #[test]
    fn test_reset_keeps_kind_and_pricing() {
        let mut draft = VoucherDraft::editing(VoucherKind::SalesReturn, "v-9")
            .with_pricing(PricingRules::ALL);
        draft.party = "Ravi Traders".to_string();
        draft.add_entry(LineItem::default()).unwrap();

        draft.reset();
        assert_eq!(draft.kind, VoucherKind::SalesReturn);
        assert_eq!(draft.pricing, Some(PricingRules::ALL));
        assert!(draft.party.is_empty());
        assert!(draft.is_empty());
        assert!(!draft.is_edit());
    }

    #[test]
    fn test_entry_for_item() {
        let item = StockItem {
            id: Some("s-7".to_string()),
            category_id: "c-1".to_string(),
            name: "Socks".to_string(),
            hsn_code: None,
            rate: Money::new(dec!(40)),
            gst_percent: Percent::new(dec!(12)),
            unit: Default::default(),
            opening_stock: Decimal::ZERO,
        };
        let entry = VoucherEntry::for_item(&item, Quantity::units(dec!(10)));
        assert_eq!(entry.item_id.as_deref(), Some("s-7"));
        assert_eq!(entry.description, "Socks");
        assert_eq!(entry.pricing(PricingRules::PURCHASE).total, Money::new(dec!(448)));
    }

    #[test]
    fn test_draft_from_json() {
        let draft: VoucherDraft = serde_json::from_value(serde_json::json!({
            "kind": "purchase",
            "date": "2024-04-01",
            "party": "Sharma Hosiery",
            "entries": [
                { "line": { "rate": "250", "quantity": { "mode": "units", "units": 4 }, "gstPercent": "18" } }
            ]
        }))
        .unwrap();
        assert_eq!(draft.len(), 1);
        assert!(!draft.entries()[0].id.is_empty());
        assert_eq!(draft.totals().grand_total, Money::new(dec!(1180)));
    }
}
