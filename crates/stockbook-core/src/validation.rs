//! # Validation Module
//!
//! Pre-submission validation for Stockbook forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form input                                                   │
//! │  └── Numeric fields coerce to 0, never fail (see `form`)               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Save button                                                  │
//! │  └── THIS MODULE: collect EVERY problem into one ValidationReport      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── Uniqueness, references, permissions                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Intermediate form states are allowed to be invalid. Validation only
//! gates the save action and reports all problems in a single message.
//!
//! ## Usage
//! ```rust
//! use stockbook_core::validation::validate_voucher;
//! use stockbook_core::{VoucherDraft, VoucherKind};
//!
//! let draft = VoucherDraft::new(VoucherKind::Purchase);
//! let report = validate_voucher(&draft).unwrap_err();
//! assert!(report.to_string().contains("party is required"));
//! ```

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::error::{ValidationError, ValidationReport};
use crate::money::Money;
use crate::pricing::{price_line, LineItem, PricingRules, Quantity};
use crate::types::{Category, Percent, StockItem};
use crate::voucher::VoucherDraft;
use crate::{MAX_NAME_LENGTH, MAX_VOUCHER_ENTRIES};

/// Result type for single-field validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required, length-limited text field.
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_name;
///
/// assert!(validate_name("category name", "Hosiery").is_ok());
/// assert!(validate_name("category name", "  ").is_err());
/// ```
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_uuid;
///
/// assert!(validate_uuid("entry id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("entry id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates that a decimal is not negative.
pub fn validate_non_negative(field: &str, value: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates that money is not negative.
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    validate_non_negative(field, amount.amount())
}

/// Validates a percentage lies in `[0, 100]`.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use stockbook_core::validation::validate_percent;
/// use stockbook_core::Percent;
///
/// assert!(validate_percent("GST %", Percent::new(Decimal::from(18))).is_ok());
/// assert!(validate_percent("GST %", Percent::new(Decimal::from(118))).is_err());
/// ```
pub fn validate_percent(field: &str, percent: Percent) -> ValidationResult<()> {
    if !percent.is_within_bounds() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

/// Validates a line quantity: no negative parts, more than zero units.
pub fn validate_quantity(field: &str, quantity: &Quantity) -> ValidationResult<()> {
    match *quantity {
        Quantity::Units { units } => validate_non_negative(field, units)?,
        Quantity::DozensPieces { dozens, pieces } => {
            validate_non_negative(&format!("{} dozens", field), dozens)?;
            validate_non_negative(&format!("{} pieces", field), pieces)?;
        }
    }

    match quantity.total_units() {
        Some(units) if units > Decimal::ZERO => Ok(()),
        Some(_) => Err(ValidationError::MustBePositive {
            field: field.to_string(),
        }),
        None => Err(ValidationError::Overflow {
            field: field.to_string(),
        }),
    }
}

// =============================================================================
// Line Validation
// =============================================================================

/// Checks one line under the given rules, recording every problem.
///
/// `label` prefixes field names (`"line 2"` → `"line 2 rate"`). Fields of
/// disabled pricing stages are ignored.
pub fn check_line(label: &str, line: &LineItem, rules: PricingRules, report: &mut ValidationReport) {
    report.check(validate_amount(&format!("{} rate", label), line.rate));
    report.check(validate_quantity(&format!("{} quantity", label), &line.quantity));

    if rules.has_gst {
        report.check(validate_percent(&format!("{} GST %", label), line.gst_percent));
    }
    if rules.has_discount {
        report.check(validate_amount(
            &format!("{} discount", label),
            line.discount_amount,
        ));
        report.check(validate_percent(
            &format!("{} discount %", label),
            line.discount_percent,
        ));
    }
    if rules.has_extra_discount {
        report.check(validate_percent(
            &format!("{} extra discount %", label),
            line.extra_discount_percent,
        ));
    }

    let priced = price_line(line, rules);
    if priced.overflow {
        report.push(ValidationError::Overflow {
            field: format!("{} total", label),
        });
    } else if priced.negative_clamped {
        report.push(ValidationError::NegativeTotal {
            field: format!("{} total", label),
        });
    }
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates a voucher before it is saved.
///
/// ## Rules
/// - Date and party are required
/// - At least one active entry
/// - No more than [`MAX_VOUCHER_ENTRIES`] entries
/// - Entry ids are UUIDs and unique within the voucher
/// - Every active entry passes [`check_line`]; voided entries are skipped
/// - The voucher totals can be represented
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Click Save                                                             │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_voucher(&draft) ← THIS FUNCTION                               │
/// │       │                                                                 │
/// │       ├── problems? → one snackbar: "Please fix 2 problems: ..."       │
/// │       │               (form keeps its state)                           │
/// │       │                                                                 │
/// │       └── OK → submit to backend → reset form                          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_voucher(draft: &VoucherDraft) -> Result<(), ValidationReport> {
    let mut report = ValidationReport::new();
    let rules = draft.rules();

    if draft.date.is_none() {
        report.push(ValidationError::Required {
            field: "date".to_string(),
        });
    }
    report.check(validate_name("party", &draft.party));

    if draft.len() > MAX_VOUCHER_ENTRIES {
        report.push(ValidationError::OutOfRange {
            field: "entries".to_string(),
            min: 1,
            max: MAX_VOUCHER_ENTRIES as i64,
        });
    }
    if draft.active_entries().next().is_none() {
        report.push(ValidationError::Required {
            field: "at least one entry".to_string(),
        });
    }

    let mut seen_ids = HashSet::new();
    for (index, entry) in draft.entries().iter().enumerate() {
        let label = format!("line {}", index + 1);
        let id_field = format!("{} id", label);
        report.check(validate_uuid(&id_field, &entry.id));
        if !seen_ids.insert(entry.id.as_str()) {
            report.push(ValidationError::Duplicate {
                field: id_field,
                value: entry.id.clone(),
            });
        }
        if entry.is_active() {
            check_line(&label, &entry.line, rules, &mut report);
        }
    }

    if draft.totals().overflow {
        report.push(ValidationError::Overflow {
            field: "grand total".to_string(),
        });
    }

    report.into_result()
}

/// Validates a category before it is created.
pub fn validate_category(category: &Category) -> Result<(), ValidationReport> {
    let mut report = ValidationReport::new();
    report.check(validate_name("category name", &category.name));
    report.into_result()
}

/// Validates a stock item before it is created.
pub fn validate_stock_item(item: &StockItem) -> Result<(), ValidationReport> {
    let mut report = ValidationReport::new();
    report.check(validate_name("item name", &item.name));
    if item.category_id.trim().is_empty() {
        report.push(ValidationError::Required {
            field: "category".to_string(),
        });
    }
    report.check(validate_amount("rate", item.rate));
    report.check(validate_percent("GST %", item.gst_percent));
    report.check(validate_non_negative("opening stock", item.opening_stock));
    report.into_result()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StockUnit, VoucherKind};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn ready_draft() -> VoucherDraft {
        let mut draft = VoucherDraft::new(VoucherKind::Purchase);
        draft.date = NaiveDate::from_ymd_opt(2024, 4, 1);
        draft.party = "Sharma Hosiery".to_string();
        draft
            .add_entry(
                LineItem::new(Money::new(dec!(250)), Quantity::units(dec!(4)))
                    .with_gst(Percent::new(dec!(18))),
            )
            .unwrap();
        draft
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("party", "Ravi Traders").is_ok());
        assert!(validate_name("party", "").is_err());
        assert!(validate_name("party", &"A".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_percent() {
        assert!(validate_percent("GST %", Percent::new(dec!(0))).is_ok());
        assert!(validate_percent("GST %", Percent::new(dec!(100))).is_ok());
        assert!(validate_percent("GST %", Percent::new(dec!(-5))).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity("qty", &Quantity::units(dec!(1))).is_ok());
        assert!(validate_quantity("qty", &Quantity::dozens_pieces(dec!(0), dec!(3))).is_ok());
        assert_eq!(
            validate_quantity("qty", &Quantity::units(dec!(0))),
            Err(ValidationError::MustBePositive {
                field: "qty".to_string()
            })
        );
        assert_eq!(
            validate_quantity("qty", &Quantity::dozens_pieces(dec!(-1), dec!(20))),
            Err(ValidationError::Negative {
                field: "qty dozens".to_string()
            })
        );
    }

    #[test]
    fn test_valid_voucher_passes() {
        assert!(validate_voucher(&ready_draft()).is_ok());
    }

    #[test]
    fn test_blank_voucher_reports_everything_at_once() {
        let draft = VoucherDraft::new(VoucherKind::Sales);
        let report = validate_voucher(&draft).unwrap_err();
        assert_eq!(report.len(), 3);
        assert_eq!(
            report.to_string(),
            "Please fix 3 problems: date is required; party is required; at least one entry is required"
        );
    }

    #[test]
    fn test_line_problems_are_labelled() {
        let mut draft = ready_draft();
        draft
            .add_entry(
                LineItem::new(Money::new(dec!(-1)), Quantity::units(dec!(0)))
                    .with_gst(Percent::new(dec!(150))),
            )
            .unwrap();

        let report = validate_voucher(&draft).unwrap_err();
        let messages: Vec<String> = report.errors().iter().map(|e| e.to_string()).collect();
        assert!(messages.contains(&"line 2 rate must not be negative".to_string()));
        assert!(messages.contains(&"line 2 quantity must be greater than zero".to_string()));
        assert!(messages.contains(&"line 2 GST % must be between 0 and 100".to_string()));
    }

    #[test]
    fn test_negative_total_flagged_upstream() {
        let mut draft = VoucherDraft::new(VoucherKind::Sales);
        draft.date = NaiveDate::from_ymd_opt(2024, 4, 1);
        draft.party = "Walk-in".to_string();
        draft
            .add_entry(
                LineItem::new(Money::new(dec!(10)), Quantity::units(dec!(1)))
                    .with_discount(Money::new(dec!(50)), Percent::zero()),
            )
            .unwrap();

        let report = validate_voucher(&draft).unwrap_err();
        assert_eq!(
            report.errors(),
            &[ValidationError::NegativeTotal {
                field: "line 1 total".to_string()
            }]
        );
    }

    #[test]
    fn test_disabled_stages_not_validated() {
        let mut draft = ready_draft();
        let id = draft.entries()[0].id.clone();
        let line = draft.entries()[0]
            .line
            .clone()
            .with_extra_discount(Percent::new(dec!(500)));
        draft.update_entry(&id, line).unwrap();
        // purchase rules ignore the extra discount
        assert!(validate_voucher(&draft).is_ok());
    }

    #[test]
    fn test_voided_entries_skip_line_checks() {
        let mut draft = ready_draft();
        let bad = draft
            .add_entry(LineItem::new(Money::new(dec!(-5)), Quantity::units(dec!(0))))
            .unwrap();
        assert!(validate_voucher(&draft).is_err());

        draft.void_entry(&bad).unwrap();
        assert!(validate_voucher(&draft).is_ok());
    }

    #[test]
    fn test_only_voided_entries_is_empty_voucher() {
        let mut draft = ready_draft();
        let id = draft.entries()[0].id.clone();
        draft.void_entry(&id).unwrap();
        let report = validate_voucher(&draft).unwrap_err();
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_duplicate_entry_ids_rejected() {
        let draft: VoucherDraft = serde_json::from_value(serde_json::json!({
            "kind": "purchase",
            "party": "Sharma Hosiery",
            "date": "2024-04-01",
            "entries": [
                {
                    "id": "550e8400-e29b-41d4-a716-446655440000",
                    "description": "Cotton socks",
                    "line": { "rate": "250", "quantity": { "mode": "units", "units": "4" } }
                },
                {
                    "id": "550e8400-e29b-41d4-a716-446655440000",
                    "description": "Woollen socks",
                    "line": { "rate": "300", "quantity": { "mode": "units", "units": "2" } }
                }
            ]
        }))
        .unwrap();

        let report = validate_voucher(&draft).unwrap_err();
        assert_eq!(
            report.errors(),
            &[ValidationError::Duplicate {
                field: "line 2 id".to_string(),
                value: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            }]
        );
    }

    #[test]
    fn test_totals_overflow_rejected() {
        let mut draft = ready_draft();
        draft
            .add_entry(LineItem::new(Money::new(Decimal::MAX), Quantity::units(dec!(1))))
            .unwrap();
        draft
            .add_entry(LineItem::new(Money::new(Decimal::MAX), Quantity::units(dec!(1))))
            .unwrap();

        let report = validate_voucher(&draft).unwrap_err();
        assert_eq!(
            report.errors(),
            &[ValidationError::Overflow {
                field: "grand total".to_string()
            }]
        );
    }

    #[test]
    fn test_validate_category() {
        assert!(validate_category(&Category::new("Hosiery")).is_ok());
        assert!(validate_category(&Category::new(" ")).is_err());
    }

    #[test]
    fn test_validate_stock_item() {
        let item = StockItem {
            id: None,
            category_id: String::new(),
            name: "Vest".to_string(),
            hsn_code: None,
            rate: Money::new(dec!(-1)),
            gst_percent: Percent::new(dec!(5)),
            unit: StockUnit::Pieces,
            opening_stock: dec!(10),
        };
        let report = validate_stock_item(&item).unwrap_err();
        assert_eq!(report.len(), 2);
    }
}
