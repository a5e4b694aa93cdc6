//! # stockbook-core: Pure Business Logic for Stockbook
//!
//! This crate is the **heart** of Stockbook. It contains the voucher
//! arithmetic and form rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Voucher screens / stockbook-cli                 │   │
//! │  │   Purchase ── Sales ── Returns ── Gate Pass ── Stock            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          stockbook-client (config, gateway, form service)       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stockbook-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐  │   │
//! │  │  │  money  │ │ pricing │ │ voucher │ │validation│ │ payload │  │   │
//! │  │  │  Money  │ │LineItem │ │ Draft   │ │  Report  │ │  JSON   │  │   │
//! │  │  │ Percent │ │  Rules  │ │ Totals  │ │  checks  │ │  body   │  │   │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └──────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Category, StockItem, VoucherKind, Percent)
//! - [`money`] - Decimal money, rounded only for display
//! - [`pricing`] - The shared line pricing rule
//! - [`voucher`] - Voucher drafts, void/unvoid, totals
//! - [`validation`] - Pre-submission validation
//! - [`payload`] - Outbound voucher body
//! - [`form`] - Lenient numeric input coercion
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use stockbook_core::pricing::{LineItem, Quantity};
//! use stockbook_core::{Money, Percent, VoucherDraft, VoucherKind};
//!
//! let mut draft = VoucherDraft::new(VoucherKind::Purchase);
//! draft
//!     .add_entry(
//!         LineItem::new(Money::new(Decimal::from(250)), Quantity::units(4))
//!             .with_gst(Percent::new(Decimal::from(18))),
//!     )
//!     .unwrap();
//!
//! assert_eq!(draft.totals().grand_total.to_string(), "1180.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod form;
pub mod money;
pub mod payload;
pub mod pricing;
pub mod types;
pub mod validation;
pub mod voucher;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError, ValidationReport};
pub use money::Money;
pub use payload::VoucherPayload;
pub use pricing::{price_line, LineItem, LinePricing, PricingRules, Quantity};
pub use types::*;
pub use voucher::{VoucherDraft, VoucherEntry, VoucherTotals};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum entries allowed on a single voucher.
pub const MAX_VOUCHER_ENTRIES: usize = 200;

/// Maximum length of names (party, category, item).
pub const MAX_NAME_LENGTH: usize = 200;
