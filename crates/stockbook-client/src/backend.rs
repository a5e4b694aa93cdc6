//! # Backend Gateway
//!
//! The seam between the form service and the REST backend. The service only
//! sees [`VoucherBackend`]; [`crate::HttpBackend`] is the production
//! implementation and tests substitute an in-memory one.
//!
//! ## Routes
//! ```text
//! POST  /api/vouchers                               submit_voucher
//! PUT   /api/vouchers/{id}                          update_voucher
//! POST  /api/vouchers/{id}/entries/{entry}/void     set_entry_voided(true)
//! POST  /api/vouchers/{id}/entries/{entry}/unvoid   set_entry_voided(false)
//! GET   /api/categories                             list_categories
//! POST  /api/categories                             create_category
//! GET   /api/stock-items?categoryId=…               list_stock_items
//! POST  /api/stock-items                            create_stock_item
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stockbook_core::{Category, StockItem, VoucherPayload};

use crate::context::RequestContext;
use crate::error::ClientResult;

/// Backend acknowledgement of a saved voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedVoucher {
    pub id: String,

    /// Voucher number assigned by the backend, when it numbers vouchers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

/// Operations the voucher screens need from the backend.
#[async_trait]
pub trait VoucherBackend: Send + Sync {
    /// Creates a new voucher.
    async fn submit_voucher(
        &self,
        ctx: &RequestContext,
        payload: &VoucherPayload,
    ) -> ClientResult<SavedVoucher>;

    /// Replaces an existing voucher (edit workflow).
    async fn update_voucher(
        &self,
        ctx: &RequestContext,
        voucher_id: &str,
        payload: &VoucherPayload,
    ) -> ClientResult<SavedVoucher>;

    /// Voids or restores one entry of a saved voucher.
    async fn set_entry_voided(
        &self,
        ctx: &RequestContext,
        voucher_id: &str,
        entry_id: &str,
        voided: bool,
    ) -> ClientResult<()>;

    async fn list_categories(&self, ctx: &RequestContext) -> ClientResult<Vec<Category>>;

    async fn create_category(
        &self,
        ctx: &RequestContext,
        category: &Category,
    ) -> ClientResult<Category>;

    /// Lists stock items, optionally restricted to one category.
    async fn list_stock_items(
        &self,
        ctx: &RequestContext,
        category_id: Option<&str>,
    ) -> ClientResult<Vec<StockItem>>;

    async fn create_stock_item(
        &self,
        ctx: &RequestContext,
        item: &StockItem,
    ) -> ClientResult<StockItem>;
}
