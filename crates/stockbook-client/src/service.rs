//! # Voucher Form Service
//!
//! Owns the draft a voucher screen is editing and performs the backend round
//! trips for it.
//!
//! ## Save Flow
//! ```text
//! save()
//!   │
//!   ├── lock draft
//!   ├── validate_voucher ──✗──► ClientError::Validation (draft kept)
//!   ├── build VoucherPayload
//!   ├── submit_voucher / update_voucher ──✗──► error (draft kept)
//!   └── reset draft ──► SavedVoucher
//! ```
//!
//! The draft lock is held across the backend call, so a second `save()`
//! waits and then sees the reset form instead of submitting twice.

use std::sync::Arc;

use stockbook_core::validation::{validate_category, validate_stock_item, validate_voucher};
use stockbook_core::{
    Category, EntryStatus, LineItem, Quantity, StockItem, VoucherDraft, VoucherEntry,
    VoucherKind, VoucherPayload, VoucherTotals,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::backend::{SavedVoucher, VoucherBackend};
use crate::context::RequestContext;
use crate::error::ClientResult;

/// One voucher form bound to a backend and a request context.
pub struct VoucherForm<B: VoucherBackend> {
    backend: Arc<B>,
    ctx: RequestContext,
    draft: Mutex<VoucherDraft>,
}

impl<B: VoucherBackend> VoucherForm<B> {
    /// Opens a blank form for a new voucher of `kind`.
    pub fn new(backend: Arc<B>, ctx: RequestContext, kind: VoucherKind) -> Self {
        Self::with_draft_state(backend, ctx, VoucherDraft::new(kind))
    }

    /// Opens the form on an existing draft (edit workflow or a loaded file).
    pub fn with_draft_state(backend: Arc<B>, ctx: RequestContext, draft: VoucherDraft) -> Self {
        VoucherForm {
            backend,
            ctx,
            draft: Mutex::new(draft),
        }
    }

    pub fn context(&self) -> &RequestContext {
        &self.ctx
    }

    // =========================================================================
    // Draft Access
    // =========================================================================

    /// Reads the draft under the lock.
    pub async fn with_draft<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&VoucherDraft) -> R,
    {
        let draft = self.draft.lock().await;
        f(&draft)
    }

    /// Mutates the draft under the lock.
    pub async fn with_draft_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut VoucherDraft) -> R,
    {
        let mut draft = self.draft.lock().await;
        f(&mut draft)
    }

    pub async fn snapshot(&self) -> VoucherDraft {
        self.with_draft(|d| d.clone()).await
    }

    pub async fn totals(&self) -> VoucherTotals {
        self.with_draft(|d| d.totals()).await
    }

    pub async fn add_line(&self, line: LineItem) -> ClientResult<String> {
        Ok(self.with_draft_mut(|d| d.add_entry(line)).await?)
    }

    /// Adds a line seeded from a stock item's default rate and GST.
    pub async fn add_stock_item(&self, item: &StockItem, quantity: Quantity) -> ClientResult<String> {
        let entry = VoucherEntry::for_item(item, quantity);
        debug!(item = %item.name, "Adding stock item to voucher");
        Ok(self.with_draft_mut(|d| d.push_entry(entry)).await?)
    }

    // =========================================================================
    // Backend Round Trips
    // =========================================================================

    /// Validates and submits the draft, then resets the form.
    ///
    /// A draft with a `voucher_id` is sent as an update. On any failure the
    /// draft is left untouched so the user can correct it and retry.
    pub async fn save(&self) -> ClientResult<SavedVoucher> {
        let mut draft = self.draft.lock().await;

        if let Err(report) = validate_voucher(&draft) {
            warn!(
                voucher_type = %draft.kind,
                problems = report.len(),
                "Voucher rejected by validation"
            );
            return Err(report.into());
        }

        let payload = VoucherPayload::from(&*draft);
        let saved = match draft.voucher_id.as_deref() {
            Some(voucher_id) => {
                self.backend
                    .update_voucher(&self.ctx, voucher_id, &payload)
                    .await?
            }
            None => self.backend.submit_voucher(&self.ctx, &payload).await?,
        };

        info!(
            voucher_id = %saved.id,
            grand_total = %draft.totals().grand_total,
            "Voucher saved"
        );
        draft.reset();
        Ok(saved)
    }

    /// Flips an entry between active and voided.
    ///
    /// On a saved voucher the backend is asked first and the local status only
    /// changes once it accepts. Unsaved drafts change locally.
    pub async fn toggle_void(&self, entry_id: &str) -> ClientResult<EntryStatus> {
        let mut draft = self.draft.lock().await;
        let voiding = !draft.entry(entry_id)?.status.is_voided();

        if let Some(voucher_id) = draft.voucher_id.as_deref() {
            self.backend
                .set_entry_voided(&self.ctx, voucher_id, entry_id, voiding)
                .await?;
        }

        if voiding {
            draft.void_entry(entry_id)?;
        } else {
            draft.unvoid_entry(entry_id)?;
        }

        let status = draft.entry(entry_id)?.status;
        debug!(entry_id, %status, "Entry toggled");
        Ok(status)
    }

    // =========================================================================
    // Masters
    // =========================================================================

    pub async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.backend.list_categories(&self.ctx).await
    }

    pub async fn create_category(&self, category: &Category) -> ClientResult<Category> {
        validate_category(category)?;
        let created = self.backend.create_category(&self.ctx, category).await?;
        info!(name = %created.name, "Category created");
        Ok(created)
    }

    pub async fn list_stock_items(&self, category_id: Option<&str>) -> ClientResult<Vec<StockItem>> {
        self.backend.list_stock_items(&self.ctx, category_id).await
    }

    pub async fn create_stock_item(&self, item: &StockItem) -> ClientResult<StockItem> {
        validate_stock_item(item)?;
        let created = self.backend.create_stock_item(&self.ctx, item).await?;
        info!(name = %created.name, "Stock item created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::Mutex as StdMutex;
    use stockbook_core::{CoreError, Money, Percent, StockUnit};
    use url::Url;

    /// In-memory backend that records what it was sent.
    #[derive(Default)]
    struct MockBackend {
        submitted: StdMutex<Vec<VoucherPayload>>,
        updated: StdMutex<Vec<(String, VoucherPayload)>>,
        void_calls: StdMutex<Vec<(String, String, bool)>>,
        categories: StdMutex<Vec<Category>>,
        reject_status: Option<u16>,
    }

    impl MockBackend {
        fn rejecting(status: u16) -> Self {
            MockBackend {
                reject_status: Some(status),
                ..Default::default()
            }
        }

        fn check(&self) -> ClientResult<()> {
            match self.reject_status {
                Some(status) => Err(ClientError::Api {
                    status,
                    message: "rejected".to_string(),
                }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl VoucherBackend for MockBackend {
        async fn submit_voucher(
            &self,
            _ctx: &RequestContext,
            payload: &VoucherPayload,
        ) -> ClientResult<SavedVoucher> {
            self.check()?;
            let mut submitted = self.submitted.lock().unwrap();
            submitted.push(payload.clone());
            Ok(SavedVoucher {
                id: format!("v-{}", submitted.len()),
                number: None,
            })
        }

        async fn update_voucher(
            &self,
            _ctx: &RequestContext,
            voucher_id: &str,
            payload: &VoucherPayload,
        ) -> ClientResult<SavedVoucher> {
            self.check()?;
            self.updated
                .lock()
                .unwrap()
                .push((voucher_id.to_string(), payload.clone()));
            Ok(SavedVoucher {
                id: voucher_id.to_string(),
                number: None,
            })
        }

        async fn set_entry_voided(
            &self,
            _ctx: &RequestContext,
            voucher_id: &str,
            entry_id: &str,
            voided: bool,
        ) -> ClientResult<()> {
            self.check()?;
            self.void_calls
                .lock()
                .unwrap()
                .push((voucher_id.to_string(), entry_id.to_string(), voided));
            Ok(())
        }

        async fn list_categories(&self, _ctx: &RequestContext) -> ClientResult<Vec<Category>> {
            Ok(self.categories.lock().unwrap().clone())
        }

        async fn create_category(
            &self,
            _ctx: &RequestContext,
            category: &Category,
        ) -> ClientResult<Category> {
            self.check()?;
            let mut categories = self.categories.lock().unwrap();
            let created = Category {
                id: Some(format!("c-{}", categories.len() + 1)),
                ..category.clone()
            };
            categories.push(created.clone());
            Ok(created)
        }

        async fn list_stock_items(
            &self,
            _ctx: &RequestContext,
            _category_id: Option<&str>,
        ) -> ClientResult<Vec<StockItem>> {
            Ok(Vec::new())
        }

        async fn create_stock_item(
            &self,
            _ctx: &RequestContext,
            item: &StockItem,
        ) -> ClientResult<StockItem> {
            self.check()?;
            Ok(StockItem {
                id: Some("i-1".to_string()),
                ..item.clone()
            })
        }
    }

    fn ctx() -> RequestContext {
        RequestContext::new(Url::parse("http://localhost:8000").unwrap(), "sharma")
    }

    fn line() -> LineItem {
        LineItem::new(Money::new(dec!(250)), Quantity::units(dec!(4)))
            .with_gst(Percent::new(dec!(18)))
    }

    async fn filled_form(backend: Arc<MockBackend>) -> VoucherForm<MockBackend> {
        let form = VoucherForm::new(backend, ctx(), VoucherKind::Purchase);
        form.with_draft_mut(|d| {
            d.date = NaiveDate::from_ymd_opt(2024, 4, 1);
            d.party = "Sharma Hosiery".to_string();
        })
        .await;
        form.add_line(line()).await.unwrap();
        form
    }

    #[tokio::test]
    async fn test_save_submits_once_and_resets() {
        let backend = Arc::new(MockBackend::default());
        let form = filled_form(backend.clone()).await;

        let saved = form.save().await.unwrap();

        assert_eq!(saved.id, "v-1");
        let submitted = backend.submitted.lock().unwrap().clone();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].grand_total, dec!(1180));

        let draft = form.snapshot().await;
        assert!(draft.is_empty());
        assert!(draft.party.is_empty());
        assert_eq!(draft.kind, VoucherKind::Purchase);
    }

    #[tokio::test]
    async fn test_save_blocked_by_validation_keeps_draft() {
        let backend = Arc::new(MockBackend::default());
        let form = VoucherForm::new(backend.clone(), ctx(), VoucherKind::Sales);
        form.add_line(line()).await.unwrap();

        let err = form.save().await.unwrap_err();

        assert!(matches!(err, ClientError::Validation(_)));
        assert!(err.to_string().starts_with("Please fix 2 problems"));
        assert!(backend.submitted.lock().unwrap().is_empty());
        assert_eq!(form.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_save_failure_keeps_draft() {
        let backend = Arc::new(MockBackend::rejecting(500));
        let form = filled_form(backend).await;

        let err = form.save().await.unwrap_err();

        assert!(matches!(err, ClientError::Api { status: 500, .. }));
        let draft = form.snapshot().await;
        assert_eq!(draft.len(), 1);
        assert_eq!(draft.party, "Sharma Hosiery");
    }

    #[tokio::test]
    async fn test_save_edit_sends_update() {
        let backend = Arc::new(MockBackend::default());
        let mut draft = VoucherDraft::editing(VoucherKind::Purchase, "v-42");
        draft.date = NaiveDate::from_ymd_opt(2024, 4, 1);
        draft.party = "Sharma Hosiery".to_string();
        draft.add_entry(line()).unwrap();
        let form = VoucherForm::with_draft_state(backend.clone(), ctx(), draft);

        let saved = form.save().await.unwrap();

        assert_eq!(saved.id, "v-42");
        assert!(backend.submitted.lock().unwrap().is_empty());
        assert_eq!(backend.updated.lock().unwrap()[0].0, "v-42");
    }

    #[tokio::test]
    async fn test_toggle_void_on_saved_voucher_round_trips() {
        let backend = Arc::new(MockBackend::default());
        let mut draft = VoucherDraft::editing(VoucherKind::Purchase, "v-42");
        let entry_id = draft.add_entry(line()).unwrap();
        let form = VoucherForm::with_draft_state(backend.clone(), ctx(), draft);

        assert_eq!(form.toggle_void(&entry_id).await.unwrap(), EntryStatus::Voided);
        assert!(form.totals().await.grand_total.is_zero());

        assert_eq!(form.toggle_void(&entry_id).await.unwrap(), EntryStatus::Active);
        assert_eq!(form.totals().await.grand_total, Money::new(dec!(1180)));

        let calls = backend.void_calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                ("v-42".to_string(), entry_id.clone(), true),
                ("v-42".to_string(), entry_id, false),
            ]
        );
    }

    #[tokio::test]
    async fn test_toggle_void_rejected_by_backend_keeps_status() {
        let backend = Arc::new(MockBackend::rejecting(403));
        let mut draft = VoucherDraft::editing(VoucherKind::Sales, "v-9");
        let entry_id = draft.add_entry(line()).unwrap();
        let form = VoucherForm::with_draft_state(backend, ctx(), draft);

        assert!(form.toggle_void(&entry_id).await.is_err());
        let status = form
            .with_draft(|d| d.entry(&entry_id).map(|e| e.status))
            .await
            .unwrap();
        assert_eq!(status, EntryStatus::Active);
    }

    #[tokio::test]
    async fn test_toggle_void_unsaved_draft_is_local() {
        let backend = Arc::new(MockBackend::default());
        let form = VoucherForm::new(backend.clone(), ctx(), VoucherKind::Purchase);
        let entry_id = form.add_line(line()).await.unwrap();

        assert_eq!(form.toggle_void(&entry_id).await.unwrap(), EntryStatus::Voided);
        assert!(backend.void_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_void_unknown_entry() {
        let form = VoucherForm::new(Arc::new(MockBackend::default()), ctx(), VoucherKind::Purchase);
        let err = form.toggle_void("missing").await.unwrap_err();
        assert!(matches!(err, ClientError::Core(CoreError::EntryNotFound(_))));
    }

    #[tokio::test]
    async fn test_add_stock_item_seeds_rate_and_gst() {
        let form = VoucherForm::new(Arc::new(MockBackend::default()), ctx(), VoucherKind::Purchase);
        let item = StockItem {
            id: Some("i-1".to_string()),
            category_id: "c-1".to_string(),
            name: "Cotton socks".to_string(),
            hsn_code: None,
            rate: Money::new(dec!(100)),
            gst_percent: Percent::new(dec!(5)),
            unit: StockUnit::Dozens,
            opening_stock: dec!(0),
        };

        let entry_id = form
            .add_stock_item(&item, Quantity::dozens_pieces(dec!(1), dec!(0)))
            .await
            .unwrap();

        let pricing = form
            .with_draft(|d| d.entry_pricing(&entry_id))
            .await
            .unwrap();
        assert_eq!(pricing.total, Money::new(dec!(1260)));
    }

    #[tokio::test]
    async fn test_create_category_validates_first() {
        let backend = Arc::new(MockBackend::default());
        let form = VoucherForm::new(backend.clone(), ctx(), VoucherKind::Purchase);

        let err = form.create_category(&Category::new("  ")).await.unwrap_err();
        assert!(err.is_user_fixable());
        assert!(backend.categories.lock().unwrap().is_empty());

        let created = form.create_category(&Category::new("Hosiery")).await.unwrap();
        assert_eq!(created.id.as_deref(), Some("c-1"));
        assert_eq!(form.list_categories().await.unwrap().len(), 1);
    }
}
