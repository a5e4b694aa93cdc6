//! # HTTP Backend
//!
//! [`VoucherBackend`] over JSON/HTTP with `reqwest`.
//!
//! Every request carries:
//! - `Authorization: Bearer <token>` when the context has a token
//! - `X-Db-Prefix` selecting the company's books
//! - `X-Section` when a section is set
//!
//! Non-success responses become [`ClientError::Api`] with the backend's
//! `message`/`error`/`detail` field when the body has one, otherwise the raw
//! body text.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use stockbook_core::{Category, StockItem, VoucherPayload};
use tracing::{debug, info};

use crate::backend::{SavedVoucher, VoucherBackend};
use crate::config::ClientConfig;
use crate::context::RequestContext;
use crate::error::{ClientError, ClientResult};

const DB_PREFIX_HEADER: &str = "X-Db-Prefix";
const SECTION_HEADER: &str = "X-Section";

/// JSON/HTTP implementation of the backend gateway.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
}

impl HttpBackend {
    /// Builds a backend whose requests time out after the configured period.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        HttpBackend { client }
    }

    fn request(&self, ctx: &RequestContext, method: Method, path: &[&str]) -> ClientResult<RequestBuilder> {
        let url = ctx.endpoint(path)?;
        debug!(%method, %url, db_prefix = ctx.db_prefix(), "Backend request");

        let mut request = self
            .client
            .request(method, url)
            .header(DB_PREFIX_HEADER, ctx.db_prefix());
        if let Some(token) = ctx.token() {
            request = request.bearer_auth(token);
        }
        if let Some(section) = ctx.section() {
            request = request.header(SECTION_HEADER, section);
        }
        Ok(request)
    }

    async fn send_json<B, T>(&self, ctx: &RequestContext, method: Method, path: &[&str], body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(ctx, method, path)?.json(body).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn get_json<T>(&self, request: RequestBuilder) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }
}

/// Passes success responses through and turns the rest into `Api` errors.
async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    debug!(status = status.as_u16(), "Backend response");
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message: error_message(&body, status.canonical_reason()),
    })
}

fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(serde_json::Value::Object(fields)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(serde_json::Value::String(message)) = fields.get(key) {
                return message.clone();
            }
        }
    }

    let body = body.trim();
    if body.is_empty() {
        reason.unwrap_or("request failed").to_string()
    } else {
        body.to_string()
    }
}

#[async_trait]
impl VoucherBackend for HttpBackend {
    async fn submit_voucher(
        &self,
        ctx: &RequestContext,
        payload: &VoucherPayload,
    ) -> ClientResult<SavedVoucher> {
        let saved: SavedVoucher = self.send_json(ctx, Method::POST, &["vouchers"], payload).await?;
        info!(
            voucher_id = %saved.id,
            voucher_type = %payload.voucher_type,
            entries = payload.entries.len(),
            "Voucher submitted"
        );
        Ok(saved)
    }

    async fn update_voucher(
        &self,
        ctx: &RequestContext,
        voucher_id: &str,
        payload: &VoucherPayload,
    ) -> ClientResult<SavedVoucher> {
        let saved: SavedVoucher = self
            .send_json(ctx, Method::PUT, &["vouchers", voucher_id], payload)
            .await?;
        info!(voucher_id = %saved.id, "Voucher updated");
        Ok(saved)
    }

    async fn set_entry_voided(
        &self,
        ctx: &RequestContext,
        voucher_id: &str,
        entry_id: &str,
        voided: bool,
    ) -> ClientResult<()> {
        let action = if voided { "void" } else { "unvoid" };
        let path = ["vouchers", voucher_id, "entries", entry_id, action];
        let response = self.request(ctx, Method::POST, &path)?.send().await?;
        check_status(response).await?;
        info!(voucher_id, entry_id, voided, "Entry status changed");
        Ok(())
    }

    async fn list_categories(&self, ctx: &RequestContext) -> ClientResult<Vec<Category>> {
        self.get_json(self.request(ctx, Method::GET, &["categories"])?).await
    }

    async fn create_category(
        &self,
        ctx: &RequestContext,
        category: &Category,
    ) -> ClientResult<Category> {
        self.send_json(ctx, Method::POST, &["categories"], category).await
    }

    async fn list_stock_items(
        &self,
        ctx: &RequestContext,
        category_id: Option<&str>,
    ) -> ClientResult<Vec<StockItem>> {
        let mut request = self.request(ctx, Method::GET, &["stock-items"])?;
        if let Some(category_id) = category_id {
            request = request.query(&[("categoryId", category_id)]);
        }
        self.get_json(request).await
    }

    async fn create_stock_item(
        &self,
        ctx: &RequestContext,
        item: &StockItem,
    ) -> ClientResult<StockItem> {
        self.send_json(ctx, Method::POST, &["stock-items"], item).await
    }
}
