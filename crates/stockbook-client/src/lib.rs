//! # stockbook-client: Backend Gateway and Form Service
//!
//! Connects the pure voucher logic in `stockbook-core` to the REST backend.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ClientConfig::load ──► request_context() ──► RequestContext            │
//! │        │                                           │                    │
//! │        ▼                                           ▼                    │
//! │  HttpBackend::new ─────────────────────► VoucherForm<HttpBackend>       │
//! │                                           │  draft: Mutex<VoucherDraft> │
//! │                                           │  save() / toggle_void()     │
//! │                                           ▼                             │
//! │                          POST /api/vouchers  (X-Db-Prefix, X-Section)   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Layered client configuration
//! - [`context`] - Per-call request context
//! - [`backend`] - The `VoucherBackend` seam
//! - [`http`] - reqwest implementation of the seam
//! - [`service`] - `VoucherForm`, the form service
//! - [`error`] - Client error types

pub mod backend;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod service;

pub use backend::{SavedVoucher, VoucherBackend};
pub use config::ClientConfig;
pub use context::RequestContext;
pub use error::{ClientError, ClientResult};
pub use http::HttpBackend;
pub use service::VoucherForm;
