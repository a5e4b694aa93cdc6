//! Per-call request context.
//!
//! Every backend call carries the caller's token, the database prefix that
//! selects the company's books, and the current section. Passing this value
//! explicitly keeps the gateway free of ambient session state.

use std::fmt;
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Prefix every backend route lives under.
const API_PREFIX: &str = "api/";

#[derive(Clone, PartialEq, Eq)]
pub struct RequestContext {
    base_url: Url,
    token: Option<String>,
    db_prefix: String,
    section: Option<String>,
}

impl RequestContext {
    pub fn new(base_url: Url, db_prefix: impl Into<String>) -> Self {
        RequestContext {
            base_url: normalize_base(base_url),
            token: None,
            db_prefix: db_prefix.into(),
            section: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn db_prefix(&self) -> &str {
        &self.db_prefix
    }

    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// Resolves a backend route from its path segments.
    ///
    /// Each segment is percent-encoded on its own, so an id containing `/`,
    /// `?` or `#` stays inside its segment. Empty, `.` and `..` segments are
    /// rejected.
    ///
    /// ```rust
    /// use stockbook_client::RequestContext;
    /// use url::Url;
    ///
    /// let ctx = RequestContext::new(Url::parse("https://books.example.com/erp").unwrap(), "acme");
    /// assert_eq!(
    ///     ctx.endpoint(&["vouchers", "42"]).unwrap().as_str(),
    ///     "https://books.example.com/erp/api/vouchers/42"
    /// );
    /// ```
    pub fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(ClientError::InvalidPathSegment(bad.to_string()));
        }

        let mut url = self.base_url.join(API_PREFIX)?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidConfig(format!("backend url cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Ensures the base ends in `/` so that `join` appends instead of replacing
/// the last path segment.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

// The token must never reach logs.
impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("db_prefix", &self.db_prefix)
            .field("section", &self.section)
            .finish()
    }
}
