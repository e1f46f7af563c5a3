//! HTTP transport types and the engine seam.
//!
//! # Design
//! Requests and responses are plain data. The pipeline never talks to a
//! socket directly: it builds an `HttpRequest`, hands it to an `HttpEngine`
//! handle and interprets the `HttpResponse` that comes back. Handles are
//! produced by an `HttpEngineFactory`, either scoped to a user token or
//! token-less, so authentication is fixed when the handle is built rather
//! than patched onto individual requests.

use std::fmt;

/// HTTP method for a request. The cinema API only uses these three verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters in call-site order.
///
/// Order is preserved on the wire. Cache keys canonicalize it away, see
/// `cache::KeyGenerator`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(Vec<(String, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Pairs sorted by key, then value.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> =
            self.0.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        pairs.sort_unstable();
        pairs
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// An HTTP request described as plain data.
///
/// `path` is relative to the engine's configured host (e.g. `chains/7/ticket-types`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Query,
    pub body: Option<String>,
}

/// An HTTP response described as plain data. Consumed once by `RequestSender`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// A failure below HTTP semantics: connection refused, timeout, TLS and so on.
///
/// The pipeline never interprets or retries these; it carries the engine's
/// own error through untouched.
#[derive(Debug, thiserror::Error)]
#[error("transport failure: {0}")]
pub struct TransportError(#[source] Box<dyn std::error::Error + Send + Sync>);

impl TransportError {
    pub fn new(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Box::new(source))
    }

    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync> {
        self.0
    }
}

/// Executes one exchange against the configured API host.
pub trait HttpEngine {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Builds engine handles, optionally scoped to a user token.
pub trait HttpEngineFactory: Send + Sync {
    type Engine: HttpEngine;

    /// A handle that authenticates every request as the given user.
    fn create(&self, user_token: &str) -> Self::Engine;

    /// A handle that carries no user credential.
    fn create_unauthenticated(&self) -> Self::Engine;
}
