//! Verb-oriented entry point for the cinema API.
//!
//! # Design
//! `RequestClient` composes three collaborators: the token provider decides
//! whether an authenticated call may proceed, the engine factory builds a
//! handle scoped to that token, and `RequestSender` performs the exchange.
//! Authentication is checked before any handle is built, so a call without
//! a user token never reaches the network.
//!
//! The `Client` trait is the seam resource code depends on; the caching
//! decorator implements it as well.

use serde::Serialize;
use tracing::debug;

use crate::auth::AuthTokenProvider;
use crate::error::ApiError;
use crate::http::{HttpEngineFactory, HttpMethod, Query};
use crate::response::ClientResponse;
use crate::sender::RequestSender;
use crate::status::ExpectedStatus;

/// Operations resource code uses to reach the API.
pub trait Client: Send + Sync {
    fn get(&self, path: &str, query: &Query, expected: &ExpectedStatus) -> Result<ClientResponse, ApiError>;

    fn post(&self, path: &str, body: &str, expected: &ExpectedStatus) -> Result<ClientResponse, ApiError>;

    fn patch(&self, path: &str, body: &str, expected: &ExpectedStatus) -> Result<ClientResponse, ApiError>;

    fn get_unauthenticated(
        &self,
        path: &str,
        query: &Query,
        expected: &ExpectedStatus,
    ) -> Result<ClientResponse, ApiError>;

    fn post_unauthenticated(
        &self,
        path: &str,
        body: &str,
        expected: &ExpectedStatus,
    ) -> Result<ClientResponse, ApiError>;

    /// Whether authenticated operations can currently proceed.
    fn is_authenticated(&self) -> bool;
}

impl<C: Client + ?Sized> Client for std::sync::Arc<C> {
    fn get(&self, path: &str, query: &Query, expected: &ExpectedStatus) -> Result<ClientResponse, ApiError> {
        (**self).get(path, query, expected)
    }

    fn post(&self, path: &str, body: &str, expected: &ExpectedStatus) -> Result<ClientResponse, ApiError> {
        (**self).post(path, body, expected)
    }

    fn patch(&self, path: &str, body: &str, expected: &ExpectedStatus) -> Result<ClientResponse, ApiError> {
        (**self).patch(path, body, expected)
    }

    fn get_unauthenticated(
        &self,
        path: &str,
        query: &Query,
        expected: &ExpectedStatus,
    ) -> Result<ClientResponse, ApiError> {
        (**self).get_unauthenticated(path, query, expected)
    }

    fn post_unauthenticated(
        &self,
        path: &str,
        body: &str,
        expected: &ExpectedStatus,
    ) -> Result<ClientResponse, ApiError> {
        (**self).post_unauthenticated(path, body, expected)
    }

    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }
}

/// Serialize a request payload.
pub fn json_body<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

pub struct RequestClient<F> {
    engines: F,
    tokens: AuthTokenProvider,
    sender: RequestSender,
}

impl<F: HttpEngineFactory> RequestClient<F> {
    pub fn new(engines: F, tokens: AuthTokenProvider, sender: RequestSender) -> Self {
        Self {
            engines,
            tokens,
            sender,
        }
    }

    fn authenticated(
        &self,
        method: HttpMethod,
        path: &str,
        query: &Query,
        body: Option<&str>,
        expected: &ExpectedStatus,
    ) -> Result<ClientResponse, ApiError> {
        let Some(token) = self.tokens.user_token() else {
            debug!(%method, path, "rejected call without user token");
            return Err(ApiError::UserNotAuthenticated);
        };
        let engine = self.engines.create(&token);
        self.sender.send(&engine, method, path, query, body, expected)
    }

    fn unauthenticated(
        &self,
        method: HttpMethod,
        path: &str,
        query: &Query,
        body: Option<&str>,
        expected: &ExpectedStatus,
    ) -> Result<ClientResponse, ApiError> {
        let engine = self.engines.create_unauthenticated();
        self.sender.send(&engine, method, path, query, body, expected)
    }
}

impl<F: HttpEngineFactory> Client for RequestClient<F> {
    fn get(&self, path: &str, query: &Query, expected: &ExpectedStatus) -> Result<ClientResponse, ApiError> {
        self.authenticated(HttpMethod::Get, path, query, None, expected)
    }

    fn post(&self, path: &str, body: &str, expected: &ExpectedStatus) -> Result<ClientResponse, ApiError> {
        self.authenticated(HttpMethod::Post, path, &Query::new(), Some(body), expected)
    }

    fn patch(&self, path: &str, body: &str, expected: &ExpectedStatus) -> Result<ClientResponse, ApiError> {
        self.authenticated(HttpMethod::Patch, path, &Query::new(), Some(body), expected)
    }

    fn get_unauthenticated(
        &self,
        path: &str,
        query: &Query,
        expected: &ExpectedStatus,
    ) -> Result<ClientResponse, ApiError> {
        self.unauthenticated(HttpMethod::Get, path, query, None, expected)
    }

    fn post_unauthenticated(
        &self,
        path: &str,
        body: &str,
        expected: &ExpectedStatus,
    ) -> Result<ClientResponse, ApiError> {
        self.unauthenticated(HttpMethod::Post, path, &Query::new(), Some(body), expected)
    }

    fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated()
    }
}
