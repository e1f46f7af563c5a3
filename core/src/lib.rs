//! Client-side request pipeline for the cinema booking API.
//!
//! # Overview
//! Turns a logical call ("ticket types for chain 7") into an authenticated,
//! possibly cached, status-checked HTTP exchange, and the JSON reply into a
//! structurally validated payload ready for domain construction.
//!
//! # Design
//! - `RequestClient` checks the session for a user token before anything
//!   touches the network, then runs the exchange through `RequestSender`.
//! - `CachingRequestClient` decorates the authenticated `get` with
//!   cache-aside storage; only successes are stored, with a randomized TTL.
//! - `ResponseFieldValidator` is the boundary between untyped JSON and
//!   typed domain values.
//! - Collaborators (HTTP engine, session, cache) are traits injected at
//!   construction; `CinemaApi` wires a default set explicitly.

pub mod api;
pub mod auth;
pub mod cache;
pub mod caching;
pub mod client;
pub mod engine;
pub mod error;
pub mod http;
pub mod response;
pub mod sender;
pub mod settings;
pub mod status;
pub mod validator;

pub use api::CinemaApi;
pub use auth::{AuthTokenPersister, AuthTokenProvider, MemorySession, Session};
pub use cache::{Cache, KeyGenerator, LifetimeGenerator, MemoryCache};
pub use caching::CachingRequestClient;
pub use client::{json_body, Client, RequestClient};
pub use engine::UreqEngineFactory;
pub use error::{ApiError, ConfigError};
pub use http::{HttpEngine, HttpEngineFactory, HttpMethod, HttpRequest, HttpResponse, Query, TransportError};
pub use response::{ClientResponse, JsonObject, ResponseData};
pub use sender::RequestSender;
pub use settings::ClientConfig;
pub use status::{ExpectedStatus, StatusDefaults};
pub use validator::{FieldKind, FieldRule, ResponseFieldValidator, ValidatedFields};
