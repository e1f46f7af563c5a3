//! Explicit wiring of the pipeline.
//!
//! Build one `CinemaApi` at startup and pass it (or the clients it hands
//! out) to resource code by reference. Both clients share a single
//! `RequestClient`, so they see the same session and engine factory.

use std::sync::Arc;

use crate::auth::{AuthTokenPersister, AuthTokenProvider, Session};
use crate::cache::{Cache, KeyGenerator, LifetimeGenerator};
use crate::caching::CachingRequestClient;
use crate::client::RequestClient;
use crate::engine::UreqEngineFactory;
use crate::error::ConfigError;
use crate::http::HttpEngineFactory;
use crate::sender::RequestSender;
use crate::settings::ClientConfig;
use crate::status::StatusDefaults;
use crate::validator::ResponseFieldValidator;

pub struct CinemaApi<F, S> {
    token_provider: AuthTokenProvider,
    token_persister: AuthTokenPersister,
    client: Arc<RequestClient<F>>,
    caching_client: CachingRequestClient<Arc<RequestClient<F>>, S>,
    validator: ResponseFieldValidator,
}

impl<S: Cache> CinemaApi<UreqEngineFactory, S> {
    /// Wire the `ureq` engine against `config.api_host`.
    pub fn from_config(config: &ClientConfig, session: Arc<dyn Session>, cache: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let engines = UreqEngineFactory::new(&config.api_host, &config.api_client_token);
        Self::new(engines, session, cache, config)
    }
}

impl<F: HttpEngineFactory, S: Cache> CinemaApi<F, S> {
    pub fn new(engines: F, session: Arc<dyn Session>, cache: S, config: &ClientConfig) -> Result<Self, ConfigError> {
        Self::with_status_defaults(engines, session, cache, config, StatusDefaults::default())
    }

    pub fn with_status_defaults(
        engines: F,
        session: Arc<dyn Session>,
        cache: S,
        config: &ClientConfig,
        defaults: StatusDefaults,
    ) -> Result<Self, ConfigError> {
        let lifetimes = LifetimeGenerator::new(config.cache_lifetime_min_secs, config.cache_lifetime_max_secs)?;
        let token_provider = AuthTokenProvider::new(Arc::clone(&session));
        let token_persister = AuthTokenPersister::new(session);

        let client = Arc::new(RequestClient::new(
            engines,
            token_provider.clone(),
            RequestSender::with_defaults(defaults),
        ));
        let caching_client = CachingRequestClient::new(Arc::clone(&client), cache, KeyGenerator::new(), lifetimes);

        Ok(Self {
            token_provider,
            token_persister,
            client,
            caching_client,
            validator: ResponseFieldValidator::new(),
        })
    }

    /// Uncached client, for writes and per-user reads.
    pub fn client(&self) -> &Arc<RequestClient<F>> {
        &self.client
    }

    /// Cached client, for reads shared by every user.
    pub fn caching_client(&self) -> &CachingRequestClient<Arc<RequestClient<F>>, S> {
        &self.caching_client
    }

    pub fn token_provider(&self) -> &AuthTokenProvider {
        &self.token_provider
    }

    pub fn token_persister(&self) -> &AuthTokenPersister {
        &self.token_persister
    }

    pub fn validator(&self) -> &ResponseFieldValidator {
        &self.validator
    }
}
