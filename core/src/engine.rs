//! Blocking HTTP engine backed by `ureq`.
//!
//! Every handle sends the API client token. Handles built with `create`
//! also carry the user's bearer token; the header set is fixed when the
//! handle is built. HTTP error statuses come back as data so that
//! `RequestSender` owns status interpretation.

use ureq::typestate::WithBody;
use ureq::{Agent, RequestBuilder};

use crate::http::{HttpEngine, HttpEngineFactory, HttpMethod, HttpRequest, HttpResponse, TransportError};

pub const CLIENT_TOKEN_HEADER: &str = "X-Client-Token";
pub const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct UreqEngineFactory {
    agent: Agent,
    host: String,
    client_token: String,
}

impl UreqEngineFactory {
    pub fn new(host: &str, client_token: &str) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self::with_agent(agent, host, client_token)
    }

    /// Use a preconfigured agent (timeouts, proxies, TLS). The agent must
    /// not turn HTTP statuses into errors.
    pub fn with_agent(agent: Agent, host: &str, client_token: &str) -> Self {
        Self {
            agent,
            host: host.trim_end_matches('/').to_string(),
            client_token: client_token.to_string(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn engine(&self, user_token: Option<&str>) -> UreqEngine {
        let mut headers = vec![(CLIENT_TOKEN_HEADER.to_string(), self.client_token.clone())];
        if let Some(token) = user_token {
            headers.push((AUTHORIZATION_HEADER.to_string(), format!("Bearer {token}")));
        }
        UreqEngine {
            agent: self.agent.clone(),
            host: self.host.clone(),
            headers,
        }
    }
}

impl HttpEngineFactory for UreqEngineFactory {
    type Engine = UreqEngine;

    fn create(&self, user_token: &str) -> UreqEngine {
        self.engine(Some(user_token))
    }

    fn create_unauthenticated(&self) -> UreqEngine {
        self.engine(None)
    }
}

#[derive(Clone)]
pub struct UreqEngine {
    agent: Agent,
    host: String,
    headers: Vec<(String, String)>,
}

impl UreqEngine {
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.host, path.trim_start_matches('/'))
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    fn prepare<B>(&self, mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        for (key, value) in request.query.pairs() {
            builder = builder.query(key, value);
        }
        builder
    }

    fn send_with_body(
        &self,
        builder: RequestBuilder<WithBody>,
        request: &HttpRequest,
    ) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        let builder = self.prepare(builder, request);
        match &request.body {
            Some(body) => builder.content_type("application/json").send(body.as_bytes()),
            None => builder.send_empty(),
        }
    }
}

impl HttpEngine for UreqEngine {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.url(&request.path);
        let result = match request.method {
            HttpMethod::Get => self.prepare(self.agent.get(&url), request).call(),
            HttpMethod::Post => self.send_with_body(self.agent.post(&url), request),
            HttpMethod::Patch => self.send_with_body(self.agent.patch(&url), request),
        };
        let mut response = result.map_err(TransportError::new)?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(TransportError::new)?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> UreqEngineFactory {
        UreqEngineFactory::new("http://localhost:3000/", "clientTokenValue")
    }

    #[test]
    fn trailing_slash_is_stripped() {
        assert_eq!(factory().host(), "http://localhost:3000");
    }

    #[test]
    fn url_joins_host_and_relative_path() {
        let engine = factory().create_unauthenticated();
        assert_eq!(engine.url("chains/7/ticket-types"), "http://localhost:3000/chains/7/ticket-types");
        assert_eq!(engine.url("/chains"), "http://localhost:3000/chains");
    }

    #[test]
    fn unauthenticated_handle_sends_only_client_token() {
        let engine = factory().create_unauthenticated();
        assert_eq!(
            engine.headers(),
            &[(CLIENT_TOKEN_HEADER.to_string(), "clientTokenValue".to_string())]
        );
    }

    #[test]
    fn user_handle_adds_bearer_token() {
        let engine = factory().create("userTokenValue");
        assert_eq!(
            engine.headers(),
            &[
                (CLIENT_TOKEN_HEADER.to_string(), "clientTokenValue".to_string()),
                (AUTHORIZATION_HEADER.to_string(), "Bearer userTokenValue".to_string()),
            ]
        );
    }

    #[test]
    fn connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let engine = UreqEngineFactory::new(&format!("http://{addr}"), "t").create_unauthenticated();
        let request = HttpRequest {
            method: HttpMethod::Get,
            path: "chains".to_string(),
            query: Default::default(),
            body: None,
        };
        assert!(engine.execute(&request).is_err());
    }
}
