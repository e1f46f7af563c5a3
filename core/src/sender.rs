//! One HTTP exchange, checked and decoded.

use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpEngine, HttpMethod, HttpRequest, Query};
use crate::response::ClientResponse;
use crate::status::{ExpectedStatus, StatusDefaults};

/// Executes a single request on an engine handle and turns the reply into a
/// `ClientResponse` or an error. Never retries.
#[derive(Debug, Clone, Default)]
pub struct RequestSender {
    defaults: StatusDefaults,
}

impl RequestSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: StatusDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &StatusDefaults {
        &self.defaults
    }

    pub fn send<E: HttpEngine + ?Sized>(
        &self,
        engine: &E,
        method: HttpMethod,
        path: &str,
        query: &Query,
        body: Option<&str>,
        expected: &ExpectedStatus,
    ) -> Result<ClientResponse, ApiError> {
        let request = HttpRequest {
            method,
            path: path.to_string(),
            query: query.clone(),
            body: body.map(str::to_string),
        };
        let response = engine.execute(&request)?;
        debug!(%method, path, status = response.status, "api exchange completed");

        if !expected.accepts(&self.defaults, method, response.status) {
            return Err(ApiError::UnexpectedStatusCode {
                status: response.status,
                path: path.to_string(),
            });
        }
        ClientResponse::from_body(path, &response.body)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::http::{HttpResponse, TransportError};

    struct OneShot {
        reply: RefCell<Option<Result<HttpResponse, TransportError>>>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl OneShot {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                reply: RefCell::new(Some(Ok(HttpResponse {
                    status,
                    body: body.to_string(),
                }))),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl HttpEngine for OneShot {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.borrow_mut().push(request.clone());
            self.reply.borrow_mut().take().expect("engine called twice")
        }
    }

    fn send(engine: &OneShot, method: HttpMethod, expected: ExpectedStatus) -> Result<ClientResponse, ApiError> {
        RequestSender::new().send(engine, method, "pathValue", &Query::new(), None, &expected)
    }

    #[test]
    fn passes_request_through_to_engine() {
        let engine = OneShot::replying(200, r#"{"data":{}}"#);
        let query = Query::new().with("queryKey", "queryValue");
        RequestSender::new()
            .send(&engine, HttpMethod::Post, "pathValue", &query, Some("bodyValue"), &ExpectedStatus::Default)
            .unwrap();

        let seen = engine.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, HttpMethod::Post);
        assert_eq!(seen[0].path, "pathValue");
        assert_eq!(seen[0].query, query);
        assert_eq!(seen[0].body.as_deref(), Some("bodyValue"));
    }

    #[test]
    fn accepted_status_yields_response() {
        let engine = OneShot::replying(200, r#"{"meta":{"metaKey":"metaValue"},"data":{"dataKey":"dataValue"}}"#);
        let response = send(&engine, HttpMethod::Get, ExpectedStatus::Default).unwrap();
        assert_eq!(response.meta["metaKey"], "metaValue");
        assert_eq!(response.data_object().unwrap()["dataKey"], "dataValue");
    }

    #[test]
    fn unexpected_status_is_error_even_with_valid_body() {
        let engine = OneShot::replying(201, r#"{"data":{}}"#);
        let err = send(&engine, HttpMethod::Get, ExpectedStatus::Default).unwrap_err();
        match err {
            ApiError::UnexpectedStatusCode { status, path } => {
                assert_eq!(status, 201);
                assert_eq!(path, "pathValue");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn extra_codes_extend_the_default() {
        let engine = OneShot::replying(300, r#"{"data":{}}"#);
        assert!(send(&engine, HttpMethod::Get, ExpectedStatus::also([300])).is_ok());
    }

    #[test]
    fn post_accepts_created_by_default() {
        let engine = OneShot::replying(201, r#"{"data":{}}"#);
        assert!(send(&engine, HttpMethod::Post, ExpectedStatus::Default).is_ok());
    }

    #[test]
    fn accepted_status_with_empty_body_is_content_error() {
        let engine = OneShot::replying(200, "");
        let err = send(&engine, HttpMethod::Get, ExpectedStatus::Default).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedResponseContent { .. }));
    }

    #[test]
    fn transport_failure_passes_through() {
        let engine = OneShot {
            reply: RefCell::new(Some(Err(TransportError::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "refused",
            ))))),
            seen: RefCell::new(Vec::new()),
        };
        let err = send(&engine, HttpMethod::Get, ExpectedStatus::Default).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
