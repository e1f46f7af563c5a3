//! Scripted engine shared by the functional tests.
//!
//! Plays back canned responses in order and records every request together
//! with the user token of the handle that sent it.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use cinema_core::{HttpEngine, HttpEngineFactory, HttpRequest, HttpResponse, TransportError};

#[derive(Default)]
struct Script {
    replies: Mutex<VecDeque<HttpResponse>>,
    fallback: Option<HttpResponse>,
    history: Mutex<Vec<(Option<String>, HttpRequest)>>,
    handles: Mutex<Vec<Option<String>>>,
}

#[derive(Clone, Default)]
pub struct ScriptedFactory {
    script: Arc<Script>,
}

impl ScriptedFactory {
    pub fn new(replies: Vec<(u16, &str)>) -> Self {
        let replies = replies
            .into_iter()
            .map(|(status, body)| HttpResponse {
                status,
                body: body.to_string(),
            })
            .collect();
        Self {
            script: Arc::new(Script {
                replies: Mutex::new(replies),
                ..Script::default()
            }),
        }
    }

    /// Answers every request with the same response.
    pub fn always(status: u16, body: &str) -> Self {
        Self {
            script: Arc::new(Script {
                fallback: Some(HttpResponse {
                    status,
                    body: body.to_string(),
                }),
                ..Script::default()
            }),
        }
    }

    pub fn history(&self) -> Vec<(Option<String>, HttpRequest)> {
        self.script.history.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.history().into_iter().map(|(_, request)| request).collect()
    }

    /// User token of every handle built so far; `None` for token-less handles.
    pub fn handles(&self) -> Vec<Option<String>> {
        self.script.handles.lock().unwrap().clone()
    }

    fn engine(&self, token: Option<&str>) -> ScriptedEngine {
        self.script.handles.lock().unwrap().push(token.map(str::to_string));
        ScriptedEngine {
            script: Arc::clone(&self.script),
            token: token.map(str::to_string),
        }
    }
}

impl HttpEngineFactory for ScriptedFactory {
    type Engine = ScriptedEngine;

    fn create(&self, user_token: &str) -> ScriptedEngine {
        self.engine(Some(user_token))
    }

    fn create_unauthenticated(&self) -> ScriptedEngine {
        self.engine(None)
    }
}

pub struct ScriptedEngine {
    script: Arc<Script>,
    token: Option<String>,
}

impl HttpEngine for ScriptedEngine {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.script
            .history
            .lock()
            .unwrap()
            .push((self.token.clone(), request.clone()));
        let next = self.script.replies.lock().unwrap().pop_front();
        match next.or_else(|| self.script.fallback.clone()) {
            Some(response) => Ok(response),
            None => Err(TransportError::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "script exhausted",
            ))),
        }
    }
}
