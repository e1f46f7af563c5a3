//! The decoded API envelope.
//!
//! Every cinema API reply is `{"meta": {...}, "data": ...}` where `meta` is
//! optional and `data` is either one object or a list of objects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

pub type JsonObject = Map<String, Value>;

/// The `data` section of a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    Object(JsonObject),
    List(Vec<JsonObject>),
}

/// A response whose status has already been accepted and whose body carried
/// a `data` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientResponse {
    #[serde(default)]
    pub meta: JsonObject,
    pub data: ResponseData,
}

impl ClientResponse {
    pub fn new(meta: JsonObject, data: ResponseData) -> Self {
        Self { meta, data }
    }

    /// Decode a raw body. `path` only labels the error.
    pub fn from_body(path: &str, body: &str) -> Result<Self, ApiError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ApiError::content(path, format!("invalid JSON: {e}")))?;
        let Value::Object(mut envelope) = value else {
            return Err(ApiError::content(path, "missing data"));
        };

        let data = match envelope.remove("data") {
            Some(Value::Object(object)) => ResponseData::Object(object),
            Some(Value::Array(items)) => ResponseData::List(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(object) => Ok(object),
                        _ => Err(ApiError::content(path, "data list entry is not an object")),
                    })
                    .collect::<Result<_, _>>()?,
            ),
            _ => return Err(ApiError::content(path, "missing data")),
        };

        let meta = match envelope.remove("meta") {
            Some(Value::Object(meta)) => meta,
            _ => JsonObject::new(),
        };

        Ok(Self { meta, data })
    }

    /// The payload of a single-entity endpoint.
    pub fn data_object(&self) -> Result<&JsonObject, ApiError> {
        match &self.data {
            ResponseData::Object(object) => Ok(object),
            ResponseData::List(_) => Err(ApiError::content("data", "expected object, found list")),
        }
    }

    /// The payload of a collection endpoint.
    pub fn data_list(&self) -> Result<&[JsonObject], ApiError> {
        match &self.data {
            ResponseData::List(items) => Ok(items),
            ResponseData::Object(_) => Err(ApiError::content("data", "expected list, found object")),
        }
    }
}
