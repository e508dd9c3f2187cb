//! HTTP response handling

use crate::error::{HarnessError, Result};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Status, headers and the unparsed body of a response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Response with a JSON body and matching content type
    pub fn from_json(status: StatusCode, value: &Value) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        Self::new(status, headers, value.to_string())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body regardless of status.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|source| HarnessError::Deserialization {
            status: self.status,
            body: self.text(),
            source,
        })
    }

    /// Look up a value by JSON pointer, e.g. `/token`.
    pub fn json_field(&self, pointer: &str) -> Result<Option<Value>> {
        let value: Value = self.json()?;
        Ok(value.pointer(pointer).cloned())
    }

    /// Body pretty-printed when it is JSON, as-is otherwise
    pub fn pretty_body(&self) -> String {
        let is_json = self
            .header("content-type")
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);
        if is_json {
            if let Ok(value) = serde_json::from_slice::<Value>(&self.body) {
                if let Ok(pretty) = serde_json::to_string_pretty(&value) {
                    return pretty;
                }
            }
        }
        self.text()
    }
}
