//! Stateless HTTP request builder and response parser for the OneSignal API.
//!
//! # Design
//! `OneSignalCore` holds only what every request needs: the resolved base
//! URL, the default app id and the fixed header set. `build_request` turns a
//! method, a path and call parameters into an `HttpRequest`;
//! `parse_response` turns an `HttpResponse` into the decoded JSON body or an
//! `ApiError`. Neither touches the network, so the whole pipeline is tested
//! with plain values.
//!
//! Error bodies look like `{"errors": ["..."]}` or
//! `{"errors": {"field": "..."}}`. For a mapping with several entries the
//! value under the lexicographically smallest key is reported, whatever
//! order the body used.

use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Params;

pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const APP_ID_KEY: &str = "app_id";

const SECURE_SCHEME: &str = "https://";

/// Request/response pipeline shared by every call of a `OneSignal` client.
///
/// Not `Debug`: the header set carries the API key.
#[derive(Clone)]
pub struct OneSignalCore {
    base_url: String,
    app_id: Option<String>,
    headers: Vec<(String, String)>,
}

impl OneSignalCore {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base_url: config.resolved_base_url(),
            app_id: config.get_app_id().map(str::to_string),
            headers: vec![
                ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
                ("Authorization".to_string(), format!("Basic {}", config.get_api_key())),
            ],
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    /// Absolute `https://` URLs pass through; anything else is a path under
    /// the base URL.
    pub fn resolve_url(&self, url_or_path: &str) -> String {
        if url_or_path.starts_with(SECURE_SCHEME) {
            url_or_path.to_string()
        } else {
            format!("{}/{}", self.base_url, url_or_path.trim_start_matches('/'))
        }
    }

    /// `{"app_id": <configured>, ...params}`; call parameters win on collision.
    pub fn merge_payload(&self, params: Params) -> Params {
        let mut payload = Params::new();
        payload.insert(
            APP_ID_KEY.to_string(),
            self.app_id.clone().map_or(Value::Null, Value::String),
        );
        payload.extend(params);
        payload
    }

    pub fn build_request(
        &self,
        method: HttpMethod,
        url_or_path: &str,
        params: Params,
    ) -> Result<HttpRequest, ApiError> {
        let payload = self.merge_payload(params);
        let (query, body) = match method {
            HttpMethod::Get => (query_pairs(&payload), None),
            _ => {
                let body = serde_json::to_string(&payload).map_err(ApiError::encode)?;
                (Vec::new(), Some(body))
            }
        };
        Ok(HttpRequest {
            method,
            url: self.resolve_url(url_or_path),
            headers: self.headers.clone(),
            query,
            body,
        })
    }

    /// The decoded body for a 200 response, an `ApiError` for anything else.
    pub fn parse_response(&self, response: &HttpResponse) -> Result<Value, ApiError> {
        let content: Value =
            serde_json::from_slice(&response.body).map_err(|_| ApiError::decode(response.status))?;
        if response.status == 200 {
            return Ok(content);
        }
        let message = extract_error_message(&content)
            .unwrap_or_else(|| format!("OneSignal returned an error that could not be parsed: {}", response.body_text()));
        Err(ApiError::status(response.status, message))
    }
}

/// First message under the body's `errors` field, if there is one.
pub fn extract_error_message(content: &Value) -> Option<String> {
    let first = match content.get("errors")? {
        Value::Object(map) => map.iter().min_by(|a, b| a.0.cmp(b.0)).map(|(_, v)| v),
        Value::Array(items) => items.first(),
        other => Some(other),
    }?;
    match first {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Flattens a payload into query pairs: nulls are dropped, strings go raw,
/// arrays repeat the key per element and everything else is sent as JSON text.
pub fn query_pairs(payload: &Params) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(payload.len());
    for (key, value) in payload {
        match value {
            Value::Array(items) => {
                pairs.extend(items.iter().filter_map(|item| query_value(item).map(|v| (key.clone(), v))));
            }
            other => {
                if let Some(v) = query_value(other) {
                    pairs.push((key.clone(), v));
                }
            }
        }
    }
    pairs
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
