//! Stateless HTTP request builder and response parser for the Wintender API.
//!
//! # Design
//! `WintenderClient` holds only a `base_url`. Each endpoint is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. Bearer tokens are attached by the caller
//! that owns the session, never here.
//!
//! ```text
//! client/
//! ├── mod.rs            - WintenderClient and shared helpers
//! ├── chat.rs           - /ai/chat
//! ├── clarifications.rs - /tenders/clarification
//! ├── commons.rs        - /commons/setting, /commons/errors
//! ├── entities.rs       - /entities
//! ├── reports.rs        - /reports
//! └── users.rs          - /users/user
//! ```

mod chat;
mod clarifications;
mod commons;
mod entities;
mod reports;
mod users;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody};
use crate::types::{ApiAck, ListParams};

/// Synchronous, stateless client for the Wintender API.
#[derive(Debug, Clone)]
pub struct WintenderClient {
    base_url: String,
}

impl WintenderClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, query: &[(&'static str, String)]) -> String {
        if query.is_empty() {
            return format!("{}{path}", self.base_url);
        }
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        format!("{}{path}?{encoded}", self.base_url)
    }

    fn bodiless(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: self.url(path, &[]),
            headers: Vec::new(),
            body: None,
        }
    }

    fn list(&self, path: &str, params: &ListParams) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url(path, &params.query_pairs()),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json<B: Serialize>(&self, method: HttpMethod, path: &str, input: &B) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            url: self.url(path, &[]),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(RequestBody::Json(body)),
        })
    }

    fn multipart(&self, method: HttpMethod, path: &str, form: MultipartForm) -> HttpRequest {
        HttpRequest {
            method,
            url: self.url(path, &[]),
            headers: vec![("content-type".to_string(), form.content_type())],
            body: Some(RequestBody::Multipart(form)),
        }
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::from_status(response.status, &response.body))
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Like `parse_json`, but an empty 2xx body is an empty acknowledgement.
fn parse_ack<T: DeserializeOwned>(response: HttpResponse) -> Result<ApiAck<T>, ApiError> {
    check_status(&response)?;
    if response.body.trim().is_empty() {
        return Ok(ApiAck {
            message: None,
            data: None,
        });
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
