//! Verb-level HTTP client for the todo API.
//!
//! # Design
//! `ApiClient` holds a base URL and a [`Transport`]. Each verb helper is split
//! into [`ApiClient::build_request`], which produces an `HttpRequest`, and
//! [`parse_response`], which consumes an `HttpResponse`; the transport does
//! the round-trip in between. Failures are logged and returned untouched:
//! there is no retry, backoff or timeout policy here.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    base_url: String,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    /// An empty `base_url` keeps request paths relative (same-origin).
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.send(self.build_request(HttpMethod::Get, path, None))
    }

    pub fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        let body = encode(body)?;
        self.send(self.build_request(HttpMethod::Post, path, Some(body)))
    }

    pub fn put<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        let body = encode(body)?;
        self.send(self.build_request(HttpMethod::Put, path, Some(body)))
    }

    pub fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.send(self.build_request(HttpMethod::Delete, path, None))
    }

    pub fn build_request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let headers = if body.is_some() {
            vec![("content-type".to_string(), "application/json".to_string())]
        } else {
            Vec::new()
        };
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers,
            body,
        }
    }

    fn send<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ApiError> {
        let method = request.method;
        let url = request.path.clone();
        tracing::debug!(%method, %url, "sending request");

        self.transport
            .execute(request)
            .and_then(parse_response)
            .inspect_err(|e| tracing::error!(%method, %url, error = %e, "request failed"))
    }
}

/// Decode a 2xx body, or map the status to an `ApiError`.
pub fn parse_response<R: DeserializeOwned>(response: HttpResponse) -> Result<R, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        message: error_text(&response.body),
    })
}

/// The envelope's `error` field when the body is one, else the raw body.
fn error_text(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| body.to_string())
}

fn encode<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))
}
