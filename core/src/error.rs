//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the todo does not exist" from "the server returned an unexpected
//! status." Other non-2xx responses land in `HttpError` with the server's
//! error text, and a 2xx envelope that reports `success: false` becomes
//! `Rejected`.

/// Errors returned by the client, service and page layers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("todo not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// The envelope came back with `success: false`.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    TransportError(String),

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}
