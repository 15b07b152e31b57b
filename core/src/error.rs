//! Errors surfaced by `DiaryApi` and `DiaryClient`.
//!
//! A 404 is its own variant: for an exchange it means the pool has no other
//! diary yet, for a comment that the diary id is unknown. Every other status
//! outside 2xx is an `HttpError` carrying the raw status and body. The client
//! never retries or rewrites any of these.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found: {body}")]
    NotFound { body: String },

    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// No response at all: connection refused, DNS, reset mid-body.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// A request target (image path, redirect location) that does not
    /// resolve against the base origin.
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
