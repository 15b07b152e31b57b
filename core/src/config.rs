//! Client configuration.
//!
//! The backend origin is supplied at startup (flag or `DIARY_API_URL`)
//! rather than compiled in, so one build can target several deployments.

use url::Url;

use crate::error::ApiError;

/// Environment variable the binary reads the backend origin from.
pub const API_URL_ENV: &str = "DIARY_API_URL";

/// Origin used when nothing is configured; the backend's default bind address.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";

/// A validated backend origin: `http(s)://host[:port]`, nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    origin: String,
    base: Url,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let input = base_url.trim();
        let invalid = |reason: String| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let base = Url::parse(input).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https".to_string()));
        }
        // The WHATWG parser accepts `http:host` and `http:///host`; an origin
        // must spell out its authority.
        let authority = &input[base.scheme().len() + 1..];
        let has_authority = authority.starts_with("//") && !authority[2..].starts_with('/');
        if !has_authority || base.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }
        if base.path() != "/" || base.query().is_some() || base.fragment().is_some() {
            return Err(invalid("must not carry a path, query or fragment".to_string()));
        }
        if !base.username().is_empty() || base.password().is_some() {
            return Err(invalid("must not carry credentials".to_string()));
        }

        Ok(Self {
            origin: base.origin().ascii_serialization(),
            base,
        })
    }

    /// The origin without a trailing slash, e.g. `http://127.0.0.1:8080`.
    pub fn base_url(&self) -> &str {
        &self.origin
    }

    /// The origin as a URL that paths can be joined onto.
    pub fn base(&self) -> &Url {
        &self.base
    }
}
