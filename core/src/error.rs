//! Error types for the Mojang API client.
//!
//! # Design
//! "No such player" is deliberately absent: a missing resource is folded into
//! `None` or an empty collection by the client, so callers only ever see an
//! `ApiError` when the call itself could not be completed. Rate limiting gets
//! its own variant because the caller is expected to react to it by slowing
//! down or caching; everything else that prevents a usable answer from the
//! service lands in `ApiDown`.

use thiserror::Error;

const RATE_LIMIT_GUIDANCE: &str =
    "please do not exceed 600 requests per 10 minutes; cache responses if needed";

/// Errors returned by `MojangClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered 429.
    #[error("rate limited: {}", RATE_LIMIT_GUIDANCE)]
    RateLimited,

    /// The service could not be reached, or answered with an unexpected status.
    #[error("could not establish a connection with the api: {0}")]
    ApiDown(String),

    /// A UUID in wire form was not exactly 32 hexadecimal characters.
    #[error("malformed uuid {0:?}: expected 32 hexadecimal characters")]
    MalformedUuid(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The client configuration is invalid or could not be read.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// True for the two failures that come from talking to the service.
    pub fn is_service_failure(&self) -> bool {
        matches!(self, ApiError::RateLimited | ApiError::ApiDown(_))
    }
}
