//! Status-code classification for every API response.
//!
//! # Design
//! The API signals "no such player" in several ways: `204 No Content`, `404`,
//! or a 2xx with an empty body. All of them collapse into
//! `Outcome::NotFound`, which the client turns into `None` or an empty
//! collection. 429 is checked before anything else so a rate-limited answer
//! is never mistaken for a missing resource.

use tracing::warn;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// A response that completed without a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    NotFound,
}

/// Classify a response by status code and whether it carried a body.
pub fn classify(status: u16, body_present: bool) -> Result<Outcome, ApiError> {
    match status {
        429 => Err(ApiError::RateLimited),
        204 | 404 => Ok(Outcome::NotFound),
        200..=299 if body_present => Ok(Outcome::Success),
        200..=299 => Ok(Outcome::NotFound),
        other => Err(ApiError::ApiDown(format!("unexpected HTTP status {other}"))),
    }
}

/// True when `body` holds something other than whitespace or a JSON `null`.
pub fn body_present(body: &str) -> bool {
    let trimmed = body.trim();
    !trimmed.is_empty() && trimmed != "null"
}

/// Classify `response` and hand back its body when there is one to parse.
pub fn verify(response: &HttpResponse) -> Result<Option<&str>, ApiError> {
    let outcome = classify(response.status, body_present(&response.body)).inspect_err(|err| {
        warn!(status = response.status, error = %err, "mojang api call failed");
    })?;
    match outcome {
        Outcome::Success => Ok(Some(response.body.as_str())),
        Outcome::NotFound => Ok(None),
    }
}
