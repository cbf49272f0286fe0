//! Blocking client core for the Mojang player-identity API.
//!
//! # Overview
//! Looks up players by username or UUID (optionally at a point in time),
//! fetches name histories, resolves usernames in bulk, reads sales
//! statistics and checks service health.
//!
//! # Design
//! - `MojangClient` splits every endpoint into `build_*` (produces an
//!   `HttpRequest`) and `parse_*` (consumes an `HttpResponse`); the public
//!   operations run the pair through an injected `Transport`.
//! - Every response goes through `classify::verify`: 429 is `RateLimited`,
//!   missing resources are `None`/empty, anything else unexpected is
//!   `ApiDown`.
//! - UUIDs are `uuid::Uuid` everywhere except at the wire, where
//!   `uuid_codec` converts to and from the undashed form.
//! - No caching and no retries. The service allows 600 requests per
//!   10 minutes; staying under that is the caller's job.

pub mod classify;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod http;
pub mod types;
#[cfg(feature = "ureq")]
pub mod ureq_transport;
pub mod uuid_codec;

pub use classify::Outcome;
pub use client::MojangClient;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use types::{MetricKey, MetricKeys, NameHistoryEntry, Player, Statistics};
#[cfg(feature = "ureq")]
pub use ureq_transport::UreqTransport;
pub use uuid_codec::{from_wire_form, to_wire_form};
