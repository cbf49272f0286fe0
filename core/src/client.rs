//! Request builder, response parser and operations for the Mojang API.
//!
//! # Design
//! Each endpoint is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Both halves are pure. The public operations (`get_player`,
//! `get_name_history`, ...) glue them together through the injected
//! `Transport`, so one call is one `build` / `execute` / `parse` round, and
//! the two-step UUID lookups are two such rounds in sequence.
//!
//! `MojangClient` keeps no mutable state between calls. "Now" comes from the
//! injected `Clock` rather than the wall clock.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::classify::verify;
use crate::clock::{Clock, SystemClock};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::{current_name, MetricKey, MetricKeys, NameHistoryEntry, Player, Statistics};
use crate::uuid_codec::to_wire_form;

/// Key in the status report that describes the profile API itself.
pub const API_STATUS_KEY: &str = "api.mojang.com";

/// Client for the Mojang player-identity API.
#[derive(Debug, Clone)]
pub struct MojangClient<T, C = SystemClock> {
    api_base_url: Url,
    status_base_url: Url,
    transport: T,
    clock: C,
}

impl<T: Transport> MojangClient<T> {
    /// Client for the public Mojang hosts, reading time from the system clock.
    pub fn new(transport: T) -> Result<Self, ApiError> {
        Self::with_config(&ClientConfig::default(), transport)
    }

    /// Fails with `ApiError::Config` if either base URL is not an absolute
    /// http(s) URL with a host.
    pub fn with_config(config: &ClientConfig, transport: T) -> Result<Self, ApiError> {
        Ok(Self {
            api_base_url: config.api_url()?,
            status_base_url: config.status_url()?,
            transport,
            clock: SystemClock,
        })
    }
}

#[cfg(feature = "ureq")]
impl MojangClient<crate::ureq_transport::UreqTransport> {
    /// Validate `config` and build a client with a `ureq` transport.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let transport = crate::ureq_transport::UreqTransport::new(config);
        Self::with_config(config, transport)
    }
}

impl<T: Transport, C: Clock> MojangClient<T, C> {
    /// Replace the time source used for lookups pinned to "now".
    pub fn with_clock<C2: Clock>(self, clock: C2) -> MojangClient<T, C2> {
        MojangClient {
            api_base_url: self.api_base_url,
            status_base_url: self.status_base_url,
            transport: self.transport,
            clock,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // -----------------------------------------------------------------------
    // Request builders
    // -----------------------------------------------------------------------

    pub fn build_status_check(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: endpoint(&self.status_base_url, &["check"]).into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// `username` is sent as a single percent-encoded path segment.
    pub fn build_profile_at(&self, username: &str, epoch_seconds: i64) -> HttpRequest {
        let mut url = endpoint(&self.api_base_url, &["users", "profiles", "minecraft", username]);
        url.query_pairs_mut().append_pair("at", &epoch_seconds.to_string());
        HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_name_history(&self, uuid: Uuid) -> HttpRequest {
        let wire = to_wire_form(uuid);
        HttpRequest {
            method: HttpMethod::Get,
            url: endpoint(&self.api_base_url, &["user", "profiles", wire.as_str(), "names"]).into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_profiles<S: AsRef<str>>(&self, usernames: &[S]) -> Result<HttpRequest, ApiError> {
        let names: Vec<&str> = usernames.iter().map(|name| name.as_ref()).collect();
        self.json_post(endpoint(&self.api_base_url, &["profiles", "minecraft"]), &names)
    }

    pub fn build_statistics(&self, keys: &[MetricKey]) -> Result<HttpRequest, ApiError> {
        let body = MetricKeys {
            metric_keys: keys.to_vec(),
        };
        self.json_post(endpoint(&self.api_base_url, &["orders", "statistics"]), &body)
    }

    fn json_post<B: serde::Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    // -----------------------------------------------------------------------
    // Response parsers
    // -----------------------------------------------------------------------

    /// Merge the status host's list of single-key maps into one map.
    pub fn parse_status(
        &self,
        response: &HttpResponse,
    ) -> Result<HashMap<String, String>, ApiError> {
        let Some(entries) = decode::<Vec<HashMap<String, String>>>(response)? else {
            return Ok(HashMap::new());
        };
        Ok(entries.into_iter().flatten().collect())
    }

    pub fn parse_player(&self, response: &HttpResponse) -> Result<Option<Player>, ApiError> {
        decode(response)
    }

    pub fn parse_name_history(
        &self,
        response: &HttpResponse,
    ) -> Result<Vec<NameHistoryEntry>, ApiError> {
        Ok(decode(response)?.unwrap_or_default())
    }

    /// Key the returned players by name. Duplicate names keep the last one.
    pub fn parse_players(
        &self,
        response: &HttpResponse,
    ) -> Result<HashMap<String, Player>, ApiError> {
        let players: Vec<Player> = decode(response)?.unwrap_or_default();
        Ok(players
            .into_iter()
            .map(|player| (player.name.clone(), player))
            .collect())
    }

    pub fn parse_statistics(
        &self,
        response: &HttpResponse,
    ) -> Result<Option<Statistics>, ApiError> {
        decode(response)
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// True only if the status host reports the profile API as `green`.
    ///
    /// Never fails: any error talking to the status host yields `false`.
    pub fn check_status(&self) -> bool {
        match self.status_report() {
            Ok(report) => report.get(API_STATUS_KEY).is_some_and(|state| state == "green"),
            Err(err) if err.is_service_failure() => {
                warn!(error = %err, "status host unavailable");
                false
            }
            Err(err) => {
                warn!(error = %err, "status report unreadable");
                false
            }
        }
    }

    /// Health of every Mojang subsystem as reported by the status host.
    pub fn status_report(&self) -> Result<HashMap<String, String>, ApiError> {
        let response = self.send(&self.build_status_check())?;
        self.parse_status(&response)
    }

    /// The player currently using `username`, or `None` if nobody does.
    pub fn get_player(&self, username: &str) -> Result<Option<Player>, ApiError> {
        self.get_player_at(username, self.clock.now_epoch_seconds())
    }

    /// The player behind `uuid` with its current name, or `None` if the
    /// account has no name history.
    pub fn get_player_by_uuid(&self, uuid: Uuid) -> Result<Option<Player>, ApiError> {
        let history = self.get_name_history(uuid)?;
        let Some(name) = current_name(&history) else {
            debug!(%uuid, "no name history, skipping profile lookup");
            return Ok(None);
        };
        self.get_player(name)
    }

    /// The player who used `username` at `epoch_seconds`.
    pub fn get_player_at(
        &self,
        username: &str,
        epoch_seconds: i64,
    ) -> Result<Option<Player>, ApiError> {
        let response = self.send(&self.build_profile_at(username, epoch_seconds))?;
        self.parse_player(&response)
    }

    /// Resolve `uuid` to its current name, then look that name up at
    /// `epoch_seconds`.
    pub fn get_player_at_by_uuid(
        &self,
        uuid: Uuid,
        epoch_seconds: i64,
    ) -> Result<Option<Player>, ApiError> {
        match self.get_player_by_uuid(uuid)? {
            Some(player) => self.get_player_at(&player.name, epoch_seconds),
            None => Ok(None),
        }
    }

    /// Every name the account has used, oldest first. Empty if unknown.
    pub fn get_name_history(&self, uuid: Uuid) -> Result<Vec<NameHistoryEntry>, ApiError> {
        let response = self.send(&self.build_name_history(uuid))?;
        self.parse_name_history(&response)
    }

    /// Look up several usernames in one request, keyed by returned name.
    pub fn get_players<S: AsRef<str>>(
        &self,
        usernames: &[S],
    ) -> Result<HashMap<String, Player>, ApiError> {
        let response = self.send(&self.build_profiles(usernames)?)?;
        self.parse_players(&response)
    }

    /// Minecraft sales statistics.
    pub fn get_statistics(&self) -> Result<Option<Statistics>, ApiError> {
        self.get_statistics_for(&MetricKeys::default().metric_keys)
    }

    /// Sales statistics aggregated over `keys`.
    pub fn get_statistics_for(&self, keys: &[MetricKey]) -> Result<Option<Statistics>, ApiError> {
        let response = self.send(&self.build_statistics(keys)?)?;
        self.parse_statistics(&response)
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        self.transport.execute(request).map_err(|err| {
            warn!(url = %request.url, error = %err, "transport failure");
            ApiError::ApiDown(err.to_string())
        })
    }
}

/// `base` with `segments` appended to its path, each percent-encoded.
fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    // Base URLs are validated to have a host, so they always have a path.
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Classify `response` and deserialize its body if there is one.
fn decode<R: DeserializeOwned>(response: &HttpResponse) -> Result<Option<R>, ApiError> {
    match verify(response)? {
        Some(body) => serde_json::from_str(body)
            .map(Some)
            .map_err(|e| ApiError::Deserialization(e.to_string())),
        None => Ok(None),
    }
}
