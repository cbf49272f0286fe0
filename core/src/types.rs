//! Domain DTOs for the Mojang API.
//!
//! # Design
//! Field names follow the JSON the service sends; Rust names are snake_case
//! with serde renames. `Player::id` is a real `Uuid` and only becomes the
//! undashed wire form at (de)serialization time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A player's identity: account id plus the username it resolves to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    #[serde(with = "crate::uuid_codec::wire")]
    pub id: Uuid,
    pub name: String,
}

/// One entry of an account's username history.
///
/// The original name of an account has no `changed_to_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NameHistoryEntry {
    pub name: String,
    /// Milliseconds since the Unix epoch.
    #[serde(rename = "changedToAt", default, skip_serializing_if = "Option::is_none")]
    pub changed_to_at: Option<i64>,
}

/// The name an account currently uses, given its history.
///
/// Picks the most recent change; entries without a timestamp (the original
/// name) count as oldest. Ties keep the later entry, so a history that is
/// already in chronological order resolves to its last element.
pub fn current_name(history: &[NameHistoryEntry]) -> Option<&str> {
    history
        .iter()
        .max_by_key(|entry| entry.changed_to_at)
        .map(|entry| entry.name.as_str())
}

/// Sales summary returned by the statistics endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Statistics {
    pub total: u64,
    pub last24h: u64,
    #[serde(rename = "saleVelocityPerSeconds")]
    pub sale_velocity_per_seconds: f64,
}

/// A metric the statistics endpoint can aggregate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    ItemSoldMinecraft,
    PrepaidCardRedeemedMinecraft,
    ItemSoldCobalt,
    PrepaidCardRedeemedCobalt,
    ItemSoldScrolls,
    ItemSoldDungeons,
}

/// Request body for the statistics endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetricKeys {
    #[serde(rename = "metricKeys")]
    pub metric_keys: Vec<MetricKey>,
}

impl Default for MetricKeys {
    fn default() -> Self {
        Self {
            metric_keys: vec![MetricKey::ItemSoldMinecraft],
        }
    }
}
