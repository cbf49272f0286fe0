//! In-memory stand-in for the Mojang profile, statistics and status APIs.
//!
//! Serves the same paths as `api.mojang.com` and `status.mojang.com` from a
//! single router. State can be changed while the server runs, including a
//! forced status code that every route answers with, for exercising rate
//! limiting and outages.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// The bulk endpoint refuses more names than this.
pub const MAX_BULK_NAMES: usize = 10;

const TOO_MANY_REQUESTS_MESSAGE: &str =
    "The client has sent too many requests within a certain amount of time";

/// Profile as the API sends it: undashed id plus current name.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NameChange {
    pub name: String,
    #[serde(rename = "changedToAt", default, skip_serializing_if = "Option::is_none")]
    pub changed_to_at: Option<i64>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Statistics {
    pub total: u64,
    pub last24h: u64,
    #[serde(rename = "saleVelocityPerSeconds")]
    pub sale_velocity_per_seconds: f64,
}

#[derive(Deserialize)]
pub struct MetricKeys {
    #[serde(rename = "metricKeys")]
    pub metric_keys: Vec<String>,
}

#[derive(Deserialize)]
pub struct AtQuery {
    pub at: Option<i64>,
}

/// An account and its chronological name history.
#[derive(Clone, Debug)]
pub struct Account {
    pub id: Uuid,
    pub history: Vec<NameChange>,
}

impl Account {
    pub fn new(id: Uuid, original_name: &str) -> Self {
        Self {
            id,
            history: vec![NameChange {
                name: original_name.to_string(),
                changed_to_at: None,
            }],
        }
    }

    pub fn renamed(mut self, name: &str, changed_to_at_millis: i64) -> Self {
        self.history.push(NameChange {
            name: name.to_string(),
            changed_to_at: Some(changed_to_at_millis),
        });
        self
    }

    pub fn current_name(&self) -> &str {
        self.history.last().map(|change| change.name.as_str()).unwrap_or_default()
    }

    /// The name the account held at `at_millis`, if it existed yet.
    pub fn name_at(&self, at_millis: i64) -> Option<&str> {
        self.history
            .iter()
            .filter(|change| change.changed_to_at.map_or(true, |t| t <= at_millis))
            .last()
            .map(|change| change.name.as_str())
    }

    fn profile(&self) -> Profile {
        Profile {
            id: self.id.simple().to_string(),
            name: self.current_name().to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MockState {
    pub accounts: Vec<Account>,
    pub statistics: HashMap<String, Statistics>,
    pub status: Vec<(String, String)>,
    pub forced_status: Option<u16>,
}

impl MockState {
    /// A handful of well-known accounts, Minecraft sales figures and an
    /// all-green status report.
    pub fn seeded() -> Self {
        let mut statistics = HashMap::new();
        statistics.insert(
            "item_sold_minecraft".to_string(),
            Statistics {
                total: 38_000_000,
                last24h: 12_000,
                sale_velocity_per_seconds: 0.5,
            },
        );
        statistics.insert(
            "prepaid_card_redeemed_minecraft".to_string(),
            Statistics {
                total: 2_000_000,
                last24h: 400,
                sale_velocity_per_seconds: 0.25,
            },
        );

        Self {
            accounts: vec![
                Account::new(uuid_from("069a79f444e94726a5befca90e38aaf5"), "Notch"),
                Account::new(uuid_from("853c80ef3c3749fdaa49938b674adae6"), "jeb_"),
                Account::new(uuid_from("5f3c2b1a9d4e4c6b8a1f00000a11ce00"), "Alicia")
                    .renamed("Alice", 1_500_000_000_000),
                Account::new(uuid_from("b0b000000000400080000000000b0b00"), "Bob"),
            ],
            statistics,
            status: [
                "minecraft.net",
                "session.minecraft.net",
                "account.mojang.com",
                "authserver.mojang.com",
                "sessionserver.mojang.com",
                "api.mojang.com",
                "textures.minecraft.net",
                "mojang.com",
            ]
            .into_iter()
            .map(|service| (service.to_string(), "green".to_string()))
            .collect(),
            forced_status: None,
        }
    }

    /// Answer every request with `status` until cleared with `None`.
    pub fn set_forced_status(&mut self, status: Option<u16>) {
        self.forced_status = status;
    }

    /// Set the health reported for `service`, adding it if absent.
    pub fn set_service_status(&mut self, service: &str, state: &str) {
        match self.status.iter_mut().find(|(name, _)| name == service) {
            Some(entry) => entry.1 = state.to_string(),
            None => self.status.push((service.to_string(), state.to_string())),
        }
    }

    fn find_current(&self, name: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|account| account.current_name().eq_ignore_ascii_case(name))
    }
}

fn uuid_from(hex: &str) -> Uuid {
    Uuid::try_parse(hex).unwrap_or_default()
}

pub type Db = Arc<RwLock<MockState>>;

pub fn shared(state: MockState) -> Db {
    Arc::new(RwLock::new(state))
}

pub fn app() -> Router {
    app_with(shared(MockState::seeded()))
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/users/profiles/minecraft/{username}", get(profile_at))
        .route("/user/profiles/{uuid}/names", get(name_history))
        .route("/profiles/minecraft", post(bulk_profiles))
        .route("/orders/statistics", post(statistics))
        .route("/check", get(check))
        .layer(middleware::from_fn_with_state(db.clone(), forced_status))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, shared(MockState::seeded())).await
}

pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

async fn forced_status(State(db): State<Db>, request: Request, next: Next) -> Response {
    let forced = db.read().await.forced_status;
    match forced {
        Some(429) => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "error": "TooManyRequestsException",
                "errorMessage": TOO_MANY_REQUESTS_MESSAGE,
            })),
        )
            .into_response(),
        Some(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        None => next.run(request).await,
    }
}

async fn profile_at(
    State(db): State<Db>,
    Path(username): Path<String>,
    Query(query): Query<AtQuery>,
) -> Result<Json<Profile>, StatusCode> {
    let at_millis = query
        .at
        .map_or_else(|| Utc::now().timestamp_millis(), |secs| secs.saturating_mul(1000));
    let state = db.read().await;
    state
        .accounts
        .iter()
        .find(|account| {
            account
                .name_at(at_millis)
                .is_some_and(|name| name.eq_ignore_ascii_case(&username))
        })
        .map(|account| Json(account.profile()))
        .ok_or(StatusCode::NO_CONTENT)
}

async fn name_history(
    State(db): State<Db>,
    Path(raw): Path<String>,
) -> Result<Json<Vec<NameChange>>, StatusCode> {
    if raw.len() != 32 {
        return Err(StatusCode::NO_CONTENT);
    }
    let id = Uuid::try_parse(&raw).map_err(|_| StatusCode::NO_CONTENT)?;
    let state = db.read().await;
    state
        .accounts
        .iter()
        .find(|account| account.id == id)
        .map(|account| Json(account.history.clone()))
        .ok_or(StatusCode::NO_CONTENT)
}

async fn bulk_profiles(
    State(db): State<Db>,
    Json(names): Json<Vec<String>>,
) -> Result<Json<Vec<Profile>>, StatusCode> {
    if names.len() > MAX_BULK_NAMES {
        return Err(StatusCode::BAD_REQUEST);
    }
    let state = db.read().await;
    let profiles = names
        .iter()
        .filter_map(|name| state.find_current(name))
        .map(Account::profile)
        .collect();
    Ok(Json(profiles))
}

async fn statistics(
    State(db): State<Db>,
    Json(input): Json<MetricKeys>,
) -> Result<Json<Statistics>, StatusCode> {
    let state = db.read().await;
    let matched: Vec<&Statistics> = input
        .metric_keys
        .iter()
        .filter_map(|key| state.statistics.get(key))
        .collect();
    if matched.is_empty() {
        return Err(StatusCode::NO_CONTENT);
    }
    let summary = matched.iter().fold(Statistics::default(), |acc, stats| Statistics {
        total: acc.total + stats.total,
        last24h: acc.last24h + stats.last24h,
        sale_velocity_per_seconds: acc.sale_velocity_per_seconds + stats.sale_velocity_per_seconds,
    });
    Ok(Json(summary))
}

async fn check(State(db): State<Db>) -> Json<Vec<HashMap<String, String>>> {
    let state = db.read().await;
    Json(
        state
            .status
            .iter()
            .map(|(service, health)| HashMap::from([(service.clone(), health.clone())]))
            .collect(),
    )
}
