//! Every client operation against the live mock server.
//!
//! # Design
//! Each test starts its own mock server on a random port so fault injection
//! in one test cannot leak into another, then talks to it over real HTTP
//! through `UreqTransport`.

use mock_server::{run_with, shared, Db, MockState};
use mojang_core::{ApiError, ClientConfig, MetricKey, MojangClient, UreqTransport};
use uuid::Uuid;

const NOTCH_ID: &str = "069a79f4-44e9-4726-a5be-fca90e38aaf5";
const ALICE_ID: &str = "5f3c2b1a-9d4e-4c6b-8a1f-00000a11ce00";

/// Start a seeded mock server and return its base URL plus a state handle.
fn start_server() -> (String, Db) {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let db = shared(MockState::seeded());
    let server_db = db.clone();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            run_with(listener, server_db).await
        })
        .unwrap();
    });

    (format!("http://{addr}"), db)
}

fn client(base_url: &str) -> MojangClient<UreqTransport> {
    MojangClient::from_config(&ClientConfig::single_host(base_url)).unwrap()
}

#[test]
fn status_check_follows_reported_health() {
    let (base_url, db) = start_server();
    let client = client(&base_url);

    assert!(client.check_status());
    assert_eq!(client.status_report().unwrap()["minecraft.net"], "green");

    db.blocking_write().set_service_status("api.mojang.com", "yellow");
    assert!(!client.check_status());

    db.blocking_write().set_service_status("api.mojang.com", "green");
    db.blocking_write().set_forced_status(Some(500));
    assert!(!client.check_status());
}

#[test]
fn player_lookup_by_name() {
    let (base_url, _db) = start_server();
    let client = client(&base_url);

    let notch = client.get_player("Notch").unwrap().unwrap();
    assert_eq!(notch.id, NOTCH_ID.parse::<Uuid>().unwrap());
    assert_eq!(notch.name, "Notch");

    assert!(client.get_player("NonexistentUser12345").unwrap().is_none());
}

#[test]
fn player_lookup_at_timestamp() {
    let (base_url, _db) = start_server();
    let client = client(&base_url);

    let alice = client.get_player_at("Alicia", 1_400_000_000).unwrap().unwrap();
    assert_eq!(alice.id, ALICE_ID.parse::<Uuid>().unwrap());
    assert_eq!(alice.name, "Alice");

    assert!(client.get_player("Alicia").unwrap().is_none());
}

#[test]
fn username_is_sent_as_a_single_path_segment() {
    let (base_url, _db) = start_server();
    let client = client(&base_url);

    assert!(client.get_player("Not ch").unwrap().is_none());
    assert!(client.get_player("Notch#fragment").unwrap().is_none());
    assert!(client.get_player("Notch/names").unwrap().is_none());

    // Would resolve to Alicia's account if the name could add its own `at`.
    let injected = "Alicia?at=1400000000&x=";
    assert!(client.get_player(injected).unwrap().is_none());
    assert!(client.get_player_at(injected, 1_400_000_000).unwrap().is_none());
}

#[test]
fn player_lookup_by_uuid_uses_current_name() {
    let (base_url, _db) = start_server();
    let client = client(&base_url);
    let alice_id: Uuid = ALICE_ID.parse().unwrap();

    let alice = client.get_player_by_uuid(alice_id).unwrap().unwrap();
    assert_eq!(alice.id, alice_id);
    assert_eq!(alice.name, "Alice");

    assert!(client.get_player_by_uuid(Uuid::nil()).unwrap().is_none());
}

#[test]
fn player_lookup_by_uuid_at_timestamp() {
    let (base_url, _db) = start_server();
    let client = client(&base_url);
    let alice_id: Uuid = ALICE_ID.parse().unwrap();

    // Nobody was called "Alice" before the rename.
    assert!(client.get_player_at_by_uuid(alice_id, 1_400_000_000).unwrap().is_none());

    let alice = client
        .get_player_at_by_uuid(alice_id, 1_600_000_000)
        .unwrap()
        .unwrap();
    assert_eq!(alice.id, alice_id);

    assert!(client.get_player_at_by_uuid(Uuid::nil(), 1_600_000_000).unwrap().is_none());
}

#[test]
fn name_history() {
    let (base_url, _db) = start_server();
    let client = client(&base_url);

    let history = client.get_name_history(ALICE_ID.parse().unwrap()).unwrap();
    let names: Vec<&str> = history.iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(names, ["Alicia", "Alice"]);
    assert_eq!(history[1].changed_to_at, Some(1_500_000_000_000));

    assert!(client.get_name_history(Uuid::new_v4()).unwrap().is_empty());
}

#[test]
fn bulk_lookup() {
    let (base_url, _db) = start_server();
    let client = client(&base_url);

    let players = client.get_players(&["Alice", "Bob"]).unwrap();
    assert_eq!(players.len(), 2);
    assert_eq!(players["Alice"].id, ALICE_ID.parse::<Uuid>().unwrap());
    assert!(players.contains_key("Bob"));

    let players = client.get_players(&["alice", "Nobody"]).unwrap();
    assert_eq!(players.len(), 1);
    assert!(players.contains_key("Alice"));
}

#[test]
fn bulk_lookup_over_limit_is_api_down() {
    let (base_url, _db) = start_server();
    let client = client(&base_url);

    let names: Vec<String> = (0..11).map(|i| format!("player{i}")).collect();
    assert!(matches!(client.get_players(names.as_slice()), Err(ApiError::ApiDown(_))));
}

#[test]
fn statistics() {
    let (base_url, _db) = start_server();
    let client = client(&base_url);

    let stats = client.get_statistics().unwrap().unwrap();
    assert_eq!(stats.total, 38_000_000);
    assert_eq!(stats.last24h, 12_000);

    let combined = client
        .get_statistics_for(&[
            MetricKey::ItemSoldMinecraft,
            MetricKey::PrepaidCardRedeemedMinecraft,
        ])
        .unwrap()
        .unwrap();
    assert_eq!(combined.total, 40_000_000);

    assert!(client.get_statistics_for(&[MetricKey::ItemSoldScrolls]).unwrap().is_none());
}

#[test]
fn rate_limit_is_raised_not_folded() {
    let (base_url, db) = start_server();
    let client = client(&base_url);
    db.blocking_write().set_forced_status(Some(429));

    assert!(matches!(client.get_player("Notch"), Err(ApiError::RateLimited)));
    assert!(matches!(client.get_name_history(Uuid::nil()), Err(ApiError::RateLimited)));
    assert!(matches!(client.get_players(&["Notch"]), Err(ApiError::RateLimited)));
    assert!(matches!(client.get_statistics(), Err(ApiError::RateLimited)));
    assert!(!client.check_status());

    db.blocking_write().set_forced_status(None);
    assert!(client.get_player("Notch").unwrap().is_some());
}

#[test]
fn server_error_is_api_down() {
    let (base_url, db) = start_server();
    let client = client(&base_url);
    db.blocking_write().set_forced_status(Some(503));

    let err = client.get_player("Notch").unwrap_err();
    assert!(matches!(err, ApiError::ApiDown(ref msg) if msg.contains("503")));
}

#[test]
fn unreachable_host_is_api_down() {
    // Bind then drop to get a port nobody listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = client(&format!("http://127.0.0.1:{port}"));

    assert!(matches!(client.get_player("Notch"), Err(ApiError::ApiDown(_))));
    assert!(matches!(client.get_player_by_uuid(Uuid::nil()), Err(ApiError::ApiDown(_))));
    assert!(!client.check_status());
}
