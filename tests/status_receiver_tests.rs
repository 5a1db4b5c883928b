//! Integration tests for the overlay status receivers over real loopback HTTP
//!
//! These tests verify:
//! - POST to the module's route updates the snapshot and answers "OK"
//! - Malformed bodies are still answered "OK" and keep the old snapshot
//! - Other paths and methods get 404
//! - Port conflicts are reported to the caller

use karlauncher::HudKind;
use karlauncher::hud::{KeystrokeState, StatusReceiver, StatusStore, serve, spawn_receiver};
use karlauncher::models::{ArmorStatus, FpsStatus, PotionStatus, TargetStatus};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

fn loopback() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 0))
}

/// Send one request with `Connection: close` and return status code and body
async fn send(addr: SocketAddr, method: &str, path: &str, body: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "{} {} HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        method,
        path,
        addr,
        body.len(),
        body
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    let status = response
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap_or_else(|| panic!("Malformed response: {:?}", response));
    let body = response
        .split_once("\r\n\r\n")
        .map(|(_, body)| body.to_string())
        .unwrap_or_default();
    (status, body)
}

#[tokio::test]
async fn test_target_update_replaces_snapshot() {
    let store = StatusStore::new(TargetStatus::default());
    let receiver = StatusReceiver::replacing(HudKind::Target.route(), store.clone());
    let handle = spawn_receiver(loopback(), receiver).unwrap();

    let (status, body) = send(
        handle.local_addr(),
        "POST",
        "/update_target",
        r#"{"name": "Herobrine", "health": 15.0, "max_health": 20.0, "distance": 3.25}"#,
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body, "OK");
    let snapshot = store.snapshot();
    assert_eq!(snapshot.name, "Herobrine");
    assert_eq!(snapshot.health_ratio(), Some(0.75));

    handle.stop();
}

#[tokio::test]
async fn test_malformed_body_still_ok() {
    let store = StatusStore::new(FpsStatus { fps: 144 });
    let receiver = StatusReceiver::replacing(HudKind::Fps.route(), store.clone());
    let handle = spawn_receiver(loopback(), receiver).unwrap();
    let addr = handle.local_addr();

    let (status, body) = send(addr, "POST", "/update_fps", "{fps: oops").await;
    assert_eq!((status, body.as_str()), (200, "OK"));

    let (status, _) = send(addr, "POST", "/update_fps", r#"{"fps": "sixty"}"#).await;
    assert_eq!(status, 200);

    assert_eq!(store.snapshot().fps, 144);
}

#[tokio::test]
async fn test_missing_fields_take_defaults() {
    let store = StatusStore::new(PotionStatus::default());
    let receiver = StatusReceiver::replacing(HudKind::Potion.route(), store.clone());
    let handle = spawn_receiver(loopback(), receiver).unwrap();
    let addr = handle.local_addr();

    send(
        addr,
        "POST",
        "/update_potions",
        r#"{"effects": [{"name": "Speed II", "duration": "1:30"}, {"name": "Regeneration"}]}"#,
    )
    .await;

    let effects = store.snapshot().effects;
    assert_eq!(effects.len(), 2);
    assert_eq!(effects[1].name, "Regeneration");
    assert_eq!(effects[1].duration, "");

    // An empty object clears the list
    send(addr, "POST", "/update_potions", "{}").await;
    assert!(store.snapshot().effects.is_empty());
}

#[tokio::test]
async fn test_wrong_path_and_method_are_404() {
    let store = StatusStore::new(ArmorStatus::default());
    let receiver = StatusReceiver::replacing(HudKind::Armor.route(), store.clone());
    let handle = spawn_receiver(loopback(), receiver).unwrap();
    let addr = handle.local_addr();

    let (status, _) = send(addr, "GET", "/update_armor", "").await;
    assert_eq!(status, 404);

    let (status, _) = send(addr, "POST", "/update_fps", r#"{"fps": 1}"#).await;
    assert_eq!(status, 404);

    let (status, _) = send(addr, "POST", "/update_armor/extra", "{}").await;
    assert_eq!(status, 404);

    assert!(store.snapshot().slots.is_empty());
}

#[tokio::test]
async fn test_key_events_accumulate() {
    let store = StatusStore::new(KeystrokeState::new());
    let receiver = StatusReceiver::keystrokes(HudKind::Keystrokes.route(), store.clone());
    let handle = spawn_receiver(loopback(), receiver).unwrap();
    let addr = handle.local_addr();

    for _ in 0..3 {
        send(addr, "POST", "/update_keys", r#"{"input": "lmb", "pressed": true}"#).await;
    }
    send(addr, "POST", "/update_keys", r#"{"input": "w"}"#).await;

    let view = store.with(|state| state.view_at(Instant::now()));
    assert_eq!(view.lmb_cps, "3cps");
    assert!(view.w);
    assert!(!view.close_requested);
}

#[test]
fn test_port_conflict_is_reported() {
    let first = spawn_receiver(
        loopback(),
        StatusReceiver::replacing("/update_fps", StatusStore::new(FpsStatus::default())),
    )
    .unwrap();

    let second = spawn_receiver(
        first.local_addr(),
        StatusReceiver::replacing("/update_fps", StatusStore::new(FpsStatus::default())),
    );

    let err = second.err().expect("second bind on the same port must fail");
    assert!(format!("{:#}", err).contains("Failed to bind"));
}

#[test]
fn test_serve_stops_on_shutdown() {
    tokio_test::block_on(async {
        let listener = TcpListener::bind(loopback()).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let store = StatusStore::new(FpsStatus::default());
        let receiver = StatusReceiver::replacing("/update_fps", store.clone());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve(listener, receiver, async {
            let _ = shutdown_rx.await;
        }));

        let (status, _) = send(addr, "POST", "/update_fps", r#"{"fps": 61}"#).await;
        assert_eq!(status, 200);
        assert_eq!(store.snapshot().fps, 61);

        shutdown_tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server did not stop")
            .unwrap();
        assert!(result.is_ok());
    });
}
